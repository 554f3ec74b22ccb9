//! Search transport abstraction.
//!
//! This module defines the [`SearchClient`] trait, the one seam between the
//! engine and the network. The engine only ever asks for "the results for this
//! term"; URL construction, region, result limit and decoding belong to the
//! implementation.
//!
//! The trait is object safe (futures are boxed) so the engine can hold an
//! `Arc<dyn SearchClient>` and tests can substitute scripted clients.

use crate::domain::{AppStoreApp, SearchFailed};
use futures_util::future::BoxFuture;

/// Remote lookup of App Store items by free-text term.
///
/// Implementations are stateless from the engine's point of view: every call
/// is independent and may run concurrently with others.
///
/// # Implementations
///
/// - [`ItunesSearchClient`](crate::client::ItunesSearchClient): HTTP client for
///   the public iTunes Search API
///
/// # Examples
///
/// ```
/// use futures_util::future::BoxFuture;
/// use storesearch::client::SearchClient;
/// use storesearch::domain::{AppStoreApp, SearchFailed};
///
/// struct Fixed;
///
/// impl SearchClient for Fixed {
///     fn search<'a>(&'a self, term: &'a str) -> BoxFuture<'a, Result<Vec<AppStoreApp>, SearchFailed>> {
///         Box::pin(async move { Ok(vec![AppStoreApp::new(1, term)]) })
///     }
/// }
/// ```
pub trait SearchClient: Send + Sync {
    /// Looks up `term` and returns results in server order.
    ///
    /// # Errors
    ///
    /// Every failure, whatever its origin, is reported as [`SearchFailed`].
    fn search<'a>(&'a self, term: &'a str) -> BoxFuture<'a, Result<Vec<AppStoreApp>, SearchFailed>>;
}
