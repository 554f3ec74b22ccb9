//! Domain layer: App Store records and error types.
//!
//! Nothing here knows about the engine, the transport or Tokio. The types are
//! plain values shared by every other layer.
//!
//! # Organization
//!
//! - [`app`]: the `AppStoreApp` record and the search response envelope
//! - [`error`]: error types and result aliases
//!
//! # Examples
//!
//! ```
//! use storesearch::domain::{AppStoreApp, SearchFailed};
//!
//! fn lookup(found: bool) -> Result<Vec<AppStoreApp>, SearchFailed> {
//!     if found {
//!         Ok(vec![AppStoreApp::new(1, "Calc Pro")])
//!     } else {
//!         Err(SearchFailed::new("no route to host"))
//!     }
//! }
//! # assert!(lookup(false).is_err());
//! ```

pub mod app;
pub mod error;

pub use app::{AppStoreApp, SearchResponse, TrackId};
pub use error::{Result, SearchFailed, StoreSearchError};
