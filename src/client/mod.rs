//! Transport layer for remote App Store lookups.
//!
//! # Modules
//!
//! - `backend`: the [`SearchClient`] trait the engine depends on
//! - `itunes`: `reqwest` implementation against the iTunes Search API

pub mod backend;
pub mod itunes;

pub use backend::SearchClient;
pub use itunes::{ClientSettings, ItunesSearchClient, DEFAULT_BASE_URL, DEFAULT_LIMIT, DEFAULT_REGION};
