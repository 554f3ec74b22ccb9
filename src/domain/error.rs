//! Error types for the search core.
//!
//! Two layers exist. [`SearchFailed`] is the single error kind a search attempt
//! can surface; it travels on the activity stream, so it is `Clone` and carries
//! only a rendered cause. [`StoreSearchError`] covers everything else the crate
//! can fail at (configuration, I/O, runtime wiring) and is what the crate-level
//! [`Result`] alias uses.

use thiserror::Error;

/// A failed remote lookup.
///
/// Malformed query construction, network failures, non-success HTTP status
/// and response decoding all collapse into this one kind. The engine reports
/// it once on the activity stream and never inspects the cause.
///
/// # Examples
///
/// ```
/// use storesearch::domain::SearchFailed;
///
/// let err = SearchFailed::new("timeout");
/// assert_eq!(err.to_string(), "search failed: timeout");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("search failed: {cause}")]
pub struct SearchFailed {
    /// Human-readable description of the underlying failure.
    pub cause: String,
}

impl SearchFailed {
    /// Wraps any displayable cause.
    pub fn new(cause: impl std::fmt::Display) -> Self {
        Self {
            cause: cause.to_string(),
        }
    }
}

impl From<reqwest::Error> for SearchFailed {
    fn from(err: reqwest::Error) -> Self {
        Self::new(err)
    }
}

impl From<url::ParseError> for SearchFailed {
    fn from(err: url::ParseError) -> Self {
        Self::new(format!("invalid search url: {err}"))
    }
}

impl From<serde_json::Error> for SearchFailed {
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("malformed response: {err}"))
    }
}

/// The main error type for crate operations outside a single search.
#[derive(Debug, Error)]
pub enum StoreSearchError {
    /// A search attempt failed.
    #[error(transparent)]
    Search(#[from] SearchFailed),

    /// Filesystem or I/O operation failed.
    ///
    /// Raised while reading a configuration file or preparing the data
    /// directory for trace output.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The engine could not be started.
    ///
    /// Occurs when a [`StateEngine`](crate::engine::StateEngine) is built
    /// outside a Tokio runtime.
    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl From<toml::de::Error> for StoreSearchError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// A specialized `Result` type for crate operations.
pub type Result<T> = std::result::Result<T, StoreSearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_errors_become_search_failures() {
        let err = serde_json::from_str::<u32>("not json").unwrap_err();
        let failed = SearchFailed::from(err);
        assert!(failed.cause.starts_with("malformed response"));
    }

    #[test]
    fn url_errors_become_search_failures() {
        let err = url::Url::parse("::nope").unwrap_err();
        let failed: SearchFailed = err.into();
        assert!(failed.cause.starts_with("invalid search url"));
    }

    #[test]
    fn search_failures_pass_through_crate_error() {
        let err = StoreSearchError::from(SearchFailed::new("offline"));
        assert_eq!(err.to_string(), "search failed: offline");
    }
}
