//! HTTP adapter for the iTunes Search API.
//!
//! Builds `GET <base>?term=..&media=software&country=..&limit=..`, checks the
//! status, decodes the JSON envelope and hands back `results`.

use crate::client::backend::SearchClient;
use crate::domain::{AppStoreApp, SearchFailed, SearchResponse};
use futures_util::future::BoxFuture;
use std::time::Duration;
use tracing::Instrument;

/// Public iTunes Search API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://itunes.apple.com/search";

/// Store front queried when none is configured.
pub const DEFAULT_REGION: &str = "us";

/// Maximum number of results requested per search.
pub const DEFAULT_LIMIT: u32 = 20;

/// Media filter; the core only deals with apps.
pub const SOFTWARE_MEDIA: &str = "software";

/// Fixed request parameters for [`ItunesSearchClient`].
///
/// None of these come from user input; they are set once from
/// [`Config`](crate::Config).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub base_url: String,
    pub region: String,
    pub limit: u32,
    pub media: String,
    /// Whole-request timeout. `None` leaves reqwest's default (no timeout).
    pub timeout: Option<Duration>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            region: DEFAULT_REGION.to_string(),
            limit: DEFAULT_LIMIT,
            media: SOFTWARE_MEDIA.to_string(),
            timeout: None,
        }
    }
}

impl ClientSettings {
    /// Builds the full request URL for `term`.
    ///
    /// The term is percent-encoded, so spaces and reserved characters are
    /// safe to pass through.
    ///
    /// # Errors
    ///
    /// Returns [`SearchFailed`] when `base_url` is not a valid URL.
    ///
    /// # Examples
    ///
    /// ```
    /// use storesearch::client::ClientSettings;
    ///
    /// let url = ClientSettings::default().search_url("photo editor")?;
    /// assert_eq!(
    ///     url.as_str(),
    ///     "https://itunes.apple.com/search?term=photo+editor&media=software&country=us&limit=20"
    /// );
    /// # Ok::<(), storesearch::domain::SearchFailed>(())
    /// ```
    pub fn search_url(&self, term: &str) -> Result<url::Url, SearchFailed> {
        let limit = self.limit.to_string();
        let url = url::Url::parse_with_params(
            &self.base_url,
            [
                ("term", term),
                ("media", self.media.as_str()),
                ("country", self.region.as_str()),
                ("limit", limit.as_str()),
            ],
        )?;
        Ok(url)
    }
}

/// [`SearchClient`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ItunesSearchClient {
    settings: ClientSettings,
    http: reqwest::Client,
}

impl ItunesSearchClient {
    /// Creates a client for the given settings.
    ///
    /// # Errors
    ///
    /// Returns [`SearchFailed`] if the underlying HTTP client cannot be built
    /// (for example when the TLS backend fails to initialize).
    pub fn new(settings: ClientSettings) -> Result<Self, SearchFailed> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        Ok(Self { settings, http })
    }

    #[must_use]
    pub const fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    async fn fetch(&self, term: &str) -> Result<Vec<AppStoreApp>, SearchFailed> {
        let url = self.settings.search_url(term)?;
        tracing::debug!(url = %url, "requesting search");

        let response = self.http.get(url).send().await?.error_for_status()?;
        let body = response.bytes().await?;
        let decoded: SearchResponse = serde_json::from_slice(&body)?;

        tracing::debug!(
            result_count = decoded.result_count,
            decoded = decoded.results.len(),
            "search response decoded"
        );
        Ok(decoded.results)
    }
}

impl SearchClient for ItunesSearchClient {
    fn search<'a>(&'a self, term: &'a str) -> BoxFuture<'a, Result<Vec<AppStoreApp>, SearchFailed>> {
        let span = tracing::debug_span!("itunes_search", term = %term);
        Box::pin(self.fetch(term).instrument(span))
    }
}
