//! Storesearch: a reactive state core for App Store search screens.
//!
//! The crate turns an intermittent stream of search-field input into a
//! consistent, de-duplicated application state:
//! - Search input is throttled (trailing edge, 200ms by default)
//! - Each surviving term triggers one iTunes Search API lookup
//! - Results and user "marks" merge into one immutable [`AppState`] snapshot
//! - Snapshots and a separate activity signal are broadcast to subscribers
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Presentation layer (not in this crate)             │
//! └─────────────────────────────────────────────────────┘
//!        │ submit_search_term / toggle_mark   ▲ observe_*
//! ┌─────────────────────────────────────────────────────┐
//! │  Engine Layer (engine/)                             │  ← Single writer
//! │  - Inbox + event loop                               │
//! │  - Throttle timers, search tasks                    │
//! │  - Broadcast with replay-latest                     │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ App Layer     │   │ Client Layer  │   │ UI Models     │
//! │ (app/)        │   │ (client/)     │   │ (ui/)         │
//! │ - Reducer     │   │ - SearchClient│   │ - ViewModel   │
//! │ - AppState    │   │ - iTunes HTTP │   │ - Rows        │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain & Infrastructure                            │
//! │  - AppStoreApp, errors (domain/)                    │
//! │  - Data paths (infrastructure/)                     │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - tracing + OpenTelemetry, JSON-lines span export  │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: state snapshot, events, actions and the reducer
//! - [`client`]: the `SearchClient` seam and its iTunes implementation
//! - [`domain`]: `AppStoreApp` and error types
//! - [`engine`]: the `StateEngine` event loop and output streams
//! - [`infrastructure`]: filesystem locations
//! - [`ui`]: view models derived from snapshots
//! - [`observability`]: tracing setup
//!
//! # Ordering Guarantees
//!
//! - Every dispatched search gets a sequence number; a result is applied only
//!   if its number is higher than every result applied before, so a slow
//!   early search never overwrites a newer one.
//! - Toggles are applied one by one in arrival order, each published.
//! - The snapshot stream never repeats a value back to back.
//!
//! # Example
//!
//! ```no_run
//! use storesearch::{initialize, Config};
//!
//! # async fn run() -> storesearch::Result<()> {
//! let engine = initialize(&Config::default())?;
//! let mut states = engine.observe_app_state();
//!
//! engine.submit_search_term(Some("calculator"));
//! while let Some(state) = states.recv().await {
//!     println!("{} apps", state.apps().len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod client;
pub mod domain;
pub mod engine;
pub mod infrastructure;
pub mod observability;
pub mod ui;

pub use app::{ActivityState, AppState, MarkSet};
pub use client::{ClientSettings, ItunesSearchClient, SearchClient};
pub use domain::{AppStoreApp, Result, SearchFailed, StoreSearchError};
pub use engine::{EngineSettings, StateEngine, Subscription};

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Largest page size the iTunes Search API accepts.
const MAX_LIMIT: u32 = 200;

/// Runtime configuration.
///
/// Region, limit and endpoint are fixed per process; they never come from the
/// search field.
///
/// # Example
///
/// ```toml
/// base_url = "https://itunes.apple.com/search"
/// region = "gb"
/// limit = 25
/// throttle_ms = 300
/// request_timeout_ms = 10000
/// trace_level = "debug"
/// trace_file = "/tmp/storesearch-spans.jsonl"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Search endpoint. Default: the public iTunes Search API.
    pub base_url: String,

    /// Two-letter store front code. Default: `"us"`
    pub region: String,

    /// Results requested per search, 1 to 200. Default: 20
    pub limit: u32,

    /// Throttle window for search input in milliseconds. Default: 200
    pub throttle_ms: u64,

    /// Per-request timeout in milliseconds. Default: none
    pub request_timeout_ms: Option<u64>,

    /// Tracing filter such as `info` or `storesearch=debug`.
    ///
    /// When unset, [`initialize`] leaves the global subscriber alone.
    pub trace_level: Option<String>,

    /// Span export file. Default: `spans.jsonl` in the data directory.
    pub trace_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: client::DEFAULT_BASE_URL.to_string(),
            region: client::DEFAULT_REGION.to_string(),
            limit: client::DEFAULT_LIMIT,
            throttle_ms: engine::DEFAULT_THROTTLE.as_millis() as u64,
            request_timeout_ms: None,
            trace_level: None,
            trace_file: None,
        }
    }
}

impl Config {
    /// Builds a configuration from loosely typed string pairs.
    ///
    /// Unparseable numbers fall back to their defaults, and unknown keys are
    /// ignored. Suited to environment maps or host-provided settings.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use storesearch::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("region".to_string(), "jp".to_string());
    /// map.insert("limit".to_string(), "abc".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.region, "jp");
    /// assert_eq!(config.limit, 20);
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();
        let text = |key: &str| {
            map.get(key)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(String::from)
        };

        Self {
            base_url: text("base_url").unwrap_or(defaults.base_url),
            region: text("region").unwrap_or(defaults.region),
            limit: text("limit")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.limit),
            throttle_ms: text("throttle_ms")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.throttle_ms),
            request_timeout_ms: text("request_timeout_ms").and_then(|s| s.parse().ok()),
            trace_level: text("trace_level"),
            trace_file: text("trace_file").map(|p| PathBuf::from(infrastructure::expand_tilde(&p))),
        }
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreSearchError::Config`] on syntax errors, unknown keys or
    /// values that fail [`validate`](Self::validate).
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreSearchError::Io`] when the file cannot be read, or any
    /// error from [`from_toml_str`](Self::from_toml_str).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = ?path, "loading configuration");
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`StoreSearchError::Config`] naming the offending key.
    pub fn validate(&self) -> Result<()> {
        if self.limit == 0 || self.limit > MAX_LIMIT {
            return Err(StoreSearchError::Config(format!(
                "limit must be between 1 and {MAX_LIMIT}, got {}",
                self.limit
            )));
        }
        if self.region.len() != 2 || !self.region.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(StoreSearchError::Config(format!(
                "region must be a two-letter country code, got {:?}",
                self.region
            )));
        }
        url::Url::parse(&self.base_url)
            .map_err(|e| StoreSearchError::Config(format!("base_url: {e}")))?;
        Ok(())
    }

    #[must_use]
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.base_url.clone(),
            region: self.region.to_ascii_lowercase(),
            limit: self.limit,
            timeout: self.request_timeout_ms.map(Duration::from_millis),
            ..ClientSettings::default()
        }
    }

    #[must_use]
    pub const fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            throttle: Duration::from_millis(self.throttle_ms),
        }
    }
}

/// Wires tracing, the iTunes client and a running engine.
///
/// Must be called inside a Tokio runtime.
///
/// # Errors
///
/// Fails when the configuration is invalid, the HTTP client cannot be built,
/// or no runtime is available.
pub fn initialize(config: &Config) -> Result<StateEngine> {
    config.validate()?;
    if config.trace_level.is_some() {
        observability::init_tracing(config);
    }

    tracing::debug!(region = %config.region, limit = config.limit, "initializing storesearch");

    let client = ItunesSearchClient::new(config.client_settings())?;
    StateEngine::new(Arc::new(client), config.engine_settings())
}
