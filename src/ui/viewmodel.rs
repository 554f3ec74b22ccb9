//! View model types representing renderable list state.
//!
//! View models are derived from an [`AppState`](crate::app::AppState) snapshot
//! via `AppState::compute_viewmodel()`. They hold display-ready data only: the
//! presentation layer maps rows onto cells without consulting the mark set or
//! reformatting record fields.
//!
//! # Example
//!
//! ```rust
//! use storesearch::app::AppState;
//! use storesearch::domain::AppStoreApp;
//!
//! let state = AppState::default().with_results(vec![AppStoreApp::new(1, "Calc Pro")]);
//! let vm = state.compute_viewmodel();
//! assert_eq!(vm.rows[0].title, "Calc Pro");
//! assert!(vm.empty_state().is_none());
//! ```

use crate::domain::TrackId;

/// Complete list view model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel {
    /// One row per search result, in result order.
    pub rows: Vec<AppRow>,

    /// Number of visible rows that are marked.
    pub marked_count: usize,
}

impl ViewModel {
    /// Placeholder text when there is nothing to list.
    #[must_use]
    pub fn empty_state(&self) -> Option<EmptyState> {
        self.rows.is_empty().then(|| EmptyState {
            message: "No apps".to_string(),
            subtitle: "Type a name to search the App Store".to_string(),
        })
    }
}

/// Display information for one search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppRow {
    pub track_id: TrackId,

    /// App name.
    pub title: String,

    /// Primary genre, empty when unknown.
    pub subtitle: String,

    /// Formatted rating such as `"4.5 (1203)"`.
    pub rating: Option<String>,

    /// Icon to load; image fetching is the presentation layer's job.
    pub icon_url: Option<url::Url>,

    /// Whether the user marked this app.
    pub is_marked: bool,
}

/// Empty list message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub message: String,
    pub subtitle: String,
}
