//! Transient search feedback.
//!
//! Activity is not part of [`AppState`](super::AppState): it describes the
//! most recent search attempt, not data worth keeping.

use crate::domain::SearchFailed;

/// Outcome signal of the most recent search attempt.
///
/// A search produces `Loading(true)` when dispatched, then `Loading(false)`
/// when it finishes, then `Failed(..)` if it failed. Loading always ends
/// before the error is surfaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityState {
    /// `true` while a search is in flight.
    Loading(bool),

    /// The search failed; state was left untouched.
    Failed(SearchFailed),
}

impl ActivityState {
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading(true))
    }

    #[must_use]
    pub const fn error(&self) -> Option<&SearchFailed> {
        match self {
            Self::Failed(err) => Some(err),
            Self::Loading(_) => None,
        }
    }
}

impl Default for ActivityState {
    fn default() -> Self {
        Self::Loading(false)
    }
}
