//! Snapshot state published to the presentation layer.
//!
//! [`AppState`] is an immutable value: every change produces a new snapshot via
//! one of two pure transitions, [`AppState::with_results`] and
//! [`AppState::with_toggled_mark`]. Because snapshots are compared by value
//! before publishing, both transitions must be free of hidden state.
//!
//! # State Components
//!
//! - **Apps**: the latest completed search result, in server order
//! - **Marks**: track ids the user toggled on, independent of the result list
//!
//! # Example
//!
//! ```rust
//! use storesearch::app::AppState;
//! use storesearch::domain::AppStoreApp;
//!
//! let state = AppState::default()
//!     .with_results(vec![AppStoreApp::new(1, "Calc Pro")])
//!     .with_toggled_mark(1);
//! assert!(state.is_marked(1));
//! assert!(!state.is_marked(2));
//! ```

use crate::domain::{AppStoreApp, TrackId};
use crate::ui::viewmodel::{AppRow, ViewModel};
use std::collections::BTreeSet;

/// Set of marked track ids.
///
/// A missing id reads as unmarked, and toggling a marked id back removes it,
/// so two mark sets that answer every query the same way are also equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct MarkSet {
    marked: BTreeSet<TrackId>,
}

impl MarkSet {
    #[must_use]
    pub fn is_marked(&self, id: TrackId) -> bool {
        self.marked.contains(&id)
    }

    /// Returns a copy with the flag for `id` flipped.
    #[must_use]
    pub fn toggled(&self, id: TrackId) -> Self {
        let mut marked = self.marked.clone();
        if !marked.remove(&id) {
            marked.insert(id);
        }
        Self { marked }
    }

    pub fn iter(&self) -> impl Iterator<Item = TrackId> + '_ {
        self.marked.iter().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.marked.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.marked.is_empty()
    }
}

impl FromIterator<TrackId> for MarkSet {
    fn from_iter<I: IntoIterator<Item = TrackId>>(iter: I) -> Self {
        Self {
            marked: iter.into_iter().collect(),
        }
    }
}

/// Immutable snapshot of everything a subscriber can observe.
///
/// Created empty by the engine and replaced wholesale on every change. The
/// presentation layer only ever receives clones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    apps: Vec<AppStoreApp>,
    marks: MarkSet,
}

impl AppState {
    /// Latest completed search result, in server order.
    #[must_use]
    pub fn apps(&self) -> &[AppStoreApp] {
        &self.apps
    }

    #[must_use]
    pub const fn marks(&self) -> &MarkSet {
        &self.marks
    }

    #[must_use]
    pub fn is_marked(&self, id: TrackId) -> bool {
        self.marks.is_marked(id)
    }

    /// Replaces the result list, keeping every mark.
    #[must_use]
    pub fn with_results(&self, apps: Vec<AppStoreApp>) -> Self {
        Self {
            apps,
            marks: self.marks.clone(),
        }
    }

    /// Flips the mark for `id`, keeping the result list.
    ///
    /// `id` need not be present in [`apps`](Self::apps); the mark is kept for
    /// when it shows up in a later search.
    #[must_use]
    pub fn with_toggled_mark(&self, id: TrackId) -> Self {
        Self {
            apps: self.apps.clone(),
            marks: self.marks.toggled(id),
        }
    }

    /// Marked items among the current results, in result order.
    pub fn marked_apps(&self) -> impl Iterator<Item = &AppStoreApp> + '_ {
        self.apps.iter().filter(|app| self.marks.is_marked(app.track_id))
    }

    /// Computes the list rows a presentation layer renders.
    ///
    /// Each row carries the pre-formatted fields a cell needs plus its mark
    /// flag, so views never consult the mark set themselves.
    #[must_use]
    pub fn compute_viewmodel(&self) -> ViewModel {
        let rows = self
            .apps
            .iter()
            .map(|app| AppRow {
                track_id: app.track_id,
                title: app.track_name.clone(),
                subtitle: app.primary_genre_name.clone().unwrap_or_default(),
                rating: app.display_rating(),
                icon_url: app.icon_url(),
                is_marked: self.marks.is_marked(app.track_id),
            })
            .collect();

        ViewModel {
            rows,
            marked_count: self.marked_apps().count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apps(ids: &[TrackId]) -> Vec<AppStoreApp> {
        ids.iter().map(|id| AppStoreApp::new(*id, format!("app-{id}"))).collect()
    }

    #[test]
    fn toggling_twice_restores_the_original_value() {
        let state = AppState::default();
        let once = state.with_toggled_mark(42);
        assert!(once.is_marked(42));

        let twice = once.with_toggled_mark(42);
        assert!(!twice.is_marked(42));
        assert_eq!(twice, state);
    }

    #[test]
    fn results_replace_apps_and_keep_marks() {
        let state = AppState::default()
            .with_results(apps(&[1, 2]))
            .with_toggled_mark(42);

        let next = state.with_results(apps(&[3]));
        assert_eq!(next.apps(), apps(&[3]).as_slice());
        assert!(next.is_marked(42));
        assert_eq!(state.apps().len(), 2);
    }

    #[test]
    fn toggle_keeps_apps_untouched() {
        let state = AppState::default().with_results(apps(&[1, 2]));
        let next = state.with_toggled_mark(1);
        assert_eq!(next.apps(), state.apps());
        assert_eq!(next.marks().iter().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn marked_apps_follow_result_order() {
        let state = AppState::default()
            .with_toggled_mark(3)
            .with_toggled_mark(1)
            .with_results(apps(&[3, 2, 1]));
        let ids: Vec<_> = state.marked_apps().map(|a| a.track_id).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn viewmodel_rows_carry_mark_flags() {
        let state = AppState::default()
            .with_results(apps(&[1, 2]))
            .with_toggled_mark(2)
            .with_toggled_mark(99);
        let vm = state.compute_viewmodel();

        assert_eq!(vm.rows.len(), 2);
        assert!(!vm.rows[0].is_marked);
        assert!(vm.rows[1].is_marked);
        assert_eq!(vm.rows[1].title, "app-2");
        assert_eq!(vm.marked_count, 1);
    }
}
