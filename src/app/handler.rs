//! Event handling and state transition logic.
//!
//! This module implements the reducer at the heart of the engine: every input
//! (a search term, a mark toggle, a throttle tick, a finished search) becomes
//! an [`Event`], and [`handle_event`] turns it into a state change plus a list
//! of [`Action`]s. The reducer is synchronous and deterministic, so it can be
//! tested without a runtime; the engine loop owns timers and the network.
//!
//! # Event Types
//!
//! - **Input**: `SearchTerm`, `ToggleMark`
//! - **Timer**: `ThrottleElapsed`
//! - **Transport**: `SearchCompleted`
//!
//! # Ordering
//!
//! Every dispatched search gets the next sequence number. A completion only
//! replaces `apps` when its number is above the highest one applied so far,
//! so a slow early search can never overwrite a faster later one. Stale
//! completions still end the loading indicator, but a stale failure is not
//! reported.
//!
//! # Example
//!
//! ```rust
//! use storesearch::app::{handle_event, Action, EngineState, Event};
//! use std::time::Duration;
//!
//! let mut state = EngineState::new(Duration::from_millis(200));
//! let (changed, actions) = handle_event(&mut state, Event::SearchTerm(Some("calc".into())));
//! assert!(!changed);
//! assert_eq!(actions, vec![Action::ArmThrottle(Duration::from_millis(200))]);
//! ```

use super::activity::ActivityState;
use super::actions::Action;
use super::state::AppState;
use super::throttle::Throttle;
use crate::domain::{AppStoreApp, SearchFailed, TrackId};
use std::time::Duration;

/// Inputs to the reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Raw text from the search field; `None` and empty text are ignored.
    SearchTerm(Option<String>),

    /// Flip the mark on a track id.
    ToggleMark(TrackId),

    /// The throttle window armed earlier has closed.
    ThrottleElapsed,

    /// A dispatched search finished.
    SearchCompleted {
        /// Sequence number assigned at dispatch.
        seq: u64,
        /// Results in server order, or the failure.
        result: Result<Vec<AppStoreApp>, SearchFailed>,
    },
}

/// Everything the engine loop owns between events.
///
/// `app` is the published snapshot; the rest is bookkeeping that never leaves
/// the loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineState {
    /// Snapshot seen by subscribers.
    pub app: AppState,

    /// Length of the throttle window.
    pub throttle_window: Duration,

    /// Pending term and window flag.
    pub throttle: Throttle,

    /// Sequence number of the most recently dispatched search.
    pub dispatched_seq: u64,

    /// Highest sequence number whose results were applied; `0` before any.
    pub applied_seq: u64,
}

impl EngineState {
    #[must_use]
    pub fn new(throttle_window: Duration) -> Self {
        Self {
            app: AppState::default(),
            throttle_window,
            throttle: Throttle::default(),
            dispatched_seq: 0,
            applied_seq: 0,
        }
    }
}

/// Processes an event, updates state and returns actions to execute.
///
/// # Returns
///
/// `(changed, actions)`. `changed` is `true` when `state.app` now differs
/// from its previous value and must be published. Actions must be executed in
/// order.
///
/// # Tracing
///
/// Each call creates a debug-level span carrying the event kind.
pub fn handle_event(state: &mut EngineState, event: Event) -> (bool, Vec<Action>) {
    let _span = tracing::debug_span!("handle_event", event = event_name(&event)).entered();

    match event {
        Event::SearchTerm(term) => {
            let Some(term) = term.filter(|t| !t.is_empty()) else {
                tracing::trace!("ignoring empty search term");
                return (false, vec![]);
            };

            tracing::trace!(term = %term, "search term offered");
            if state.throttle.offer(term) {
                (false, vec![Action::ArmThrottle(state.throttle_window)])
            } else {
                (false, vec![])
            }
        }
        Event::ThrottleElapsed => {
            let Some(term) = state.throttle.close_window() else {
                return (false, vec![]);
            };

            state.dispatched_seq += 1;
            let seq = state.dispatched_seq;
            tracing::debug!(seq = seq, term = %term, "dispatching search");

            (
                false,
                vec![
                    Action::PublishActivity(ActivityState::Loading(true)),
                    Action::DispatchSearch { seq, term },
                ],
            )
        }
        Event::ToggleMark(id) => {
            state.app = state.app.with_toggled_mark(id);
            tracing::debug!(track_id = id, marked = state.app.is_marked(id), "mark toggled");
            (true, vec![])
        }
        Event::SearchCompleted { seq, result } => {
            let mut actions = vec![Action::PublishActivity(ActivityState::Loading(false))];

            match result {
                Ok(apps) if seq > state.applied_seq => {
                    state.applied_seq = seq;
                    let next = state.app.with_results(apps);
                    let changed = next != state.app;
                    tracing::debug!(seq = seq, count = next.apps().len(), changed = changed, "search results applied");
                    state.app = next;
                    (changed, actions)
                }
                Ok(apps) => {
                    tracing::debug!(
                        seq = seq,
                        applied_seq = state.applied_seq,
                        count = apps.len(),
                        "discarding stale search results"
                    );
                    (false, actions)
                }
                Err(err) if seq > state.applied_seq => {
                    tracing::warn!(seq = seq, error = %err, "search failed");
                    actions.push(Action::PublishActivity(ActivityState::Failed(err)));
                    (false, actions)
                }
                Err(err) => {
                    tracing::debug!(
                        seq = seq,
                        applied_seq = state.applied_seq,
                        error = %err,
                        "discarding stale search failure"
                    );
                    (false, actions)
                }
            }
        }
    }
}

const fn event_name(event: &Event) -> &'static str {
    match event {
        Event::SearchTerm(_) => "search_term",
        Event::ToggleMark(_) => "toggle_mark",
        Event::ThrottleElapsed => "throttle_elapsed",
        Event::SearchCompleted { .. } => "search_completed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(200);

    fn apps(ids: &[TrackId]) -> Vec<AppStoreApp> {
        ids.iter().map(|id| AppStoreApp::new(*id, format!("app-{id}"))).collect()
    }

    fn term(s: &str) -> Event {
        Event::SearchTerm(Some(s.to_string()))
    }

    fn dispatch(state: &mut EngineState, s: &str) -> u64 {
        handle_event(state, term(s));
        let (_, actions) = handle_event(state, Event::ThrottleElapsed);
        match actions.last() {
            Some(Action::DispatchSearch { seq, .. }) => *seq,
            other => panic!("expected dispatch, got {other:?}"),
        }
    }

    #[test]
    fn empty_and_missing_terms_do_nothing() {
        let mut state = EngineState::new(WINDOW);
        let before = state.clone();

        assert_eq!(handle_event(&mut state, Event::SearchTerm(None)), (false, vec![]));
        assert_eq!(handle_event(&mut state, term("")), (false, vec![]));
        assert_eq!(state, before);
    }

    #[test]
    fn burst_dispatches_only_the_last_term() {
        let mut state = EngineState::new(WINDOW);

        let (_, first) = handle_event(&mut state, term("c"));
        assert_eq!(first, vec![Action::ArmThrottle(WINDOW)]);
        assert_eq!(handle_event(&mut state, term("ca")).1, vec![]);
        assert_eq!(handle_event(&mut state, term("calc")).1, vec![]);

        let (_, actions) = handle_event(&mut state, Event::ThrottleElapsed);
        assert_eq!(
            actions,
            vec![
                Action::PublishActivity(ActivityState::Loading(true)),
                Action::DispatchSearch { seq: 1, term: "calc".to_string() },
            ]
        );

        assert_eq!(handle_event(&mut state, Event::ThrottleElapsed).1, vec![]);
    }

    #[test]
    fn successful_completion_replaces_apps() {
        let mut state = EngineState::new(WINDOW);
        let seq = dispatch(&mut state, "calculator");

        let (changed, actions) = handle_event(
            &mut state,
            Event::SearchCompleted { seq, result: Ok(apps(&[1, 2])) },
        );
        assert!(changed);
        assert_eq!(actions, vec![Action::PublishActivity(ActivityState::Loading(false))]);
        assert_eq!(state.app.apps(), apps(&[1, 2]).as_slice());
    }

    #[test]
    fn identical_results_do_not_count_as_a_change() {
        let mut state = EngineState::new(WINDOW);
        let first = dispatch(&mut state, "a");
        handle_event(&mut state, Event::SearchCompleted { seq: first, result: Ok(apps(&[1])) });

        let second = dispatch(&mut state, "a");
        let (changed, _) =
            handle_event(&mut state, Event::SearchCompleted { seq: second, result: Ok(apps(&[1])) });
        assert!(!changed);
    }

    #[test]
    fn late_results_from_an_older_search_are_discarded() {
        let mut state = EngineState::new(WINDOW);
        let a = dispatch(&mut state, "a");
        let b = dispatch(&mut state, "b");
        assert!(b > a);

        handle_event(&mut state, Event::SearchCompleted { seq: b, result: Ok(apps(&[2])) });
        let (changed, actions) =
            handle_event(&mut state, Event::SearchCompleted { seq: a, result: Ok(apps(&[1])) });

        assert!(!changed);
        assert_eq!(actions, vec![Action::PublishActivity(ActivityState::Loading(false))]);
        assert_eq!(state.app.apps(), apps(&[2]).as_slice());
    }

    #[test]
    fn failure_reports_after_loading_ends_and_keeps_apps() {
        let mut state = EngineState::new(WINDOW);
        let ok = dispatch(&mut state, "a");
        handle_event(&mut state, Event::SearchCompleted { seq: ok, result: Ok(apps(&[1])) });

        let seq = dispatch(&mut state, "xyz");
        let err = SearchFailed::new("timeout");
        let (changed, actions) =
            handle_event(&mut state, Event::SearchCompleted { seq, result: Err(err.clone()) });

        assert!(!changed);
        assert_eq!(
            actions,
            vec![
                Action::PublishActivity(ActivityState::Loading(false)),
                Action::PublishActivity(ActivityState::Failed(err)),
            ]
        );
        assert_eq!(state.app.apps(), apps(&[1]).as_slice());
    }

    #[test]
    fn failure_from_an_older_search_is_not_reported_over_newer_results() {
        let mut state = EngineState::new(WINDOW);
        let a = dispatch(&mut state, "a");
        let b = dispatch(&mut state, "b");

        handle_event(&mut state, Event::SearchCompleted { seq: b, result: Ok(apps(&[2])) });
        let (changed, actions) = handle_event(
            &mut state,
            Event::SearchCompleted { seq: a, result: Err(SearchFailed::new("a timed out")) },
        );

        assert!(!changed);
        assert_eq!(actions, vec![Action::PublishActivity(ActivityState::Loading(false))]);
        assert_eq!(state.app.apps(), apps(&[2]).as_slice());
        assert_eq!(state.applied_seq, b);
    }

    #[test]
    fn failed_newer_search_does_not_block_older_results() {
        let mut state = EngineState::new(WINDOW);
        let a = dispatch(&mut state, "a");
        let b = dispatch(&mut state, "b");

        handle_event(&mut state, Event::SearchCompleted { seq: b, result: Err(SearchFailed::new("down")) });
        let (changed, _) =
            handle_event(&mut state, Event::SearchCompleted { seq: a, result: Ok(apps(&[1])) });
        assert!(changed);
        assert_eq!(state.app.apps(), apps(&[1]).as_slice());
    }

    #[test]
    fn toggles_always_report_a_change() {
        let mut state = EngineState::new(WINDOW);
        assert_eq!(handle_event(&mut state, Event::ToggleMark(42)), (true, vec![]));
        assert!(state.app.is_marked(42));
        assert_eq!(handle_event(&mut state, Event::ToggleMark(42)), (true, vec![]));
        assert!(!state.app.is_marked(42));
    }

    #[test]
    fn marks_survive_searches() {
        let mut state = EngineState::new(WINDOW);
        handle_event(&mut state, Event::ToggleMark(42));

        let seq = dispatch(&mut state, "unrelated");
        handle_event(&mut state, Event::SearchCompleted { seq, result: Ok(apps(&[7])) });
        assert!(state.app.is_marked(42));

        let seq = dispatch(&mut state, "includes");
        handle_event(&mut state, Event::SearchCompleted { seq, result: Ok(apps(&[42])) });
        assert!(state.app.is_marked(42));
    }
}
