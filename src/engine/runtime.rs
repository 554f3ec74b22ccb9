//! The state engine and its event loop.
//!
//! [`StateEngine`] is the handle callers hold. It owns the sending side of the
//! loop's inbox and the two output broadcasters. The loop itself runs as a
//! Tokio task and is the only writer of state: it takes one message at a time,
//! runs it through [`handle_event`], publishes the new snapshot if it changed
//! and executes the returned actions.
//!
//! ```text
//!  submit_search_term ─┐                       ┌─► observe_app_state
//!  toggle_mark ────────┼─► inbox ─► loop ──────┤
//!  throttle timer ─────┤            │          └─► observe_activity
//!  search task ────────┘            └─► spawns timers / searches
//! ```
//!
//! Timers and searches run as separate tasks and report back through the same
//! inbox, so their effects are serialized with caller input. The loop keeps
//! only a weak handle on its inbox; once the engine is dropped and in-flight
//! tasks have reported, the loop exits.

use super::broadcast::{Broadcaster, Subscription};
use super::messages::EngineMessage;
use crate::app::{handle_event, Action, ActivityState, AppState, EngineState};
use crate::client::SearchClient;
use crate::domain::{Result, StoreSearchError, TrackId};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::Instrument;

/// Default throttle window for search input.
pub const DEFAULT_THROTTLE: Duration = Duration::from_millis(200);

/// Tunables of the engine loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    /// Trailing-edge throttle window applied to search terms.
    pub throttle: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            throttle: DEFAULT_THROTTLE,
        }
    }
}

/// Handle to a running engine.
///
/// Cheap to share behind an `Arc`; every method takes `&self` and may be
/// called from any thread.
#[derive(Debug)]
pub struct StateEngine {
    inbox: mpsc::UnboundedSender<EngineMessage>,
    app_state: Arc<Broadcaster<AppState>>,
    activity: Arc<Broadcaster<ActivityState>>,
}

impl StateEngine {
    /// Starts an engine on the current Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`StoreSearchError::Runtime`] when called outside a runtime.
    pub fn new(client: Arc<dyn SearchClient>, settings: EngineSettings) -> Result<Self> {
        let handle = tokio::runtime::Handle::try_current()
            .map_err(|e| StoreSearchError::Runtime(e.to_string()))?;

        let (tx, rx) = mpsc::unbounded_channel();
        let app_state = Arc::new(Broadcaster::replaying(AppState::default()));
        let activity = Arc::new(Broadcaster::transient());

        let event_loop = EngineLoop {
            state: EngineState::new(settings.throttle),
            inbox: tx.downgrade(),
            client,
            app_state: Arc::clone(&app_state),
            activity: Arc::clone(&activity),
        };
        handle.spawn(event_loop.run(rx));

        tracing::debug!(throttle_ms = settings.throttle.as_millis() as u64, "state engine started");

        Ok(Self {
            inbox: tx,
            app_state,
            activity,
        })
    }

    /// Offers raw search text.
    ///
    /// `None` and empty strings are dropped. Other terms go through the
    /// throttle; the last term of each window is searched.
    pub fn submit_search_term(&self, term: Option<&str>) {
        self.send(EngineMessage::search_term(term.map(str::to_owned)));
    }

    /// Flips the mark on `id` and publishes the resulting snapshot.
    ///
    /// Toggles are never throttled or merged.
    pub fn toggle_mark(&self, id: TrackId) {
        self.send(EngineMessage::toggle_mark(id));
    }

    /// Snapshot stream: replays the current state, then every change.
    pub fn observe_app_state(&self) -> Subscription<AppState> {
        self.app_state.subscribe()
    }

    /// Activity stream: only signals emitted after subscribing.
    pub fn observe_activity(&self) -> Subscription<ActivityState> {
        self.activity.subscribe()
    }

    /// Latest published snapshot.
    #[must_use]
    pub fn current_state(&self) -> AppState {
        self.app_state.latest().unwrap_or_default()
    }

    fn send(&self, message: EngineMessage) {
        if self.inbox.send(message).is_err() {
            tracing::error!("engine loop is gone, dropping input");
        }
    }
}

struct EngineLoop {
    state: EngineState,
    inbox: mpsc::WeakUnboundedSender<EngineMessage>,
    client: Arc<dyn SearchClient>,
    app_state: Arc<Broadcaster<AppState>>,
    activity: Arc<Broadcaster<ActivityState>>,
}

impl EngineLoop {
    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<EngineMessage>) {
        while let Some(message) = rx.recv().await {
            self.process(message);
        }
        tracing::debug!("state engine stopped");
    }

    fn process(&mut self, message: EngineMessage) {
        let _context_guard = message.trace_context.as_ref().and_then(|ctx| ctx.attach());
        let _span = tracing::debug_span!("engine_process").entered();

        let (changed, actions) = handle_event(&mut self.state, message.event);
        if changed && !self.app_state.publish(self.state.app.clone()) {
            tracing::trace!("snapshot equal to previous, not published");
        }

        for action in actions {
            self.execute(action);
        }
    }

    fn execute(&self, action: Action) {
        match action {
            Action::PublishActivity(activity) => {
                self.activity.publish(activity);
            }
            Action::ArmThrottle(window) => {
                let Some(tx) = self.inbox.upgrade() else {
                    return;
                };
                tokio::spawn(
                    async move {
                        tokio::time::sleep(window).await;
                        let _ = tx.send(EngineMessage::throttle_elapsed());
                    }
                    .in_current_span(),
                );
            }
            Action::DispatchSearch { seq, term } => {
                let Some(tx) = self.inbox.upgrade() else {
                    return;
                };
                let client = Arc::clone(&self.client);
                let span = tracing::debug_span!("search", seq = seq, term = %term);
                tokio::spawn(
                    async move {
                        let result = client.search(&term).await;
                        let _ = tx.send(EngineMessage::search_completed(seq, result));
                    }
                    .instrument(span),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AppStoreApp, SearchFailed};
    use futures_util::future::BoxFuture;

    struct Echo;

    impl SearchClient for Echo {
        fn search<'a>(&'a self, term: &'a str) -> BoxFuture<'a, std::result::Result<Vec<AppStoreApp>, SearchFailed>> {
            Box::pin(async move { Ok(vec![AppStoreApp::new(1, term)]) })
        }
    }

    #[test]
    fn requires_a_runtime() {
        let err = StateEngine::new(Arc::new(Echo), EngineSettings::default()).unwrap_err();
        assert!(matches!(err, StoreSearchError::Runtime(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn new_subscribers_get_current_snapshot() {
        let engine = StateEngine::new(Arc::new(Echo), EngineSettings::default()).unwrap();
        let mut states = engine.observe_app_state();
        assert_eq!(states.recv().await, Some(AppState::default()));

        engine.submit_search_term(Some("calc"));
        let next = states.recv().await.unwrap();
        assert_eq!(next.apps()[0].track_name, "calc");

        let mut late = engine.observe_app_state();
        assert_eq!(late.recv().await, Some(next.clone()));
        assert_eq!(engine.current_state(), next);
    }
}
