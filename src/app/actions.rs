//! Actions representing side effects to be executed by the engine loop.
//!
//! The event handler never touches timers, the network or subscribers. It
//! returns a `Vec<Action>` and the engine loop carries them out in order.
//!
//! # Example
//!
//! ```rust
//! use storesearch::app::Action;
//!
//! let actions = vec![Action::DispatchSearch { seq: 1, term: "calculator".to_string() }];
//! assert_eq!(actions.len(), 1);
//! ```

use super::activity::ActivityState;
use std::time::Duration;

/// Commands produced by [`handle_event`](super::handle_event).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Start the throttle timer; when it elapses the loop must feed
    /// `Event::ThrottleElapsed` back in.
    ArmThrottle(Duration),

    /// Run a remote search and report back with
    /// `Event::SearchCompleted { seq, .. }`.
    DispatchSearch {
        /// Dispatch sequence number assigned to this search.
        seq: u64,
        /// Non-empty query term.
        term: String,
    },

    /// Emit a value on the activity stream.
    PublishActivity(ActivityState),
}
