//! Application layer: state, events and actions.
//!
//! This module holds the pure part of the core. The engine loop feeds events
//! in, applies the returned state and executes the returned actions.
//!
//! # Architecture
//!
//! ```text
//! Input / Timer / Transport → Events → handle_event → State change → Publish
//!                                           ↓
//!                                        Actions → timers, searches, activity
//! ```
//!
//! # Modules
//!
//! - [`actions`]: side effect commands emitted by the event handler
//! - [`activity`]: transient loading/error signal
//! - [`handler`]: event processing and state transitions
//! - [`state`]: immutable `AppState` snapshot and mark set
//! - [`throttle`]: trailing-edge throttle bookkeeping

pub mod actions;
pub mod activity;
pub mod handler;
pub mod state;
pub mod throttle;

pub use actions::Action;
pub use activity::ActivityState;
pub use handler::{handle_event, EngineState, Event};
pub use state::{AppState, MarkSet};
pub use throttle::Throttle;
