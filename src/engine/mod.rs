//! Engine layer: the asynchronous orchestrator around the pure reducer.
//!
//! # Architecture
//!
//! - `messages`: inbox message type with trace context propagation
//! - `broadcast`: replay-latest, multi-subscriber output streams
//! - `runtime`: [`StateEngine`] handle and its single-writer event loop

pub mod broadcast;
pub mod messages;
pub mod runtime;

pub use broadcast::{Broadcaster, Subscription};
pub use messages::{EngineMessage, TraceContext};
pub use runtime::{EngineSettings, StateEngine, DEFAULT_THROTTLE};
