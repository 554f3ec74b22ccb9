//! Presentation-facing types.
//!
//! Rendering itself lives outside this crate. This module only defines the
//! immutable view models the core derives from its state snapshots.
//!
//! # Modules
//!
//! - [`viewmodel`]: list rows and empty-state text

pub mod viewmodel;

pub use viewmodel::{AppRow, EmptyState, ViewModel};
