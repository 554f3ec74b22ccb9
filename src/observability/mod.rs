//! OpenTelemetry-based observability with file export.
//!
//! ```text
//! tracing spans → tracing-opentelemetry → SDK tracer → JsonLinesExporter → spans.jsonl
//! ```
//!
//! Each finished span becomes one JSON line in a size-rotated file. Search
//! completions carry the dispatching span's context through the engine inbox
//! (see [`TraceContext`](crate::engine::TraceContext)), so a search and the
//! state update it caused share a trace.
//!
//! # Configuration
//!
//! 1. `RUST_LOG` (highest priority)
//! 2. `trace_level` in [`Config`](crate::Config)
//! 3. Default: `"info"`

mod exporter;
mod init;
mod rotating_writer;

pub use init::init_tracing;
