//! Engine inbox message types.
//!
//! Everything that reaches the engine loop, whether from a caller, a throttle
//! timer or a finished search task, arrives as an [`EngineMessage`]. Each
//! message carries the OpenTelemetry context of the span that produced it, so a
//! search completion processed by the loop is linked to the dispatch span even
//! though it crossed a task boundary.

use crate::app::Event;
use crate::domain::{AppStoreApp, SearchFailed, TrackId};

/// Tracing context captured when a message is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Span ID of the sender, used as remote parent.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Captures the trace and span IDs of the current tracing span.
    ///
    /// Returns `None` when no OpenTelemetry layer is installed or the current
    /// span is not sampled.
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let otel_context = tracing::Span::current().context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        span_context.is_valid().then(|| Self {
            trace_id: format!("{:032x}", span_context.trace_id()),
            parent_span_id: format!("{:016x}", span_context.span_id()),
        })
    }

    /// Makes this context the active OpenTelemetry parent.
    ///
    /// The returned guard must be dropped before the next `.await`.
    pub fn attach(&self) -> Option<opentelemetry::ContextGuard> {
        use opentelemetry::trace::{SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState};

        let trace_id = TraceId::from_hex(&self.trace_id).ok()?;
        let span_id = SpanId::from_hex(&self.parent_span_id).ok()?;
        let span_context = SpanContext::new(trace_id, span_id, TraceFlags::SAMPLED, true, TraceState::default());

        Some(opentelemetry::Context::current().with_remote_span_context(span_context).attach())
    }
}

/// An [`Event`] in transit to the engine loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineMessage {
    pub event: Event,
    pub trace_context: Option<TraceContext>,
}

/// Generates constructors that attach the current trace context.
macro_rules! engine_message_builders {
    (
        $(
            $builder_name:ident($($field:ident: $ty:ty),*) => $event:expr
        ),* $(,)?
    ) => {
        impl EngineMessage {
            $(
                #[doc = concat!("Create a `", stringify!($builder_name), "` message with current trace context")]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self {
                        event: $event,
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

engine_message_builders! {
    search_term(term: Option<String>) => Event::SearchTerm(term),
    toggle_mark(id: TrackId) => Event::ToggleMark(id),
    throttle_elapsed() => Event::ThrottleElapsed,
    search_completed(seq: u64, result: Result<Vec<AppStoreApp>, SearchFailed>) => Event::SearchCompleted { seq, result },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_wrap_events_without_active_tracer() {
        let msg = EngineMessage::toggle_mark(7);
        assert_eq!(msg.event, Event::ToggleMark(7));
        assert!(msg.trace_context.is_none());

        let msg = EngineMessage::search_term(Some("calc".to_string()));
        assert_eq!(msg.event, Event::SearchTerm(Some("calc".to_string())));
    }

    #[test]
    fn malformed_context_does_not_attach() {
        let ctx = TraceContext {
            trace_id: "zz".to_string(),
            parent_span_id: "00".to_string(),
        };
        assert!(ctx.attach().is_none());
    }
}
