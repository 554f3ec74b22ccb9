//! Tracing subscriber setup.

use super::exporter;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Service name recorded on every exported span.
const SERVICE_NAME: &str = "storesearch";

/// Installs the global tracing subscriber.
///
/// The filter comes from `RUST_LOG` when set, otherwise from
/// `config.trace_level` (default `"info"`). Spans are exported as JSON lines
/// to `config.trace_file`, or to `spans.jsonl` in the data directory.
///
/// Never fails: when the output directory cannot be created, or a subscriber
/// is already installed, the call is a no-op. Returns whether this call
/// installed the subscriber.
pub fn init_tracing(config: &Config) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(config.trace_level.as_deref().unwrap_or("info"))
    });

    let trace_file = config
        .trace_file
        .clone()
        .unwrap_or_else(|| crate::infrastructure::get_data_dir().join("spans.jsonl"));

    if let Some(parent) = trace_file.parent() {
        if std::fs::create_dir_all(parent).is_err() {
            return false;
        }
    }

    let provider = exporter::create_tracer_provider(trace_file, SERVICE_NAME);
    let otel_layer = OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME));

    tracing_subscriber::registry()
        .with(filter)
        .with(otel_layer)
        .try_init()
        .is_ok()
}
