//! OpenTelemetry span exporter writing one JSON object per finished span.
//!
//! Each line looks like:
//!
//! ```json
//! {"trace":"4bf9..","span":"00f0..","parent":"","name":"search","start":"2026-..Z",
//!  "duration_us":1834,"attributes":{"seq":3,"term":"calc"},"status":"ok"}
//! ```

use super::rotating_writer::RotatingWriter;
use futures_util::future::BoxFuture;
use opentelemetry::trace::{SpanId, Status, TraceError};
use opentelemetry::{KeyValue, Value};
use opentelemetry_sdk::export::trace::{ExportResult, SpanData, SpanExporter};
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;
use serde_json::{Map, Value as JsonValue};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

/// Exporter that appends spans to a [`RotatingWriter`].
struct JsonLinesExporter {
    writer: RotatingWriter,
    service: String,
    is_shutdown: AtomicBool,
}

impl SpanExporter for JsonLinesExporter {
    fn export(&mut self, batch: Vec<SpanData>) -> BoxFuture<'static, ExportResult> {
        if self.is_shutdown.load(Ordering::SeqCst) {
            return Box::pin(std::future::ready(Err(TraceError::from("exporter is shut down"))));
        }

        let result = batch
            .iter()
            .map(|span| span_to_json(&self.service, span).to_string())
            .try_for_each(|line| self.writer.write_line(&line))
            .map_err(|e| TraceError::from(e.to_string()));

        Box::pin(std::future::ready(result))
    }

    fn shutdown(&mut self) {
        self.is_shutdown.store(true, Ordering::SeqCst);
    }
}

impl std::fmt::Debug for JsonLinesExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonLinesExporter")
            .field("writer", &self.writer)
            .field("service", &self.service)
            .finish_non_exhaustive()
    }
}

/// Serializes one span to a flat JSON object.
fn span_to_json(service: &str, span: &SpanData) -> JsonValue {
    let parent = if span.parent_span_id == SpanId::INVALID {
        String::new()
    } else {
        format!("{:016x}", span.parent_span_id)
    };
    let start = chrono::DateTime::<chrono::Utc>::from(span.start_time);
    let duration_us = span
        .end_time
        .duration_since(span.start_time)
        .map_or(0, |d| d.as_micros() as u64);
    let status = match &span.status {
        Status::Unset => JsonValue::from("unset"),
        Status::Ok => JsonValue::from("ok"),
        Status::Error { description } => serde_json::json!({ "error": description.to_string() }),
    };

    serde_json::json!({
        "service": service,
        "trace": format!("{:032x}", span.span_context.trace_id()),
        "span": format!("{:016x}", span.span_context.span_id()),
        "parent": parent,
        "name": span.name,
        "start": start.to_rfc3339(),
        "duration_us": duration_us,
        "attributes": attributes_to_json(&span.attributes),
        "status": status,
    })
}

fn attributes_to_json(attributes: &[KeyValue]) -> JsonValue {
    let map: Map<String, JsonValue> = attributes
        .iter()
        .map(|kv| {
            let value = match &kv.value {
                Value::Bool(b) => JsonValue::from(*b),
                Value::I64(i) => JsonValue::from(*i),
                Value::F64(f) => JsonValue::from(*f),
                Value::String(s) => JsonValue::from(s.as_str()),
                other => JsonValue::from(other.to_string()),
            };
            (kv.key.to_string(), value)
        })
        .collect();
    JsonValue::Object(map)
}

/// Builds a tracer provider that exports every finished span to `file_path`.
///
/// Uses the simple (synchronous) span processor so no background runtime is
/// needed for export.
pub fn create_tracer_provider(file_path: PathBuf, service: &str) -> TracerProvider {
    let exporter = JsonLinesExporter {
        writer: RotatingWriter::new(file_path),
        service: service.to_string(),
        is_shutdown: AtomicBool::new(false),
    };

    let resource = Resource::new(vec![KeyValue::new("service.name", service.to_string())]);

    TracerProvider::builder()
        .with_config(opentelemetry_sdk::trace::Config::default().with_resource(resource))
        .with_simple_exporter(exporter)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry::trace::{Tracer, TracerProvider as _};

    #[test]
    fn finished_spans_land_in_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spans.jsonl");
        let provider = create_tracer_provider(path.clone(), "storesearch-test");

        let tracer = provider.tracer("test");
        tracer.in_span("dispatch", |_cx| {});
        let _ = provider.force_flush();

        let contents = std::fs::read_to_string(&path).unwrap();
        let line: JsonValue = serde_json::from_str(contents.lines().next().unwrap()).unwrap();
        assert_eq!(line["name"], "dispatch");
        assert_eq!(line["service"], "storesearch-test");
        assert_eq!(line["parent"], "");
    }

    #[test]
    fn attributes_keep_their_json_types() {
        let json = attributes_to_json(&[
            KeyValue::new("seq", 3_i64),
            KeyValue::new("term", "calc"),
            KeyValue::new("stale", false),
        ]);
        assert_eq!(json["seq"], 3);
        assert_eq!(json["term"], "calc");
        assert_eq!(json["stale"], false);
    }
}
