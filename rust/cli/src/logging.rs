//! Tracing setup for the binary and a capturing layer for tests.
//!
//! Engine diagnostics (isolated rules, legacy format fallbacks) go to stderr so
//! stdout stays line-delimited JSON.

use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::Level;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

/// Initialize stderr logging. `RUST_LOG` overrides the default `warn` filter.
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn init_logging() {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Structured log entry captured by [`CaptureLogs`]
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: Level,
    pub target: String,
    pub message: String,
    pub fields: Vec<(String, String)>,
}

impl LogEntry {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Collects events in memory so tests can assert on what was logged.
#[derive(Debug, Clone, Default)]
pub struct CaptureLogs {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl CaptureLogs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at_level(&self, level: Level) -> Vec<LogEntry> {
        self.lock()
            .iter()
            .filter(|e| e.level == level)
            .cloned()
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LogEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn into_layer<S>(self) -> CaptureLayer<S>
    where
        S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    {
        CaptureLayer {
            capture: self,
            _phantom: PhantomData,
        }
    }
}

pub struct CaptureLayer<S> {
    capture: CaptureLogs,
    _phantom: PhantomData<S>,
}

impl<S> Layer<S> for CaptureLayer<S>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        self.capture.lock().push(LogEntry {
            level: *metadata.level(),
            target: metadata.target().to_string(),
            message: visitor.message.unwrap_or_default(),
            fields: visitor.fields,
        });
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    fields: Vec<(String, String)>,
}

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        let value_str = format!("{:?}", value);
        if field.name() == "message" {
            self.message = Some(value_str);
        } else {
            self.fields.push((field.name().to_string(), value_str));
        }
    }
}
