//! Subscriber setup: `EnvFilter` plus an OpenTelemetry layer.

use super::exporter;
use crate::infrastructure::paths;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Service name recorded on every span.
pub const SERVICE_NAME: &str = "Emberwatch";

/// File name of the trace log inside the data directory.
pub const TRACE_FILE_NAME: &str = "emberwatch-otlp.json";

/// Installs the global subscriber at `level` (an `EnvFilter` directive).
///
/// Traces go to `emberwatch-otlp.json` in the plugin data directory. If the
/// directory cannot be created tracing stays off; observability never keeps
/// the plugin from starting. Later calls are no-ops.
///
/// # Example
///
/// ```no_run
/// emberwatch::observability::init_tracing("debug");
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(level: &str) {
    let data_dir = paths::get_data_dir();
    if std::fs::create_dir_all(&data_dir).is_err() {
        return;
    }

    let resource = Resource::new(vec![opentelemetry::KeyValue::new(
        "service.name",
        SERVICE_NAME,
    )]);
    let provider = exporter::file_tracer_provider(data_dir.join(TRACE_FILE_NAME), resource);
    let tracer = provider.tracer(SERVICE_NAME);

    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(OpenTelemetryLayer::new(tracer))
        .try_init();
}
