//! OpenTelemetry tracing with file-based span export.
//!
//! ```text
//! tracing macros → tracing-opentelemetry → SDK tracer → FileSpanExporter → rotating JSON file
//! ```
//!
//! Spans are written as OTLP/JSON, one batch per line, to
//! `~/.local/share/zellij/emberwatch/emberwatch-otlp.json` (seen as
//! `/host/.local/share/zellij/emberwatch/...` from inside the sandbox). The
//! file rotates at 10 MiB and keeps three backups.
//!
//! The level comes from the `trace_level` plugin option and defaults to
//! `info`. The plugin and its worker each call [`init_tracing`]; worker
//! messages carry a [`TraceContext`](crate::worker::TraceContext) so worker
//! spans join the plugin's trace.
//!
//! # Modules
//!
//! - [`init`]: Subscriber setup
//! - [`exporter`]: File span exporter and tracer provider
//! - [`otlp`]: OTLP/JSON encoding
//! - [`rotating_file`]: Size-rotated line writer

pub mod exporter;
pub mod init;
pub mod otlp;
pub mod rotating_file;

pub use init::{init_tracing, SERVICE_NAME, TRACE_FILE_NAME};
pub use rotating_file::{RotatingFile, RotationPolicy};
