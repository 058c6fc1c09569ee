//! Background worker for analysis, directory scans and preferences.
//!
//! Zellij runs the worker as a separate instance that processes messages one
//! at a time. Long operations (the classifier's latency, directory walks,
//! file I/O) happen here so the plugin keeps rendering.
//!
//! # Architecture
//!
//! - `messages`: Request/response protocol types with trace context propagation
//! - `handler`: Request processing, independent of the Zellij runtime

pub mod handler;
pub mod messages;

pub use handler::EmberwatchWorker;
pub use messages::{TraceContext, WorkerMessage, WorkerResponse};
