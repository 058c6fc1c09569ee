//! Worker message types for plugin ⇄ worker communication.
//!
//! Messages travel as JSON through Zellij's plugin/worker IPC. Every request
//! carries an optional [`TraceContext`] so spans opened by the worker are
//! parented to the plugin span that sent the request.

use crate::classifier::MockSettings;
use crate::domain::{AnalysisError, BrowseEntry, ThemeMode, Verdict};
use serde::{Deserialize, Serialize};

/// Distributed tracing context for cross-instance span propagation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Parent span ID for linking spans across instances.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Captures the trace and span IDs of the current tracing span.
    ///
    /// Returns `None` when there is no valid OpenTelemetry context, e.g. when
    /// tracing was never initialized.
    #[must_use]
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let otel_context = tracing::Span::current().context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if !span_context.is_valid() {
            return None;
        }

        Some(Self {
            trace_id: format!("{:032x}", span_context.trace_id()),
            parent_span_id: format!("{:016x}", span_context.span_id()),
        })
    }
}

/// Generates constructors that attach the current trace context.
macro_rules! worker_message_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl WorkerMessage {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " message with current trace context")]
                #[must_use]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

worker_message_builders! {
    configure(Configure { classifier: MockSettings, trace_level: String }),
    analyze(Analyze { request_id: u64, path: String, timeout_ms: u64 }),
    scan_directory(ScanDirectory { dir: String, max_depth: usize }),
    load_preferences(LoadPreferences {}),
    save_theme(SaveTheme { mode: ThemeMode }),
}

/// Requests from the plugin to the worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorkerMessage {
    /// Installs classifier settings and the worker's trace level.
    ///
    /// Sent once at plugin load, before any other message.
    Configure {
        /// Settings for the mock classifier.
        classifier: MockSettings,

        /// `EnvFilter` directive for the worker's tracing.
        trace_level: String,

        /// Trace context for linking spans across instances.
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Classifies the image at `path`.
    Analyze {
        /// Ticket issued by the lifecycle controller; echoed in every response.
        request_id: u64,

        /// Sandbox path of the accepted file.
        path: String,

        /// Deadline for the whole analysis.
        timeout_ms: u64,

        /// Trace context for linking spans across instances.
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Lists image-like files for the browser.
    ScanDirectory {
        /// Sandbox path of the directory.
        dir: String,

        /// Maximum recursion depth.
        max_depth: usize,

        /// Trace context for linking spans across instances.
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Reads stored preferences.
    LoadPreferences {
        /// Trace context for linking spans across instances.
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Persists the theme choice.
    SaveTheme {
        /// Mode the user switched to.
        mode: ThemeMode,

        /// Trace context for linking spans across instances.
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
}

impl WorkerMessage {
    /// Trace context carried by any variant.
    #[must_use]
    pub const fn trace_context(&self) -> Option<&TraceContext> {
        match self {
            Self::Configure { trace_context, .. }
            | Self::Analyze { trace_context, .. }
            | Self::ScanDirectory { trace_context, .. }
            | Self::LoadPreferences { trace_context }
            | Self::SaveTheme { trace_context, .. } => trace_context.as_ref(),
        }
    }

    /// Short variant name for spans and logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Configure { .. } => "configure",
            Self::Analyze { .. } => "analyze",
            Self::ScanDirectory { .. } => "scan_directory",
            Self::LoadPreferences { .. } => "load_preferences",
            Self::SaveTheme { .. } => "save_theme",
        }
    }
}

/// Responses from the worker to the plugin.
///
/// An `Analyze` request produces zero or more `AnalysisProgress` responses
/// followed by exactly one `AnalysisCompleted` or `AnalysisFailed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerResponse {
    /// Configuration was applied.
    Configured {
        /// Name of the installed classifier.
        classifier: String,
    },

    /// The classifier reported progress.
    AnalysisProgress {
        /// Ticket of the analysis.
        request_id: u64,
        /// Percentage in `0..=100`.
        percent: u8,
    },

    /// The classifier produced a verdict.
    AnalysisCompleted {
        /// Ticket of the analysis.
        request_id: u64,
        /// Classifier output.
        verdict: Verdict,
    },

    /// The analysis failed.
    AnalysisFailed {
        /// Ticket of the analysis.
        request_id: u64,
        /// What went wrong.
        error: AnalysisError,
    },

    /// A directory listing is ready.
    DirectoryScanned {
        /// Directory that was scanned.
        dir: String,
        /// Image-like files, sorted by relative name.
        entries: Vec<BrowseEntry>,
    },

    /// Stored preferences were read.
    PreferencesLoaded {
        /// Stored theme, if the user ever chose one.
        theme: Option<ThemeMode>,
    },

    /// The theme choice was persisted.
    PreferencesSaved {
        /// Mode that was stored.
        theme: ThemeMode,
    },

    /// A request failed outside the analysis path.
    Error {
        /// Human-readable error message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_context_is_omitted_when_absent() {
        let message = WorkerMessage::LoadPreferences {
            trace_context: None,
        };
        let json = serde_json::to_string(&message).expect("serialize");
        assert_eq!(json, r#"{"LoadPreferences":{}}"#);
        let back: WorkerMessage = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, message);
    }

    #[test]
    fn builders_without_a_subscriber_carry_no_context() {
        let message = WorkerMessage::analyze(7, "/host/a.jpg".to_string(), 30_000);
        assert!(message.trace_context().is_none());
        assert_eq!(message.kind(), "analyze");
    }

    #[test]
    fn analysis_failure_crosses_the_wire() {
        let response = WorkerResponse::AnalysisFailed {
            request_id: 3,
            error: AnalysisError::TimedOut { after_ms: 500 },
        };
        let json = serde_json::to_string(&response).expect("serialize");
        let back: WorkerResponse = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, response);
    }
}
