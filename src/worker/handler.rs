//! Worker-side request processing.
//!
//! Runs in Zellij's worker instance, off the render loop. Analysis blocks
//! here for the classifier's full latency; progress is streamed back through
//! the emitter while it runs. Every failure becomes a response, so nothing
//! propagates out of [`EmberwatchWorker::handle_message`].

use crate::classifier::{CancellationToken, Classifier, ImageInput, MockClassifier};
use crate::domain::error::{EmberwatchError, Result};
use crate::domain::{AnalysisError, ImageKind, ThemeMode};
use crate::infrastructure::{paths, scan_image_files};
use crate::storage::{JsonPreferences, PreferenceStore};
use crate::worker::{WorkerMessage, WorkerResponse};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name of the preference store inside the data directory.
pub const PREFERENCES_FILE: &str = "preferences.json";

/// State owned by the worker instance.
pub struct EmberwatchWorker {
    classifier: Box<dyn Classifier>,
    preferences: Option<Box<dyn PreferenceStore>>,
    preferences_path: PathBuf,
    tracing_initialized: bool,
    shutdown: CancellationToken,
}

impl Default for EmberwatchWorker {
    fn default() -> Self {
        Self::new(Box::new(MockClassifier::default()))
    }
}

impl std::fmt::Debug for EmberwatchWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmberwatchWorker")
            .field("classifier", &self.classifier.name())
            .field("preferences_path", &self.preferences_path)
            .finish_non_exhaustive()
    }
}

impl EmberwatchWorker {
    /// Creates a worker around `classifier`; preferences open lazily.
    #[must_use]
    pub fn new(classifier: Box<dyn Classifier>) -> Self {
        Self {
            classifier,
            preferences: None,
            preferences_path: paths::get_data_dir().join(PREFERENCES_FILE),
            tracing_initialized: false,
            shutdown: CancellationToken::new(),
        }
    }

    /// Cancels every analysis derived from this worker, now and later.
    ///
    /// Called when the worker instance is torn down. Any analysis still
    /// running stops at its next check, and new `Analyze` requests fail with
    /// [`AnalysisError::Cancelled`] without reading the file.
    pub fn shutdown(&self) {
        tracing::debug!("worker shutting down");
        self.shutdown.cancel();
    }

    /// Uses `store` instead of the JSON file in the data directory.
    #[must_use]
    pub fn with_preferences(mut self, store: Box<dyn PreferenceStore>) -> Self {
        self.preferences = Some(store);
        self
    }

    /// Skips tracing setup on `Configure`; for embedding in tests.
    #[must_use]
    pub fn without_tracing(mut self) -> Self {
        self.tracing_initialized = true;
        self
    }

    fn preferences(&mut self) -> Result<&mut Box<dyn PreferenceStore>> {
        if self.preferences.is_none() {
            let store = JsonPreferences::new(self.preferences_path.clone())?;
            self.preferences = Some(Box::new(store));
        }
        self.preferences
            .as_mut()
            .ok_or_else(|| EmberwatchError::Worker("preferences not initialized".to_string()))
    }

    /// Processes one request, passing every response to `emit` in order.
    pub fn handle_message(&mut self, message: WorkerMessage, emit: &mut dyn FnMut(WorkerResponse)) {
        let _context_guard = attach_parent_trace_context(&message);
        let _span = tracing::debug_span!("worker_handle_message", kind = message.kind()).entered();

        match message {
            WorkerMessage::Configure {
                classifier,
                trace_level,
                ..
            } => {
                if !self.tracing_initialized {
                    crate::observability::init_tracing(&trace_level);
                    self.tracing_initialized = true;
                }
                tracing::debug!(settings = ?classifier, "installing mock classifier");
                self.classifier = Box::new(MockClassifier::new(classifier));
                emit(WorkerResponse::Configured {
                    classifier: self.classifier.name().to_string(),
                });
            }
            WorkerMessage::Analyze {
                request_id,
                path,
                timeout_ms,
                ..
            } => self.analyze(request_id, Path::new(&path), timeout_ms, emit),
            WorkerMessage::ScanDirectory { dir, max_depth, .. } => {
                emit(match scan_image_files(Path::new(&dir), max_depth) {
                    Ok(entries) => WorkerResponse::DirectoryScanned { dir, entries },
                    Err(e) => WorkerResponse::Error {
                        message: format!("Cannot list {}: {e}", paths::strip_host_prefix(&dir)),
                    },
                });
            }
            WorkerMessage::LoadPreferences { .. } => {
                emit(match self.preferences().and_then(|store| store.load()) {
                    Ok(record) => WorkerResponse::PreferencesLoaded {
                        theme: record.theme,
                    },
                    Err(e) => storage_error("load preferences", &e),
                });
            }
            WorkerMessage::SaveTheme { mode, .. } => emit(self.save_theme(mode)),
        }
    }

    fn save_theme(&mut self, mode: ThemeMode) -> WorkerResponse {
        let now = chrono::Utc::now().timestamp();
        match self
            .preferences()
            .and_then(|store| store.save_theme(mode, now))
        {
            Ok(()) => WorkerResponse::PreferencesSaved { theme: mode },
            Err(e) => storage_error("save theme", &e),
        }
    }

    fn analyze(
        &mut self,
        request_id: u64,
        path: &Path,
        timeout_ms: u64,
        emit: &mut dyn FnMut(WorkerResponse),
    ) {
        let _span = tracing::info_span!(
            "analyze",
            request_id,
            path = %path.display(),
            classifier = self.classifier.name()
        )
        .entered();

        let token = self
            .shutdown
            .child_with_timeout(Duration::from_millis(timeout_ms));
        if let Err(error) = token.check() {
            tracing::info!(error = %error, "analysis refused");
            emit(WorkerResponse::AnalysisFailed { request_id, error });
            return;
        }

        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::info!(error = %e, "image unreadable");
                emit(WorkerResponse::AnalysisFailed {
                    request_id,
                    error: AnalysisError::Read(e.to_string()),
                });
                return;
            }
        };

        let input = ImageInput {
            name: crate::domain::candidate::display_name(path),
            kind: path
                .extension()
                .and_then(|e| e.to_str())
                .and_then(ImageKind::from_extension),
            bytes,
        };
        let mut last_reported: Option<u8> = None;
        let mut on_progress = |percent: u8| {
            let percent = percent.min(100);
            if last_reported.map_or(true, |last| percent > last) {
                last_reported = Some(percent);
                emit(WorkerResponse::AnalysisProgress {
                    request_id,
                    percent,
                });
            }
        };

        let outcome = self.classifier.classify(&input, &token, &mut on_progress);
        match outcome {
            Ok(verdict) => {
                tracing::info!(status = ?verdict.status, confidence = verdict.confidence, "analysis completed");
                emit(WorkerResponse::AnalysisCompleted {
                    request_id,
                    verdict,
                });
            }
            Err(error) => {
                tracing::info!(error = %error, "analysis failed");
                emit(WorkerResponse::AnalysisFailed { request_id, error });
            }
        }
    }
}

impl Drop for EmberwatchWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn storage_error(operation: &str, error: &EmberwatchError) -> WorkerResponse {
    tracing::debug!(operation, error = %error, "storage operation failed");
    WorkerResponse::Error {
        message: format!("{operation}: {error}"),
    }
}

/// Re-attaches the plugin's span as remote parent for the duration of a request.
fn attach_parent_trace_context(message: &WorkerMessage) -> Option<opentelemetry::ContextGuard> {
    use opentelemetry::trace::{
        SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState,
    };

    let trace_context = message.trace_context()?;
    let trace_id = TraceId::from_hex(&trace_context.trace_id).ok()?;
    let span_id = SpanId::from_hex(&trace_context.parent_span_id).ok()?;

    let span_context = SpanContext::new(
        trace_id,
        span_id,
        TraceFlags::SAMPLED,
        true,
        TraceState::default(),
    );

    Some(
        opentelemetry::Context::current()
            .with_remote_span_context(span_context)
            .attach(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::MockSettings;
    use crate::domain::Verdict;
    use crate::test_support;

    fn no_sleep(_: Duration) {}

    fn worker(dir: &Path) -> EmberwatchWorker {
        let classifier = MockClassifier::new(MockSettings {
            latency_ms: 300,
            step_ms: 100,
            failure_rate: 0.0,
            seed: Some(11),
        })
        .with_sleeper(no_sleep);
        let store = JsonPreferences::new(dir.join(PREFERENCES_FILE)).expect("store");
        EmberwatchWorker::new(Box::new(classifier))
            .with_preferences(Box::new(store))
            .without_tracing()
    }

    fn run(worker: &mut EmberwatchWorker, message: WorkerMessage) -> Vec<WorkerResponse> {
        let mut responses = Vec::new();
        worker.handle_message(message, &mut |r| responses.push(r));
        responses
    }

    #[test]
    fn analysis_streams_progress_then_completes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let image = test_support::write(dir.path(), "ridge.jpg", &test_support::jpeg_bytes(16, 16));
        let mut worker = worker(dir.path());

        let responses = run(
            &mut worker,
            WorkerMessage::analyze(5, image.to_string_lossy().into_owned(), 30_000),
        );

        assert_eq!(
            &responses[..3],
            &[
                WorkerResponse::AnalysisProgress { request_id: 5, percent: 33 },
                WorkerResponse::AnalysisProgress { request_id: 5, percent: 66 },
                WorkerResponse::AnalysisProgress { request_id: 5, percent: 100 },
            ]
        );
        match &responses[3] {
            WorkerResponse::AnalysisCompleted {
                request_id: 5,
                verdict: Verdict { status: Some(_), confidence },
            } => assert!((70..=99).contains(confidence)),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(responses.len(), 4);
    }

    #[test]
    fn missing_file_fails_with_read_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut worker = worker(dir.path());
        let responses = run(
            &mut worker,
            WorkerMessage::analyze(1, dir.path().join("gone.png").to_string_lossy().into_owned(), 1_000),
        );
        assert!(matches!(
            responses.as_slice(),
            [WorkerResponse::AnalysisFailed { request_id: 1, error: AnalysisError::Read(_) }]
        ));
    }

    #[test]
    fn zero_timeout_fails_with_timed_out() {
        let dir = tempfile::tempdir().expect("tempdir");
        let image = test_support::write(dir.path(), "a.png", &test_support::png_bytes(4, 4));
        let mut worker = worker(dir.path());
        let responses = run(
            &mut worker,
            WorkerMessage::analyze(2, image.to_string_lossy().into_owned(), 0),
        );
        assert_eq!(
            responses,
            vec![WorkerResponse::AnalysisFailed {
                request_id: 2,
                error: AnalysisError::TimedOut { after_ms: 0 },
            }]
        );
    }

    #[test]
    fn shutdown_cancels_later_analyses() {
        let dir = tempfile::tempdir().expect("tempdir");
        let image = test_support::write(dir.path(), "a.png", &test_support::png_bytes(4, 4));
        let mut worker = worker(dir.path());

        worker.shutdown();
        let responses = run(
            &mut worker,
            WorkerMessage::analyze(4, image.to_string_lossy().into_owned(), 30_000),
        );

        assert_eq!(
            responses,
            vec![WorkerResponse::AnalysisFailed {
                request_id: 4,
                error: AnalysisError::Cancelled,
            }]
        );
    }

    #[test]
    fn configure_installs_new_settings() {
        let dir = tempfile::tempdir().expect("tempdir");
        let image = test_support::write(dir.path(), "a.png", &test_support::png_bytes(4, 4));
        let mut worker = worker(dir.path());

        let responses = run(
            &mut worker,
            WorkerMessage::configure(
                MockSettings {
                    latency_ms: 0,
                    failure_rate: 1.0,
                    seed: Some(1),
                    ..MockSettings::default()
                },
                "debug".to_string(),
            ),
        );
        assert_eq!(
            responses,
            vec![WorkerResponse::Configured { classifier: "mock".to_string() }]
        );

        let responses = run(
            &mut worker,
            WorkerMessage::analyze(3, image.to_string_lossy().into_owned(), 1_000),
        );
        assert!(matches!(
            responses.last(),
            Some(WorkerResponse::AnalysisFailed { error: AnalysisError::Classifier(_), .. })
        ));
    }

    #[test]
    fn theme_round_trips_through_preferences() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut worker = worker(dir.path());

        assert_eq!(
            run(&mut worker, WorkerMessage::load_preferences()),
            vec![WorkerResponse::PreferencesLoaded { theme: None }]
        );
        assert_eq!(
            run(&mut worker, WorkerMessage::save_theme(ThemeMode::Dark)),
            vec![WorkerResponse::PreferencesSaved { theme: ThemeMode::Dark }]
        );
        assert_eq!(
            run(&mut worker, WorkerMessage::load_preferences()),
            vec![WorkerResponse::PreferencesLoaded { theme: Some(ThemeMode::Dark) }]
        );
    }

    #[test]
    fn scan_reports_entries_or_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        test_support::write(dir.path(), "a.png", b"x");
        let mut worker = worker(dir.path());

        let root = dir.path().to_string_lossy().into_owned();
        match run(&mut worker, WorkerMessage::scan_directory(root.clone(), 1)).as_slice() {
            [WorkerResponse::DirectoryScanned { dir, entries }] => {
                assert_eq!(dir, &root);
                assert_eq!(entries.len(), 1);
            }
            other => panic!("unexpected {other:?}"),
        }

        let missing = dir.path().join("nope").to_string_lossy().into_owned();
        assert!(matches!(
            run(&mut worker, WorkerMessage::scan_directory(missing, 1)).as_slice(),
            [WorkerResponse::Error { .. }]
        ));
    }
}
