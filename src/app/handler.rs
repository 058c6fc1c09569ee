//! Event handling and state transition logic.
//!
//! [`handle_event`] is the only place [`AppState`] changes. It returns
//! whether the pane should re-render plus the actions the shim must run.
//!
//! # Event Types
//!
//! - **Lifecycle**: `Started`, `Tick`
//! - **Commands**: `StartPathEntry`, `OpenBrowser`, `ToggleTheme`,
//!   `RemoveFile`, `NewAnalysis`, `CloseFocus`
//! - **Input**: `Char`, `Backspace`, `Escape`, `Submit`, `KeyDown`, `KeyUp`,
//!   `FocusSearchBar`, `FocusResults`
//! - **Intake**: `FilesOffered`
//! - **Worker**: `WorkerResponse`
//!
//! # Ticks
//!
//! Toast expiry and the analysis watchdog run on a host timer. After every
//! event a single tick is scheduled if something is animating and none is
//! pending.

use super::lifecycle::Settled;
use super::modes::{InputMode, SearchFocus};
use crate::app::{Action, AppState};
use crate::domain::detection::format_timestamp;
use crate::domain::error::Result;
use crate::domain::{AnalysisError, UploadStatus, Verdict};
use crate::infrastructure::resolve_submission;
use crate::intake::IntakeOutcome;
use crate::worker::{WorkerMessage, WorkerResponse};
use std::path::PathBuf;

/// Interval between clock ticks while something animates.
pub const TICK_MS: u64 = 250;

/// Toast shown when an analysis succeeds.
pub const SUCCESS_MESSAGE: &str = "Image analysis complete!";

/// Toast shown when an analysis fails.
pub const FAILURE_MESSAGE: &str = "Failed to analyze image. Please try again.";

/// Events triggered by user input, the host, or worker responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The plugin finished loading.
    Started,
    /// Hides the plugin pane.
    CloseFocus,
    /// Opens path entry, optionally seeded with the key that opened it.
    StartPathEntry {
        /// First character of a dropped or typed path.
        prefill: Option<char>,
    },
    /// Opens the file browser on the configured directory.
    OpenBrowser,
    /// Flips between light and dark.
    ToggleTheme,
    /// Removes the selected file.
    RemoveFile,
    /// Clears a finished analysis so a new file can be offered.
    NewAnalysis,

    /// Text input.
    Char(char),
    /// Deletes the last input character.
    Backspace,
    /// Leaves path entry or the browser.
    Escape,
    /// Submits the path input or the browser selection.
    Submit,
    /// Moves the browser cursor down.
    KeyDown,
    /// Moves the browser cursor up.
    KeyUp,
    /// Focuses the browser filter.
    FocusSearchBar,
    /// Focuses the browser list.
    FocusResults,

    /// Paths offered by a drop, paste or pick.
    FilesOffered(Vec<PathBuf>),

    /// Host timer fired.
    Tick {
        /// Time since the tick was scheduled.
        elapsed_ms: u64,
    },

    /// A response from the background worker.
    WorkerResponse(WorkerResponse),
}

/// Processes an event, mutates application state, and returns actions to execute.
///
/// # Parameters
///
/// * `state` - Mutable reference to application state
/// * `event` - Event to process
///
/// # Returns
///
/// `(should_render, actions)`.
///
/// # Errors
///
/// Returns [`EmberwatchError::InvalidTransition`](crate::EmberwatchError::InvalidTransition)
/// if an event asks the lifecycle for an edge it does not have. State is
/// left unchanged in that case.
///
/// # Example
///
/// ```rust
/// use emberwatch::{handle_event, initialize, Action, Config, Event};
///
/// let mut state = initialize(&Config::default())?;
/// let (render, actions) = handle_event(&mut state, &Event::ToggleTheme)?;
/// assert!(render);
/// assert!(matches!(actions.as_slice(), [Action::PostToWorker(_)]));
/// # Ok::<(), emberwatch::EmberwatchError>(())
/// ```
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    let (should_render, mut actions) = dispatch(state, event)?;
    if let Some(tick) = schedule_tick(state) {
        actions.push(tick);
    }
    Ok((should_render, actions))
}

#[allow(clippy::too_many_lines)]
fn dispatch(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    match event {
        Event::Started => {
            let mut actions = vec![Action::PostToWorker(WorkerMessage::configure(
                state.config.classifier.clone(),
                state.config.trace_level.clone(),
            ))];
            if state.config.persist_theme {
                actions.push(Action::PostToWorker(WorkerMessage::load_preferences()));
            }
            Ok((true, actions))
        }
        Event::CloseFocus => Ok((false, vec![Action::CloseFocus])),
        Event::StartPathEntry { prefill } => {
            if state.input_mode != InputMode::Normal {
                return Ok((false, vec![]));
            }
            tracing::debug!(?prefill, "entering path entry");
            state.input_mode = InputMode::PathEntry;
            state.path_input = prefill.map(String::from).unwrap_or_default();
            Ok((true, vec![]))
        }
        Event::OpenBrowser => {
            let dir = state.config.browse_root().to_string_lossy().into_owned();
            tracing::debug!(%dir, depth = state.config.browse_depth, "opening browser");
            state.input_mode = InputMode::Browse(SearchFocus::Typing);
            state.browser.open(dir.clone());
            Ok((
                true,
                vec![Action::PostToWorker(WorkerMessage::scan_directory(
                    dir,
                    state.config.browse_depth,
                ))],
            ))
        }
        Event::ToggleTheme => {
            let mode = state.themes.toggle();
            state.theme_chosen_by_user = true;
            let actions = if state.config.persist_theme {
                vec![Action::PostToWorker(WorkerMessage::save_theme(mode))]
            } else {
                vec![]
            };
            Ok((true, actions))
        }
        Event::RemoveFile => {
            if !state.intake.remove(state.lifecycle.status()) {
                return Ok((false, vec![]));
            }
            state.lifecycle.reset()?;
            tracing::debug!("file removed");
            Ok((true, vec![]))
        }
        Event::NewAnalysis => {
            if matches!(state.lifecycle.status(), UploadStatus::Success | UploadStatus::Error) {
                state.lifecycle.reset()?;
                state.intake.clear();
                tracing::debug!("ready for a new analysis");
                return Ok((true, vec![]));
            }
            Ok((false, vec![]))
        }
        Event::Char(c) => match state.input_mode {
            InputMode::PathEntry => {
                state.path_input.push(*c);
                Ok((true, vec![]))
            }
            InputMode::Browse(SearchFocus::Typing) => {
                state.browser.push_char(*c);
                Ok((true, vec![]))
            }
            InputMode::Browse(SearchFocus::Navigating) | InputMode::Normal => Ok((false, vec![])),
        },
        Event::Backspace => match state.input_mode {
            InputMode::PathEntry => {
                state.path_input.pop();
                Ok((true, vec![]))
            }
            InputMode::Browse(SearchFocus::Typing) => {
                state.browser.pop_char();
                Ok((true, vec![]))
            }
            InputMode::Browse(SearchFocus::Navigating) | InputMode::Normal => Ok((false, vec![])),
        },
        Event::Escape => {
            if state.input_mode == InputMode::Normal {
                return Ok((false, vec![]));
            }
            state.input_mode = InputMode::Normal;
            state.path_input.clear();
            Ok((true, vec![]))
        }
        Event::Submit => match state.input_mode {
            InputMode::PathEntry => {
                let text = std::mem::take(&mut state.path_input);
                state.input_mode = InputMode::Normal;
                let paths = resolve_submission(&text, state.config.host_root.as_deref());
                tracing::debug!(count = paths.len(), "path input submitted");
                let (_, actions) = offer_files(state, &paths)?;
                Ok((true, actions))
            }
            InputMode::Browse(_) => {
                let Some(entry) = state.browser.selected() else {
                    return Ok((false, vec![]));
                };
                let path = PathBuf::from(&entry.path);
                state.input_mode = InputMode::Normal;
                let (_, actions) = offer_files(state, &[path])?;
                Ok((true, actions))
            }
            InputMode::Normal => Ok((false, vec![])),
        },
        Event::KeyDown => {
            if !matches!(state.input_mode, InputMode::Browse(_)) {
                return Ok((false, vec![]));
            }
            state.browser.move_down();
            Ok((true, vec![]))
        }
        Event::KeyUp => {
            if !matches!(state.input_mode, InputMode::Browse(_)) {
                return Ok((false, vec![]));
            }
            state.browser.move_up();
            Ok((true, vec![]))
        }
        Event::FocusSearchBar => {
            if !matches!(state.input_mode, InputMode::Browse(_)) {
                return Ok((false, vec![]));
            }
            state.input_mode = InputMode::Browse(SearchFocus::Typing);
            Ok((true, vec![]))
        }
        Event::FocusResults => {
            if !matches!(state.input_mode, InputMode::Browse(_)) {
                return Ok((false, vec![]));
            }
            state.input_mode = InputMode::Browse(SearchFocus::Navigating);
            Ok((true, vec![]))
        }
        Event::FilesOffered(paths) => offer_files(state, paths),
        Event::Tick { elapsed_ms } => {
            state.tick_scheduled = false;
            let mut should_render = state.notifications.advance(*elapsed_ms);
            if let Some(settled) = state.lifecycle.advance_clock(*elapsed_ms) {
                announce(state, &settled);
                should_render = true;
            }
            Ok((should_render, vec![]))
        }
        Event::WorkerResponse(response) => handle_worker_response(state, response),
    }
}

fn handle_worker_response(state: &mut AppState, response: &WorkerResponse) -> Result<(bool, Vec<Action>)> {
    match response {
        WorkerResponse::Configured { classifier } => {
            tracing::debug!(%classifier, "worker configured");
            Ok((false, vec![]))
        }
        WorkerResponse::AnalysisProgress {
            request_id,
            percent,
        } => Ok((state.lifecycle.record_progress(*request_id, *percent), vec![])),
        WorkerResponse::AnalysisCompleted {
            request_id,
            verdict,
        } => Ok(settle(state, *request_id, Ok(*verdict))),
        WorkerResponse::AnalysisFailed { request_id, error } => {
            Ok(settle(state, *request_id, Err(error.clone())))
        }
        WorkerResponse::DirectoryScanned { dir, entries } => {
            let taken = state.browser.loaded(dir, entries.clone());
            Ok((taken && matches!(state.input_mode, InputMode::Browse(_)), vec![]))
        }
        WorkerResponse::PreferencesLoaded { theme } => {
            let Some(mode) = theme else {
                return Ok((false, vec![]));
            };
            if state.theme_chosen_by_user {
                tracing::debug!(stored = %mode, "stored theme ignored, user already chose");
                return Ok((false, vec![]));
            }
            Ok((state.themes.set(*mode), vec![]))
        }
        WorkerResponse::PreferencesSaved { theme } => {
            tracing::debug!(%theme, "theme persisted");
            Ok((false, vec![]))
        }
        WorkerResponse::Error { message } => {
            tracing::warn!(%message, "worker error");
            if state.browser.is_loading() {
                state.browser.failed(message.clone());
            }
            state.notifications.error(message.clone());
            Ok((true, vec![]))
        }
    }
}

/// Offers paths to intake and starts an analysis on acceptance.
fn offer_files(state: &mut AppState, paths: &[PathBuf]) -> Result<(bool, Vec<Action>)> {
    match state.intake.offer(paths, state.lifecycle.status()) {
        IntakeOutcome::Empty | IntakeOutcome::Disabled => Ok((false, vec![])),
        IntakeOutcome::Rejected(err) => {
            state.notifications.error(err.to_string());
            Ok((true, vec![]))
        }
        IntakeOutcome::Accepted(accepted) => {
            if accepted.ignored > 0 {
                state.notifications.info(format!(
                    "One image at a time: ignored {} more file{}",
                    accepted.ignored,
                    if accepted.ignored == 1 { "" } else { "s" }
                ));
            }
            let request_id = state.lifecycle.begin(accepted.image)?;
            let message = WorkerMessage::analyze(
                request_id,
                accepted.path.to_string_lossy().into_owned(),
                state.lifecycle.timeout_ms(),
            );
            Ok((true, vec![Action::PostToWorker(message)]))
        }
    }
}

fn settle(
    state: &mut AppState,
    request_id: u64,
    outcome: std::result::Result<Verdict, AnalysisError>,
) -> (bool, Vec<Action>) {
    let timestamp = format_timestamp(&chrono::Local::now());
    match state.lifecycle.complete(request_id, outcome, timestamp) {
        Some(settled) => {
            announce(state, &settled);
            (true, vec![])
        }
        None => (false, vec![]),
    }
}

fn announce(state: &mut AppState, settled: &Settled) {
    match settled {
        Settled::Success => {
            state.notifications.success(SUCCESS_MESSAGE);
        }
        Settled::Failure(error) => {
            tracing::debug!(%error, "announcing failure");
            state.notifications.error(FAILURE_MESSAGE);
        }
    }
}

fn schedule_tick(state: &mut AppState) -> Option<Action> {
    if state.tick_scheduled || !state.needs_ticks() {
        return None;
    }
    state.tick_scheduled = true;
    #[allow(clippy::cast_precision_loss)]
    let seconds = TICK_MS as f64 / 1000.0;
    Some(Action::ScheduleTick { seconds })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Classification, ThemeMode, ValidationError};
    use crate::test_support;
    use crate::Config;

    fn state() -> AppState {
        crate::initialize(&Config::default()).expect("initialize")
    }

    fn handle(state: &mut AppState, event: Event) -> (bool, Vec<Action>) {
        handle_event(state, &event).expect("handle")
    }

    fn analyze_request(actions: &[Action]) -> u64 {
        actions
            .iter()
            .find_map(|a| match a {
                Action::PostToWorker(WorkerMessage::Analyze { request_id, .. }) => Some(*request_id),
                _ => None,
            })
            .expect("analyze request")
    }

    fn toast_messages(state: &AppState) -> Vec<String> {
        state.notifications.visible().map(|t| t.message.clone()).collect()
    }

    #[test]
    fn started_configures_the_worker_and_loads_preferences() {
        let mut state = state();
        let (_, actions) = handle(&mut state, Event::Started);
        assert!(matches!(
            actions.as_slice(),
            [
                Action::PostToWorker(WorkerMessage::Configure { .. }),
                Action::PostToWorker(WorkerMessage::LoadPreferences { .. })
            ]
        ));
    }

    #[test]
    fn accepted_file_starts_an_analysis_and_a_tick() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = test_support::write(dir.path(), "a.png", &test_support::png_bytes(8, 8));
        let mut state = state();

        let (render, actions) = handle(&mut state, Event::FilesOffered(vec![path]));
        assert!(render);
        assert_eq!(state.status(), UploadStatus::Uploading);
        analyze_request(&actions);
        assert!(actions.contains(&Action::ScheduleTick { seconds: 0.25 }));
        assert!(state.tick_scheduled);
    }

    #[test]
    fn rejected_file_only_shows_a_toast() {
        let dir = tempfile::tempdir().expect("tempdir");
        let gif = test_support::write(dir.path(), "smoke.gif", b"GIF89a");
        let mut state = state();

        let (_, actions) = handle(&mut state, Event::FilesOffered(vec![gif]));
        assert_eq!(state.status(), UploadStatus::Idle);
        assert!(state.lifecycle.result().is_none());
        assert_eq!(
            toast_messages(&state),
            [ValidationError::UnsupportedType {
                name: "smoke.gif".to_string()
            }
            .to_string()]
        );
        assert_eq!(actions, vec![Action::ScheduleTick { seconds: 0.25 }]);
    }

    #[test]
    fn completion_announces_and_stale_responses_are_ignored() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = test_support::write(dir.path(), "a.png", &test_support::png_bytes(8, 8));
        let mut state = state();
        let (_, actions) = handle(&mut state, Event::FilesOffered(vec![path]));
        let id = analyze_request(&actions);

        let (render, _) = handle(
            &mut state,
            Event::WorkerResponse(WorkerResponse::AnalysisProgress {
                request_id: id + 1,
                percent: 50,
            }),
        );
        assert!(!render);

        let verdict = Verdict {
            status: Some(Classification::Smoke),
            confidence: 81,
        };
        handle(
            &mut state,
            Event::WorkerResponse(WorkerResponse::AnalysisCompleted {
                request_id: id,
                verdict,
            }),
        );
        assert_eq!(state.status(), UploadStatus::Success);
        assert_eq!(toast_messages(&state), [SUCCESS_MESSAGE]);

        let (render, _) = handle(
            &mut state,
            Event::WorkerResponse(WorkerResponse::AnalysisFailed {
                request_id: id,
                error: AnalysisError::Cancelled,
            }),
        );
        assert!(!render);
        assert_eq!(state.status(), UploadStatus::Success);
    }

    #[test]
    fn failure_shows_the_retry_message() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = test_support::write(dir.path(), "a.png", &test_support::png_bytes(8, 8));
        let mut state = state();
        let (_, actions) = handle(&mut state, Event::FilesOffered(vec![path]));
        let id = analyze_request(&actions);

        handle(
            &mut state,
            Event::WorkerResponse(WorkerResponse::AnalysisFailed {
                request_id: id,
                error: AnalysisError::Classifier("boom".to_string()),
            }),
        );
        assert_eq!(state.status(), UploadStatus::Error);
        assert_eq!(state.lifecycle.progress(), 0);
        assert_eq!(toast_messages(&state), [FAILURE_MESSAGE]);
    }

    #[test]
    fn offers_while_uploading_are_ignored() {
        let dir = tempfile::tempdir().expect("tempdir");
        let a = test_support::write(dir.path(), "a.png", &test_support::png_bytes(8, 8));
        let b = test_support::write(dir.path(), "b.png", &test_support::png_bytes(8, 8));
        let mut state = state();
        handle(&mut state, Event::FilesOffered(vec![a]));

        let (render, actions) = handle(&mut state, Event::FilesOffered(vec![b]));
        assert!(!render);
        assert!(actions.is_empty());
        assert_eq!(state.intake.current().map(|h| h.name().to_string()), Some("a.png".to_string()));
    }

    #[test]
    fn remove_is_refused_while_uploading_and_resets_after_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = test_support::write(dir.path(), "a.png", &test_support::png_bytes(8, 8));
        let mut state = state();
        let (_, actions) = handle(&mut state, Event::FilesOffered(vec![path]));
        let id = analyze_request(&actions);

        assert!(!handle(&mut state, Event::RemoveFile).0);
        handle(
            &mut state,
            Event::WorkerResponse(WorkerResponse::AnalysisFailed {
                request_id: id,
                error: AnalysisError::EmptyImage,
            }),
        );
        assert!(handle(&mut state, Event::RemoveFile).0);
        assert_eq!(state.status(), UploadStatus::Idle);
        assert!(state.intake.current().is_none());
    }

    #[test]
    fn new_analysis_clears_a_success() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = test_support::write(dir.path(), "a.png", &test_support::png_bytes(8, 8));
        let mut state = state();
        let (_, actions) = handle(&mut state, Event::FilesOffered(vec![path]));
        let id = analyze_request(&actions);

        assert!(!handle(&mut state, Event::NewAnalysis).0);
        handle(
            &mut state,
            Event::WorkerResponse(WorkerResponse::AnalysisCompleted {
                request_id: id,
                verdict: Verdict {
                    status: None,
                    confidence: 70,
                },
            }),
        );
        assert!(handle(&mut state, Event::NewAnalysis).0);
        assert_eq!(state.status(), UploadStatus::Idle);
        assert!(state.lifecycle.result().is_none());
        assert_eq!(state.intake.ledger().live_count(), 0);
    }

    #[test]
    fn watchdog_tick_fails_a_stuck_analysis() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = test_support::write(dir.path(), "a.png", &test_support::png_bytes(8, 8));
        let mut state = crate::initialize(&Config {
            analysis_timeout_ms: 100,
            ..Config::default()
        })
        .expect("initialize");
        handle(&mut state, Event::FilesOffered(vec![path]));

        let (render, actions) = handle(&mut state, Event::Tick { elapsed_ms: 10_000 });
        assert!(render);
        assert_eq!(state.status(), UploadStatus::Error);
        assert_eq!(toast_messages(&state), [FAILURE_MESSAGE]);
        assert_eq!(actions, vec![Action::ScheduleTick { seconds: 0.25 }]);
    }

    #[test]
    fn toasts_expire_on_ticks_and_ticks_stop() {
        let mut state = state();
        state.notifications.info("hello");
        let (_, actions) = handle(&mut state, Event::Tick { elapsed_ms: 0 });
        assert_eq!(actions.len(), 1);

        let (render, actions) = handle(&mut state, Event::Tick { elapsed_ms: 5_000 });
        assert!(render);
        assert!(actions.is_empty());
        assert!(!state.tick_scheduled);
    }

    #[test]
    fn path_entry_submits_resolved_paths() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = test_support::write(dir.path(), "ridge line.jpg", &test_support::jpeg_bytes(8, 8));
        let mut state = state();

        handle(&mut state, Event::StartPathEntry { prefill: Some('\'') });
        assert_eq!(state.input_mode, InputMode::PathEntry);
        for c in format!("{}'", path.display()).chars() {
            handle(&mut state, Event::Char(c));
        }
        let (_, actions) = handle(&mut state, Event::Submit);

        assert_eq!(state.input_mode, InputMode::Normal);
        assert!(state.path_input.is_empty());
        analyze_request(&actions);
        assert_eq!(
            state.intake.current().map(|h| h.name().to_string()),
            Some("ridge line.jpg".to_string())
        );
    }

    #[test]
    fn browser_pick_is_offered() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = test_support::write(dir.path(), "pick.png", &test_support::png_bytes(8, 8));
        let mut state = state();

        let (_, actions) = handle(&mut state, Event::OpenBrowser);
        let Some(Action::PostToWorker(WorkerMessage::ScanDirectory { dir: scanned, .. })) = actions.first() else {
            panic!("scan expected");
        };
        let listing = crate::infrastructure::scan_image_files(dir.path(), 1).expect("scan");
        handle(
            &mut state,
            Event::WorkerResponse(WorkerResponse::DirectoryScanned {
                dir: scanned.clone(),
                entries: listing,
            }),
        );
        assert_eq!(state.browser.filtered_len(), 1);
        assert_eq!(state.browser.selected().map(|e| PathBuf::from(&e.path)), Some(path));

        let (_, actions) = handle(&mut state, Event::Submit);
        analyze_request(&actions);
        assert_eq!(state.input_mode, InputMode::Normal);
    }

    #[test]
    fn stored_theme_applies_unless_the_user_already_toggled() {
        let mut state = state();
        let loaded = Event::WorkerResponse(WorkerResponse::PreferencesLoaded {
            theme: Some(ThemeMode::Dark),
        });
        assert!(handle(&mut state, loaded.clone()).0);
        assert_eq!(state.themes.mode(), ThemeMode::Dark);

        let mut toggled = self::state();
        handle(&mut toggled, Event::ToggleTheme);
        handle(&mut toggled, Event::ToggleTheme);
        assert!(!handle(&mut toggled, loaded).0);
        assert_eq!(toggled.themes.mode(), ThemeMode::Light);
    }

    #[test]
    fn theme_toggle_without_persistence_posts_nothing() {
        let mut state = crate::initialize(&Config {
            persist_theme: false,
            ..Config::default()
        })
        .expect("initialize");
        let (render, actions) = handle(&mut state, Event::ToggleTheme);
        assert!(render);
        assert!(actions.is_empty());
    }
}
