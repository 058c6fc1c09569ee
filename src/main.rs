//! Zellij plugin wrapper and entry point.
//!
//! Thin integration layer between the Emberwatch library and the Zellij
//! plugin system: translates host events into library events and library
//! actions into host calls.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────┐
//! │   Zellij Main Thread    │
//! │  ┌──────────────────┐   │
//! │  │  State (plugin)  │   │  ← UI state, event handling
//! │  └──────────────────┘   │
//! │          │              │
//! │          │ IPC          │
//! │          ▼              │
//! │  ┌──────────────────┐   │
//! │  │   WorkerShim     │   │  ← Classification, directory scans
//! │  │ (worker thread)  │   │  ← Preference storage
//! │  └──────────────────┘   │
//! └─────────────────────────┘
//! ```
//!
//! # Plugin Lifecycle
//!
//! 1. **Load**: Parse config, initialize tracing, create `AppState`
//! 2. **Subscribe**: Register for Key, `CustomMessage`, `Timer` events
//! 3. **Start**: Configure the worker and request stored preferences
//! 4. **Update**: Handle events, delegate to library layer
//! 5. **Render**: Call library render function
//!
//! # Keybindings
//!
//! Main screen:
//! - `o`/`i`: Enter a path (typing `/`, `~` or a quote also starts one, so
//!   pasting or dropping a path into the pane just works)
//! - `b`: Browse for an image
//! - `x`: Remove the selected file
//! - `n`: Start a new analysis after a result
//! - `t`: Toggle light/dark theme
//! - `q`: Close plugin
//!
//! Path entry: `Enter` analyze, `Esc` cancel.
//!
//! Browser:
//! - `Ctrl+n`/`Ctrl+p`, `Down`/`Up`: Move selection
//! - `Tab`: Switch between filter and list
//! - `j`/`k`, `/`: Move and refocus the filter (list focus only)
//! - `Enter`: Analyze selection
//! - `Esc`: Close browser

#![allow(clippy::multiple_crate_versions)]

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use zellij_tile::prelude::*;
use zellij_tile::shim::{post_message_to, post_message_to_plugin};

use emberwatch::worker::{EmberwatchWorker, WorkerMessage, WorkerResponse};
use emberwatch::{handle_event, Action, Config, Event, InputMode, SearchFocus};

const WORKER_NAME: &str = "emberwatch";

/// Worker wrapper implementing the Zellij worker interface.
///
/// The library worker owns trait objects, so it is skipped by serde and
/// rebuilt on each worker instance.
#[derive(Serialize, Deserialize, Default)]
pub struct WorkerShim {
    #[serde(skip)]
    inner: EmberwatchWorker,
}

impl ZellijWorker<'_> for WorkerShim {
    /// Deserializes a request, runs it, and posts every response back.
    fn on_message(&mut self, message: String, payload: String) {
        let request = match serde_json::from_str::<WorkerMessage>(&payload) {
            Ok(request) => request,
            Err(e) => {
                tracing::debug!(error = %e, "failed to deserialize worker message");
                return;
            }
        };

        self.inner.handle_message(request, &mut |response| {
            match serde_json::to_string(&response) {
                Ok(payload) => post_message_to_plugin(PluginMessage {
                    name: message.clone(),
                    payload,
                    worker_name: None,
                }),
                Err(e) => tracing::debug!(error = %e, "failed to serialize worker response"),
            }
        });
    }
}

// Register plugin and worker with Zellij
register_plugin!(State);
register_worker!(WorkerShim, emberwatch_worker, EMBERWATCH_WORKER);

/// Plugin state wrapper.
#[derive(Default)]
struct State {
    /// Core application state; `None` until `load` succeeds.
    app: Option<emberwatch::AppState>,
}

impl ZellijPlugin for State {
    /// Initializes the plugin on load.
    ///
    /// No permissions are requested: intake reads files through the `/host`
    /// mount and the worker writes preferences to `/data`.
    fn load(&mut self, configuration: BTreeMap<String, String>) {
        let config = Config::from_zellij(&configuration);
        emberwatch::observability::init_tracing(&config.trace_level);

        let span = tracing::debug_span!("plugin_load");
        let _guard = span.entered();

        match emberwatch::initialize(&config) {
            Ok(app) => self.app = Some(app),
            Err(e) => {
                tracing::error!(error = %e, "failed to initialize plugin");
                return;
            }
        }

        subscribe(&[EventType::Key, EventType::CustomMessage, EventType::Timer]);
        self.dispatch(&Event::Started);

        tracing::debug!("plugin load complete");
    }

    /// Handles incoming Zellij events; returns `true` to re-render.
    fn update(&mut self, event: zellij_tile::prelude::Event) -> bool {
        let event_name = Self::get_event_name(&event);
        let span = tracing::debug_span!("plugin_update_event", event_type = %event_name);
        let _guard = span.entered();

        let our_event = match event {
            zellij_tile::prelude::Event::Key(ref key) => match self.map_key_event(key) {
                Some(event) => event,
                None => return false,
            },
            zellij_tile::prelude::Event::CustomMessage(message, payload) => {
                match Self::map_custom_message_event(&message, &payload) {
                    Some(event) => event,
                    None => return false,
                }
            }
            zellij_tile::prelude::Event::Timer(elapsed_secs) => Event::Tick {
                elapsed_ms: seconds_to_ms(elapsed_secs),
            },
            _ => return false,
        };

        self.dispatch(&our_event)
    }

    fn render(&mut self, rows: usize, cols: usize) {
        if let Some(app) = &self.app {
            emberwatch::ui::render(app, rows, cols);
        } else {
            println!("Emberwatch failed to start; see the plugin log.");
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn seconds_to_ms(seconds: f64) -> u64 {
    (seconds.max(0.0) * 1000.0).round() as u64
}

impl State {
    /// Runs an event through the library and executes resulting actions.
    fn dispatch(&mut self, event: &Event) -> bool {
        let Some(app) = self.app.as_mut() else {
            return false;
        };

        match handle_event(app, event) {
            Ok((should_render, actions)) => {
                tracing::debug!(action_count = actions.len(), should_render, "event handled successfully");
                for a in actions {
                    Self::execute_action(&a);
                }
                should_render
            }
            Err(e) => {
                tracing::debug!(error = %e, "error handling event");
                false
            }
        }
    }

    /// Gets a string name for a Zellij event for logging purposes.
    fn get_event_name(event: &zellij_tile::prelude::Event) -> String {
        match event {
            zellij_tile::prelude::Event::Key(key) => format!("Key({:?})", key.bare_key),
            zellij_tile::prelude::Event::CustomMessage(msg, _) => format!("CustomMessage({msg})"),
            zellij_tile::prelude::Event::Timer(..) => "Timer".to_string(),
            _ => "Other".to_string(),
        }
    }

    /// Maps keyboard events to application events for the current mode.
    fn map_key_event(&self, key: &KeyWithModifier) -> Option<Event> {
        tracing::debug!(bare_key = ?key.bare_key, "key event");
        let mode = self.app.as_ref()?.input_mode;

        if key.has_modifiers(&[KeyModifier::Ctrl]) {
            return match (key.bare_key, mode) {
                (BareKey::Char('n'), InputMode::Browse(_)) => Some(Event::KeyDown),
                (BareKey::Char('p'), InputMode::Browse(_)) => Some(Event::KeyUp),
                (BareKey::Char('c'), InputMode::Normal) => Some(Event::CloseFocus),
                _ => None,
            };
        }

        Some(match mode {
            InputMode::Normal => match key.bare_key {
                BareKey::Char('q') => Event::CloseFocus,
                BareKey::Char('o' | 'i') => Event::StartPathEntry { prefill: None },
                BareKey::Char(c) if InputMode::starts_path(c) => Event::StartPathEntry { prefill: Some(c) },
                BareKey::Char('b') => Event::OpenBrowser,
                BareKey::Char('t') => Event::ToggleTheme,
                BareKey::Char('x') | BareKey::Delete => Event::RemoveFile,
                BareKey::Char('n') => Event::NewAnalysis,
                BareKey::Esc => Event::Escape,
                _ => return None,
            },
            InputMode::PathEntry => match key.bare_key {
                BareKey::Enter => Event::Submit,
                BareKey::Esc => Event::Escape,
                BareKey::Backspace => Event::Backspace,
                BareKey::Char(c) => Event::Char(c),
                _ => return None,
            },
            InputMode::Browse(SearchFocus::Typing) => match key.bare_key {
                BareKey::Enter => Event::Submit,
                BareKey::Esc => Event::Escape,
                BareKey::Tab => Event::FocusResults,
                BareKey::Down => Event::KeyDown,
                BareKey::Up => Event::KeyUp,
                BareKey::Backspace => Event::Backspace,
                BareKey::Char(c) => Event::Char(c),
                _ => return None,
            },
            InputMode::Browse(SearchFocus::Navigating) => match key.bare_key {
                BareKey::Enter => Event::Submit,
                BareKey::Esc | BareKey::Char('q') => Event::Escape,
                BareKey::Tab | BareKey::Char('/') => Event::FocusSearchBar,
                BareKey::Down | BareKey::Char('j') => Event::KeyDown,
                BareKey::Up | BareKey::Char('k') => Event::KeyUp,
                _ => return None,
            },
        })
    }

    /// Maps custom message events to application events.
    fn map_custom_message_event(message: &str, payload: &str) -> Option<Event> {
        tracing::debug!(message_name = %message, payload_len = payload.len(), "custom message event");

        if message != WORKER_NAME {
            tracing::debug!(message_name = %message, "ignoring custom message with unknown name");
            return None;
        }

        match serde_json::from_str::<WorkerResponse>(payload) {
            Ok(response) => Some(Event::WorkerResponse(response)),
            Err(e) => {
                tracing::debug!(error = %e, "failed to deserialize worker response");
                None
            }
        }
    }

    /// Posts a message to the worker thread as JSON.
    fn post_worker_message(message: &WorkerMessage) {
        match serde_json::to_string(message) {
            Ok(payload) => {
                tracing::debug!(kind = message.kind(), payload_len = payload.len(), "posting message to worker");
                post_message_to(PluginMessage {
                    worker_name: Some(WORKER_NAME.to_string()),
                    name: WORKER_NAME.to_string(),
                    payload,
                });
            }
            Err(e) => {
                tracing::debug!(error = %e, "failed to serialize worker message");
            }
        }
    }

    /// Executes an action returned from event handling.
    #[tracing::instrument(level = "debug")]
    fn execute_action(action: &Action) {
        match action {
            Action::CloseFocus => {
                tracing::debug!("closing plugin focus");
                hide_self();
            }
            Action::PostToWorker(message) => Self::post_worker_message(message),
            Action::ScheduleTick { seconds } => set_timeout(*seconds),
        }
    }
}
