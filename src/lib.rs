//! Emberwatch: a Zellij plugin that screens forest images for fire and smoke.
//!
//! Emberwatch provides:
//! - Single-image intake from a dropped, pasted or typed path, or a built-in
//!   file browser with fuzzy search
//! - Type, size and content validation with a half-block thumbnail preview
//! - Analysis on a background worker through a pluggable, cancellable
//!   classifier (a seeded mock stands in for a real model)
//! - A results card with confidence bar, timestamp and risk advisory
//! - Light and dark palettes, persisted across sessions
//! - Auto-dismissing toast notifications
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Zellij Plugin Shim (main.rs)                       │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling, lifecycle controller             │
//! │  - Theme store, notifications, browser              │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Intake        │   │ Worker Layer  │
//! │ (ui/)         │   │ (intake/)     │   │ (worker/)     │
//! │ - Rendering   │   │ - Validation  │   │ - Classifier  │
//! │ - Palettes    │   │ - Previews    │   │ - Dir scans   │
//! │ - Components  │   │               │   │ - Preferences │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain, Classifier, Storage, Infrastructure        │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - OpenTelemetry tracing, file-based OTLP export    │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Configuration
//!
//! ```kdl
//! pane {
//!     plugin location="file:/path/to/emberwatch.wasm" {
//!         theme "dark"
//!         browse_dir "~/pictures/patrol"
//!         browse_depth "3"
//!         analysis_timeout_ms "30000"
//!         persist_theme "true"
//!         host_root "/home/ana"
//!         trace_level "info"
//!     }
//! }
//! ```
//!
//! # Example
//!
//! ```rust
//! use emberwatch::{handle_event, initialize, Config, Event};
//!
//! let mut state = initialize(&Config::default())?;
//! let (_render, actions) = handle_event(&mut state, &Event::Started)?;
//! assert!(!actions.is_empty());
//! # Ok::<(), emberwatch::EmberwatchError>(())
//! ```

#![allow(clippy::multiple_crate_versions)]

pub mod app;
pub mod classifier;
pub mod domain;
pub mod infrastructure;
pub mod intake;
pub mod observability;
pub mod storage;
pub mod ui;
pub mod worker;

#[cfg(test)]
mod test_support;

pub use app::{handle_event, Action, AppState, Event, InputMode, SearchFocus};
pub use domain::{EmberwatchError, Result, ThemeMode};
pub use ui::Theme;

use crate::app::ThemeStore;
use crate::classifier::MockSettings;
use std::collections::BTreeMap;
use std::path::{Component, PathBuf};

/// Plugin configuration parsed from the Zellij layout.
///
/// Every key is optional; unparsable values fall back to the default with a
/// warning.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Initial theme (`light` or `dark`), overridden by a stored preference.
    pub theme: ThemeMode,

    /// TOML palette replacing the built-in light theme.
    pub light_theme_file: Option<String>,

    /// TOML palette replacing the built-in dark theme.
    pub dark_theme_file: Option<String>,

    /// `EnvFilter` directive for tracing, e.g. `info` or `emberwatch=debug`.
    pub trace_level: String,

    /// Directory the browser lists, from the host's point of view.
    pub browse_dir: String,

    /// How deep the browser descends below `browse_dir`.
    pub browse_depth: usize,

    /// Deadline for one analysis.
    pub analysis_timeout_ms: u64,

    /// Lifetime of a toast.
    pub toast_duration_ms: u64,

    /// Store the theme choice between sessions.
    pub persist_theme: bool,

    /// Host directory mounted at `/host`, used to translate absolute paths.
    pub host_root: Option<PathBuf>,

    /// Settings for the mock classifier.
    pub classifier: MockSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: ThemeMode::Light,
            light_theme_file: None,
            dark_theme_file: None,
            trace_level: "info".to_string(),
            browse_dir: ".".to_string(),
            browse_depth: 2,
            analysis_timeout_ms: app::lifecycle::DEFAULT_ANALYSIS_TIMEOUT_MS,
            toast_duration_ms: app::notifications::DEFAULT_TOAST_MS,
            persist_theme: true,
            host_root: None,
            classifier: MockSettings::default(),
        }
    }
}

fn parse_or<T: std::str::FromStr>(config: &BTreeMap<String, String>, key: &str, default: T) -> T {
    match config.get(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "invalid configuration value, using default");
            default
        }),
    }
}

fn parse_flag(config: &BTreeMap<String, String>, key: &str, default: bool) -> bool {
    match config.get(key).map(|v| v.trim().to_ascii_lowercase()) {
        None => default,
        Some(v) if matches!(v.as_str(), "true" | "yes" | "on" | "1") => true,
        Some(v) if matches!(v.as_str(), "false" | "no" | "off" | "0") => false,
        Some(v) => {
            tracing::warn!(key, value = %v, "invalid flag, using default");
            default
        }
    }
}

fn non_empty(config: &BTreeMap<String, String>, key: &str) -> Option<String> {
    config
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(String::from)
}

impl Config {
    /// Parses the plugin's KDL configuration map.
    ///
    /// # Parameters
    ///
    /// * `config` - Key/value pairs from the plugin block
    ///
    /// # Example
    ///
    /// ```rust
    /// use emberwatch::{Config, ThemeMode};
    /// use std::collections::BTreeMap;
    ///
    /// let mut raw = BTreeMap::new();
    /// raw.insert("theme".to_string(), "dark".to_string());
    /// raw.insert("browse_depth".to_string(), "5".to_string());
    /// raw.insert("persist_theme".to_string(), "false".to_string());
    ///
    /// let config = Config::from_zellij(&raw);
    /// assert_eq!(config.theme, ThemeMode::Dark);
    /// assert_eq!(config.browse_depth, 5);
    /// assert!(!config.persist_theme);
    /// assert_eq!(config.analysis_timeout_ms, 30_000);
    /// ```
    #[must_use]
    pub fn from_zellij(config: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();

        let failure_rate: f64 = parse_or(config, "mock_failure_rate", 0.0);
        let classifier = MockSettings {
            latency_ms: parse_or(config, "mock_latency_ms", defaults.classifier.latency_ms),
            failure_rate: failure_rate.clamp(0.0, 1.0),
            seed: non_empty(config, "mock_seed").and_then(|s| s.parse().ok()),
            ..defaults.classifier
        };

        Self {
            theme: parse_or(config, "theme", defaults.theme),
            light_theme_file: non_empty(config, "light_theme_file"),
            dark_theme_file: non_empty(config, "dark_theme_file"),
            trace_level: non_empty(config, "trace_level").unwrap_or(defaults.trace_level),
            browse_dir: non_empty(config, "browse_dir").unwrap_or(defaults.browse_dir),
            browse_depth: parse_or(config, "browse_depth", defaults.browse_depth),
            analysis_timeout_ms: parse_or(config, "analysis_timeout_ms", defaults.analysis_timeout_ms),
            toast_duration_ms: parse_or(config, "toast_duration_ms", defaults.toast_duration_ms),
            persist_theme: parse_flag(config, "persist_theme", defaults.persist_theme),
            host_root: non_empty(config, "host_root").map(PathBuf::from),
            classifier,
        }
    }

    /// Sandbox path of the browse directory.
    ///
    /// # Example
    ///
    /// ```rust
    /// use emberwatch::Config;
    /// use std::path::PathBuf;
    ///
    /// assert_eq!(Config::default().browse_root(), PathBuf::from("/host"));
    /// ```
    #[must_use]
    pub fn browse_root(&self) -> PathBuf {
        infrastructure::resolve_input_path(&self.browse_dir, self.host_root.as_deref())
            .components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect()
    }

    fn theme_override(&self, mode: ThemeMode) -> Option<PathBuf> {
        let file = match mode {
            ThemeMode::Light => self.light_theme_file.as_deref(),
            ThemeMode::Dark => self.dark_theme_file.as_deref(),
        }?;
        Some(infrastructure::resolve_input_path(file, self.host_root.as_deref()))
    }
}

/// Builds the initial application state.
///
/// # Errors
///
/// Returns [`EmberwatchError::Theme`] if a built-in palette fails to parse.
/// Unusable theme override files only produce a warning.
pub fn initialize(config: &Config) -> Result<AppState> {
    tracing::debug!("initializing emberwatch plugin");

    let light = Theme::load(ThemeMode::Light, config.theme_override(ThemeMode::Light).as_deref())?;
    let dark = Theme::load(ThemeMode::Dark, config.theme_override(ThemeMode::Dark).as_deref())?;
    let themes = ThemeStore::new(config.theme, light, dark);

    Ok(AppState::new(config.clone(), themes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn empty_map_yields_defaults() {
        assert_eq!(Config::from_zellij(&BTreeMap::new()), Config::default());
    }

    #[test]
    fn bad_values_fall_back() {
        let config = Config::from_zellij(&raw(&[
            ("theme", "sepia"),
            ("browse_depth", "deep"),
            ("persist_theme", "maybe"),
            ("mock_failure_rate", "7"),
        ]));
        assert_eq!(config.theme, ThemeMode::Light);
        assert_eq!(config.browse_depth, 2);
        assert!(config.persist_theme);
        assert!((config.classifier.failure_rate - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn mock_settings_are_read() {
        let config = Config::from_zellij(&raw(&[
            ("mock_latency_ms", "0"),
            ("mock_seed", "42"),
            ("trace_level", "emberwatch=debug"),
        ]));
        assert_eq!(config.classifier.latency_ms, 0);
        assert_eq!(config.classifier.seed, Some(42));
        assert_eq!(config.trace_level, "emberwatch=debug");
    }

    #[test]
    fn browse_root_translates_host_paths() {
        let config = Config::from_zellij(&raw(&[
            ("browse_dir", "/home/ana/patrol"),
            ("host_root", "/home/ana"),
        ]));
        assert_eq!(config.browse_root(), PathBuf::from("/host/patrol"));

        let tilde = Config::from_zellij(&raw(&[("browse_dir", "~/pics")]));
        assert_eq!(tilde.browse_root(), PathBuf::from("/host/pics"));
    }

    #[test]
    fn initialize_starts_in_the_configured_theme() {
        let config = Config {
            theme: ThemeMode::Dark,
            ..Config::default()
        };
        let state = initialize(&config).expect("initialize");
        assert_eq!(state.themes.mode(), ThemeMode::Dark);
        assert_eq!(state.themes.current().name, "dark");
    }
}
