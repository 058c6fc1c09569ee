//! Storage layer for persistent user preferences.
//!
//! Only the theme choice is persisted. Detection results live for a single
//! analysis and are never written to disk.
//!
//! # Modules
//!
//! - `backend`: Storage trait abstraction for backend implementations
//! - `json`: JSON file-based storage implementation
//! - `models`: Storage record types separate from domain models

pub mod backend;
pub mod json;
pub mod models;

pub use backend::PreferenceStore;
pub use json::JsonPreferences;
pub use models::{PreferencesRecord, PREFERENCES_VERSION};
