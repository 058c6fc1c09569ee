//! Preference storage abstraction.
//!
//! The [`PreferenceStore`] trait keeps the worker independent of where
//! preferences live. It is deliberately small: the plugin only ever reads the
//! whole record at startup and writes the theme when it changes.

use crate::domain::error::Result;
use crate::domain::ThemeMode;
use crate::storage::models::PreferencesRecord;

/// Abstraction over preference persistence backends.
///
/// # Implementations
///
/// - [`JsonPreferences`](crate::storage::JsonPreferences): JSON file with atomic writes
///
/// # Examples
///
/// ```no_run
/// use emberwatch::storage::{JsonPreferences, PreferenceStore};
/// use std::path::PathBuf;
///
/// let store = JsonPreferences::new(PathBuf::from("/tmp/preferences.json"))?;
/// let record = store.load()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait PreferenceStore: Send {
    /// Returns the stored preferences, or defaults if nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the read operation fails.
    fn load(&self) -> Result<PreferencesRecord>;

    /// Persists the theme choice.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn save_theme(&mut self, theme: ThemeMode, timestamp: i64) -> Result<()>;
}
