//! JSON file-based preference storage.
//!
//! Uses atomic file writes (write-to-temp + rename) so a crash mid-write never
//! leaves a truncated file behind.
//!
//! # File Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "theme": "dark",
//!   "updated_at": 1700000000
//! }
//! ```

use crate::domain::error::{EmberwatchError, Result};
use crate::domain::ThemeMode;
use crate::storage::backend::PreferenceStore;
use crate::storage::models::{PreferencesRecord, PREFERENCES_VERSION};
use std::path::{Path, PathBuf};

/// JSON file preference backend.
///
/// The record is kept in memory and persisted on every change.
///
/// # Thread Safety
///
/// This type is `Send` but not `Sync`. It is used from the single worker
/// instance only.
#[derive(Debug)]
pub struct JsonPreferences {
    /// Path to the JSON file on disk.
    file_path: PathBuf,

    /// In-memory copy, loaded on creation.
    data: PreferencesRecord,

    /// Tracks if data has been modified since last save.
    dirty: bool,
}

impl JsonPreferences {
    /// Creates or opens a preference file.
    ///
    /// Parent directories are created automatically. A file that cannot be
    /// parsed is replaced by defaults on the next write.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory creation fails
    /// - The file exists but cannot be read
    /// - The file was written by a newer, unknown format version
    pub fn new(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "initializing JSON preferences");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("no preferences yet, using defaults");
            PreferencesRecord::default()
        };

        Ok(Self {
            file_path,
            data,
            dirty: false,
        })
    }

    fn load_from_file(path: &Path) -> Result<PreferencesRecord> {
        let contents = std::fs::read_to_string(path)?;
        let data: PreferencesRecord = match serde_json::from_str(&contents) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(error = %e, "preferences file is corrupt, starting from defaults");
                return Ok(PreferencesRecord::default());
            }
        };

        if data.version > PREFERENCES_VERSION {
            return Err(EmberwatchError::Storage(format!(
                "unsupported preferences version {}",
                data.version
            )));
        }

        tracing::debug!(version = data.version, theme = ?data.theme, "loaded preferences");
        Ok(data)
    }

    /// Saves the record using write-to-temp + rename.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization, the temp write or the rename fails.
    fn save_to_file(&mut self) -> Result<()> {
        if !self.dirty {
            tracing::trace!("skipping save, no changes");
            return Ok(());
        }

        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| EmberwatchError::Storage(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        self.dirty = false;
        tracing::debug!(path = ?self.file_path, "preferences saved");
        Ok(())
    }

    /// Location of the preference file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

impl PreferenceStore for JsonPreferences {
    fn load(&self) -> Result<PreferencesRecord> {
        Ok(self.data.clone())
    }

    fn save_theme(&mut self, theme: ThemeMode, timestamp: i64) -> Result<()> {
        let _span = tracing::debug_span!("json_save_theme", theme = %theme).entered();

        if self.data.theme == Some(theme) {
            tracing::trace!("theme unchanged");
            return Ok(());
        }

        self.data.version = PREFERENCES_VERSION;
        self.data.set_theme(theme, timestamp);
        self.dirty = true;
        self.save_to_file()
    }
}

impl Drop for JsonPreferences {
    fn drop(&mut self) {
        if self.dirty {
            if let Err(e) = self.save_to_file() {
                tracing::error!(error = %e, "failed to save preferences on drop");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonPreferences::new(dir.path().join("nested/preferences.json")).expect("open");
        assert_eq!(store.load().expect("load"), PreferencesRecord::default());
        assert!(dir.path().join("nested").is_dir());
    }

    #[test]
    fn theme_survives_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("preferences.json");

        let mut store = JsonPreferences::new(path.clone()).expect("open");
        store.save_theme(ThemeMode::Dark, 42).expect("save");
        drop(store);

        let reopened = JsonPreferences::new(path.clone()).expect("reopen");
        let record = reopened.load().expect("load");
        assert_eq!(record.theme, Some(ThemeMode::Dark));
        assert_eq!(record.updated_at, Some(42));
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn corrupt_file_is_replaced_by_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("preferences.json");
        std::fs::write(&path, "{ not json").expect("write");

        let mut store = JsonPreferences::new(path.clone()).expect("open");
        assert_eq!(store.load().expect("load").theme, None);
        store.save_theme(ThemeMode::Light, 1).expect("save");

        let raw = std::fs::read_to_string(&path).expect("read");
        assert!(raw.contains("\"light\""));
    }

    #[test]
    fn newer_format_is_refused() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("preferences.json");
        std::fs::write(&path, r#"{"version": 99, "theme": "dark"}"#).expect("write");

        let err = JsonPreferences::new(path).expect_err("newer version");
        assert!(matches!(err, EmberwatchError::Storage(_)));
    }
}
