//! Storage record models for the persistence layer.
//!
//! Records are kept separate from domain types so the on-disk format can be
//! versioned independently.

use crate::domain::ThemeMode;
use serde::{Deserialize, Serialize};

/// Current on-disk format version.
pub const PREFERENCES_VERSION: u32 = 1;

/// Persisted user preferences.
///
/// Detection results are never stored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferencesRecord {
    /// Format version for future migrations.
    pub version: u32,

    /// Last theme the user chose, `None` until they toggle once.
    #[serde(default)]
    pub theme: Option<ThemeMode>,

    /// Unix timestamp of the last write.
    #[serde(default)]
    pub updated_at: Option<i64>,
}

impl Default for PreferencesRecord {
    fn default() -> Self {
        Self {
            version: PREFERENCES_VERSION,
            theme: None,
            updated_at: None,
        }
    }
}

impl PreferencesRecord {
    /// Records a theme choice made at `timestamp`.
    ///
    /// # Examples
    ///
    /// ```
    /// use emberwatch::domain::ThemeMode;
    /// use emberwatch::storage::PreferencesRecord;
    ///
    /// let mut record = PreferencesRecord::default();
    /// record.set_theme(ThemeMode::Dark, 1_700_000_000);
    /// assert_eq!(record.theme, Some(ThemeMode::Dark));
    /// ```
    pub fn set_theme(&mut self, theme: ThemeMode, timestamp: i64) {
        self.theme = Some(theme);
        self.updated_at = Some(timestamp);
    }
}
