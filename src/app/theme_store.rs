//! Light/dark theme selection held by the application state.

use crate::domain::ThemeMode;
use crate::ui::theme::Theme;

/// Both palettes plus the active mode.
///
/// Owned by [`AppState`](crate::app::AppState) and passed to rendering
/// explicitly; there is no global theme.
#[derive(Debug, Clone)]
pub struct ThemeStore {
    mode: ThemeMode,
    light: Theme,
    dark: Theme,
}

impl ThemeStore {
    /// Creates a store starting in `mode`.
    #[must_use]
    pub const fn new(mode: ThemeMode, light: Theme, dark: Theme) -> Self {
        Self { mode, light, dark }
    }

    /// Flips between light and dark, returning the new mode.
    pub fn toggle(&mut self) -> ThemeMode {
        self.mode = self.mode.toggled();
        tracing::debug!(mode = %self.mode, "theme toggled");
        self.mode
    }

    /// Switches to `mode`. Returns `true` if it changed.
    pub fn set(&mut self, mode: ThemeMode) -> bool {
        let changed = self.mode != mode;
        self.mode = mode;
        changed
    }

    /// Active mode.
    #[must_use]
    pub const fn mode(&self) -> ThemeMode {
        self.mode
    }

    /// Palette of the active mode.
    #[must_use]
    pub const fn current(&self) -> &Theme {
        match self.mode {
            ThemeMode::Light => &self.light,
            ThemeMode::Dark => &self.dark,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(mode: ThemeMode) -> ThemeStore {
        ThemeStore::new(
            mode,
            Theme::builtin(ThemeMode::Light).expect("light"),
            Theme::builtin(ThemeMode::Dark).expect("dark"),
        )
    }

    #[test]
    fn toggling_twice_returns_to_the_original() {
        for start in [ThemeMode::Light, ThemeMode::Dark] {
            let mut themes = store(start);
            let palette = themes.current().clone();
            assert_eq!(themes.toggle(), start.toggled());
            assert_ne!(themes.current(), &palette);
            assert_eq!(themes.toggle(), start);
            assert_eq!(themes.current(), &palette);
        }
    }

    #[test]
    fn set_reports_changes() {
        let mut themes = store(ThemeMode::Light);
        assert!(!themes.set(ThemeMode::Light));
        assert!(themes.set(ThemeMode::Dark));
        assert_eq!(themes.current().name, "dark");
    }
}
