//! Color palettes and ANSI escape sequence generation.
//!
//! Two palettes ship with the plugin, one per [`ThemeMode`], embedded from
//! `themes/*.toml`. Either can be replaced by a user file with the same
//! shape.
//!
//! # TOML Format
//!
//! ```toml
//! name = "my-dark"
//!
//! [colors]
//! header_fg = "#f3f4f6"
//! text_normal = "#e5e7eb"
//! text_dim = "#9ca3af"
//! border = "#374151"
//! accent = "#34d399"
//! selection_fg = "#111827"
//! selection_bg = "#34d399"
//! search_bar_border = "#34d399"
//! match_highlight_fg = "#111827"
//! match_highlight_bg = "#fbbf24"
//! empty_state_fg = "#34d399"
//! progress_track = "#374151"
//! fire = "#f87171"
//! smoke = "#fbbf24"
//! no_fire = "#4ade80"
//! neutral = "#9ca3af"
//! toast_fg = "#f9fafb"
//! toast_success = "#15803d"
//! toast_error = "#b91c1c"
//! toast_info = "#4b5563"
//! ```

use crate::domain::error::{EmberwatchError, Result};
use crate::domain::ThemeMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A named palette.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Theme {
    /// Human-readable theme name.
    pub name: String,
    /// Color palette for all UI elements.
    pub colors: ThemeColors,
}

/// Hex colors (`"#rrggbb"`) for every UI element.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ThemeColors {
    /// Title text.
    pub header_fg: String,
    /// Optional title bar background.
    #[serde(default)]
    pub header_bg: Option<String>,

    /// Body text.
    pub text_normal: String,
    /// Secondary text (footer, hints, unsupported browser entries).
    pub text_dim: String,
    /// Separators and the dropzone frame.
    pub border: String,
    /// Dropzone frame while a path is being entered, progress fill.
    pub accent: String,

    /// Selected browser row foreground.
    pub selection_fg: String,
    /// Selected browser row background.
    pub selection_bg: String,

    /// Search and path input frame.
    pub search_bar_border: String,
    /// Fuzzy match highlight foreground.
    pub match_highlight_fg: String,
    /// Fuzzy match highlight background.
    pub match_highlight_bg: String,

    /// Empty browser message.
    pub empty_state_fg: String,

    /// Unfilled part of progress and confidence bars.
    pub progress_track: String,

    /// Fire badge and advisory.
    pub fire: String,
    /// Smoke badge and advisory.
    pub smoke: String,
    /// No-fire badge and advisory.
    pub no_fire: String,
    /// Badge of an undetermined result.
    pub neutral: String,

    /// Toast text.
    pub toast_fg: String,
    /// Success toast background.
    pub toast_success: String,
    /// Error toast background.
    pub toast_error: String,
    /// Informational toast background.
    pub toast_info: String,
}

impl Theme {
    /// Returns the built-in palette for `mode`.
    ///
    /// # Errors
    ///
    /// Returns [`EmberwatchError::Theme`] if the embedded TOML fails to parse.
    pub fn builtin(mode: ThemeMode) -> Result<Self> {
        let toml_str = match mode {
            ThemeMode::Light => include_str!("../../themes/light.toml"),
            ThemeMode::Dark => include_str!("../../themes/dark.toml"),
        };

        toml::from_str(toml_str)
            .map_err(|e| EmberwatchError::Theme(format!("built-in {mode} palette: {e}")))
    }

    /// Loads a palette from a TOML file.
    ///
    /// # Parameters
    ///
    /// * `path` - Path to the TOML file
    ///
    /// # Errors
    ///
    /// Returns [`EmberwatchError::Theme`] if:
    /// - The file cannot be read (file not found, permission denied, etc.)
    /// - The TOML content cannot be parsed (invalid syntax, missing fields)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref()).map_err(|e| {
            EmberwatchError::Theme(format!(
                "Failed to read theme file {}: {e}",
                path.as_ref().display()
            ))
        })?;

        toml::from_str(&contents)
            .map_err(|e| EmberwatchError::Theme(format!("Failed to parse theme TOML: {e}")))
    }

    /// Loads the palette for `mode`, preferring `override_path` when given.
    ///
    /// A failing override is logged and the built-in palette is used instead.
    ///
    /// # Errors
    ///
    /// Returns an error only if the built-in palette fails to parse.
    pub fn load(mode: ThemeMode, override_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = override_path {
            match Self::from_file(path) {
                Ok(theme) => return Ok(theme),
                Err(e) => {
                    tracing::warn!(%mode, error = %e, "theme override unusable, using built-in");
                }
            }
        }
        Self::builtin(mode)
    }

    /// Converts a hex color to an RGB triple.
    ///
    /// Strips a leading `#`. Malformed input yields white.
    #[must_use]
    pub fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
        let hex = hex.trim_start_matches('#').trim();

        if hex.len() != 6 || !hex.is_ascii() {
            return (255, 255, 255);
        }

        let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
        let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
        let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);

        (r, g, b)
    }

    /// 24-bit foreground escape for a hex color.
    ///
    /// # Example
    ///
    /// ```rust
    /// use emberwatch::ui::Theme;
    ///
    /// assert_eq!(Theme::fg("#ff8000"), "\u{1b}[38;2;255;128;0m");
    /// ```
    #[must_use]
    pub fn fg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        Self::fg_rgb([r, g, b])
    }

    /// 24-bit background escape for a hex color.
    #[must_use]
    pub fn bg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        Self::bg_rgb([r, g, b])
    }

    /// 24-bit foreground escape for a raw pixel.
    #[must_use]
    pub fn fg_rgb([r, g, b]: [u8; 3]) -> String {
        format!("\u{001b}[38;2;{r};{g};{b}m")
    }

    /// 24-bit background escape for a raw pixel.
    #[must_use]
    pub fn bg_rgb([r, g, b]: [u8; 3]) -> String {
        format!("\u{001b}[48;2;{r};{g};{b}m")
    }

    /// ANSI bold (`\x1b[1m`).
    #[must_use]
    pub const fn bold() -> &'static str {
        "\u{001b}[1m"
    }

    /// ANSI dim (`\x1b[2m`).
    #[must_use]
    pub const fn dim() -> &'static str {
        "\u{001b}[2m"
    }

    /// ANSI reset (`\x1b[0m`), clearing all styling.
    #[must_use]
    pub const fn reset() -> &'static str {
        "\u{001b}[0m"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_builtin_palettes_parse() {
        let light = Theme::builtin(ThemeMode::Light).expect("light");
        let dark = Theme::builtin(ThemeMode::Dark).expect("dark");
        assert_eq!(light.name, "light");
        assert_eq!(dark.name, "dark");
        assert_ne!(light.colors, dark.colors);
        assert!(light.colors.header_bg.is_none());
    }

    #[test]
    fn malformed_hex_falls_back_to_white() {
        assert_eq!(Theme::hex_to_rgb("#12"), (255, 255, 255));
        assert_eq!(Theme::hex_to_rgb("zzzzzz"), (255, 255, 255));
        assert_eq!(Theme::hex_to_rgb("10b981"), (0x10, 0xb9, 0x81));
    }

    #[test]
    fn override_file_wins_and_bad_override_falls_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("mine.toml");
        let mut custom = Theme::builtin(ThemeMode::Dark).expect("dark");
        custom.name = "mine".to_string();
        std::fs::write(&path, toml::to_string(&custom).expect("encode")).expect("write");

        let loaded = Theme::load(ThemeMode::Dark, Some(&path)).expect("load");
        assert_eq!(loaded.name, "mine");

        let missing = dir.path().join("missing.toml");
        let fallback = Theme::load(ThemeMode::Light, Some(&missing)).expect("fallback");
        assert_eq!(fallback.name, "light");
    }

    #[test]
    fn unreadable_file_is_a_theme_error() {
        let err = Theme::from_file("/definitely/not/here.toml").expect_err("missing");
        assert!(matches!(err, EmberwatchError::Theme(_)));
    }
}
