//! Input mode state machine.
//!
//! The mode decides how keys are interpreted and which footer and overlay
//! are drawn:
//!
//! - **Normal**: single-key commands (browse, theme, remove, new analysis)
//! - **`PathEntry`**: text input for typed, pasted or dropped paths
//! - **Browse**: the file browser, with focus on its query or its list
//!
//! A terminal delivers a dropped file as typed text. Path-like first
//! characters (`/`, `~`, quotes) in Normal mode open `PathEntry` with that
//! character already in the buffer, so a drop lands in the input intact.

/// Focus state within the file browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFocus {
    /// Keys edit the filter query.
    Typing,

    /// Keys move the cursor through the filtered list.
    Navigating,
}

/// Current input handling mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Default command mode.
    #[default]
    Normal,

    /// Collecting a path; Enter submits, Esc cancels.
    PathEntry,

    /// Browsing files under the configured directory.
    Browse(SearchFocus),
}

impl InputMode {
    /// Characters that open path entry when typed in Normal mode.
    pub const PATH_PREFIXES: [char; 4] = ['/', '~', '\'', '"'];

    /// Whether `c` starts a path when typed in Normal mode.
    #[must_use]
    pub fn starts_path(c: char) -> bool {
        Self::PATH_PREFIXES.contains(&c)
    }
}
