//! View model types representing renderable UI state.
//!
//! View models are computed by
//! [`AppState::compute_viewmodel`](crate::app::AppState::compute_viewmodel)
//! and consumed by the renderer. They hold display-ready data only.
//!
//! # Layout
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │ header (title, theme)          toasts →  │
//! │ dropzone (prompt | preview + progress)   │
//! │ results card                             │
//! │ overlay (path input | browser)           │
//! │ footer                                   │
//! └──────────────────────────────────────────┘
//! ```

use crate::app::notifications::ToastKind;
use crate::intake::Thumbnail;
use crate::ui::presentation::ResultsCard;

/// Complete UI view model for rendering.
#[derive(Debug, Clone)]
pub struct UIViewModel {
    /// Title bar.
    pub header: HeaderInfo,

    /// The upload area.
    pub dropzone: DropzoneView,

    /// The results card.
    pub results: ResultsView,

    /// Path input or browser drawn over the lower half, if open.
    pub overlay: Option<Overlay>,

    /// Live toasts, oldest first.
    pub toasts: Vec<ToastView>,

    /// Key hints.
    pub footer: FooterInfo,
}

/// Header display information.
#[derive(Debug, Clone)]
pub struct HeaderInfo {
    /// Title text.
    pub title: String,
    /// Theme indicator, e.g. `☾ dark`.
    pub theme_label: String,
}

/// Footer display information.
#[derive(Debug, Clone)]
pub struct FooterInfo {
    /// Key hints for the current mode.
    pub keybindings: String,
}

/// What the upload area shows.
#[derive(Debug, Clone)]
pub enum DropzoneView {
    /// No file selected yet.
    Prompt {
        /// Main call to action.
        headline: String,
        /// Accepted formats and size limit.
        formats: String,
    },
    /// A file was accepted.
    Preview {
        /// File name.
        name: String,
        /// Size in megabytes.
        size_label: String,
        /// Decoded thumbnail.
        thumbnail: Thumbnail,
        /// Whether the remove hint is shown.
        removable: bool,
        /// Analysis progress while uploading.
        progress: Option<ProgressInfo>,
    },
}

/// Progress bar content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressInfo {
    /// Fill in `0..=100`.
    pub percent: u8,
    /// Caption under the bar.
    pub label: String,
}

/// The results card plus the analyzed image, if still live.
#[derive(Debug, Clone)]
pub struct ResultsView {
    /// Card content.
    pub card: ResultsCard,
    /// Thumbnail of the analyzed image.
    pub thumbnail: Option<Thumbnail>,
}

/// Modal content drawn above the footer.
#[derive(Debug, Clone)]
pub enum Overlay {
    /// Path input.
    PathInput(InputBoxInfo),
    /// File browser.
    Browser(BrowserView),
}

/// A single-line text input.
#[derive(Debug, Clone)]
pub struct InputBoxInfo {
    /// Label before the text.
    pub label: String,
    /// Current text.
    pub text: String,
    /// Whether the caret is shown.
    pub focused: bool,
}

/// File browser content.
#[derive(Debug, Clone)]
pub struct BrowserView {
    /// Directory shown in the title.
    pub title: String,
    /// Filter input.
    pub search: InputBoxInfo,
    /// Visible rows.
    pub items: Vec<DisplayItem>,
    /// Shown instead of rows when there are none.
    pub empty_state: Option<EmptyState>,
}

/// One browser row.
#[derive(Debug, Clone)]
pub struct DisplayItem {
    /// Relative path.
    pub name: String,
    /// Size in megabytes.
    pub size_label: String,
    /// Row under the cursor.
    pub is_selected: bool,
    /// Intake would accept this file.
    pub is_supported: bool,
    /// Character ranges to highlight for fuzzy matches, `(start, end)`.
    pub highlight_ranges: Vec<(usize, usize)>,
}

/// Empty-state message.
#[derive(Debug, Clone)]
pub struct EmptyState {
    /// Primary message.
    pub message: String,
    /// Secondary explanatory text.
    pub subtitle: String,
}

/// One toast.
#[derive(Debug, Clone)]
pub struct ToastView {
    /// Flavor.
    pub kind: ToastKind,
    /// Text.
    pub message: String,
}
