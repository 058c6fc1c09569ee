//! Application state and view model computation.
//!
//! [`AppState`] is the single source of truth for the plugin pane. It owns
//! the intake (and through it the live preview), the lifecycle controller,
//! the theme store, the toast queue and the browser. Only
//! [`handle_event`](crate::app::handle_event) mutates it.

use super::browser::FileBrowser;
use super::lifecycle::LifecycleController;
use super::modes::{InputMode, SearchFocus};
use super::notifications::Notifications;
use super::theme_store::ThemeStore;
use crate::domain::candidate::format_megabytes;
use crate::domain::{BrowseEntry, ThemeMode, UploadStatus};
use crate::infrastructure::strip_host_prefix;
use crate::intake::FileIntake;
use crate::ui::presentation::present_results;
use crate::ui::viewmodel::{
    BrowserView, DisplayItem, DropzoneView, EmptyState, FooterInfo, HeaderInfo, InputBoxInfo,
    Overlay, ProgressInfo, ResultsView, ToastView, UIViewModel,
};
use crate::Config;

/// Title shown in the header.
pub const TITLE: &str = "Forest Fire Detection";

/// Rows the browser layout spends on chrome (header, borders, title,
/// search box, column headers, footer).
const BROWSER_CHROME_ROWS: usize = 10;

/// Widest relative path shown before truncation.
const NAME_MAX_CHARS: usize = 46;

/// Central application state container.
#[derive(Debug)]
pub struct AppState {
    /// How keys are interpreted.
    pub input_mode: InputMode,

    /// Text collected in path entry mode.
    pub path_input: String,

    /// File browser listing and cursor.
    pub browser: FileBrowser,

    /// Owner of the live preview.
    pub intake: FileIntake,

    /// Upload/detection state machine.
    pub lifecycle: LifecycleController,

    /// Light/dark palettes.
    pub themes: ThemeStore,

    /// Live toasts.
    pub notifications: Notifications,

    /// Configuration the plugin was loaded with.
    pub config: Config,

    /// A `Timer` event is pending.
    pub tick_scheduled: bool,

    /// The user toggled the theme this session; a late stored preference
    /// must not override it.
    pub theme_chosen_by_user: bool,
}

impl AppState {
    /// Creates idle state from configuration and loaded palettes.
    #[must_use]
    pub fn new(config: Config, themes: ThemeStore) -> Self {
        Self {
            input_mode: InputMode::Normal,
            path_input: String::new(),
            browser: FileBrowser::default(),
            intake: FileIntake::default(),
            lifecycle: LifecycleController::new(config.analysis_timeout_ms),
            themes,
            notifications: Notifications::new(config.toast_duration_ms),
            config,
            tick_scheduled: false,
            theme_chosen_by_user: false,
        }
    }

    /// Current lifecycle status.
    #[must_use]
    pub const fn status(&self) -> UploadStatus {
        self.lifecycle.status()
    }

    /// Whether something is animating and needs clock ticks.
    #[must_use]
    pub fn needs_ticks(&self) -> bool {
        !self.notifications.is_empty() || self.lifecycle.is_loading()
    }

    /// Computes a renderable view model for a `rows` × `cols` pane.
    #[must_use]
    pub fn compute_viewmodel(&self, rows: usize, cols: usize) -> UIViewModel {
        let overlay = match self.input_mode {
            InputMode::Normal => None,
            InputMode::PathEntry => Some(Overlay::PathInput(InputBoxInfo {
                label: "Path".to_string(),
                text: self.path_input.clone(),
                focused: true,
            })),
            InputMode::Browse(focus) => Some(Overlay::Browser(self.compute_browser(focus, rows, cols))),
        };

        UIViewModel {
            header: self.compute_header(),
            dropzone: self.compute_dropzone(),
            results: self.compute_results(),
            overlay,
            toasts: self
                .notifications
                .visible()
                .map(|t| ToastView {
                    kind: t.kind,
                    message: t.message.clone(),
                })
                .collect(),
            footer: self.compute_footer(),
        }
    }

    fn compute_header(&self) -> HeaderInfo {
        let theme_label = match self.themes.mode() {
            ThemeMode::Light => "☀ light",
            ThemeMode::Dark => "☾ dark",
        };
        HeaderInfo {
            title: TITLE.to_string(),
            theme_label: theme_label.to_string(),
        }
    }

    fn compute_dropzone(&self) -> DropzoneView {
        let Some(handle) = self.intake.current() else {
            return DropzoneView::Prompt {
                headline: "Drop an image here, or press o to enter a path".to_string(),
                formats: format!(
                    "JPG, JPEG, PNG • Max {}MB",
                    self.intake.limit_bytes() / (1024 * 1024)
                ),
            };
        };

        let progress = self.lifecycle.is_loading().then(|| {
            let percent = self.lifecycle.progress();
            ProgressInfo {
                percent,
                label: format!("Analyzing image... {percent}%"),
            }
        });

        DropzoneView::Preview {
            name: handle.name().to_string(),
            size_label: format_megabytes(handle.size_bytes()),
            thumbnail: handle.thumbnail().clone(),
            removable: FileIntake::is_enabled(self.status()),
            progress,
        }
    }

    fn compute_results(&self) -> ResultsView {
        let result = self.lifecycle.result();
        ResultsView {
            card: present_results(result, self.lifecycle.is_loading()),
            thumbnail: result
                .and_then(|r| self.intake.resolve(&r.image))
                .map(|handle| handle.thumbnail().clone()),
        }
    }

    fn compute_browser(&self, focus: SearchFocus, rows: usize, cols: usize) -> BrowserView {
        let available_rows = rows.saturating_sub(BROWSER_CHROME_ROWS);
        let (start, end) = self.browser.visible_window(available_rows);
        let selected = self.browser.selected_index();

        let items = self
            .browser
            .filtered_entries()
            .enumerate()
            .skip(start)
            .take(end - start)
            .map(|(idx, entry)| self.compute_display_item(entry, idx == selected, cols))
            .collect();

        let dir = self.browser.dir().map(strip_host_prefix).unwrap_or_default();
        let empty_state = if self.browser.is_loading() {
            Some(EmptyState {
                message: "Scanning for images...".to_string(),
                subtitle: format!("Looking under {dir}"),
            })
        } else if let Some(error) = self.browser.error() {
            Some(EmptyState {
                message: "Cannot list directory".to_string(),
                subtitle: error.to_string(),
            })
        } else if self.browser.total_len() == 0 {
            Some(EmptyState {
                message: "No images found".to_string(),
                subtitle: format!("Add JPG or PNG files under {dir}, or set browse_dir"),
            })
        } else if self.browser.filtered_len() == 0 {
            Some(EmptyState {
                message: "No matches".to_string(),
                subtitle: "Refine the filter".to_string(),
            })
        } else {
            None
        };

        BrowserView {
            title: format!(
                " {dir} ({}/{}) ",
                self.browser.filtered_len(),
                self.browser.total_len()
            ),
            search: InputBoxInfo {
                label: "Filter".to_string(),
                text: self.browser.query().to_string(),
                focused: focus == SearchFocus::Typing,
            },
            items,
            empty_state,
        }
    }

    fn compute_display_item(&self, entry: &BrowseEntry, is_selected: bool, cols: usize) -> DisplayItem {
        let max_chars = NAME_MAX_CHARS.min(cols.saturating_sub(14).max(8));
        let char_count = entry.name.chars().count();

        let (name, visible) = if char_count > max_chars {
            let keep = max_chars.saturating_sub(3);
            (
                format!("{}...", entry.name.chars().take(keep).collect::<String>()),
                keep,
            )
        } else {
            (entry.name.clone(), char_count)
        };

        let highlight_ranges = self
            .browser
            .highlight_ranges(&entry.name)
            .into_iter()
            .filter(|&(start, _)| start < visible)
            .map(|(start, end)| (start, end.min(visible)))
            .collect();

        DisplayItem {
            name,
            size_label: format_megabytes(entry.size_bytes),
            is_selected,
            is_supported: entry.is_supported(),
            highlight_ranges,
        }
    }

    fn compute_footer(&self) -> FooterInfo {
        let keybindings = match self.input_mode {
            InputMode::PathEntry => "Enter: analyze  Esc: cancel  Paste or drop a file path",
            InputMode::Browse(SearchFocus::Typing) => {
                "Enter: analyze  Ctrl+n/p: navigate  Tab: results  Esc: close  Type to filter"
            }
            InputMode::Browse(SearchFocus::Navigating) => {
                "j/k: navigate  /: edit filter  Enter: analyze  Esc: close"
            }
            InputMode::Normal => match self.status() {
                UploadStatus::Uploading => "t: theme  q: quit",
                UploadStatus::Success => "n: new analysis  t: theme  q: quit",
                UploadStatus::Idle | UploadStatus::Error if self.intake.current().is_some() => {
                    "o: path  b: browse  x: remove  t: theme  q: quit"
                }
                UploadStatus::Idle | UploadStatus::Error => "o: path  b: browse  t: theme  q: quit",
            },
        };

        FooterInfo {
            keybindings: keybindings.to_string(),
        }
    }
}
