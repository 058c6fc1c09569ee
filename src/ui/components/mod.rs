//! Composable UI component renderers.
//!
//! Each component prints one part of the pane at a given row and returns the
//! next free row.
//!
//! # Components
//!
//! - [`header`]: Title bar with the theme indicator
//! - [`dropzone`]: Drop prompt or the accepted file with progress
//! - [`results`]: The results card
//! - [`search`]: Boxed input for path entry and the browser filter
//! - [`table`]: Browser rows (NAME, SIZE)
//! - [`empty`]: Empty state message for the browser
//! - [`toast`]: Notifications in the top-right corner
//! - [`footer`]: Keybinding hints
//!
//! # Layout Modes
//!
//! - [`render_main_layout`]: Header + Dropzone + Results (+ path input) + Footer
//! - [`render_browser_layout`]: Header + Title + Filter + Table + Footer

mod dropzone;
mod empty;
mod footer;
mod header;
mod results;
mod search;
mod table;
mod toast;

pub use results::tone_color;

use crate::ui::helpers::{position_cursor, print_centered};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{BrowserView, InputBoxInfo, UIViewModel};

use dropzone::render_dropzone;
use empty::render_empty_state;
use footer::render_footer;
use header::render_header;
use results::render_results;
use search::render_input_box;
use table::{render_table_headers, render_table_rows};
use toast::render_toasts;

const CARD_MARGIN: usize = 1;

/// First row below the header and its border.
const CONTENT_ROW: usize = 4;

/// Which edge of a card frame to draw.
#[derive(Debug, Clone, Copy)]
enum BoxEdge {
    Top,
    Bottom,
}

/// Columns inside a card frame.
fn inner_width(cols: usize) -> usize {
    cols.saturating_sub(CARD_MARGIN * 2 + 2)
}

fn render_box_edge(row: usize, edge: BoxEdge, color: &str, cols: usize) -> usize {
    let (left, right) = match edge {
        BoxEdge::Top => ('╭', '╮'),
        BoxEdge::Bottom => ('╰', '╯'),
    };
    position_cursor(row, CARD_MARGIN + 1);
    print!("{}", Theme::fg(color));
    print!("{left}{}{right}", "─".repeat(inner_width(cols)));
    print!("{}", Theme::reset());
    row + 1
}

/// Prints `content` inside the card frame; `visible` is its width without escapes.
fn render_framed_line(row: usize, content: &str, visible: usize, color: &str, cols: usize) -> usize {
    position_cursor(row, CARD_MARGIN + 1);
    print!("{}│{}", Theme::fg(color), Theme::reset());
    print!("{content}");
    print!("{}", Theme::reset());
    print!("{}", " ".repeat(inner_width(cols).saturating_sub(visible)));
    print!("{}│{}", Theme::fg(color), Theme::reset());
    row + 1
}

/// Renders a horizontal border line at the specified row.
///
/// # Returns
///
/// The next available row position (row + 1)
fn render_border(row: usize, color: &str, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::fg(color));
    print!("{}", "─".repeat(cols));
    print!("{}", Theme::reset());
    row + 1
}

fn render_chrome(vm: &UIViewModel, theme: &Theme, cols: usize, rows: usize) {
    let current_row = render_header(2, &vm.header, theme, cols);
    render_border(current_row, &theme.colors.border, cols);

    let footer_start = rows.saturating_sub(1);
    let border_row = footer_start.saturating_sub(1);
    render_border(border_row, &theme.colors.border, cols);
    render_footer(footer_start, &vm.footer, theme, cols);
}

/// Renders the main screen.
///
/// Layout structure:
/// ```text
/// [blank line]
/// [Header]
/// [Border]
/// [Dropzone card]
/// [Results card]
/// [Path input - 3 lines, when open]
/// [Border]
/// [Footer]
/// ```
///
/// Toasts are drawn last, over the top-right corner.
pub fn render_main_layout(vm: &UIViewModel, path_input: Option<&InputBoxInfo>, theme: &Theme, cols: usize, rows: usize) {
    let mut current_row = render_dropzone(CONTENT_ROW, &vm.dropzone, theme, cols);
    current_row = render_results(current_row, &vm.results, theme, cols);

    if let Some(input) = path_input {
        let input_row = rows.saturating_sub(5).max(current_row);
        render_input_box(input_row, input, theme, cols);
    }

    render_chrome(vm, theme, cols, rows);
    render_toasts(CONTENT_ROW, &vm.toasts, theme, cols);
}

/// Renders the full-screen file browser.
///
/// Layout structure:
/// ```text
/// [blank line]
/// [Header]
/// [Border]
/// [Directory title]
/// [Filter box - 3 lines]
/// [Table Headers]
/// [Table Rows | Empty state]
/// [Border]
/// [Footer]
/// ```
pub fn render_browser_layout(vm: &UIViewModel, browser: &BrowserView, theme: &Theme, cols: usize, rows: usize) {
    print_centered(
        CONTENT_ROW,
        &browser.title,
        &format!("{}{}", Theme::bold(), Theme::fg(&theme.colors.accent)),
        cols,
    );
    let mut current_row = render_input_box(CONTENT_ROW + 1, &browser.search, theme, cols);

    if let Some(empty) = &browser.empty_state {
        render_empty_state(current_row + 1, empty, theme, cols);
    } else {
        current_row = render_table_headers(current_row, theme, cols);
        render_table_rows(current_row, &browser.items, theme, cols);
    }

    render_chrome(vm, theme, cols, rows);
    render_toasts(CONTENT_ROW, &vm.toasts, theme, cols);
}
