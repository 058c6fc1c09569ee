//! Boxed single-line input, used for path entry and the browser filter.
//!
//! ```text
//!      ┌──────────────────────────────────────┐
//!      │ Filter: ridge▏                       │
//!      └──────────────────────────────────────┘
//! ```

use crate::ui::helpers::{position_cursor, text_width};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::InputBoxInfo;

const INPUT_BOX_MARGIN: usize = 5;

/// Renders a three-line input box starting at `row`.
///
/// Long input scrolls so the end of the text stays visible. A focused box
/// draws its border in the accent color and shows a caret.
///
/// # Returns
///
/// The next available row position (row + 3)
pub fn render_input_box(row: usize, input: &InputBoxInfo, theme: &Theme, cols: usize) -> usize {
    let margin = if cols > INPUT_BOX_MARGIN * 4 { INPUT_BOX_MARGIN } else { 0 };
    let box_width = cols.saturating_sub(margin * 2);
    let inner_width = box_width.saturating_sub(2);
    let border = if input.focused {
        &theme.colors.accent
    } else {
        &theme.colors.search_bar_border
    };

    position_cursor(row, 1);
    print!("{}", " ".repeat(margin));
    print!("{}", Theme::fg(border));
    print!("┌{}┐", "─".repeat(inner_width));
    print!("{}", Theme::reset());

    let prefix = format!(" {}: ", input.label);
    let caret = if input.focused { "▏" } else { "" };
    let room = inner_width.saturating_sub(text_width(&prefix) + text_width(caret));
    let text_len = text_width(&input.text);
    let shown: String = input.text.chars().skip(text_len.saturating_sub(room)).collect();
    let padding = inner_width.saturating_sub(text_width(&prefix) + text_width(&shown) + text_width(caret));

    position_cursor(row + 1, 1);
    print!("{}", " ".repeat(margin));
    print!("{}", Theme::fg(border));
    print!("│");
    print!("{}", Theme::fg(&theme.colors.text_dim));
    print!("{prefix}");
    print!("{}", Theme::fg(&theme.colors.text_normal));
    print!("{shown}");
    print!("{}", Theme::fg(&theme.colors.accent));
    print!("{caret}");
    print!("{}", " ".repeat(padding));
    print!("{}", Theme::fg(border));
    print!("│");
    print!("{}", Theme::reset());

    position_cursor(row + 2, 1);
    print!("{}", " ".repeat(margin));
    print!("{}", Theme::fg(border));
    print!("└{}┘", "─".repeat(inner_width));
    print!("{}", Theme::reset());

    row + 3
}
