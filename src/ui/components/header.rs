//! Header component: title bar with the theme indicator.

use crate::ui::helpers::{center_padding, position_cursor, text_width, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::HeaderInfo;

/// Renders the header at `row`: centered bold title, theme label flush right.
///
/// # Returns
///
/// The next available row position (row + 1)
pub fn render_header(row: usize, header: &HeaderInfo, theme: &Theme, cols: usize) -> usize {
    let label_width = text_width(&header.theme_label) + 1;
    let title = truncate(&header.title, cols.saturating_sub(label_width * 2));
    let title_len = text_width(&title);
    let padding = center_padding(&title, cols);

    position_cursor(row, 1);
    print!("{}", Theme::bold());
    print!("{}", Theme::fg(&theme.colors.header_fg));
    if let Some(bg) = &theme.colors.header_bg {
        print!("{}", Theme::bg(bg));
    }

    print!("{}", " ".repeat(padding));
    print!("{title}");

    let used = padding + title_len;
    if cols >= used + label_width {
        print!("{}", " ".repeat(cols - used - label_width));
        print!("{}", Theme::fg(&theme.colors.accent));
        print!("{} ", header.theme_label);
    } else {
        print!("{}", " ".repeat(cols.saturating_sub(used)));
    }

    print!("{}", Theme::reset());
    row + 1
}
