//! Browser rows: file name with fuzzy highlights and a right-aligned size.

use crate::ui::helpers::{self, position_cursor, text_width};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::DisplayItem;

const SIZE_COLUMN: usize = 10;

/// Renders the NAME/SIZE heading at `row`.
///
/// # Returns
///
/// The next available row position (row + 1)
pub fn render_table_headers(row: usize, theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::bold());
    print!("{}", Theme::fg(&theme.colors.header_fg));
    let name_width = cols.saturating_sub(SIZE_COLUMN + 2);
    print!("  {:<name_width$}{:>SIZE_COLUMN$}", "NAME", "SIZE");
    print!("{}", Theme::reset());
    row + 1
}

/// Renders one row per item starting at `row`.
///
/// # Returns
///
/// The row after the last item.
pub fn render_table_rows(row: usize, items: &[DisplayItem], theme: &Theme, cols: usize) -> usize {
    let mut current_row = row;
    for item in items {
        current_row = render_table_row(current_row, item, theme, cols);
    }
    current_row
}

fn render_table_row(row: usize, item: &DisplayItem, theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);

    if item.is_selected {
        print!("{}", Theme::fg(&theme.colors.selection_fg));
        print!("{}", Theme::bg(&theme.colors.selection_bg));
        print!("▶ ");
    } else {
        print!("  ");
    }

    if !item.is_supported {
        // Unsupported entries stay listed, dimmed.
        print!("{}", Theme::dim());
        print!("{}", Theme::fg(&theme.colors.text_dim));
    } else if !item.is_selected {
        print!("{}", Theme::fg(&theme.colors.text_normal));
    }

    helpers::render_highlighted_text(&item.name, &item.highlight_ranges, theme, item.is_selected);

    let used = 2 + text_width(&item.name);
    let size_width = text_width(&item.size_label);
    print!("{}", " ".repeat(cols.saturating_sub(used + size_width)));
    if cols >= used + size_width {
        print!("{}", item.size_label);
    }

    print!("{}", Theme::reset());
    row + 1
}
