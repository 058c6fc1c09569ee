//! Shared rendering utilities and helpers.
//!
//! Low-level pieces used by several components. Everything measures text in
//! characters, never bytes.
//!
//! # Features
//!
//! - **Fuzzy Match Highlighting**: Renders text with highlighted character ranges
//! - **Half-block Thumbnails**: Two pixel rows per terminal row with `▀`
//! - **Bars and Padding**: Progress splits, truncation and centering
//!
//! # Example
//!
//! ```rust
//! use emberwatch::ui::helpers::{center_padding, truncate};
//!
//! assert_eq!(truncate("ridge-north-0412.jpg", 10), "ridge-n...");
//! assert_eq!(center_padding("fire", 10), 3);
//! ```

use crate::intake::Thumbnail;
use crate::ui::theme::Theme;

const ELLIPSIS: &str = "...";

/// Positions the cursor at a specific row and column.
///
/// Uses ANSI escape sequence `\u{1b}[{row};{col}H` to move the cursor.
/// Coordinates are 1-indexed (row 1 = first row, col 1 = first column).
pub fn position_cursor(row: usize, col: usize) {
    print!("\u{1b}[{row};{col}H");
}

/// Display width of `text` in terminal columns.
#[must_use]
pub fn text_width(text: &str) -> usize {
    text.chars().count()
}

/// Shortens `text` to at most `max` characters, ending in `...` when cut.
#[must_use]
pub fn truncate(text: &str, max: usize) -> String {
    if text_width(text) <= max {
        return text.to_string();
    }
    if max <= ELLIPSIS.len() {
        return text.chars().take(max).collect();
    }
    let kept: String = text.chars().take(max - ELLIPSIS.len()).collect();
    format!("{kept}{ELLIPSIS}")
}

/// Left padding that centers `text` in `cols`.
#[must_use]
pub fn center_padding(text: &str, cols: usize) -> usize {
    cols.saturating_sub(text_width(text)) / 2
}

/// Prints `text` centered on `row`, padded to the full width.
pub fn print_centered(row: usize, text: &str, style: &str, cols: usize) {
    let text = truncate(text, cols);
    let padding = center_padding(&text, cols);

    position_cursor(row, 1);
    print!("{style}");
    print!("{}", " ".repeat(padding));
    print!("{text}");
    print!("{}", " ".repeat(cols.saturating_sub(padding + text_width(&text))));
    print!("{}", Theme::reset());
}

/// Splits a bar of `width` cells into `(filled, empty)` for `percent`.
#[must_use]
pub fn progress_split(percent: u8, width: usize) -> (usize, usize) {
    let filled = width * usize::from(percent.min(100)) / 100;
    (filled, width - filled)
}

/// A horizontal bar as ANSI text: `filled_color` cells, then track cells.
#[must_use]
pub fn bar(percent: u8, width: usize, filled_color: &str, track_color: &str) -> String {
    let (filled, empty) = progress_split(percent, width);
    format!(
        "{}{}{}{}{}",
        Theme::fg(filled_color),
        "█".repeat(filled),
        Theme::fg(track_color),
        "░".repeat(empty),
        Theme::reset()
    )
}

/// One terminal row of a thumbnail as ANSI text.
///
/// Terminal row `row` covers pixel rows `2 * row` and `2 * row + 1`; the
/// upper pixel is the foreground of `▀`, the lower its background. An odd
/// last row leaves the background untouched.
#[must_use]
pub fn thumbnail_row(thumbnail: &Thumbnail, row: u32) -> String {
    let top_y = row * 2;
    let mut out = String::new();
    for x in 0..thumbnail.width {
        let Some(top) = thumbnail.pixel(x, top_y) else {
            break;
        };
        out.push_str(&Theme::fg_rgb(top));
        match thumbnail.pixel(x, top_y + 1) {
            Some(bottom) => out.push_str(&Theme::bg_rgb(bottom)),
            None => out.push_str("\u{1b}[49m"),
        }
        out.push('▀');
    }
    out.push_str(Theme::reset());
    out
}

/// Renders text with highlighted character ranges for fuzzy matches.
///
/// Ranges are `(start, end)` character indices, end exclusive. Highlighting
/// is skipped on the selected row so it does not fight the selection colors.
///
/// # Example
///
/// ```rust
/// use emberwatch::ui::helpers::render_highlighted_text;
/// use emberwatch::{Theme, ThemeMode};
///
/// let theme = Theme::builtin(ThemeMode::Dark)?;
/// render_highlighted_text("ridge/fire-01.jpg", &[(6, 10)], &theme, false);
/// # Ok::<(), emberwatch::EmberwatchError>(())
/// ```
pub fn render_highlighted_text(text: &str, ranges: &[(usize, usize)], theme: &Theme, is_selected: bool) {
    if ranges.is_empty() || is_selected {
        print!("{text}");
        return;
    }

    let chars: Vec<char> = text.chars().collect();
    let mut current_pos = 0;

    for &(start, end) in ranges {
        let start = start.min(chars.len());
        let end = end.min(chars.len());
        if start < current_pos || start >= end {
            continue;
        }
        if start > current_pos {
            let normal_section: String = chars[current_pos..start].iter().collect();
            print!("{normal_section}");
        }

        print!("{}", Theme::fg(&theme.colors.match_highlight_fg));
        print!("{}", Theme::bg(&theme.colors.match_highlight_bg));
        let highlighted_section: String = chars[start..end].iter().collect();
        print!("{highlighted_section}");
        print!("{}", Theme::reset());
        print!("{}", Theme::fg(&theme.colors.text_normal));

        current_pos = end;
    }

    if current_pos < chars.len() {
        let remaining: String = chars[current_pos..].iter().collect();
        print!("{remaining}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate("brûlé.png", 20), "brûlé.png");
        assert_eq!(truncate("éééééééé", 6), "ééé...");
        assert_eq!(truncate("abcdef", 2), "ab");
    }

    #[test]
    fn progress_split_is_proportional_and_capped() {
        assert_eq!(progress_split(0, 20), (0, 20));
        assert_eq!(progress_split(50, 20), (10, 10));
        assert_eq!(progress_split(99, 20), (19, 1));
        assert_eq!(progress_split(250, 20), (20, 0));
    }

    #[test]
    fn thumbnail_rows_pair_pixels() {
        let thumbnail = Thumbnail {
            width: 1,
            height: 3,
            pixels: vec![[255, 0, 0], [0, 0, 255], [0, 255, 0]],
        };

        assert_eq!(
            thumbnail_row(&thumbnail, 0),
            format!("{}{}▀{}", Theme::fg_rgb([255, 0, 0]), Theme::bg_rgb([0, 0, 255]), Theme::reset())
        );
        assert_eq!(
            thumbnail_row(&thumbnail, 1),
            format!("{}\u{1b}[49m▀{}", Theme::fg_rgb([0, 255, 0]), Theme::reset())
        );
        assert_eq!(thumbnail_row(&thumbnail, 2), Theme::reset());
    }

    #[test]
    fn centering_uses_character_width() {
        assert_eq!(center_padding("☀ light", 11), 2);
        assert_eq!(center_padding("too wide for this", 4), 0);
    }
}
