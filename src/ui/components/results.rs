//! Results card: class badge, confidence bar, timestamp and advisory.
//!
//! ```text
//!  ╭──────────────────────────────────────────────╮
//!  │ ▀▀▀▀▀▀▀▀  Analysis Result                    │
//!  │ ▀▀▀▀▀▀▀▀   Smoke   Confidence 81%            │
//!  │ ▀▀▀▀▀▀▀▀  ████████████████████░░░░░          │
//!  │ ▀▀▀▀▀▀▀▀  Analyzed 3/14/2025, 2:05:09 PM     │
//!  │ ▀▀▀▀▀▀▀▀  ⚠ Potential risk detected. ...     │
//!  ╰──────────────────────────────────────────────╯
//! ```

use super::{render_box_edge, render_framed_line, BoxEdge};
use crate::ui::helpers::{bar, text_width, thumbnail_row, truncate};
use crate::ui::presentation::{ResultsCard, Tone};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::ResultsView;

const CARD_LINES: u32 = 5;
const BAR_MAX: usize = 30;
const SKELETON_WIDTHS: [usize; 4] = [16, 24, 30, 20];

/// Renders the results card starting at `row`. A hidden card draws nothing.
///
/// # Returns
///
/// The next available row position.
pub fn render_results(row: usize, view: &ResultsView, theme: &Theme, cols: usize) -> usize {
    let border = &theme.colors.border;
    let inner = super::inner_width(cols);
    let thumb_cols = view.thumbnail.as_ref().map_or(0, |t| t.width as usize + 2);
    let text_width_max = inner.saturating_sub(thumb_cols + 1);

    let lines: Vec<(String, usize)> = match &view.card {
        ResultsCard::Hidden => return row,
        ResultsCard::Loading => {
            let title = section_title(theme, text_width_max);
            std::iter::once(title)
                .chain(SKELETON_WIDTHS.iter().map(|&w| {
                    let w = w.min(text_width_max);
                    (
                        format!("{}{}{}", Theme::fg(&theme.colors.progress_track), "░".repeat(w), Theme::reset()),
                        w,
                    )
                }))
                .collect()
        }
        ResultsCard::Ready {
            label,
            tone,
            confidence,
            timestamp,
            advisory,
        } => {
            let color = tone_color(*tone, theme);
            let badge = format!(" {label} ");
            let confidence_text = format!("  Confidence {confidence}%");
            let bar_width = text_width_max.min(BAR_MAX);

            let mut lines = vec![
                section_title(theme, text_width_max),
                (
                    format!(
                        "{}{}{}{badge}{}{}{confidence_text}{}",
                        Theme::bold(),
                        Theme::fg(&theme.colors.toast_fg),
                        Theme::bg(color),
                        Theme::reset(),
                        Theme::fg(&theme.colors.text_normal),
                        Theme::reset()
                    ),
                    text_width(&badge) + text_width(&confidence_text),
                ),
                (bar(*confidence, bar_width, color, &theme.colors.progress_track), bar_width),
                plain(&format!("Analyzed {timestamp}"), &Theme::fg(&theme.colors.text_dim), text_width_max),
            ];
            if let Some(advisory) = advisory {
                lines.push(plain(advisory, &Theme::fg(color), text_width_max));
            }
            lines
        }
    };

    let thumb_rows = view.thumbnail.as_ref().map_or(0, crate::intake::Thumbnail::rows);
    let mut current_row = render_box_edge(row, BoxEdge::Top, border, cols);
    for line in 0..thumb_rows.max(CARD_LINES) {
        let mut content = String::from(" ");
        if let Some(thumbnail) = &view.thumbnail {
            if line < thumbnail.rows() {
                content.push_str(&thumbnail_row(thumbnail, line));
            } else {
                content.push_str(&" ".repeat(thumbnail.width as usize));
            }
            content.push_str("  ");
        }
        let (text, len) = lines.get(line as usize).cloned().unwrap_or_default();
        content.push_str(&text);
        current_row = render_framed_line(current_row, &content, 1 + thumb_cols + len, border, cols);
    }
    render_box_edge(current_row, BoxEdge::Bottom, border, cols)
}

/// Palette color for a badge tone.
#[must_use]
pub fn tone_color(tone: Tone, theme: &Theme) -> &str {
    match tone {
        Tone::Red => &theme.colors.fire,
        Tone::Amber => &theme.colors.smoke,
        Tone::Green => &theme.colors.no_fire,
        Tone::Neutral => &theme.colors.neutral,
    }
}

fn section_title(theme: &Theme, width: usize) -> (String, usize) {
    plain(
        "Analysis Result",
        &format!("{}{}", Theme::bold(), Theme::fg(&theme.colors.header_fg)),
        width,
    )
}

fn plain(text: &str, style: &str, width: usize) -> (String, usize) {
    let text = truncate(text, width);
    let len = text_width(&text);
    (format!("{style}{text}{}", Theme::reset()), len)
}
