//! Upload area: the drop prompt, or the accepted file with its thumbnail.

use super::{render_box_edge, render_framed_line, BoxEdge};
use crate::ui::helpers::{bar, text_width, thumbnail_row, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{DropzoneView, ProgressInfo};

const INFO_LINES: u32 = 5;
const GUTTER: usize = 2;

/// Renders the upload area starting at `row`.
///
/// # Returns
///
/// The next available row position.
pub fn render_dropzone(row: usize, view: &DropzoneView, theme: &Theme, cols: usize) -> usize {
    match view {
        DropzoneView::Prompt { headline, formats } => render_prompt(row, headline, formats, theme, cols),
        DropzoneView::Preview {
            name,
            size_label,
            thumbnail,
            removable,
            progress,
        } => {
            let border = &theme.colors.border;
            let inner = super::inner_width(cols);
            let thumb_cols = thumbnail.width as usize;
            let info_width = inner.saturating_sub(thumb_cols + GUTTER + 1);

            let mut current_row = render_box_edge(row, BoxEdge::Top, border, cols);
            for line in 0..thumbnail.rows().max(INFO_LINES) {
                let mut content = String::from(" ");
                if line < thumbnail.rows() {
                    content.push_str(&thumbnail_row(thumbnail, line));
                } else {
                    content.push_str(&" ".repeat(thumb_cols));
                }
                content.push_str(&" ".repeat(GUTTER));

                let (info, info_len) = info_line(line, name, size_label, *removable, progress.as_ref(), theme, info_width);
                content.push_str(&info);

                current_row = render_framed_line(current_row, &content, 1 + thumb_cols + GUTTER + info_len, border, cols);
            }
            render_box_edge(current_row, BoxEdge::Bottom, border, cols)
        }
    }
}

fn render_prompt(row: usize, headline: &str, formats: &str, theme: &Theme, cols: usize) -> usize {
    let border = &theme.colors.accent;
    let inner = super::inner_width(cols);

    let mut current_row = render_box_edge(row, BoxEdge::Top, border, cols);
    current_row = render_framed_line(current_row, "", 0, border, cols);
    for (text, style) in [
        (headline, format!("{}{}", Theme::bold(), Theme::fg(&theme.colors.text_normal))),
        (formats, Theme::fg(&theme.colors.text_dim)),
    ] {
        let text = truncate(text, inner);
        let padding = inner.saturating_sub(text_width(&text)) / 2;
        let content = format!("{}{style}{text}{}", " ".repeat(padding), Theme::reset());
        current_row = render_framed_line(current_row, &content, padding + text_width(&text), border, cols);
    }
    current_row = render_framed_line(current_row, "", 0, border, cols);
    render_box_edge(current_row, BoxEdge::Bottom, border, cols)
}

/// Text beside the thumbnail for `line`, with its visible width.
fn info_line(
    line: u32,
    name: &str,
    size_label: &str,
    removable: bool,
    progress: Option<&ProgressInfo>,
    theme: &Theme,
    width: usize,
) -> (String, usize) {
    let styled = |style: String, text: &str| {
        let text = truncate(text, width);
        let len = text_width(&text);
        (format!("{style}{text}{}", Theme::reset()), len)
    };

    match (line, progress) {
        (0, _) => styled(format!("{}{}", Theme::bold(), Theme::fg(&theme.colors.text_normal)), name),
        (1, _) => styled(Theme::fg(&theme.colors.text_dim), size_label),
        (3, Some(progress)) => {
            let bar_width = width.min(30);
            (bar(progress.percent, bar_width, &theme.colors.accent, &theme.colors.progress_track), bar_width)
        }
        (4, Some(progress)) => styled(Theme::fg(&theme.colors.accent), &progress.label),
        (3, None) if removable => styled(Theme::fg(&theme.colors.text_dim), "x: remove"),
        _ => (String::new(), 0),
    }
}
