//! Toast stack drawn over the top-right corner.

use crate::app::notifications::ToastKind;
use crate::ui::helpers::{position_cursor, text_width, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::ToastView;

/// Renders toasts from `row` downward, newest at the bottom.
pub fn render_toasts(row: usize, toasts: &[ToastView], theme: &Theme, cols: usize) {
    let max_width = (cols / 2).max(20).min(cols);

    for (offset, toast) in toasts.iter().enumerate() {
        let (icon, color) = match toast.kind {
            ToastKind::Success => ("✓", &theme.colors.toast_success),
            ToastKind::Error => ("✗", &theme.colors.toast_error),
            ToastKind::Info => ("ℹ", &theme.colors.toast_info),
        };
        let text = format!(" {icon} {} ", truncate(&toast.message, max_width.saturating_sub(4)));
        let width = text_width(&text);

        position_cursor(row + offset, cols.saturating_sub(width) + 1);
        print!("{}", Theme::bold());
        print!("{}", Theme::fg(&theme.colors.toast_fg));
        print!("{}", Theme::bg(color));
        print!("{text}");
        print!("{}", Theme::reset());
    }
}
