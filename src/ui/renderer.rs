//! Top-level rendering coordinator.
//!
//! The renderer follows a two-step process:
//!
//! 1. **View Model Computation**: Transform `AppState` into `UIViewModel`
//! 2. **Component Rendering**: Delegate to the layout for the open overlay
//!
//! # Example
//!
//! ```rust
//! use emberwatch::{initialize, ui::render, Config};
//!
//! let state = initialize(&Config::default())?;
//! render(&state, 24, 80); // Renders to stdout
//! # Ok::<(), emberwatch::EmberwatchError>(())
//! ```

use crate::app::AppState;
use crate::ui::components;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{Overlay, UIViewModel};

/// Renders the plugin UI to stdout in the active palette.
///
/// # Parameters
///
/// * `state` - Current application state
/// * `rows` - Terminal height in rows
/// * `cols` - Terminal width in columns
///
/// # Output
///
/// Prints ANSI-styled output with absolute cursor positioning. Does not
/// clear the screen.
pub fn render(state: &AppState, rows: usize, cols: usize) {
    let viewmodel = state.compute_viewmodel(rows, cols);

    render_viewmodel(&viewmodel, state.themes.current(), rows, cols);
}

/// Renders a view model with overlay-specific layout.
///
/// - Browser overlay: full-screen browser
/// - Path input overlay: main screen with an input box above the footer
/// - No overlay: main screen
fn render_viewmodel(vm: &UIViewModel, theme: &Theme, rows: usize, cols: usize) {
    match &vm.overlay {
        Some(Overlay::Browser(browser)) => components::render_browser_layout(vm, browser, theme, cols, rows),
        Some(Overlay::PathInput(input)) => components::render_main_layout(vm, Some(input), theme, cols, rows),
        None => components::render_main_layout(vm, None, theme, cols, rows),
    }
}
