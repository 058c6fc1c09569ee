//! User interface rendering layer with component-based architecture.
//!
//! Turns view models into ANSI-styled output through composable components,
//! with light and dark palettes and fuzzy match highlighting.
//!
//! # Architecture
//!
//! ```text
//! AppState → compute_viewmodel → UIViewModel → render → ANSI Output
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: View model types representing renderable UI state
//! - [`presentation`]: Detection result to results card mapping
//! - [`renderer`]: Top-level rendering coordinator
//! - [`components`]: Composable UI component renderers
//! - [`helpers`]: Shared rendering utilities (highlighting, thumbnails, bars)
//! - [`theme`]: Palettes and ANSI escape sequence generation

pub mod components;
pub mod helpers;
pub mod presentation;
pub mod renderer;
pub mod theme;
pub mod viewmodel;

pub use presentation::{present_results, ResultsCard, Tone};
pub use renderer::render;
pub use theme::{Theme, ThemeColors};
pub use viewmodel::{
    BrowserView, DisplayItem, DropzoneView, EmptyState, FooterInfo, HeaderInfo, InputBoxInfo, Overlay, ProgressInfo,
    ResultsView, ToastView, UIViewModel,
};
