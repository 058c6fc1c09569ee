//! Application layer coordinating state, events, and actions.
//!
//! This layer sits between the plugin runtime (main.rs) and the
//! domain/intake/worker layers. Everything that changes in response to a key,
//! a host timer or a worker response changes here.
//!
//! # Architecture
//!
//! The application layer follows a unidirectional data flow pattern:
//!
//! ```text
//! User Input → Events → Event Handler → State Mutations → Actions → Side Effects
//!                           ↑                                  ↓
//!                           └──────── Worker Responses ────────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`browser`]: File browser listing, fuzzy filter and selection
//! - [`handler`]: Event processing logic and state transition coordinator
//! - [`lifecycle`]: The Idle/Uploading/Success/Error controller
//! - [`modes`]: Input mode state machine types
//! - [`notifications`]: Auto-dismissing toasts
//! - [`state`]: Central application state container and view model computation
//! - [`theme_store`]: Active light/dark palette
//!
//! # Example
//!
//! ```rust
//! use emberwatch::app::{handle_event, Event, InputMode};
//! use emberwatch::{initialize, Config};
//!
//! let mut state = initialize(&Config::default())?;
//! handle_event(&mut state, &Event::StartPathEntry { prefill: Some('~') })?;
//! assert_eq!(state.input_mode, InputMode::PathEntry);
//! assert_eq!(state.path_input, "~");
//! # Ok::<(), emberwatch::EmberwatchError>(())
//! ```

pub mod actions;
pub mod browser;
pub mod handler;
pub mod lifecycle;
pub mod modes;
pub mod notifications;
pub mod state;
pub mod theme_store;

pub use actions::Action;
pub use browser::FileBrowser;
pub use handler::{handle_event, Event};
pub use lifecycle::{LifecycleController, Settled};
pub use modes::{InputMode, SearchFocus};
pub use notifications::{Notifications, Toast, ToastKind};
pub use state::AppState;
pub use theme_store::ThemeStore;
