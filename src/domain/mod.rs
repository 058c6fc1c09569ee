//! Domain layer for the Emberwatch plugin.
//!
//! Core types with no dependency on the Zellij runtime: lifecycle status,
//! verdicts and results, offered files, theme mode and the error taxonomy.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`status`]: The upload/detection status enum and its allowed edges
//! - [`detection`]: Classifier verdicts, detection results, image references
//! - [`candidate`]: Offered files and browser listings
//! - [`theme_mode`]: Light/dark selection

pub mod candidate;
pub mod detection;
pub mod error;
pub mod status;
pub mod theme_mode;

pub use candidate::{BrowseEntry, FileCandidate, ImageKind};
pub use detection::{Classification, DetectionResult, ImageRef, PreviewId, Verdict};
pub use error::{AnalysisError, EmberwatchError, Result, ValidationError};
pub use status::UploadStatus;
pub use theme_mode::ThemeMode;
