//! Upload/detection lifecycle status.

use serde::{Deserialize, Serialize};

/// Where the current upload is in its lifecycle.
///
/// Drives which UI branch is visible and whether intake accepts files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UploadStatus {
    /// Nothing in flight.
    #[default]
    Idle,
    /// A file was accepted and is being analyzed.
    Uploading,
    /// Analysis finished and a result is available.
    Success,
    /// Analysis failed.
    Error,
}

impl UploadStatus {
    /// Returns `true` if the lifecycle allows moving from `self` to `to`.
    #[must_use]
    pub const fn can_transition_to(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Idle, Self::Uploading)
                | (Self::Uploading, Self::Success | Self::Error)
                | (Self::Success | Self::Error, Self::Idle)
        )
    }

    /// Intake ignores offers while an analysis runs or a result is shown.
    #[must_use]
    pub const fn accepts_files(self) -> bool {
        !matches!(self, Self::Uploading | Self::Success)
    }
}
