//! File intake: accepts at most one image and owns its preview.
//!
//! Intake is the only place a [`PreviewHandle`] is created or released. The
//! lifecycle controller receives an [`ImageRef`] pointing at the live handle
//! and never owns it.
//!
//! # Organization
//!
//! - [`validation`]: Type, size and content checks
//! - [`preview`]: Preview handles, thumbnails and the handle ledger

pub mod preview;
pub mod validation;

pub use preview::{PreviewHandle, PreviewLedger, Thumbnail};
pub use validation::{validate, ACCEPTED_EXTENSIONS, MAX_FILE_BYTES};

use crate::domain::{FileCandidate, ImageKind, ImageRef, UploadStatus, ValidationError};
use std::path::{Path, PathBuf};

/// A file intake accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accepted {
    /// Reference to the new preview.
    pub image: ImageRef,
    /// Path the worker should read.
    pub path: PathBuf,
    /// Validated kind.
    pub kind: ImageKind,
    /// Offered files beyond the first that were not considered.
    pub ignored: usize,
}

/// Result of offering files to intake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeOutcome {
    /// Nothing was offered.
    Empty,
    /// Intake is disabled in the current status; the offer was ignored.
    Disabled,
    /// The first file was accepted and now holds the preview.
    Accepted(Accepted),
    /// The first file was refused; nothing changed.
    Rejected(ValidationError),
}

/// Holder of the single live preview.
#[derive(Debug)]
pub struct FileIntake {
    ledger: PreviewLedger,
    current: Option<PreviewHandle>,
    limit_bytes: u64,
}

impl Default for FileIntake {
    fn default() -> Self {
        Self::new(PreviewLedger::new())
    }
}

impl FileIntake {
    /// Creates an empty intake registering handles in `ledger`.
    #[must_use]
    pub fn new(ledger: PreviewLedger) -> Self {
        Self {
            ledger,
            current: None,
            limit_bytes: MAX_FILE_BYTES,
        }
    }

    /// Overrides the size limit.
    #[must_use]
    pub fn with_limit(mut self, limit_bytes: u64) -> Self {
        self.limit_bytes = limit_bytes;
        self
    }

    /// Whether files may be offered in `status`.
    #[must_use]
    pub const fn is_enabled(status: UploadStatus) -> bool {
        status.accepts_files()
    }

    /// Offers files from a drop, paste or browser pick.
    ///
    /// Only the first path is considered. It is checked for type, then size,
    /// then content, then decoded into a thumbnail. On acceptance the
    /// previous preview is released before the new one is registered; on
    /// rejection the previous preview stays.
    ///
    /// # Parameters
    ///
    /// * `paths` - Offered files, in the order the host delivered them
    /// * `status` - Current lifecycle status; intake only runs in `Idle` and `Error`
    ///
    /// # Returns
    ///
    /// [`IntakeOutcome::Empty`] for no paths, [`IntakeOutcome::Disabled`]
    /// when `status` refuses files, otherwise the verdict on the first path.
    ///
    /// # Example
    ///
    /// ```rust
    /// use emberwatch::domain::UploadStatus;
    /// use emberwatch::intake::{FileIntake, IntakeOutcome};
    /// use std::path::PathBuf;
    ///
    /// let mut intake = FileIntake::default();
    /// assert_eq!(intake.offer(&[], UploadStatus::Idle), IntakeOutcome::Empty);
    /// assert_eq!(
    ///     intake.offer(&[PathBuf::from("a.png")], UploadStatus::Uploading),
    ///     IntakeOutcome::Disabled
    /// );
    /// ```
    pub fn offer(&mut self, paths: &[PathBuf], status: UploadStatus) -> IntakeOutcome {
        let Some(first) = paths.first() else {
            return IntakeOutcome::Empty;
        };
        if !Self::is_enabled(status) {
            tracing::debug!(?status, "intake disabled, offer ignored");
            return IntakeOutcome::Disabled;
        }

        let ignored = paths.len() - 1;
        match self.accept(first) {
            Ok((image, kind)) => {
                tracing::info!(name = %image.name, ignored, "image accepted");
                IntakeOutcome::Accepted(Accepted {
                    image,
                    path: first.clone(),
                    kind,
                    ignored,
                })
            }
            Err(err) => {
                tracing::info!(path = %first.display(), error = %err, "image rejected");
                IntakeOutcome::Rejected(err)
            }
        }
    }

    fn accept(&mut self, path: &Path) -> Result<(ImageRef, ImageKind), ValidationError> {
        let candidate = FileCandidate::probe(path).map_err(|e| ValidationError::Unreadable {
            name: crate::domain::candidate::display_name(path),
            reason: e.to_string(),
        })?;
        let kind = validate(&candidate, self.limit_bytes)?;
        let thumbnail = PreviewHandle::load_thumbnail(&candidate, kind)?;

        if let Some(previous) = self.current.take() {
            previous.release();
        }
        let handle = PreviewHandle::register(&self.ledger, &candidate, kind, thumbnail);
        let image = handle.image_ref();
        self.current = Some(handle);
        Ok((image, kind))
    }

    /// Releases the current preview if intake is enabled in `status`.
    ///
    /// # Parameters
    ///
    /// * `status` - Current lifecycle status; removal is refused while
    ///   uploading or showing a result
    ///
    /// # Returns
    ///
    /// `true` if a preview was released.
    pub fn remove(&mut self, status: UploadStatus) -> bool {
        if !Self::is_enabled(status) {
            return false;
        }
        self.clear()
    }

    /// Releases the current preview regardless of status.
    pub fn clear(&mut self) -> bool {
        self.current.take().map(PreviewHandle::release).is_some()
    }

    /// The live preview, if any.
    #[must_use]
    pub const fn current(&self) -> Option<&PreviewHandle> {
        self.current.as_ref()
    }

    /// Resolves a displayable reference to its live handle.
    #[must_use]
    pub fn resolve(&self, image: &ImageRef) -> Option<&PreviewHandle> {
        self.current.as_ref().filter(|h| h.id() == image.preview_id)
    }

    /// Ledger the handles are registered in.
    #[must_use]
    pub const fn ledger(&self) -> &PreviewLedger {
        &self.ledger
    }

    /// Size limit in bytes.
    #[must_use]
    pub const fn limit_bytes(&self) -> u64 {
        self.limit_bytes
    }
}
