//! Preview handles: the displayable reference to an accepted image.
//!
//! A [`PreviewHandle`] owns a decoded thumbnail and is registered in a
//! [`PreviewLedger`] for exactly as long as it lives. Creation and release are
//! paired by ownership: the handle is not `Clone`, [`PreviewHandle::release`]
//! consumes it, and `Drop` covers supersede and teardown. Nothing that merely
//! renders the preview can release it.

use crate::domain::{FileCandidate, ImageKind, ImageRef, PreviewId, ValidationError};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Maximum thumbnail width in pixels (one terminal column per pixel).
pub const THUMBNAIL_MAX_WIDTH: u32 = 32;

/// Maximum thumbnail height in pixels (two pixels per terminal row).
pub const THUMBNAIL_MAX_HEIGHT: u32 = 16;

/// Downscaled RGB pixels of an accepted image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major RGB pixels, `width * height` entries.
    pub pixels: Vec<[u8; 3]>,
}

impl Thumbnail {
    /// Decodes `bytes` as `kind` and scales it to fit the thumbnail box.
    ///
    /// # Errors
    ///
    /// Returns the decoder error if the bytes are not a valid image of `kind`.
    pub fn decode(bytes: &[u8], kind: ImageKind) -> image::ImageResult<Self> {
        let decoded = image::load_from_memory_with_format(bytes, kind.format())?;
        let scaled = decoded
            .thumbnail(THUMBNAIL_MAX_WIDTH, THUMBNAIL_MAX_HEIGHT)
            .to_rgb8();
        Ok(Self {
            width: scaled.width(),
            height: scaled.height(),
            pixels: scaled.pixels().map(|p| p.0).collect(),
        })
    }

    /// Pixel at `(x, y)`, or `None` outside the thumbnail.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }

    /// Number of terminal rows the thumbnail occupies.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.height.div_ceil(2)
    }
}

#[derive(Debug, Default)]
struct LedgerState {
    next_id: u64,
    live: BTreeSet<PreviewId>,
    released: u64,
}

/// Registry of live preview handles.
///
/// Clones share the same registry.
#[derive(Debug, Clone, Default)]
pub struct PreviewLedger {
    state: Arc<Mutex<LedgerState>>,
}

impl PreviewLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn register(&self) -> PreviewId {
        let mut state = self.lock();
        state.next_id += 1;
        let id = PreviewId(state.next_id);
        state.live.insert(id);
        id
    }

    fn release(&self, id: PreviewId) -> bool {
        let mut state = self.lock();
        let was_live = state.live.remove(&id);
        if was_live {
            state.released += 1;
        }
        was_live
    }

    /// Number of handles currently alive.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.lock().live.len()
    }

    /// Whether `id` belongs to a live handle.
    #[must_use]
    pub fn is_live(&self, id: PreviewId) -> bool {
        self.lock().live.contains(&id)
    }

    /// Total handles released over the ledger's lifetime.
    #[must_use]
    pub fn released_count(&self) -> u64 {
        self.lock().released
    }
}

/// Owning handle to an accepted image and its thumbnail.
pub struct PreviewHandle {
    id: PreviewId,
    path: PathBuf,
    name: String,
    size_bytes: u64,
    kind: ImageKind,
    thumbnail: Thumbnail,
    ledger: PreviewLedger,
}

impl PreviewHandle {
    /// Registers a handle for an already-decoded candidate.
    #[must_use]
    pub fn register(
        ledger: &PreviewLedger,
        candidate: &FileCandidate,
        kind: ImageKind,
        thumbnail: Thumbnail,
    ) -> Self {
        let id = ledger.register();
        tracing::debug!(preview_id = %id, name = %candidate.name, "preview handle acquired");
        Self {
            id,
            path: candidate.path.clone(),
            name: candidate.name.clone(),
            size_bytes: candidate.size_bytes,
            kind,
            thumbnail,
            ledger: ledger.clone(),
        }
    }

    /// Reads and decodes a candidate's thumbnail without registering anything.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Unreadable`] if the file cannot be read or decoded.
    pub fn load_thumbnail(
        candidate: &FileCandidate,
        kind: ImageKind,
    ) -> Result<Thumbnail, ValidationError> {
        let unreadable = |reason: String| ValidationError::Unreadable {
            name: candidate.name.clone(),
            reason,
        };
        let bytes = std::fs::read(&candidate.path).map_err(|e| unreadable(e.to_string()))?;
        Thumbnail::decode(&bytes, kind).map_err(|e| unreadable(e.to_string()))
    }

    /// Releases the handle. Equivalent to dropping it.
    pub fn release(self) {}

    /// Ledger identifier.
    #[must_use]
    pub const fn id(&self) -> PreviewId {
        self.id
    }

    /// File name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// File size in bytes.
    #[must_use]
    pub const fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Accepted kind.
    #[must_use]
    pub const fn kind(&self) -> ImageKind {
        self.kind
    }

    /// Path of the accepted file.
    #[must_use]
    pub const fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Decoded thumbnail.
    #[must_use]
    pub const fn thumbnail(&self) -> &Thumbnail {
        &self.thumbnail
    }

    /// Non-owning reference for results.
    #[must_use]
    pub fn image_ref(&self) -> ImageRef {
        ImageRef {
            preview_id: self.id,
            path: self.path.to_string_lossy().into_owned(),
            name: self.name.clone(),
        }
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        if self.ledger.release(self.id) {
            tracing::debug!(preview_id = %self.id, "preview handle released");
        } else {
            tracing::warn!(preview_id = %self.id, "preview handle was already released");
        }
    }
}

impl std::fmt::Debug for PreviewHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewHandle")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("size_bytes", &self.size_bytes)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    #[test]
    fn thumbnail_fits_the_box_and_keeps_aspect() {
        let bytes = test_support::png_bytes(128, 64);
        let thumb = Thumbnail::decode(&bytes, ImageKind::Png).expect("decode");
        assert_eq!((thumb.width, thumb.height), (32, 16));
        assert_eq!(thumb.pixels.len(), 32 * 16);
        assert_eq!(thumb.rows(), 8);
        assert!(thumb.pixel(32, 0).is_none());
    }

    #[test]
    fn decoding_with_the_wrong_kind_fails() {
        let bytes = test_support::png_bytes(8, 8);
        assert!(Thumbnail::decode(&bytes, ImageKind::Jpeg).is_err());
    }

    #[test]
    fn drop_releases_exactly_once() {
        let dir = tempfile::tempdir().expect("tempdir");
        let candidate = test_support::png_candidate(dir.path(), "a.png");
        let ledger = PreviewLedger::new();
        let thumb = PreviewHandle::load_thumbnail(&candidate, ImageKind::Png).expect("thumb");

        let handle = PreviewHandle::register(&ledger, &candidate, ImageKind::Png, thumb);
        let id = handle.id();
        assert!(ledger.is_live(id));
        assert_eq!(ledger.live_count(), 1);

        handle.release();
        assert!(!ledger.is_live(id));
        assert_eq!(ledger.live_count(), 0);
        assert_eq!(ledger.released_count(), 1);
    }

    #[test]
    fn image_ref_points_at_the_accepted_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let candidate = test_support::png_candidate(dir.path(), "ridge.png");
        let ledger = PreviewLedger::new();
        let thumb = PreviewHandle::load_thumbnail(&candidate, ImageKind::Png).expect("thumb");
        let handle = PreviewHandle::register(&ledger, &candidate, ImageKind::Png, thumb);

        let image = handle.image_ref();
        assert_eq!(image.preview_id, handle.id());
        assert_eq!(image.path, candidate.path.to_string_lossy());
        assert_eq!(image.name, "ridge.png");
    }

    #[test]
    fn missing_file_is_unreadable() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut candidate = test_support::png_candidate(dir.path(), "gone.png");
        candidate.path = dir.path().join("does-not-exist.png");
        let err = PreviewHandle::load_thumbnail(&candidate, ImageKind::Png).expect_err("missing");
        assert!(matches!(err, ValidationError::Unreadable { .. }));
    }
}
