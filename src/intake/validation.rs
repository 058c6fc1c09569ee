//! Cheap checks run on an offered file before anything is decoded.

use crate::domain::{FileCandidate, ImageKind, ValidationError};

/// Largest file intake accepts: 10 MiB.
pub const MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

/// Extensions intake accepts, lowercase and without the dot.
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Validates type, size and content of `candidate`.
///
/// Checks run in order: declared type, size against `limit_bytes`, then the
/// magic bytes, which must be JPEG or PNG and agree with the extension.
///
/// # Errors
///
/// Returns the first [`ValidationError`] hit.
pub fn validate(candidate: &FileCandidate, limit_bytes: u64) -> Result<ImageKind, ValidationError> {
    let Some(declared) = candidate.declared_kind() else {
        return Err(ValidationError::UnsupportedType {
            name: candidate.name.clone(),
        });
    };

    if candidate.size_bytes > limit_bytes {
        return Err(ValidationError::TooLarge {
            size_bytes: candidate.size_bytes,
            limit_bytes,
        });
    }

    match candidate.sniffed_kind() {
        Some(sniffed) if sniffed == declared => Ok(declared),
        _ => Err(ValidationError::ContentMismatch {
            name: candidate.name.clone(),
        }),
    }
}
