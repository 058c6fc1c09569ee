//! Files offered to intake and files listed by the browser.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Number of leading bytes read for content sniffing.
const HEAD_LEN: usize = 16;

/// Image encodings intake accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageKind {
    /// `image/jpeg` (`.jpg`, `.jpeg`).
    Jpeg,
    /// `image/png` (`.png`).
    Png,
}

impl ImageKind {
    /// Maps a file extension (case-insensitive, without the dot) to a kind.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    /// MIME type for this kind.
    #[must_use]
    pub const fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    /// Equivalent `image` crate format.
    #[must_use]
    pub const fn format(self) -> image::ImageFormat {
        match self {
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Png => image::ImageFormat::Png,
        }
    }
}

/// One file offered by a user gesture, probed from disk.
///
/// Only metadata and a few leading bytes are read; the full contents are
/// loaded once the candidate passes the cheap checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    /// Path as resolved for reading.
    pub path: PathBuf,
    /// Final path component.
    pub name: String,
    /// Size reported by the filesystem.
    pub size_bytes: u64,
    /// Lowercased extension without the dot, empty if none.
    pub extension: String,
    /// Leading bytes for format sniffing.
    pub head: Vec<u8>,
}

impl FileCandidate {
    /// Reads metadata and the first bytes of `path`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the path does not exist, is not a regular
    /// file, or cannot be opened.
    pub fn probe(path: &Path) -> std::io::Result<Self> {
        let metadata = std::fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "not a regular file",
            ));
        }

        let mut head = Vec::with_capacity(HEAD_LEN);
        File::open(path)?
            .take(HEAD_LEN as u64)
            .read_to_end(&mut head)?;

        Ok(Self {
            path: path.to_path_buf(),
            name: display_name(path),
            size_bytes: metadata.len(),
            extension: path
                .extension()
                .and_then(|e| e.to_str())
                .map(str::to_ascii_lowercase)
                .unwrap_or_default(),
            head,
        })
    }

    /// Kind implied by the extension, if accepted.
    #[must_use]
    pub fn declared_kind(&self) -> Option<ImageKind> {
        ImageKind::from_extension(&self.extension)
    }

    /// Kind implied by the leading bytes, if JPEG or PNG.
    #[must_use]
    pub fn sniffed_kind(&self) -> Option<ImageKind> {
        match image::guess_format(&self.head).ok()? {
            image::ImageFormat::Jpeg => Some(ImageKind::Jpeg),
            image::ImageFormat::Png => Some(ImageKind::Png),
            _ => None,
        }
    }
}

/// A file listed by the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowseEntry {
    /// Full path, usable for intake.
    pub path: String,
    /// Path relative to the browsed directory, used for display and search.
    pub name: String,
    /// File size.
    pub size_bytes: u64,
}

impl BrowseEntry {
    /// Whether intake would accept this entry's extension.
    #[must_use]
    pub fn is_supported(&self) -> bool {
        Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .and_then(ImageKind::from_extension)
            .is_some()
    }
}

/// Final path component as a string, or the whole path if it has none.
#[must_use]
pub fn display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.to_string_lossy().into_owned(),
        |n| n.to_string_lossy().into_owned(),
    )
}

/// Formats a byte count as megabytes with two decimals, e.g. `2.00 MB`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_megabytes(size_bytes: u64) -> String {
    format!("{:.2} MB", size_bytes as f64 / (1024.0 * 1024.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn extension_mapping_is_case_insensitive() {
        assert_eq!(ImageKind::from_extension("JPG"), Some(ImageKind::Jpeg));
        assert_eq!(ImageKind::from_extension("jpeg"), Some(ImageKind::Jpeg));
        assert_eq!(ImageKind::from_extension("Png"), Some(ImageKind::Png));
        assert_eq!(ImageKind::from_extension("gif"), None);
    }

    #[test]
    fn probe_reads_size_and_png_signature() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("Canopy.PNG");
        let mut file = std::fs::File::create(&path).expect("create");
        file.write_all(b"\x89PNG\r\n\x1a\n0123456789abcdef")
            .expect("write");
        drop(file);

        let candidate = FileCandidate::probe(&path).expect("probe");
        assert_eq!(candidate.name, "Canopy.PNG");
        assert_eq!(candidate.extension, "png");
        assert_eq!(candidate.size_bytes, 24);
        assert_eq!(candidate.head.len(), HEAD_LEN);
        assert_eq!(candidate.declared_kind(), Some(ImageKind::Png));
        assert_eq!(candidate.sniffed_kind(), Some(ImageKind::Png));
    }

    #[test]
    fn probe_rejects_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(FileCandidate::probe(dir.path()).is_err());
    }

    #[test]
    fn megabytes_use_two_decimals() {
        assert_eq!(format_megabytes(2 * 1024 * 1024), "2.00 MB");
        assert_eq!(format_megabytes(1_572_864), "1.50 MB");
    }

    #[test]
    fn browse_entry_support_follows_extension() {
        let entry = BrowseEntry {
            path: "/host/a/smoke.gif".to_string(),
            name: "a/smoke.gif".to_string(),
            size_bytes: 10,
        };
        assert!(!entry.is_supported());
    }
}
