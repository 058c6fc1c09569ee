//! Infrastructure layer for filesystem and environment interactions.
//!
//! Path translation for the Zellij sandbox (where the host filesystem is
//! mounted under `/host`) and the directory scan behind the file browser.

pub mod paths;

pub use paths::{expand_tilde, get_data_dir, resolve_input_path, resolve_submission, strip_host_prefix};

use crate::domain::BrowseEntry;
use std::path::Path;

/// Extensions the browser lists. Only JPG/JPEG/PNG are accepted; the others
/// are listed so the user sees why a picture is missing.
pub const IMAGE_LIKE_EXTENSIONS: [&str; 8] = ["jpg", "jpeg", "png", "gif", "webp", "bmp", "tif", "tiff"];

/// Upper bound on listed entries, so a scan of a huge tree stays responsive.
pub const MAX_SCAN_ENTRIES: usize = 2_000;

/// Lists image-like files under `root`, descending at most `max_depth` levels.
///
/// Hidden files and directories are skipped. Entry names are relative to
/// `root` and the result is sorted by name. Unreadable subdirectories are
/// skipped silently.
///
/// # Errors
///
/// Returns an I/O error only if `root` itself cannot be read.
///
/// # Examples
///
/// ```no_run
/// use emberwatch::infrastructure::scan_image_files;
/// use std::path::Path;
///
/// let entries = scan_image_files(Path::new("/host/pictures"), 2)?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn scan_image_files(root: &Path, max_depth: usize) -> std::io::Result<Vec<BrowseEntry>> {
    let _span = tracing::debug_span!("scan_image_files", root = %root.display(), max_depth).entered();

    let mut entries = Vec::new();
    let mut pending = vec![(root.to_path_buf(), 0_usize)];
    let mut first = true;

    while let Some((dir, depth)) = pending.pop() {
        let read = match std::fs::read_dir(&dir) {
            Ok(read) => read,
            Err(e) if first => return Err(e),
            Err(e) => {
                tracing::debug!(dir = %dir.display(), error = %e, "skipping unreadable directory");
                continue;
            }
        };
        first = false;

        for entry in read.filter_map(Result::ok) {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if name.starts_with('.') {
                continue;
            }
            let Ok(file_type) = entry.file_type() else { continue };
            let path = entry.path();

            if file_type.is_dir() {
                if depth < max_depth {
                    pending.push((path, depth + 1));
                }
            } else if is_image_like(&path) && entries.len() < MAX_SCAN_ENTRIES {
                let size_bytes = entry.metadata().map_or(0, |m| m.len());
                let relative = path.strip_prefix(root).unwrap_or(&path);
                entries.push(BrowseEntry {
                    path: path.to_string_lossy().into_owned(),
                    name: relative.to_string_lossy().into_owned(),
                    size_bytes,
                });
            }
        }
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    tracing::debug!(count = entries.len(), "directory scanned");
    Ok(entries)
}

fn is_image_like(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_LIKE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn lists_images_within_depth_and_skips_hidden() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path();
        fs::create_dir_all(root.join("ridge/deep/deeper")).expect("dirs");
        fs::create_dir_all(root.join(".cache")).expect("hidden dir");
        for file in [
            "a.JPG",
            "notes.txt",
            "smoke.gif",
            ".hidden.png",
            "ridge/b.png",
            "ridge/deep/c.jpeg",
            "ridge/deep/deeper/d.png",
            ".cache/e.png",
        ] {
            fs::write(root.join(file), b"x").expect("write");
        }

        let names: Vec<String> = scan_image_files(root, 2)
            .expect("scan")
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["a.JPG", "ridge/b.png", "ridge/deep/c.jpeg", "smoke.gif"]);
    }

    #[test]
    fn depth_zero_lists_only_the_root() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir(dir.path().join("sub")).expect("dir");
        fs::write(dir.path().join("sub/a.png"), b"x").expect("write");
        fs::write(dir.path().join("b.png"), b"xy").expect("write");

        let entries = scan_image_files(dir.path(), 0).expect("scan");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "b.png");
        assert_eq!(entries[0].size_bytes, 2);
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(scan_image_files(&dir.path().join("nope"), 1).is_err());
    }
}
