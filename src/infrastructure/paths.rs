//! Path handling for the Zellij plugin sandbox.
//!
//! Inside the sandbox the host filesystem is visible under `/host`, which
//! points at the directory Zellij was started in (usually `$HOME`). Paths the
//! user drops or types are written from the host's point of view, so they are
//! translated here before intake probes them.

use std::path::{Path, PathBuf};

/// Sandbox mount point of the host directory.
pub const HOST_MOUNT: &str = "/host";

/// Returns the data directory for Emberwatch state.
///
/// Resolves to `/host/.local/share/zellij/emberwatch`, which is
/// `~/.local/share/zellij/emberwatch` when Zellij starts from `$HOME`. Holds
/// `preferences.json` and the trace file.
///
/// # Examples
///
/// ```
/// use emberwatch::infrastructure::get_data_dir;
///
/// assert_eq!(get_data_dir().to_str(), Some("/host/.local/share/zellij/emberwatch"));
/// ```
#[must_use]
pub fn get_data_dir() -> PathBuf {
    PathBuf::from(HOST_MOUNT).join(".local/share/zellij/emberwatch")
}

/// Expands `~` to the sandbox host mount.
///
/// # Examples
///
/// ```
/// use emberwatch::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("~/pictures"), "/host/pictures");
/// assert_eq!(expand_tilde("~"), "/host");
/// assert_eq!(expand_tilde("/absolute/path"), "/absolute/path");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    if path.starts_with("~/") {
        path.replacen('~', HOST_MOUNT, 1)
    } else if path == "~" {
        HOST_MOUNT.to_string()
    } else {
        path.to_string()
    }
}

/// Removes the `/host` prefix for display.
///
/// # Examples
///
/// ```
/// use emberwatch::infrastructure::strip_host_prefix;
///
/// assert_eq!(strip_host_prefix("/host/pictures/ridge.jpg"), "~/pictures/ridge.jpg");
/// assert_eq!(strip_host_prefix("/tmp/ridge.jpg"), "/tmp/ridge.jpg");
/// ```
#[must_use]
pub fn strip_host_prefix(path: &str) -> String {
    match path.strip_prefix(HOST_MOUNT) {
        Some("") => "~".to_string(),
        Some(rest) if rest.starts_with('/') => format!("~{rest}"),
        _ => path.to_string(),
    }
}

/// Splits pasted or dropped text into individual path tokens.
///
/// Terminals deliver a dropped file as text, quoting or escaping it the way a
/// shell would. Handles:
/// - whitespace and newlines between paths
/// - `'single'` and `"double"` quotes
/// - backslash escapes (`My\ Photo.jpg`)
/// - `file://` URIs with percent-encoding
///
/// # Examples
///
/// ```
/// use emberwatch::infrastructure::paths::split_dropped_text;
///
/// assert_eq!(
///     split_dropped_text(r"'/tmp/a b.jpg' /tmp/c\ d.png"),
///     vec!["/tmp/a b.jpg", "/tmp/c d.png"]
/// );
/// assert_eq!(split_dropped_text("file:///tmp/fire%20line.png"), vec!["/tmp/fire line.png"]);
/// ```
#[must_use]
pub fn split_dropped_text(text: &str) -> Vec<String> {
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Quote {
        None,
        Single,
        Double,
    }

    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote = Quote::None;
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Quote::Single, '\'') | (Quote::Double, '"') => quote = Quote::None,
            (Quote::None, '\'') => {
                quote = Quote::Single;
                in_token = true;
            }
            (Quote::None, '"') => {
                quote = Quote::Double;
                in_token = true;
            }
            (Quote::None | Quote::Double, '\\') => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
                in_token = true;
            }
            (Quote::None, c) if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            (_, c) => {
                current.push(c);
                in_token = true;
            }
        }
    }
    if in_token {
        tokens.push(current);
    }

    tokens
        .into_iter()
        .filter(|t| !t.is_empty())
        .map(|t| decode_file_uri(&t))
        .collect()
}

fn decode_file_uri(token: &str) -> String {
    token.strip_prefix("file://").map_or_else(
        || token.to_string(),
        |rest| {
            // file://hostname/path: drop the authority
            let path = if rest.starts_with('/') {
                rest
            } else {
                rest.find('/').map_or(rest, |i| &rest[i..])
            };
            percent_encoding::percent_decode_str(path)
                .decode_utf8_lossy()
                .into_owned()
        },
    )
}

/// Maps a host-side path to the path the sandbox can read.
///
/// - `/host/...` is kept
/// - `~` and `~/...` go under `/host`
/// - absolute paths under `host_root` (the directory mounted at `/host`) are re-rooted
/// - other absolute paths are kept as given
/// - relative paths are taken relative to `/host`
///
/// # Examples
///
/// ```
/// use emberwatch::infrastructure::resolve_input_path;
/// use std::path::{Path, PathBuf};
///
/// let home = Some(Path::new("/home/ana"));
/// assert_eq!(resolve_input_path("/home/ana/pics/a.jpg", home), PathBuf::from("/host/pics/a.jpg"));
/// assert_eq!(resolve_input_path("pics/a.jpg", None), PathBuf::from("/host/pics/a.jpg"));
/// ```
#[must_use]
pub fn resolve_input_path(input: &str, host_root: Option<&Path>) -> PathBuf {
    let expanded = expand_tilde(input.trim());
    let path = Path::new(&expanded);

    if path.starts_with(HOST_MOUNT) {
        return path.to_path_buf();
    }
    if path.is_absolute() {
        return host_root
            .and_then(|root| path.strip_prefix(root).ok())
            .map_or_else(|| path.to_path_buf(), |rest| Path::new(HOST_MOUNT).join(rest));
    }
    Path::new(HOST_MOUNT).join(path)
}

/// Turns submitted text into the list of paths to offer to intake.
///
/// If the text splits into several tokens but, taken verbatim, names an
/// existing file, that single file wins: some terminals paste paths with
/// spaces unquoted.
#[must_use]
pub fn resolve_submission(text: &str, host_root: Option<&Path>) -> Vec<PathBuf> {
    let tokens = split_dropped_text(text);
    if tokens.len() > 1 {
        let verbatim = resolve_input_path(text, host_root);
        if verbatim.is_file() {
            return vec![verbatim];
        }
    }
    tokens
        .iter()
        .map(|t| resolve_input_path(t, host_root))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_quotes_allow_escaped_quotes() {
        assert_eq!(
            split_dropped_text(r#""/tmp/say \"fire\".png""#),
            vec![r#"/tmp/say "fire".png"#]
        );
    }

    #[test]
    fn newlines_separate_paths() {
        assert_eq!(
            split_dropped_text("/a.jpg\n/b.png\n"),
            vec!["/a.jpg".to_string(), "/b.png".to_string()]
        );
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(split_dropped_text("   \n ").is_empty());
        assert!(split_dropped_text("''").is_empty());
    }

    #[test]
    fn file_uri_with_authority() {
        assert_eq!(
            split_dropped_text("file://localhost/tmp/ash%2Bsmoke.jpg"),
            vec!["/tmp/ash+smoke.jpg"]
        );
    }

    #[test]
    fn absolute_paths_outside_the_root_are_kept() {
        assert_eq!(
            resolve_input_path("/mnt/data/a.png", Some(Path::new("/home/ana"))),
            PathBuf::from("/mnt/data/a.png")
        );
        assert_eq!(
            resolve_input_path("/host/a.png", None),
            PathBuf::from("/host/a.png")
        );
        assert_eq!(
            resolve_input_path("~/a.png", None),
            PathBuf::from("/host/a.png")
        );
    }

    #[test]
    fn unquoted_path_with_spaces_is_kept_whole_when_it_exists() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("burn scar.jpg");
        std::fs::write(&file, b"x").expect("write");
        let text = file.to_string_lossy().into_owned();

        assert_eq!(resolve_submission(&text, None), vec![file]);
    }

    #[test]
    fn several_paths_resolve_in_order() {
        let got = resolve_submission("'a b.jpg' c.png", None);
        assert_eq!(
            got,
            vec![PathBuf::from("/host/a b.jpg"), PathBuf::from("/host/c.png")]
        );
    }

    #[test]
    fn display_form_uses_tilde() {
        assert_eq!(strip_host_prefix("/host"), "~");
        assert_eq!(strip_host_prefix("/hostile/x"), "/hostile/x");
    }
}
