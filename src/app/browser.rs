//! In-pane file browser with fuzzy filtering.
//!
//! Lists image-like files the worker found under the browse directory.
//! Unsupported types (GIF, WebP, ...) stay in the listing so the user sees
//! them, and picking one produces the usual validation notice.

use crate::domain::BrowseEntry;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::collections::BTreeSet;

/// Browser listing, query and cursor.
#[derive(Debug, Clone, Default)]
pub struct FileBrowser {
    /// Sandbox path of the directory being listed.
    dir: Option<String>,

    /// Every entry the worker returned, sorted by name.
    entries: Vec<BrowseEntry>,

    /// Indices into `entries` that match the query, in listing order.
    filtered: Vec<usize>,

    /// Cursor position within `filtered`.
    selected_index: usize,

    /// Current filter text.
    query: String,

    /// A scan request is in flight.
    loading: bool,

    /// Why the last scan failed, if it did.
    error: Option<String>,
}

impl FileBrowser {
    /// Starts listing `dir`, discarding the previous listing and query.
    pub fn open(&mut self, dir: impl Into<String>) {
        *self = Self {
            dir: Some(dir.into()),
            loading: true,
            ..Self::default()
        };
    }

    /// Installs a listing. Listings for another directory are ignored.
    ///
    /// Returns `true` if the listing was taken.
    pub fn loaded(&mut self, dir: &str, entries: Vec<BrowseEntry>) -> bool {
        if self.dir.as_deref() != Some(dir) {
            tracing::debug!(dir, expected = ?self.dir, "listing for another directory ignored");
            return false;
        }
        self.entries = entries;
        self.loading = false;
        self.error = None;
        self.apply_filter();
        true
    }

    /// Records a failed scan.
    pub fn failed(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
        self.entries.clear();
        self.filtered.clear();
        self.selected_index = 0;
    }

    /// Appends to the query and refilters.
    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
        self.apply_filter();
    }

    /// Removes the last query character and refilters.
    pub fn pop_char(&mut self) {
        self.query.pop();
        self.apply_filter();
    }

    /// Recomputes `filtered` from the query.
    ///
    /// The query is split on whitespace; an entry matches when every token
    /// fuzzy-matches its lowercased name. The cursor is clamped to the new
    /// bounds.
    pub fn apply_filter(&mut self) {
        let _span = tracing::debug_span!(
            "browser_filter",
            total = self.entries.len(),
            query_len = self.query.len()
        )
        .entered();

        let tokens = self.tokens();
        let matcher = SkimMatcherV2::default();

        self.filtered = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| {
                let name = entry.name.to_lowercase();
                tokens.iter().all(|t| matcher.fuzzy_match(&name, t).is_some())
            })
            .map(|(i, _)| i)
            .collect();

        if self.filtered.is_empty() {
            self.selected_index = 0;
        } else {
            self.selected_index = self.selected_index.min(self.filtered.len() - 1);
        }

        tracing::debug!(filtered = self.filtered.len(), "browser filter applied");
    }

    fn tokens(&self) -> Vec<String> {
        self.query
            .split_whitespace()
            .map(str::to_lowercase)
            .collect()
    }

    /// Moves the cursor down, wrapping to the top.
    pub fn move_down(&mut self) {
        if self.filtered.is_empty() {
            return;
        }
        self.selected_index = (self.selected_index + 1) % self.filtered.len();
    }

    /// Moves the cursor up, wrapping to the bottom.
    pub fn move_up(&mut self) {
        if self.filtered.is_empty() {
            return;
        }
        if self.selected_index == 0 {
            self.selected_index = self.filtered.len() - 1;
        } else {
            self.selected_index -= 1;
        }
    }

    /// Entry under the cursor.
    #[must_use]
    pub fn selected(&self) -> Option<&BrowseEntry> {
        self.filtered
            .get(self.selected_index)
            .and_then(|&i| self.entries.get(i))
    }

    /// Matching entries in listing order.
    pub fn filtered_entries(&self) -> impl Iterator<Item = &BrowseEntry> {
        self.filtered.iter().filter_map(|&i| self.entries.get(i))
    }

    /// Character ranges of `text` matched by the query, as `(start, end)`
    /// with exclusive end.
    ///
    /// Matches of every token are merged, then consecutive indices are
    /// coalesced into runs.
    #[must_use]
    pub fn highlight_ranges(&self, text: &str) -> Vec<(usize, usize)> {
        let tokens = self.tokens();
        if tokens.is_empty() {
            return vec![];
        }

        let matcher = SkimMatcherV2::default();
        let lowered = text.to_lowercase();
        let indices: BTreeSet<usize> = tokens
            .iter()
            .filter_map(|t| matcher.fuzzy_indices(&lowered, t))
            .flat_map(|(_score, idx)| idx)
            .collect();

        let mut ranges = Vec::new();
        let mut run: Option<(usize, usize)> = None;
        for idx in indices {
            run = match run {
                Some((start, end)) if idx == end => Some((start, idx + 1)),
                Some(done) => {
                    ranges.push(done);
                    Some((idx, idx + 1))
                }
                None => Some((idx, idx + 1)),
            };
        }
        ranges.extend(run);
        ranges
    }

    /// Window `(start, end)` into the filtered list that fits `rows` lines.
    ///
    /// The cursor sits near the middle; near either end the window is
    /// shifted to stay full.
    #[must_use]
    pub fn visible_window(&self, rows: usize) -> (usize, usize) {
        let total = self.filtered.len();
        let mut start = self.selected_index.saturating_sub(rows / 2);
        let end = (start + rows).min(total);
        if end - start < rows && total >= rows {
            start = end.saturating_sub(rows);
        }
        (start, end)
    }

    /// Directory being listed.
    #[must_use]
    pub fn dir(&self) -> Option<&str> {
        self.dir.as_deref()
    }

    /// Current query.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Cursor position within the filtered list.
    #[must_use]
    pub const fn selected_index(&self) -> usize {
        self.selected_index
    }

    /// Number of entries matching the query.
    #[must_use]
    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    /// Number of entries in the listing.
    #[must_use]
    pub fn total_len(&self) -> usize {
        self.entries.len()
    }

    /// Whether a scan is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Error of the last scan.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str) -> BrowseEntry {
        BrowseEntry {
            path: format!("/host/photos/{name}"),
            name: name.to_string(),
            size_bytes: 1024,
        }
    }

    fn browser(names: &[&str]) -> FileBrowser {
        let mut browser = FileBrowser::default();
        browser.open("/host/photos");
        assert!(browser.loaded("/host/photos", names.iter().map(|n| entry(n)).collect()));
        browser
    }

    #[test]
    fn listing_for_another_directory_is_ignored() {
        let mut browser = FileBrowser::default();
        browser.open("/host/a");
        assert!(!browser.loaded("/host/b", vec![entry("x.png")]));
        assert!(browser.is_loading());
        assert_eq!(browser.total_len(), 0);
    }

    #[test]
    fn tokens_must_all_match() {
        let mut browser = browser(&["ridge/smoke.jpg", "ridge/clear.png", "valley/smoke.png"]);
        for c in "smoke ridge".chars() {
            browser.push_char(c);
        }
        let names: Vec<_> = browser.filtered_entries().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["ridge/smoke.jpg"]);

        browser.pop_char();
        browser.pop_char();
        browser.pop_char();
        browser.pop_char();
        browser.pop_char();
        assert_eq!(browser.filtered_len(), 2);
    }

    #[test]
    fn cursor_wraps_and_clamps() {
        let mut browser = browser(&["a.png", "b.png", "c.png"]);
        browser.move_up();
        assert_eq!(browser.selected().map(|e| e.name.as_str()), Some("c.png"));
        browser.move_down();
        assert_eq!(browser.selected_index(), 0);

        browser.move_up();
        browser.push_char('a');
        assert_eq!(browser.selected().map(|e| e.name.as_str()), Some("a.png"));
    }

    #[test]
    fn highlight_ranges_coalesce_runs() {
        let mut browser = browser(&["forest.jpg"]);
        for c in "fore".chars() {
            browser.push_char(c);
        }
        assert_eq!(browser.highlight_ranges("forest.jpg"), vec![(0, 4)]);
        assert!(FileBrowser::default().highlight_ranges("forest.jpg").is_empty());
    }

    #[test]
    fn window_follows_the_cursor() {
        let names: Vec<String> = (0..20).map(|i| format!("{i:02}.png")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let mut browser = browser(&refs);

        assert_eq!(browser.visible_window(6), (0, 6));
        for _ in 0..10 {
            browser.move_down();
        }
        assert_eq!(browser.visible_window(6), (7, 13));
        browser.move_up();
        browser.move_up();
        for _ in 0..11 {
            browser.move_up();
        }
        assert_eq!(browser.selected_index(), 17);
        assert_eq!(browser.visible_window(6), (14, 20));
    }

    #[test]
    fn failure_clears_the_listing() {
        let mut browser = browser(&["a.png"]);
        browser.failed("Cannot list ~/photos");
        assert_eq!(browser.error(), Some("Cannot list ~/photos"));
        assert!(browser.selected().is_none());
        assert!(!browser.is_loading());
    }
}
