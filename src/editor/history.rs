use tracing::trace;

use super::textarea::TextArea;

/// Text and cursor offset captured before history navigation started
#[derive(Debug, Clone, PartialEq, Eq)]
struct Draft {
    text: String,
    cursor: usize,
}

/// Past entries plus a navigation cursor and a draft slot.
///
/// The navigation cursor ranges over `[0, len]`; `len` means the buffer
/// currently holds the draft rather than an entry.
#[derive(Debug, Clone)]
pub struct HistoryList {
    entries: Vec<String>,
    /// Maximum number of entries, 0 for unlimited
    max_size: usize,
    /// Skip an added entry equal to the last one
    dedup: bool,
    cursor: usize,
    draft: Option<Draft>,
}

impl Default for HistoryList {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryList {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            max_size: 0,
            dedup: true,
            cursor: 0,
            draft: None,
        }
    }

    pub fn set_max_size(&mut self, max_size: usize) {
        self.max_size = max_size;
        self.truncate_front();
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn set_dedup(&mut self, dedup: bool) {
        self.dedup = dedup;
    }

    /// Replace all entries. With a non-zero `cap`, only the newest `cap`
    /// entries are kept.
    pub fn set_all(&mut self, entries: Vec<String>, cap: usize) {
        self.max_size = cap;
        self.entries = entries;
        self.truncate_front();
        self.reset_cursor();
    }

    /// Append an entry, evicting the oldest ones past the maximum size
    pub fn add(&mut self, entry: impl Into<String>) {
        let entry = entry.into();
        let duplicate = self.dedup && self.entries.last() == Some(&entry);
        if !duplicate {
            self.entries.push(entry);
        }
        self.truncate_front();
        self.reset_cursor();
    }

    fn truncate_front(&mut self) {
        if self.max_size != 0 && self.entries.len() > self.max_size {
            let excess = self.entries.len() - self.max_size;
            self.entries.drain(..excess);
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.entries.get(idx).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Navigation cursor, `len()` when on the draft
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor.min(self.entries.len());
    }

    /// Move the navigation cursor back to the draft position
    pub fn reset_cursor(&mut self) {
        self.cursor = self.entries.len();
    }

    pub fn has_draft(&self) -> bool {
        self.draft.is_some()
    }

    /// Capture the buffer as the draft unless one is already held
    pub fn save_draft_if_unsaved(&mut self, text: &TextArea) {
        if self.draft.is_none() {
            self.draft = Some(Draft {
                text: text.value(),
                cursor: text.cursor_offset(),
            });
        }
    }

    /// Put the draft back into the buffer and return to the draft position
    pub fn restore_draft(&mut self, text: &mut TextArea) {
        if let Some(draft) = self.draft.take() {
            text.set_value(&draft.text);
            text.set_cursor_offset(draft.cursor);
        }
        self.reset_cursor();
    }

    pub fn discard_draft(&mut self) {
        self.draft = None;
    }

    /// Step to the previous entry. Returns true if the buffer changed.
    pub fn up(&mut self, text: &mut TextArea) -> bool {
        if self.entries.is_empty() {
            return false;
        }
        self.save_draft_if_unsaved(text);
        if self.cursor == 0 {
            return false;
        }
        self.cursor = self.cursor.min(self.entries.len()) - 1;
        trace!(cursor = self.cursor, "history up");
        let entry = &self.entries[self.cursor];
        text.set_value(entry);
        true
    }

    /// Step to the next entry, or back to the draft past the last one.
    /// Returns true if the buffer changed.
    pub fn down(&mut self, text: &mut TextArea) -> bool {
        if self.entries.is_empty() || self.cursor >= self.entries.len() {
            return false;
        }
        // Navigation may start with Down, e.g. after accepting a search
        self.save_draft_if_unsaved(text);
        self.cursor += 1;
        trace!(cursor = self.cursor, "history down");
        if self.cursor == self.entries.len() {
            self.restore_draft(text);
            return true;
        }
        let entry = &self.entries[self.cursor];
        text.set_value(entry);
        true
    }
}
