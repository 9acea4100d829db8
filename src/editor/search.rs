//! Incremental reverse search through history

use tracing::trace;

use super::history::HistoryList;
use super::textarea::TextArea;

/// An active backward search. Dropped on accept or cancel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchSession {
    pattern: String,
    /// History index of the current match, `history.len()` before any match
    match_cursor: usize,
    /// Pattern used by the last scan
    last_pattern: String,
    not_found: bool,
}

impl SearchSession {
    /// Begin searching: the buffer is saved as the draft if it isn't already
    pub fn start(history: &mut HistoryList, text: &TextArea) -> Self {
        history.save_draft_if_unsaved(text);
        history.reset_cursor();
        Self {
            pattern: String::new(),
            match_cursor: history.len(),
            last_pattern: String::new(),
            not_found: false,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn match_cursor(&self) -> usize {
        self.match_cursor
    }

    pub fn not_found(&self) -> bool {
        self.not_found
    }

    pub fn set_pattern(&mut self, pattern: &str) {
        self.pattern = pattern.to_string();
    }

    pub fn push_str(&mut self, s: &str) {
        self.pattern.push_str(s);
    }

    pub fn pop_char(&mut self) {
        self.pattern.pop();
    }

    /// Drop the last word of the pattern and the spaces after it
    pub fn pop_word(&mut self) {
        let trimmed = self.pattern.trim_end().len();
        self.pattern.truncate(trimmed);
        let cut = self
            .pattern
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        self.pattern.truncate(cut);
    }

    pub fn clear_pattern(&mut self) {
        self.pattern.clear();
    }

    /// Rescan if the pattern changed, or continue to an older match when
    /// `next_match` is set. On a hit the buffer shows the matching entry
    /// with the cursor at the match start.
    pub fn update(&mut self, next_match: bool, history: &HistoryList, text: &mut TextArea) {
        if self.pattern == self.last_pattern {
            if !next_match {
                return;
            }
        } else {
            self.match_cursor = history.len();
            self.last_pattern = self.pattern.clone();
        }

        let pattern: Vec<char> = self.pattern.chars().collect();
        for idx in (0..self.match_cursor.min(history.len())).rev() {
            let Some(entry) = history.get(idx) else {
                continue;
            };
            if let Some(offset) = rightmost_match(entry, &pattern) {
                trace!(idx, offset, pattern = %self.pattern, "search hit");
                self.match_cursor = idx;
                self.not_found = false;
                text.set_value(entry);
                text.set_cursor_offset(offset);
                return;
            }
        }
        trace!(pattern = %self.pattern, "search miss");
        self.not_found = true;
    }

    /// Keep the buffer as is and continue history navigation from the match
    pub fn accept(self, history: &mut HistoryList) {
        history.discard_draft();
        history.set_cursor(self.match_cursor);
    }

    /// Put the draft back
    pub fn cancel(self, history: &mut HistoryList, text: &mut TextArea) {
        history.restore_draft(text);
    }
}

/// Char offset of the rightmost occurrence of `pattern` in `entry`.
/// An empty pattern matches at the end.
fn rightmost_match(entry: &str, pattern: &[char]) -> Option<usize> {
    let chars: Vec<char> = entry.chars().collect();
    if pattern.len() > chars.len() {
        return None;
    }
    (0..=chars.len() - pattern.len())
        .rev()
        .find(|&start| chars[start..].starts_with(pattern))
}
