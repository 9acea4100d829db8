//! Completion proposals and the hooks the host plugs into the editor

mod util;

use std::collections::HashMap;

pub use util::{find_word, find_word_start, flatten, longest_common_prefix};

/// What a resolver wants done at the cursor.
///
/// The editor first moves the cursor by `cursor_shift` chars on the current
/// line, deletes `delete_before` chars before it, then inserts `prefill`.
/// Non-empty categories then open a selection overlay with one list per
/// category, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Proposal {
    pub prefill: String,
    pub cursor_shift: isize,
    pub delete_before: usize,
    pub categories: Vec<String>,
    pub candidates: HashMap<String, Vec<String>>,
}

impl Proposal {
    /// Nothing to insert and nothing to choose from
    pub fn is_empty(&self) -> bool {
        self.prefill.is_empty() && self.categories.is_empty()
    }

    /// Replace the word spanning cols `[word_start, word_end)` with `replacement`,
    /// the cursor being at `col`
    pub fn single_word(replacement: impl Into<String>, col: usize, word_start: usize, word_end: usize) -> Self {
        Self {
            prefill: replacement.into(),
            cursor_shift: word_end as isize - col as isize,
            delete_before: word_end.saturating_sub(word_start),
            ..Default::default()
        }
    }

    /// Complete the word spanning `[word_start, word_end)` from a list of
    /// candidates. A single candidate is inserted directly; several are
    /// offered in one category after inserting their common prefix.
    pub fn words(
        category: impl Into<String>,
        candidates: Vec<String>,
        col: usize,
        word_start: usize,
        word_end: usize,
        case_sensitive: bool,
    ) -> Self {
        match candidates.len() {
            0 => Self::default(),
            1 => Self::single_word(candidates[0].clone(), col, word_start, word_end),
            _ => {
                let prefix = candidates[1..].iter().fold(candidates[0].clone(), |acc, c| {
                    longest_common_prefix(&acc, c, case_sensitive)
                });
                let category = category.into();
                let mut proposal = Self::single_word(prefix, col, word_start, word_end);
                proposal.categories = vec![category.clone()];
                proposal.candidates.insert(category, candidates);
                proposal
            }
        }
    }

    /// Append a category of candidates
    pub fn with_category(mut self, category: impl Into<String>, candidates: Vec<String>) -> Self {
        let category = category.into();
        self.categories.push(category.clone());
        self.candidates.insert(category, candidates);
        self
    }
}

/// Produces completions for the text around the cursor.
///
/// Returns an informational message (may be empty) and the proposal.
pub trait CompletionResolver {
    fn resolve(&mut self, lines: &[String], line: usize, col: usize) -> (String, Proposal);
}

impl<F> CompletionResolver for F
where
    F: FnMut(&[String], usize, usize) -> (String, Proposal),
{
    fn resolve(&mut self, lines: &[String], line: usize, col: usize) -> (String, Proposal) {
        self(lines, line, col)
    }
}

/// Decides whether Enter submits the input or inserts a newline
pub trait InputCompleteCheck {
    fn is_complete(&self, lines: &[String], line: usize, col: usize) -> bool;
}

impl<F> InputCompleteCheck for F
where
    F: Fn(&[String], usize, usize) -> bool,
{
    fn is_complete(&self, lines: &[String], line: usize, col: usize) -> bool {
        self(lines, line, col)
    }
}
