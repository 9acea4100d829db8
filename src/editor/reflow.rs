//! Paragraph reflow for the whole input

use crate::util::unicode::display_width;

/// Width the default reflow wraps at
pub const DEFAULT_REFLOW_WIDTH: usize = 72;

/// Rewraps the input text.
///
/// Receives the whole value and the text area width. Returns the new value
/// and an informational message (may be empty).
pub trait Reflower {
    fn reflow(&mut self, text: &str, target_width: usize) -> (String, String);
}

impl<F> Reflower for F
where
    F: FnMut(&str, usize) -> (String, String),
{
    fn reflow(&mut self, text: &str, target_width: usize) -> (String, String) {
        self(text, target_width)
    }
}

/// Greedy word wrap of blank-line separated paragraphs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordReflow {
    pub width: usize,
}

impl Default for WordReflow {
    fn default() -> Self {
        Self {
            width: DEFAULT_REFLOW_WIDTH,
        }
    }
}

impl Reflower for WordReflow {
    fn reflow(&mut self, text: &str, target_width: usize) -> (String, String) {
        // Never wider than the text area
        let width = self.width.min(target_width).max(1);
        let wrapped = wrap_words(text, width);
        if wrapped == text {
            (wrapped, String::new())
        } else {
            (wrapped, format!("reflowed to {} columns", width))
        }
    }
}

/// Refill each paragraph to at most `width` columns. Blank lines separate
/// paragraphs and are kept; a word wider than `width` gets a line of its own.
pub fn wrap_words(text: &str, width: usize) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut words: Vec<&str> = Vec::new();
    for line in text.split('\n') {
        if line.trim().is_empty() {
            fill(&words, width, &mut out);
            words.clear();
            out.push(String::new());
        } else {
            words.extend(line.split_whitespace());
        }
    }
    fill(&words, width, &mut out);
    out.join("\n")
}

fn fill(words: &[&str], width: usize, out: &mut Vec<String>) {
    let mut line = String::new();
    let mut used = 0;
    for word in words {
        let w = display_width(word);
        if !line.is_empty() && used + 1 + w > width {
            out.push(std::mem::take(&mut line));
            used = 0;
        }
        if !line.is_empty() {
            line.push(' ');
            used += 1;
        }
        line.push_str(word);
        used += w;
    }
    if !line.is_empty() {
        out.push(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_wraps_long_paragraph() {
        assert_eq!(wrap_words("the quick brown fox jumps", 10), "the quick\nbrown fox\njumps");
    }

    #[test]
    fn test_joins_lines_and_keeps_paragraphs() {
        assert_eq!(wrap_words("a\nb\n\nc   d", 72), "a b\n\nc d");
        assert_eq!(wrap_words("a\n  \nb\n", 72), "a\n\nb\n");
    }

    #[test]
    fn test_long_word_gets_own_line() {
        assert_eq!(wrap_words("x supercalifragilistic y", 5), "x\nsupercalifragilistic\ny");
    }

    #[test]
    fn test_wide_chars_count_columns() {
        // Each ideograph is two columns wide
        assert_eq!(wrap_words("日本 日本 日本", 9), "日本 日本\n日本");
    }

    #[test]
    fn test_default_reflow_info() {
        let mut reflow = WordReflow::default();
        assert_eq!(reflow.reflow("short", 80), ("short".to_string(), String::new()));

        let (text, info) = reflow.reflow("one two three", 8);
        assert_eq!(text, "one two\nthree");
        assert_eq!(info, "reflowed to 8 columns");
    }
}
