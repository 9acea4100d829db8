use std::fmt;

use ropey::{Rope, RopeSlice};

/// Input text addressed by char offset or by (line, col).
///
/// Lines are separated by '\n' only and there is always at least one line,
/// so a value ending in a newline has an empty last line.
#[derive(Debug, Clone, Default)]
pub struct Buffer {
    rope: Rope,
}

impl Buffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Replace the whole value
    pub fn set(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
    }

    /// Insert at a char offset, clamped to the end
    pub fn insert(&mut self, offset: usize, text: &str) {
        let offset = offset.min(self.rope.len_chars());
        self.rope.insert(offset, text);
    }

    /// Remove chars [start, end); empty or inverted ranges are ignored
    pub fn delete(&mut self, start: usize, end: usize) {
        let len = self.rope.len_chars();
        let (start, end) = (start.min(len), end.min(len));
        if start < end {
            self.rope.remove(start..end);
        }
    }

    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// A line without its newline
    fn line_slice(&self, line: usize) -> Option<RopeSlice<'_>> {
        let slice = self.rope.get_line(line)?;
        let len = slice.len_chars();
        if len > 0 && slice.char(len - 1) == '\n' {
            Some(slice.slice(..len - 1))
        } else {
            Some(slice)
        }
    }

    pub fn line_str(&self, line: usize) -> Option<String> {
        self.line_slice(line).map(|s| s.to_string())
    }

    /// Chars on a line, newline excluded; 0 past the last line
    pub fn line_len(&self, line: usize) -> usize {
        self.line_slice(line).map_or(0, |s| s.len_chars())
    }

    pub fn lines(&self) -> Vec<String> {
        (0..self.line_count())
            .map(|l| self.line_str(l).unwrap_or_default())
            .collect()
    }

    /// Char offset of (line, col), with col clamped to the line
    pub fn line_col_to_char(&self, line: usize, col: usize) -> usize {
        if line >= self.rope.len_lines() {
            return self.rope.len_chars();
        }
        self.rope.line_to_char(line) + col.min(self.line_len(line))
    }

    /// (line, col) of a char offset, clamped to the end
    pub fn char_to_line_col(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.rope.len_chars());
        let line = self.rope.char_to_line(offset);
        (line, offset - self.rope.line_to_char(line))
    }
}

impl fmt::Display for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in self.rope.chunks() {
            f.write_str(chunk)?;
        }
        Ok(())
    }
}
