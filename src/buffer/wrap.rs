//! Per-line wrap segmentation cache
//!
//! Each logical line is split into display rows no wider than the wrap
//! width. A line's segmentation is stored as the char offsets at which its
//! display rows start (always beginning with 0), and is only recomputed
//! when that line is edited or the width changes.

use crate::util::unicode::char_width;

/// Row start offsets (in chars) of one wrapped logical line
pub type Segments = Vec<usize>;

/// Split a line into display rows of at most `width` columns.
///
/// A char that would overflow the current row starts a new one, so a
/// line of N single-width chars takes `max(1, ceil(N / width))` rows.
pub fn wrap_line(line: &str, width: usize) -> Segments {
    let width = width.max(1);
    let mut starts = vec![0];
    let mut used = 0;
    for (i, c) in line.chars().enumerate() {
        let w = char_width(c);
        if used > 0 && used + w > width {
            starts.push(i);
            used = 0;
        }
        used += w;
    }
    starts
}

/// A display row resolved back to its logical line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRef {
    pub line: usize,
    pub segment: usize,
}

#[derive(Debug, Clone)]
pub struct WrapCache {
    width: usize,
    lines: Vec<Segments>,
}

impl WrapCache {
    pub fn new(width: usize) -> Self {
        Self {
            width: width.max(1),
            lines: vec![vec![0]],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Recompute every line
    pub fn rebuild(&mut self, lines: &[String]) {
        self.lines = lines.iter().map(|l| wrap_line(l, self.width)).collect();
        if self.lines.is_empty() {
            self.lines.push(vec![0]);
        }
    }

    /// Change the wrap width. Returns true if the cache was rebuilt.
    pub fn set_width(&mut self, width: usize, lines: &[String]) -> bool {
        let width = width.max(1);
        if width == self.width {
            return false;
        }
        self.width = width;
        self.rebuild(lines);
        true
    }

    /// Replace the entries for `removed` lines starting at `start` with
    /// fresh segmentations of `new_lines`. Lines outside the range keep
    /// their cached value.
    pub fn splice(&mut self, start: usize, removed: usize, new_lines: &[String]) {
        let start = start.min(self.lines.len());
        let end = (start + removed).min(self.lines.len());
        let fresh: Vec<Segments> = new_lines.iter().map(|l| wrap_line(l, self.width)).collect();
        self.lines.splice(start..end, fresh);
        if self.lines.is_empty() {
            self.lines.push(vec![0]);
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn segments(&self, line: usize) -> &[usize] {
        self.lines.get(line).map(|s| s.as_slice()).unwrap_or(&[0])
    }

    /// Number of display rows taken by a logical line (at least 1)
    pub fn row_count(&self, line: usize) -> usize {
        self.segments(line).len()
    }

    /// Number of display rows for the whole buffer
    pub fn total_rows(&self) -> usize {
        self.lines.iter().map(|s| s.len()).sum::<usize>().max(1)
    }

    /// Display rows taken by all lines before `line`
    pub fn rows_before(&self, line: usize) -> usize {
        self.lines.iter().take(line).map(|s| s.len()).sum()
    }

    /// Index of the segment that holds `col`. A column at the very end of
    /// the line belongs to the last segment.
    pub fn segment_of(&self, line: usize, col: usize) -> usize {
        let starts = self.segments(line);
        starts.partition_point(|&s| s <= col).saturating_sub(1)
    }

    /// Resolve an absolute display row. Rows past the end clamp to the
    /// last segment of the last line.
    pub fn locate(&self, display_row: usize) -> RowRef {
        let mut remaining = display_row;
        for (line, segs) in self.lines.iter().enumerate() {
            if remaining < segs.len() {
                return RowRef {
                    line,
                    segment: remaining,
                };
            }
            remaining -= segs.len();
        }
        let line = self.lines.len().saturating_sub(1);
        RowRef {
            line,
            segment: self.row_count(line) - 1,
        }
    }
}
