use unicode_segmentation::UnicodeSegmentation;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Get the display width of a string (handling wide chars like CJK)
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Display width of a single char. Control characters count as one column
/// so that every char occupies space in the wrap layout.
pub fn char_width(c: char) -> usize {
    UnicodeWidthChar::width(c).unwrap_or(1)
}

/// Char offset of the grapheme boundary following `col`, or the line
/// length when `col` is already in the last cluster.
pub fn next_grapheme_boundary(s: &str, col: usize) -> usize {
    let mut offset = 0;
    for g in s.graphemes(true) {
        offset += g.chars().count();
        if offset > col {
            return offset;
        }
    }
    offset
}

/// Char offset of the grapheme boundary preceding `col`.
pub fn prev_grapheme_boundary(s: &str, col: usize) -> usize {
    let mut offset = 0;
    for g in s.graphemes(true) {
        let next = offset + g.chars().count();
        if next >= col {
            return offset;
        }
        offset = next;
    }
    offset
}
