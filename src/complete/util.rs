//! Helpers for writing completion resolvers

/// The whitespace-delimited word under the cursor on its line, with its
/// start and end columns. A cursor past the end looks at the last char.
/// Never crosses line boundaries.
pub fn find_word(lines: &[String], line: usize, col: usize) -> (String, usize, usize) {
    let chars: Vec<char> = match lines.get(line) {
        Some(l) => l.chars().collect(),
        None => return (String::new(), 0, 0),
    };
    if chars.is_empty() {
        return (String::new(), 0, 0);
    }
    let col = col.min(chars.len() - 1);

    let mut start = col;
    while start > 0 && !chars[start - 1].is_whitespace() {
        start -= 1;
    }
    let mut end = col;
    while end < chars.len() && !chars[end].is_whitespace() {
        end += 1;
    }
    (chars[start..end].iter().collect(), start, end)
}

/// Column where the word ending at `col` starts
pub fn find_word_start(line: &str, col: usize) -> usize {
    let chars: Vec<char> = line.chars().collect();
    let mut start = col.min(chars.len());
    while start > 0 && !chars[start - 1].is_whitespace() {
        start -= 1;
    }
    start
}

/// Longest common prefix of two strings, taken from `first`
pub fn longest_common_prefix(first: &str, last: &str, case_sensitive: bool) -> String {
    let mut end = 0;
    for (a, b) in first.chars().zip(last.chars()) {
        let same = if case_sensitive {
            a == b
        } else {
            a.to_uppercase().eq(b.to_uppercase())
        };
        if !same {
            break;
        }
        end += a.len_utf8();
    }
    first[..end].to_string()
}

/// Join lines with newlines and return the cursor as a char offset into
/// the result
pub fn flatten(lines: &[String], line: usize, col: usize) -> (String, usize) {
    let mut offset = 0;
    for (i, l) in lines.iter().enumerate() {
        let len = l.chars().count();
        if i == line {
            offset += col.min(len);
            break;
        }
        offset += len + 1;
    }
    (lines.join("\n"), offset)
}
