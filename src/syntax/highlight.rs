//! Pluggable line highlighting

use crossterm::style::Color;

/// Token types for syntax highlighting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    Plain,
    Keyword,
    String,
    Number,
    Comment,
    Operator,
    Punctuation,
}

impl TokenType {
    /// Get the foreground color for this token type
    pub fn color(&self) -> Color {
        match self {
            TokenType::Plain => Color::Reset,
            TokenType::Keyword => Color::Blue,
            TokenType::String => Color::Green,
            TokenType::Number => Color::Magenta,
            TokenType::Comment => Color::DarkGrey,
            TokenType::Operator => Color::Yellow,
            TokenType::Punctuation => Color::DarkGrey,
        }
    }

    /// Whether this token type should be bold
    pub fn bold(&self) -> bool {
        matches!(self, TokenType::Keyword)
    }
}

/// A token in a line of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub token_type: TokenType,
    /// Start column (character index, not byte)
    pub start: usize,
    /// End column (exclusive, character index)
    pub end: usize,
}

/// State carried from one line to the next
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightState {
    /// Currently in a multiline comment
    pub in_block_comment: bool,
}

/// Splits a line into styled tokens. Chars not covered by a token are plain.
pub trait Highlighter {
    fn tokenize_line(&self, line: &str, state: &mut HighlightState) -> Vec<Token>;
}

/// Token type of every char of a line of `len` chars
pub fn char_styles(len: usize, tokens: &[Token]) -> Vec<TokenType> {
    let mut styles = vec![TokenType::Plain; len];
    for token in tokens {
        let end = token.end.min(len);
        for style in styles.iter_mut().take(end).skip(token.start) {
            *style = token.token_type;
        }
    }
    styles
}

/// Keyword-driven highlighter for simple command languages
#[derive(Debug, Clone)]
pub struct KeywordHighlighter {
    /// Stored uppercase, matched case-insensitively
    keywords: Vec<String>,
    line_comment: Option<String>,
    block_comment: Option<(String, String)>,
    quotes: Vec<char>,
    operators: Vec<&'static str>,
    punctuation: Vec<char>,
}

impl KeywordHighlighter {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords.into_iter().map(|k| k.as_ref().to_uppercase()).collect(),
            line_comment: None,
            block_comment: None,
            quotes: vec!['\'', '"'],
            operators: vec!["<=", ">=", "<>", "!=", "||", "=", "<", ">", "+", "-", "*", "/", "%"],
            punctuation: vec!['(', ')', ',', ';', '.'],
        }
    }

    /// SQL-flavored defaults
    pub fn sql() -> Self {
        Self::new([
            "SELECT", "FROM", "WHERE", "INSERT", "INTO", "VALUES", "UPDATE", "SET", "DELETE",
            "CREATE", "DROP", "TABLE", "AND", "OR", "NOT", "NULL", "AS", "ORDER", "GROUP", "BY",
            "LIMIT", "JOIN", "ON", "IS", "IN",
        ])
        .with_line_comment("--")
        .with_block_comment("/*", "*/")
    }

    pub fn with_line_comment(mut self, marker: &str) -> Self {
        self.line_comment = Some(marker.to_string());
        self
    }

    pub fn with_block_comment(mut self, start: &str, end: &str) -> Self {
        self.block_comment = Some((start.to_string(), end.to_string()));
        self
    }

    pub fn is_keyword(&self, word: &str) -> bool {
        let upper = word.to_uppercase();
        self.keywords.iter().any(|k| *k == upper)
    }

    fn matches_at(chars: &[char], pos: usize, pattern: &str) -> bool {
        let mut i = pos;
        for pc in pattern.chars() {
            if chars.get(i) != Some(&pc) {
                return false;
            }
            i += 1;
        }
        true
    }

    /// Start and length of the block comment terminator at or after `start`
    fn find_block_comment_end(&self, chars: &[char], start: usize) -> Option<usize> {
        let (_, end) = self.block_comment.as_ref()?;
        (start..chars.len())
            .find(|&i| Self::matches_at(chars, i, end))
            .map(|i| i + end.chars().count())
    }

    fn find_string_end(chars: &[char], start: usize, quote: char) -> usize {
        let mut i = start + 1;
        while i < chars.len() {
            if chars[i] == quote {
                return i + 1;
            }
            if chars[i] == '\\' && i + 1 < chars.len() {
                i += 2;
            } else {
                i += 1;
            }
        }
        chars.len()
    }

    fn number_end(chars: &[char], start: usize) -> Option<usize> {
        let c = chars[start];
        let leading_dot = c == '.' && chars.get(start + 1).is_some_and(|d| d.is_ascii_digit());
        if !c.is_ascii_digit() && !leading_dot {
            return None;
        }
        let mut i = start;
        let mut has_dot = false;
        while i < chars.len() {
            let ch = chars[i];
            if ch.is_ascii_digit() {
                i += 1;
            } else if ch == '.' && !has_dot {
                has_dot = true;
                i += 1;
            } else {
                break;
            }
        }
        Some(i)
    }
}

impl Highlighter for KeywordHighlighter {
    fn tokenize_line(&self, line: &str, state: &mut HighlightState) -> Vec<Token> {
        let mut tokens = Vec::new();
        let chars: Vec<char> = line.chars().collect();
        let mut i = 0;

        while i < chars.len() {
            // Handle continuing multiline comment
            if state.in_block_comment {
                match self.find_block_comment_end(&chars, i) {
                    Some(end) => {
                        tokens.push(Token { token_type: TokenType::Comment, start: i, end });
                        i = end;
                        state.in_block_comment = false;
                        continue;
                    }
                    None => {
                        tokens.push(Token { token_type: TokenType::Comment, start: i, end: chars.len() });
                        break;
                    }
                }
            }

            if chars[i].is_whitespace() {
                i += 1;
                continue;
            }

            if let Some(ref marker) = self.line_comment {
                if Self::matches_at(&chars, i, marker) {
                    tokens.push(Token { token_type: TokenType::Comment, start: i, end: chars.len() });
                    break;
                }
            }

            if let Some((ref start, _)) = self.block_comment {
                if Self::matches_at(&chars, i, start) {
                    let comment_start = i;
                    let after = i + start.chars().count();
                    match self.find_block_comment_end(&chars, after) {
                        Some(end) => {
                            tokens.push(Token { token_type: TokenType::Comment, start: comment_start, end });
                            i = end;
                            continue;
                        }
                        None => {
                            tokens.push(Token {
                                token_type: TokenType::Comment,
                                start: comment_start,
                                end: chars.len(),
                            });
                            state.in_block_comment = true;
                            break;
                        }
                    }
                }
            }

            if self.quotes.contains(&chars[i]) {
                let end = Self::find_string_end(&chars, i, chars[i]);
                tokens.push(Token { token_type: TokenType::String, start: i, end });
                i = end;
                continue;
            }

            if let Some(end) = Self::number_end(&chars, i) {
                tokens.push(Token { token_type: TokenType::Number, start: i, end });
                i = end;
                continue;
            }

            if chars[i].is_alphabetic() || chars[i] == '_' {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                if self.is_keyword(&word) {
                    tokens.push(Token { token_type: TokenType::Keyword, start, end: i });
                }
                continue;
            }

            // Try longer operators first
            if let Some(op) = self.operators.iter().find(|op| Self::matches_at(&chars, i, op)) {
                let end = i + op.chars().count();
                tokens.push(Token { token_type: TokenType::Operator, start: i, end });
                i = end;
                continue;
            }

            if self.punctuation.contains(&chars[i]) {
                tokens.push(Token { token_type: TokenType::Punctuation, start: i, end: i + 1 });
            }
            i += 1;
        }

        tokens
    }
}
