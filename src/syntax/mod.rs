//! Syntax highlighting module

mod highlight;

pub use highlight::{char_styles, HighlightState, Highlighter, KeywordHighlighter, Token, TokenType};
