//! Display model produced by the editor and consumed by the painter

use crate::syntax::TokenType;

/// How a span of text should look
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanStyle {
    Plain,
    Token(TokenType),
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: SpanStyle,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: SpanStyle::Plain,
        }
    }

    pub fn new(text: impl Into<String>, style: SpanStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// One display row of the text area
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewRow {
    /// Prompt, padded to the prompt width
    pub prompt: String,
    pub spans: Vec<Span>,
}

impl ViewRow {
    /// Row text without styling
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// The search input line shown under the text while searching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchLine {
    pub prompt: String,
    pub pattern: String,
    /// Shown dimmed when the pattern is empty
    pub placeholder: String,
    pub not_found: bool,
}

/// One category list of the completion overlay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayColumn {
    pub title: String,
    /// Column width in terminal cells
    pub width: usize,
    /// Items of the current page
    pub items: Vec<String>,
    /// Selected item within `items`
    pub selected: Option<usize>,
    pub focused: bool,
    pub page: usize,
    pub pages: usize,
    /// Filter text, if a filter is set or being typed
    pub filter: Option<String>,
}

/// Cursor location in painted lines: text rows first, then the search line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewCursor {
    pub line: usize,
    pub col: usize,
}

/// Everything needed to paint the editor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct View {
    pub rows: Vec<ViewRow>,
    pub search: Option<SearchLine>,
    pub overlay: Vec<OverlayColumn>,
    /// Rows reserved for the overlay
    pub overlay_height: usize,
    pub cursor: Option<ViewCursor>,
    pub message: Option<String>,
}

impl View {
    /// Number of lines the painter will emit
    pub fn line_count(&self) -> usize {
        let overlay = if self.overlay.is_empty() { 0 } else { self.overlay_height };
        self.rows.len() + usize::from(self.search.is_some()) + overlay
    }

    /// Plain text of the text rows, prompts included
    pub fn text_lines(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|r| format!("{}{}", r.prompt, r.text()))
            .collect()
    }
}
