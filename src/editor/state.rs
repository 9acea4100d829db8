use tracing::{debug, warn};

use crate::complete::{CompletionResolver, InputCompleteCheck};
use crate::config::EditorConfig;
use crate::input::Action;
use crate::render::{SearchLine, Span, SpanStyle, View, ViewCursor, ViewRow};
use crate::syntax::{char_styles, HighlightState, Highlighter, TokenType};
use crate::util::unicode::{char_width, display_width};

use super::completion::{overlay_height, CompletionOutcome, CompletionSession};
use super::history::HistoryList;
use super::reflow::{Reflower, WordReflow};
use super::search::SearchSession;
use super::textarea::TextArea;

/// Why input ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// Enter with complete input
    Accepted,
    /// End of input on an empty line position
    EndOfFile,
    /// Interrupt on an empty buffer
    Interrupted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Termination {
    pub reason: EndReason,
    pub text: String,
}

/// Result of handling one action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Pending,
    Finished(Termination),
}

/// Interaction mode. Search and completion never overlap.
#[derive(Debug, Clone)]
enum Mode {
    Editing,
    Searching(SearchSession),
    Completing(CompletionSession),
}

/// Multi-line input editor: text area, history, search and completion
pub struct Editor {
    text: TextArea,
    history: HistoryList,
    mode: Mode,

    resolver: Option<Box<dyn CompletionResolver>>,
    input_check: Option<Box<dyn InputCompleteCheck>>,
    highlighter: Option<Box<dyn Highlighter>>,
    reflower: Option<Box<dyn Reflower>>,

    prompt: String,
    next_prompt: String,
    placeholder: String,
    search_prompt: String,
    search_prompt_not_found: String,
    search_placeholder: String,
    hide_prompt: bool,
    delete_char_if_not_eof: bool,
    char_limit: usize,
    /// 0 for the screen height
    max_height: usize,

    screen_width: usize,
    screen_height: usize,

    /// Informational message from the last completion or reflow
    message: Option<String>,
    finished: Option<Termination>,
    needs_redraw: bool,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(80, 24)
    }
}

impl Editor {
    pub fn new(screen_width: usize, screen_height: usize) -> Self {
        Self::from_config(&EditorConfig::default(), screen_width, screen_height)
    }

    pub fn from_config(config: &EditorConfig, screen_width: usize, screen_height: usize) -> Self {
        let mut history = HistoryList::new();
        history.set_max_size(config.max_history_size);
        history.set_dedup(config.dedup_history);

        let mut editor = Self {
            text: TextArea::default(),
            history,
            mode: Mode::Editing,
            resolver: None,
            input_check: None,
            highlighter: None,
            reflower: Some(Box::new(WordReflow::default())),
            prompt: config.prompt.clone(),
            next_prompt: config.next_prompt.clone(),
            placeholder: config.placeholder.clone(),
            search_prompt: config.search_prompt.clone(),
            search_prompt_not_found: config.search_prompt_not_found.clone(),
            search_placeholder: config.search_placeholder.clone(),
            hide_prompt: false,
            delete_char_if_not_eof: config.delete_char_if_not_eof,
            char_limit: config.char_limit,
            max_height: config.max_height,
            screen_width: screen_width.max(1),
            screen_height: screen_height.max(1),
            message: None,
            finished: None,
            needs_redraw: true,
        };
        editor.resize(screen_width, screen_height);
        editor.reset();
        editor
    }

    // === Hooks ===

    pub fn set_resolver<R: CompletionResolver + 'static>(&mut self, resolver: R) {
        self.resolver = Some(Box::new(resolver));
    }

    pub fn clear_resolver(&mut self) {
        self.resolver = None;
    }

    pub fn set_input_check<C: InputCompleteCheck + 'static>(&mut self, check: C) {
        self.input_check = Some(Box::new(check));
    }

    pub fn clear_input_check(&mut self) {
        self.input_check = None;
    }

    pub fn set_highlighter<H: Highlighter + 'static>(&mut self, highlighter: H) {
        self.highlighter = Some(Box::new(highlighter));
    }

    pub fn set_reflower<R: Reflower + 'static>(&mut self, reflower: R) {
        self.reflower = Some(Box::new(reflower));
    }

    /// Disable reflow; the action then does nothing
    pub fn clear_reflower(&mut self) {
        self.reflower = None;
    }

    // === Settings ===

    pub fn set_prompt(&mut self, prompt: &str, next_prompt: &str) {
        self.prompt = prompt.to_string();
        self.next_prompt = next_prompt.to_string();
        self.update_prompt();
    }

    pub fn set_placeholder(&mut self, placeholder: &str) {
        self.placeholder = placeholder.to_string();
    }

    pub fn set_max_height(&mut self, max_height: usize) {
        self.max_height = max_height;
        self.update_text_height();
    }

    pub fn set_char_limit(&mut self, limit: usize) {
        self.char_limit = limit;
        self.text.set_char_limit(limit);
    }

    pub fn set_delete_char_if_not_eof(&mut self, enabled: bool) {
        self.delete_char_if_not_eof = enabled;
    }

    // === Accessors ===

    pub fn text(&self) -> &TextArea {
        &self.text
    }

    pub fn value(&self) -> String {
        self.text.value()
    }

    pub fn history(&self) -> &HistoryList {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut HistoryList {
        &mut self.history
    }

    pub fn is_searching(&self) -> bool {
        matches!(self.mode, Mode::Searching(_))
    }

    pub fn is_completing(&self) -> bool {
        matches!(self.mode, Mode::Completing(_))
    }

    pub fn completion(&self) -> Option<&CompletionSession> {
        match &self.mode {
            Mode::Completing(session) => Some(session),
            _ => None,
        }
    }

    pub fn search(&self) -> Option<&SearchSession> {
        match &self.mode {
            Mode::Searching(session) => Some(session),
            _ => None,
        }
    }

    pub fn status(&self) -> Status {
        match &self.finished {
            Some(t) => Status::Finished(t.clone()),
            None => Status::Pending,
        }
    }

    /// Message produced by the last completion or reflow, if not yet taken
    pub fn take_message(&mut self) -> Option<String> {
        self.message.take()
    }

    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    pub fn mark_drawn(&mut self) {
        self.needs_redraw = false;
    }

    // === Lifecycle ===

    /// Start a fresh input. History is kept.
    pub fn reset(&mut self) {
        self.mode = Mode::Editing;
        self.finished = None;
        self.message = None;
        self.hide_prompt = false;
        self.history.discard_draft();
        self.history.reset_cursor();
        self.text.set_char_limit(self.char_limit);
        self.text.reset();
        self.text.set_height(1);
        self.text.focus();
        self.update_prompt();
        self.update_text_height();
        self.needs_redraw = true;
    }

    pub fn resize(&mut self, screen_width: usize, screen_height: usize) {
        self.screen_width = screen_width.max(1);
        self.screen_height = screen_height.max(1);
        // Keep the last column free so the terminal never auto-wraps
        self.text.set_width(self.screen_width.saturating_sub(1).max(1));
        let screen_height = self.screen_height;
        if let Mode::Completing(session) = &mut self.mode {
            session.set_height(overlay_height(session.natural_height(), screen_height));
        }
        self.update_text_height();
        self.needs_redraw = true;
    }

    // === Event handling ===

    pub fn handle(&mut self, action: Action) -> Status {
        if self.finished.is_some() {
            return self.status();
        }
        self.needs_redraw = true;

        match action {
            Action::ToggleHidePrompt => {
                self.hide_prompt = !self.hide_prompt;
                self.update_prompt();
            }
            // Repainting is up to the host
            Action::Refresh => {}
            action => match std::mem::replace(&mut self.mode, Mode::Editing) {
                Mode::Editing => self.handle_editing(action),
                Mode::Searching(session) => self.handle_searching(session, action),
                Mode::Completing(session) => self.handle_completing(session, action),
            },
        }

        self.update_text_height();
        self.status()
    }

    fn handle_editing(&mut self, action: Action) {
        match action {
            Action::Insert(c) => self.text.insert_char(c),
            Action::InsertText(s) => self.text.insert_text(&s),

            Action::CharForward => self.text.char_forward(),
            Action::CharBackward => self.text.char_backward(),
            Action::WordForward => self.text.word_forward(),
            Action::WordBackward => self.text.word_backward(),
            Action::MoveUp => {
                if self.text.at_first_display_row_of_buffer() {
                    self.history.up(&mut self.text);
                } else {
                    self.text.line_up();
                }
            }
            Action::MoveDown => {
                if self.text.at_last_display_row_of_buffer() {
                    self.history.down(&mut self.text);
                } else {
                    self.text.line_down();
                }
            }
            Action::LineStart => self.text.line_start(),
            Action::LineEnd => self.text.line_end(),
            Action::BufferStart => self.text.buffer_start(),
            Action::BufferEnd => self.text.buffer_end(),
            Action::PageUp => self.text.page_up(),
            Action::PageDown => self.text.page_down(),
            Action::HistoryPrev => {
                self.history.up(&mut self.text);
            }
            Action::HistoryNext => {
                self.history.down(&mut self.text);
            }

            Action::DeleteBackward => self.text.delete_backward(1),
            Action::DeleteForward => self.text.delete_forward(1),
            Action::DeleteWordBackward => self.text.delete_word_backward(),
            Action::DeleteWordForward => self.text.delete_word_forward(),
            Action::DeleteToLineEnd => self.text.delete_to_line_end(),
            Action::DeleteToLineStart => self.text.delete_to_line_start(),
            Action::TransposeBackward => self.text.transpose_backward(),
            Action::UppercaseWordForward => self.text.uppercase_word_forward(),
            Action::LowercaseWordForward => self.text.lowercase_word_forward(),
            Action::CapitalizeWordForward => self.text.capitalize_word_forward(),

            Action::InsertNewline => {
                if self.input_is_complete() {
                    self.finish(EndReason::Accepted);
                } else {
                    self.text.insert_newline();
                }
            }
            Action::AlwaysNewline => self.text.insert_newline(),
            Action::StartCompletion => self.start_completion(),
            Action::Reflow => self.reflow(),
            Action::Interrupt => {
                if self.text.empty_value() {
                    self.finish(EndReason::Interrupted);
                } else {
                    self.history.discard_draft();
                    self.history.reset_cursor();
                    self.text.reset();
                }
            }
            Action::EndOfInput => {
                if self.text.at_beginning_of_line() {
                    self.finish(EndReason::EndOfFile);
                } else if self.delete_char_if_not_eof {
                    self.text.delete_forward(1);
                }
            }
            Action::StartSearch => {
                debug!("search started");
                let session = SearchSession::start(&mut self.history, &self.text);
                self.mode = Mode::Searching(session);
            }
            // Only meaningful inside a mode
            Action::AcceptCompletion | Action::AbortSearch => {}
            Action::ToggleHidePrompt | Action::Refresh => {}
        }
    }

    fn handle_searching(&mut self, mut session: SearchSession, action: Action) {
        match action {
            Action::StartSearch => session.update(true, &self.history, &mut self.text),
            Action::AbortSearch => {
                debug!("search cancelled");
                session.cancel(&mut self.history, &mut self.text);
                return;
            }
            Action::Interrupt => {
                // Interrupt on an empty buffer ends input, as in editing mode
                let empty = self.text.empty_value();
                debug!(empty, "search interrupted");
                session.cancel(&mut self.history, &mut self.text);
                if empty {
                    self.finish(EndReason::Interrupted);
                }
                return;
            }
            Action::EndOfInput if self.text.at_beginning_of_line() => {
                session.cancel(&mut self.history, &mut self.text);
                self.finish(EndReason::EndOfFile);
                return;
            }
            Action::Insert(c) => {
                let mut tmp = [0u8; 4];
                session.push_str(c.encode_utf8(&mut tmp));
                session.update(false, &self.history, &mut self.text);
            }
            Action::InsertText(s) => {
                session.push_str(&s);
                session.update(false, &self.history, &mut self.text);
            }
            Action::DeleteBackward => {
                session.pop_char();
                session.update(false, &self.history, &mut self.text);
            }
            Action::DeleteWordBackward => {
                session.pop_word();
                session.update(false, &self.history, &mut self.text);
            }
            Action::DeleteToLineStart => {
                session.clear_pattern();
                session.update(false, &self.history, &mut self.text);
            }
            other => {
                debug!(match_cursor = session.match_cursor(), "search accepted");
                session.accept(&mut self.history);
                self.handle_editing(other);
                return;
            }
        }
        self.mode = Mode::Searching(session);
    }

    fn handle_completing(&mut self, mut session: CompletionSession, action: Action) {
        match session.handle(&action) {
            CompletionOutcome::Consumed => self.mode = Mode::Completing(session),
            CompletionOutcome::Accepted(item) => {
                self.text.delete_backward(session.delete_count());
                self.text.insert_text(&item);
                self.text.insert_char(' ');
            }
            CompletionOutcome::Aborted => debug!("completion aborted"),
            CompletionOutcome::Unrecognized => {
                debug!("completion closed by unrelated action");
                self.handle_editing(action);
            }
        }
    }

    fn input_is_complete(&self) -> bool {
        match &self.input_check {
            None => true,
            Some(check) => {
                let pos = self.text.cursor();
                check.is_complete(&self.text.lines(), pos.line, pos.col)
            }
        }
    }

    fn start_completion(&mut self) {
        let Some(resolver) = self.resolver.as_mut() else {
            return;
        };
        let pos = self.text.cursor();
        let (message, proposal) = resolver.resolve(&self.text.lines(), pos.line, pos.col);
        if !message.is_empty() {
            self.message = Some(message);
        }
        if proposal.is_empty() {
            return;
        }

        if !self.text.shift_cursor(proposal.cursor_shift) {
            warn!(shift = proposal.cursor_shift, "completion cursor shift out of range, clamped");
        }
        let col = self.text.cursor().col;
        let delete = if proposal.delete_before > col {
            warn!(delete = proposal.delete_before, col, "completion delete count out of range, clamped");
            col
        } else {
            proposal.delete_before
        };
        self.text.delete_backward(delete);
        let before = self.text.cursor_offset();
        self.text.insert_text(&proposal.prefill);
        let inserted = self.text.cursor_offset() - before;

        match CompletionSession::new(&proposal, inserted) {
            None => self.text.insert_char(' '),
            Some(mut session) => {
                session.set_height(overlay_height(session.natural_height(), self.screen_height));
                debug!(categories = session.lists().len(), "completion overlay opened");
                self.mode = Mode::Completing(session);
            }
        }
    }

    fn reflow(&mut self) {
        let Some(reflower) = self.reflower.as_mut() else {
            return;
        };
        let value = self.text.value();
        let (text, info) = reflower.reflow(&value, self.text.wrap_width());
        if text != value {
            debug!(from = value.len(), to = text.len(), "input reflowed");
            self.text.set_value(&text);
        }
        if !info.is_empty() {
            self.message = Some(info);
        }
    }

    fn finish(&mut self, reason: EndReason) {
        self.history.reset_cursor();
        self.text.blur();
        let text = self.text.value();
        debug!(?reason, len = text.len(), "input finished");
        self.finished = Some(Termination { reason, text });
    }

    // === Layout ===

    fn update_prompt(&mut self) {
        let width = if self.hide_prompt {
            0
        } else {
            display_width(&self.prompt).max(display_width(&self.next_prompt))
        };
        self.text.set_prompt_width(width);
    }

    /// Fit the text area between the configured maximum and the rows
    /// taken by the search line or the overlay
    fn update_text_height(&mut self) {
        let overlay_rows = match &self.mode {
            Mode::Completing(session) => session.height(),
            _ => 0,
        };
        let search_rows = usize::from(self.is_searching());
        let limit = if self.max_height > 0 {
            self.max_height.min(self.screen_height)
        } else {
            self.screen_height
        };
        let available = limit.saturating_sub(1 + overlay_rows + search_rows).max(1);
        let height = self.text.logical_height().clamp(1, available);
        if height != self.text.height() {
            self.text.set_height(height);
        }
    }

    fn prompt_for(&self, line: usize, segment: usize) -> String {
        let width = self.text.prompt_width();
        if width == 0 {
            return String::new();
        }
        let prompt = match (line, segment) {
            (0, 0) => self.prompt.as_str(),
            (_, 0) => self.next_prompt.as_str(),
            _ => "",
        };
        let pad = width.saturating_sub(display_width(prompt));
        format!("{}{}", prompt, " ".repeat(pad))
    }

    /// Build the display model
    pub fn view(&self) -> View {
        let visible = self.text.visible_rows();
        let last_line = visible.last().map(|r| r.line).unwrap_or(0);

        // Highlighter state flows from the first line
        let mut line_styles: Vec<Vec<TokenType>> = Vec::new();
        if let Some(hl) = &self.highlighter {
            let mut state = HighlightState::default();
            for line in 0..=last_line {
                let text = self.text.line_text(line);
                let tokens = hl.tokenize_line(&text, &mut state);
                line_styles.push(char_styles(text.chars().count(), &tokens));
            }
        }

        let show_placeholder =
            self.text.empty_value() && !self.placeholder.is_empty() && !self.is_searching();

        let rows: Vec<ViewRow> = visible
            .iter()
            .map(|row| {
                let prompt = self.prompt_for(row.line, row.segment);
                let spans = if show_placeholder {
                    vec![Span::new(
                        truncate_to_width(&self.placeholder, self.text.wrap_width()),
                        SpanStyle::Placeholder,
                    )]
                } else {
                    let chars: Vec<char> = self.text.line_text(row.line).chars().collect();
                    let styles = line_styles.get(row.line).map(Vec::as_slice);
                    styled_spans(&chars[row.start..row.end.min(chars.len())], row.start, styles)
                };
                ViewRow { prompt, spans }
            })
            .collect();

        let search = self.search().map(|session| SearchLine {
            prompt: if session.not_found() {
                self.search_prompt_not_found.clone()
            } else {
                self.search_prompt.clone()
            },
            pattern: session.pattern().to_string(),
            placeholder: self.search_placeholder.clone(),
            not_found: session.not_found(),
        });

        let cursor = if !self.text.is_focused() {
            None
        } else if let Some(line) = &search {
            Some(ViewCursor {
                line: rows.len(),
                col: display_width(&line.prompt) + display_width(&line.pattern),
            })
        } else {
            Some(ViewCursor {
                line: self.text.cursor_display_row() - self.text.viewport_offset(),
                col: self.text.prompt_width() + self.text.cursor_display_col(),
            })
        };

        let (overlay, overlay_height) = match self.completion() {
            Some(session) => (session.columns(), session.height()),
            None => (Vec::new(), 0),
        };

        View {
            rows,
            search,
            overlay,
            overlay_height,
            cursor,
            message: self.message.clone(),
        }
    }
}

/// Group chars into runs of equal style. `offset` is the column of the
/// first char within its line.
fn styled_spans(chars: &[char], offset: usize, styles: Option<&[TokenType]>) -> Vec<Span> {
    let style_at = |i: usize| -> SpanStyle {
        match styles.and_then(|s| s.get(offset + i)) {
            Some(TokenType::Plain) | None => SpanStyle::Plain,
            Some(t) => SpanStyle::Token(*t),
        }
    };
    let mut spans: Vec<Span> = Vec::new();
    for (i, c) in chars.iter().enumerate() {
        let style = style_at(i);
        match spans.last_mut() {
            Some(last) if last.style == style => last.text.push(*c),
            _ => spans.push(Span::new(c.to_string(), style)),
        }
    }
    spans
}

fn truncate_to_width(s: &str, width: usize) -> String {
    let mut used = 0;
    s.chars()
        .take_while(|&c| {
            used += char_width(c);
            used <= width
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complete::{find_word, Proposal};
    use crate::editor::Position;
    use crate::syntax::KeywordHighlighter;
    use pretty_assertions::assert_eq;

    fn editor() -> Editor {
        Editor::new(80, 24)
    }

    fn type_str(ed: &mut Editor, s: &str) {
        for c in s.chars() {
            ed.handle(Action::Insert(c));
        }
    }

    fn finished(status: Status) -> Termination {
        match status {
            Status::Finished(t) => t,
            Status::Pending => panic!("still pending"),
        }
    }

    fn semicolon_check(lines: &[String], line: usize, _col: usize) -> bool {
        line + 1 == lines.len() && lines.last().is_some_and(|l| l.trim_end().ends_with(';'))
    }

    const NAMES: &[&str] = &["Andrew", "Ann", "Anna", "Anthony", "Brian", "Mary"];

    fn name_resolver(lines: &[String], line: usize, col: usize) -> (String, Proposal) {
        let (word, start, end) = find_word(lines, line, col);
        let lower = word.to_lowercase();
        let candidates: Vec<String> = NAMES
            .iter()
            .filter(|n| n.to_lowercase().starts_with(&lower))
            .map(|n| n.to_string())
            .collect();
        let msg = format!("matching {:?}", word);
        (msg, Proposal::words("names", candidates, col, start, end, false))
    }

    #[test]
    fn test_enter_without_predicate_accepts() {
        let mut ed = editor();
        type_str(&mut ed, "hello");
        let t = finished(ed.handle(Action::InsertNewline));
        assert_eq!(t.reason, EndReason::Accepted);
        assert_eq!(t.text, "hello");
        // Further actions are ignored
        assert_eq!(finished(ed.handle(Action::Insert('x'))).text, "hello");
    }

    #[test]
    fn test_predicate_false_inserts_newline() {
        let mut ed = editor();
        ed.set_input_check(semicolon_check);
        type_str(&mut ed, "select 1");
        assert_eq!(ed.handle(Action::InsertNewline), Status::Pending);
        assert_eq!(ed.value(), "select 1\n");
        assert!(!ed.is_searching() && !ed.is_completing());
        type_str(&mut ed, "from t;");
        let t = finished(ed.handle(Action::InsertNewline));
        assert_eq!(t.text, "select 1\nfrom t;");
    }

    #[test]
    fn test_always_newline_ignores_predicate() {
        let mut ed = editor();
        type_str(&mut ed, "a");
        assert_eq!(ed.handle(Action::AlwaysNewline), Status::Pending);
        assert_eq!(ed.value(), "a\n");
    }

    #[test]
    fn test_interrupt() {
        let mut ed = editor();
        type_str(&mut ed, "abc");
        assert_eq!(ed.handle(Action::Interrupt), Status::Pending);
        assert_eq!(ed.value(), "");
        let t = finished(ed.handle(Action::Interrupt));
        assert_eq!(t.reason, EndReason::Interrupted);
    }

    #[test]
    fn test_end_of_input() {
        let mut ed = editor();
        type_str(&mut ed, "ab");
        ed.handle(Action::CharBackward);
        assert_eq!(ed.handle(Action::EndOfInput), Status::Pending);
        assert_eq!(ed.value(), "a");

        ed.set_delete_char_if_not_eof(false);
        ed.handle(Action::EndOfInput);
        assert_eq!(ed.value(), "a");

        ed.handle(Action::LineStart);
        let t = finished(ed.handle(Action::EndOfInput));
        assert_eq!(t.reason, EndReason::EndOfFile);
        assert_eq!(t.text, "a");
    }

    #[test]
    fn test_reset_starts_over() {
        let mut ed = editor();
        type_str(&mut ed, "x");
        finished(ed.handle(Action::InsertNewline));
        ed.reset();
        assert_eq!(ed.status(), Status::Pending);
        assert_eq!(ed.value(), "");
        assert!(ed.text().is_focused());
    }

    #[test]
    fn test_vertical_motion_falls_through_to_history() {
        let mut ed = editor();
        ed.history_mut().add("old one");
        ed.history_mut().add("old two");
        type_str(&mut ed, "new");
        ed.handle(Action::AlwaysNewline);
        type_str(&mut ed, "line");

        // First up moves within the buffer
        ed.handle(Action::MoveUp);
        assert_eq!(ed.value(), "new\nline");
        assert_eq!(ed.text().cursor().line, 0);
        ed.handle(Action::MoveUp);
        assert_eq!(ed.value(), "old two");
        ed.handle(Action::MoveUp);
        assert_eq!(ed.value(), "old one");
        ed.handle(Action::MoveDown);
        ed.handle(Action::MoveDown);
        assert_eq!(ed.value(), "new\nline");
        assert_eq!(ed.text().cursor(), Position::new(0, 3));
    }

    fn world_editor() -> Editor {
        let mut ed = editor();
        ed.history_mut().set_all(
            vec![
                "say hello to the world".into(),
                "peter parker was not spiderman".into(),
                "this is a big world indeed".into(),
            ],
            0,
        );
        ed
    }

    #[test]
    fn test_search_then_accept_with_motion() {
        let mut ed = world_editor();
        type_str(&mut ed, "draft");
        ed.handle(Action::StartSearch);
        assert!(ed.is_searching());
        type_str(&mut ed, "world");
        assert_eq!(ed.value(), "this is a big world indeed");
        ed.handle(Action::StartSearch);
        assert_eq!(ed.value(), "say hello to the world");
        assert_eq!(ed.text().cursor().col, 17);

        // A motion accepts the match and then moves
        ed.handle(Action::CharForward);
        assert!(!ed.is_searching());
        assert_eq!(ed.value(), "say hello to the world");
        assert_eq!(ed.text().cursor().col, 18);
        assert_eq!(ed.history().cursor(), 0);
    }

    #[test]
    fn test_search_abort_restores_draft() {
        let mut ed = world_editor();
        type_str(&mut ed, "draft");
        ed.handle(Action::StartSearch);
        type_str(&mut ed, "parker");
        assert_eq!(ed.value(), "peter parker was not spiderman");
        ed.handle(Action::AbortSearch);
        assert!(!ed.is_searching());
        assert_eq!(ed.value(), "draft");

        ed.handle(Action::StartSearch);
        type_str(&mut ed, "parker");
        ed.handle(Action::Interrupt);
        assert_eq!(ed.status(), Status::Pending);
        assert_eq!(ed.value(), "draft");
    }

    #[test]
    fn test_search_pattern_editing_and_not_found() {
        let mut ed = world_editor();
        ed.handle(Action::StartSearch);
        type_str(&mut ed, "zz");
        assert!(ed.search().unwrap().not_found());
        let view = ed.view();
        assert_eq!(view.search.as_ref().unwrap().prompt, "bck?");
        ed.handle(Action::DeleteBackward);
        ed.handle(Action::DeleteBackward);
        type_str(&mut ed, "peter");
        assert!(!ed.search().unwrap().not_found());
        assert_eq!(ed.value(), "peter parker was not spiderman");
        assert_eq!(ed.view().search.unwrap().prompt, "bck:");
    }

    #[test]
    fn test_search_enter_accepts_then_submits() {
        let mut ed = world_editor();
        ed.handle(Action::StartSearch);
        type_str(&mut ed, "big");
        let t = finished(ed.handle(Action::InsertNewline));
        assert_eq!(t.text, "this is a big world indeed");
    }

    #[test]
    fn test_search_eof_at_column_zero() {
        let mut ed = world_editor();
        type_str(&mut ed, "dr");
        ed.handle(Action::StartSearch);
        type_str(&mut ed, "say");
        assert_eq!(ed.text().cursor().col, 0);
        let t = finished(ed.handle(Action::EndOfInput));
        assert_eq!(t.reason, EndReason::EndOfFile);
        assert_eq!(t.text, "dr");
    }

    #[test]
    fn test_search_interrupt_on_empty_buffer_ends_input() {
        let mut ed = world_editor();
        ed.handle(Action::StartSearch);
        assert_eq!(ed.value(), "");
        let t = finished(ed.handle(Action::Interrupt));
        assert_eq!(t.reason, EndReason::Interrupted);
        assert_eq!(t.text, "");

        // A shown match is not empty, so the search is only cancelled
        let mut ed = world_editor();
        ed.handle(Action::StartSearch);
        type_str(&mut ed, "parker");
        assert_eq!(ed.handle(Action::Interrupt), Status::Pending);
        assert!(!ed.is_searching());
        assert_eq!(ed.value(), "");
    }

    #[test]
    fn test_history_next_after_search_accept_returns_to_match() {
        let mut ed = editor();
        ed.history_mut()
            .set_all(vec!["alpha".into(), "beta".into(), "gamma".into()], 0);
        ed.handle(Action::StartSearch);
        type_str(&mut ed, "alpha");
        assert_eq!(ed.value(), "alpha");

        ed.handle(Action::HistoryNext);
        assert!(!ed.is_searching());
        assert_eq!(ed.value(), "beta");
        ed.handle(Action::HistoryNext);
        assert_eq!(ed.value(), "gamma");
        ed.handle(Action::HistoryNext);
        assert_eq!(ed.value(), "alpha");
        ed.handle(Action::HistoryNext);
        assert_eq!(ed.value(), "alpha");
    }

    #[test]
    fn test_reflow_rewraps_and_reports() {
        let mut ed = editor();
        let text = vec!["lorem"; 20].join(" ");
        ed.handle(Action::InsertText(text.clone()));
        assert_eq!(ed.text().line_count(), 1);

        ed.handle(Action::Reflow);
        let value = ed.value();
        assert_eq!(value, crate::editor::wrap_words(&text, 72));
        assert!(value.lines().all(|l| display_width(l) <= 72));
        assert_eq!(value.split_whitespace().count(), 20);
        assert_eq!(ed.take_message().as_deref(), Some("reflowed to 72 columns"));

        // Already wrapped: nothing changes and nothing is reported
        ed.handle(Action::Reflow);
        assert_eq!(ed.value(), value);
        assert_eq!(ed.take_message(), None);
    }

    fn shout(text: &str, _width: usize) -> (String, String) {
        (text.to_uppercase(), "loud".to_string())
    }

    #[test]
    fn test_custom_and_cleared_reflower() {
        let mut ed = editor();
        ed.set_reflower(shout);
        type_str(&mut ed, "abc");
        ed.handle(Action::Reflow);
        assert_eq!(ed.value(), "ABC");
        assert_eq!(ed.take_message().as_deref(), Some("loud"));

        ed.clear_reflower();
        type_str(&mut ed, "d");
        ed.handle(Action::Reflow);
        assert_eq!(ed.value(), "ABCd");
        assert_eq!(ed.take_message(), None);
    }

    #[test]
    fn test_completion_overlay_accept() {
        let mut ed = editor();
        ed.set_resolver(|_: &[String], _: usize, _: usize| {
            (
                String::new(),
                Proposal::default().with_category("names", vec!["Ann".into(), "Anna".into()]),
            )
        });
        ed.handle(Action::StartCompletion);
        let session = ed.completion().unwrap();
        assert_eq!(session.lists().len(), 1);
        assert_eq!(session.lists()[0].len(), 2);
        assert_eq!(session.lists()[0].index(), 0);
        ed.handle(Action::InsertNewline);
        assert!(!ed.is_completing());
        assert_eq!(ed.value(), "Ann ");
        assert_eq!(ed.status(), Status::Pending);
    }

    #[test]
    fn test_completion_prefix_then_choice() {
        let mut ed = editor();
        ed.set_resolver(name_resolver);
        type_str(&mut ed, "hi an");
        ed.handle(Action::StartCompletion);
        assert_eq!(ed.take_message(), Some("matching \"an\"".to_string()));
        assert_eq!(ed.take_message(), None);
        // Common prefix of Andrew, Ann, Anna, Anthony
        assert_eq!(ed.value(), "hi An");
        assert!(ed.is_completing());
        ed.handle(Action::MoveDown);
        ed.handle(Action::MoveDown);
        ed.handle(Action::AcceptCompletion);
        assert_eq!(ed.value(), "hi Anna ");
    }

    #[test]
    fn test_completion_single_candidate_adds_space() {
        let mut ed = editor();
        ed.set_resolver(name_resolver);
        type_str(&mut ed, "mA");
        ed.handle(Action::StartCompletion);
        assert!(!ed.is_completing());
        assert_eq!(ed.value(), "Mary ");
    }

    #[test]
    fn test_completion_rewrites_word_under_cursor() {
        let mut ed = editor();
        ed.set_resolver(name_resolver);
        type_str(&mut ed, "bri x");
        ed.handle(Action::LineStart);
        ed.handle(Action::CharForward);
        ed.handle(Action::StartCompletion);
        assert_eq!(ed.value(), "Brian  x");
    }

    #[test]
    fn test_completion_no_match_is_noop() {
        let mut ed = editor();
        ed.set_resolver(name_resolver);
        type_str(&mut ed, "zed");
        ed.handle(Action::StartCompletion);
        assert_eq!(ed.value(), "zed");
        assert!(!ed.is_completing());
        assert!(ed.take_message().is_some());
    }

    #[test]
    fn test_completion_unrecognized_action_redelivered() {
        let mut ed = editor();
        ed.set_resolver(name_resolver);
        type_str(&mut ed, "an");
        ed.handle(Action::StartCompletion);
        assert!(ed.is_completing());
        ed.handle(Action::Insert('x'));
        assert!(!ed.is_completing());
        assert_eq!(ed.value(), "Anx");
    }

    #[test]
    fn test_completion_abort_keeps_prefill() {
        let mut ed = editor();
        ed.set_resolver(name_resolver);
        type_str(&mut ed, "an");
        ed.handle(Action::StartCompletion);
        assert_eq!(ed.handle(Action::Interrupt), Status::Pending);
        assert!(!ed.is_completing());
        assert_eq!(ed.value(), "An");
    }

    #[test]
    fn test_completion_without_resolver_is_noop() {
        let mut ed = editor();
        type_str(&mut ed, "x");
        ed.handle(Action::StartCompletion);
        assert_eq!(ed.value(), "x");
    }

    #[test]
    fn test_resolver_contract_violation_is_clamped() {
        let mut ed = editor();
        ed.set_resolver(|_: &[String], _: usize, _: usize| {
            (
                String::new(),
                Proposal {
                    prefill: "done".into(),
                    cursor_shift: 50,
                    delete_before: 99,
                    ..Default::default()
                },
            )
        });
        type_str(&mut ed, "abc");
        ed.handle(Action::AlwaysNewline);
        type_str(&mut ed, "de");
        ed.handle(Action::StartCompletion);
        // Only the current line's chars can be deleted
        assert_eq!(ed.value(), "abc\ndone ");
    }

    #[test]
    fn test_completion_closes_search() {
        let mut ed = world_editor();
        ed.set_resolver(name_resolver);
        ed.handle(Action::StartSearch);
        type_str(&mut ed, "peter");
        ed.handle(Action::StartCompletion);
        assert!(!ed.is_searching());
        assert!(!ed.is_completing());
        assert_eq!(ed.value(), "peter parker was not spiderman");
    }

    #[test]
    fn test_text_height_tracks_content_and_screen() {
        let mut ed = Editor::new(11, 6);
        ed.set_prompt("", "");
        // Width 10 after reserving the last column
        assert_eq!(ed.text().height(), 1);
        type_str(&mut ed, &"x".repeat(25));
        assert_eq!(ed.text().logical_height(), 3);
        assert_eq!(ed.text().height(), 3);
        for _ in 0..4 {
            ed.handle(Action::AlwaysNewline);
        }
        // Screen of 6 rows leaves 5 for text
        assert_eq!(ed.text().height(), 5);
        ed.handle(Action::StartSearch);
        assert_eq!(ed.text().height(), 4);
        ed.handle(Action::AbortSearch);
        ed.set_max_height(3);
        assert_eq!(ed.text().height(), 2);
    }

    #[test]
    fn test_view_prompts_and_cursor() {
        let mut ed = editor();
        ed.set_prompt("> ", ".. ");
        type_str(&mut ed, "ab");
        ed.handle(Action::AlwaysNewline);
        type_str(&mut ed, "c");
        let view = ed.view();
        assert_eq!(view.text_lines(), vec![">  ab".to_string(), ".. c".to_string()]);
        assert_eq!(view.cursor, Some(ViewCursor { line: 1, col: 4 }));

        ed.handle(Action::ToggleHidePrompt);
        let view = ed.view();
        assert_eq!(view.text_lines(), vec!["ab".to_string(), "c".to_string()]);
        assert_eq!(view.cursor, Some(ViewCursor { line: 1, col: 1 }));
    }

    #[test]
    fn test_view_placeholder_and_search_line() {
        let mut ed = world_editor();
        ed.set_placeholder("type here");
        let view = ed.view();
        assert_eq!(view.rows[0].spans, vec![Span::new("type here", SpanStyle::Placeholder)]);

        ed.handle(Action::StartSearch);
        type_str(&mut ed, "big");
        let view = ed.view();
        let search = view.search.clone().unwrap();
        assert_eq!(search.pattern, "big");
        assert_eq!(view.cursor, Some(ViewCursor { line: 1, col: 7 }));
        assert_eq!(view.line_count(), 2);
    }

    #[test]
    fn test_view_highlighting() {
        let mut ed = editor();
        ed.set_prompt("", "");
        ed.set_highlighter(KeywordHighlighter::sql());
        type_str(&mut ed, "select 42");
        let view = ed.view();
        assert_eq!(
            view.rows[0].spans,
            vec![
                Span::new("select", SpanStyle::Token(TokenType::Keyword)),
                Span::plain(" "),
                Span::new("42", SpanStyle::Token(TokenType::Number)),
            ]
        );
    }

    #[test]
    fn test_view_overlay() {
        let mut ed = Editor::new(80, 20);
        ed.set_resolver(name_resolver);
        type_str(&mut ed, "an");
        ed.handle(Action::StartCompletion);
        let view = ed.view();
        assert_eq!(view.overlay.len(), 1);
        assert_eq!(view.overlay[0].title, "names");
        assert_eq!(view.overlay[0].items, vec!["Andrew", "Ann", "Anna", "Anthony"]);
        assert_eq!(view.overlay_height, 7);
        assert_eq!(view.line_count(), 1 + 7);
    }

    #[test]
    fn test_wrapped_rows_only_prompt_first_segment() {
        let mut ed = Editor::new(7, 10);
        ed.set_prompt("> ", "");
        type_str(&mut ed, "abcdefg");
        let view = ed.view();
        // Width 6, minus a 2 column prompt
        assert_eq!(view.text_lines(), vec!["> abcd".to_string(), "  efg".to_string()]);
        assert_eq!(view.cursor, Some(ViewCursor { line: 1, col: 5 }));
    }
}
