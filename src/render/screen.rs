use crossterm::{
    cursor::{Hide, MoveDown, MoveTo, MoveToColumn, MoveUp, Show},
    event::{
        DisableBracketedPaste, EnableBracketedPaste, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use std::io::{stdout, Result, Stdout, Write};

use super::view::{OverlayColumn, SearchLine, SpanStyle, View, ViewRow};
use crate::util::unicode::{char_width, display_width};

const PROMPT_COLOR: Color = Color::AnsiValue(246);
const PLACEHOLDER_COLOR: Color = Color::AnsiValue(243);
const NOT_FOUND_COLOR: Color = Color::Red;
const TITLE_COLOR: Color = Color::Cyan;
const PAGER_COLOR: Color = Color::AnsiValue(243);
const COLUMN_GAP: usize = 2;

/// Inline terminal painter.
///
/// Paints the editor below the current terminal line and repaints in
/// place, tracking how many lines it owns.
pub struct Screen<W: Write = Stdout> {
    out: W,
    pub rows: u16,
    pub cols: u16,
    keyboard_enhanced: bool,
    /// Lines painted by the last render
    painted: usize,
    /// Line holding the terminal cursor, relative to the first painted line
    cursor_line: usize,
}

impl Screen<Stdout> {
    pub fn new() -> Result<Self> {
        let (cols, rows) = terminal::size()?;
        Ok(Self::with_writer(stdout(), cols, rows))
    }

    pub fn refresh_size(&mut self) -> Result<()> {
        let (cols, rows) = terminal::size()?;
        self.cols = cols;
        self.rows = rows;
        Ok(())
    }
}

impl<W: Write> Screen<W> {
    pub fn with_writer(out: W, cols: u16, rows: u16) -> Self {
        Self {
            out,
            rows,
            cols,
            keyboard_enhanced: false,
            painted: 0,
            cursor_line: 0,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn enter_raw_mode(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        execute!(self.out, EnableBracketedPaste)?;

        // Kitty protocol: unambiguous Alt and Escape where supported
        if execute!(
            self.out,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )
        .is_ok()
        {
            self.keyboard_enhanced = true;
        }
        Ok(())
    }

    pub fn leave_raw_mode(&mut self) -> Result<()> {
        if self.keyboard_enhanced {
            let _ = execute!(self.out, PopKeyboardEnhancementFlags);
            self.keyboard_enhanced = false;
        }
        execute!(self.out, DisableBracketedPaste, Show)?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Clear the whole terminal and paint from the top on the next render
    pub fn clear(&mut self) -> Result<()> {
        execute!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
        self.painted = 0;
        self.cursor_line = 0;
        Ok(())
    }

    /// Print text above the editor. The editor must be rendered again.
    pub fn print_above(&mut self, text: &str) -> Result<()> {
        self.move_to_top()?;
        queue!(self.out, Clear(ClearType::FromCursorDown))?;
        for line in text.lines() {
            queue!(self.out, Print(line), Print("\r\n"))?;
        }
        self.painted = 0;
        self.cursor_line = 0;
        self.out.flush()?;
        Ok(())
    }

    /// Leave the painted region behind and put the cursor on a fresh line
    pub fn finish(&mut self) -> Result<()> {
        let last = self.painted.saturating_sub(1);
        let down = last.saturating_sub(self.cursor_line);
        if down > 0 {
            queue!(self.out, MoveDown(down as u16))?;
        }
        queue!(self.out, Print("\r\n"), Show)?;
        self.painted = 0;
        self.cursor_line = 0;
        self.out.flush()?;
        Ok(())
    }

    /// Repaint the editor view in place
    pub fn render(&mut self, view: &View) -> Result<()> {
        // Hide cursor during render to prevent flicker
        queue!(self.out, Hide)?;
        self.move_to_top()?;
        queue!(self.out, Clear(ClearType::FromCursorDown))?;

        let mut lines = 0;
        for row in &view.rows {
            self.next_line(&mut lines)?;
            self.paint_row(row)?;
        }
        if let Some(search) = &view.search {
            self.next_line(&mut lines)?;
            self.paint_search(search)?;
        }
        if !view.overlay.is_empty() {
            for r in 0..view.overlay_height {
                self.next_line(&mut lines)?;
                self.paint_overlay_row(&view.overlay, r, view.overlay_height)?;
            }
        }
        self.painted = lines;

        // The terminal cursor sits on the last painted line
        let last = lines.saturating_sub(1);
        match view.cursor {
            Some(cursor) => {
                let line = cursor.line.min(last);
                let up = last - line;
                if up > 0 {
                    queue!(self.out, MoveUp(up as u16))?;
                }
                queue!(self.out, MoveToColumn(cursor.col as u16), Show)?;
                self.cursor_line = line;
            }
            None => self.cursor_line = last,
        }

        self.out.flush()?;
        Ok(())
    }

    fn move_to_top(&mut self) -> Result<()> {
        if self.cursor_line > 0 {
            queue!(self.out, MoveUp(self.cursor_line as u16))?;
        }
        queue!(self.out, MoveToColumn(0))?;
        Ok(())
    }

    fn next_line(&mut self, lines: &mut usize) -> Result<()> {
        if *lines > 0 {
            queue!(self.out, Print("\r\n"))?;
        }
        *lines += 1;
        Ok(())
    }

    fn paint_row(&mut self, row: &ViewRow) -> Result<()> {
        if !row.prompt.is_empty() {
            queue!(self.out, SetForegroundColor(PROMPT_COLOR), Print(&row.prompt), ResetColor)?;
        }
        for span in &row.spans {
            match span.style {
                SpanStyle::Plain => queue!(self.out, Print(&span.text))?,
                SpanStyle::Placeholder => queue!(
                    self.out,
                    SetForegroundColor(PLACEHOLDER_COLOR),
                    Print(&span.text),
                    ResetColor
                )?,
                SpanStyle::Token(token) => {
                    if token.bold() {
                        queue!(self.out, SetAttribute(Attribute::Bold))?;
                    }
                    queue!(
                        self.out,
                        SetForegroundColor(token.color()),
                        Print(&span.text),
                        SetAttribute(Attribute::Reset),
                        ResetColor
                    )?;
                }
            }
        }
        Ok(())
    }

    fn paint_search(&mut self, search: &SearchLine) -> Result<()> {
        if search.not_found {
            queue!(self.out, SetForegroundColor(NOT_FOUND_COLOR), Print(&search.prompt), ResetColor)?;
        } else {
            queue!(self.out, Print(&search.prompt))?;
        }
        if search.pattern.is_empty() {
            let room = (self.cols as usize).saturating_sub(display_width(&search.prompt) + 1);
            queue!(
                self.out,
                SetForegroundColor(PLACEHOLDER_COLOR),
                Print(fit(&search.placeholder, room).trim_end()),
                ResetColor
            )?;
        } else {
            queue!(self.out, Print(&search.pattern))?;
        }
        Ok(())
    }

    /// One row of the overlay: titles, page items, page indicator, filter
    fn paint_overlay_row(&mut self, columns: &[OverlayColumn], r: usize, height: usize) -> Result<()> {
        let page_rows = height.saturating_sub(3);
        let mut used = 0;
        for column in columns {
            let width = column.width.max(display_width(&column.title));
            if used + width > self.cols as usize {
                break;
            }
            if used > 0 {
                queue!(self.out, Print(" ".repeat(COLUMN_GAP)))?;
            }

            if r == 0 {
                queue!(self.out, SetAttribute(Attribute::Bold), SetForegroundColor(TITLE_COLOR))?;
                if column.focused {
                    queue!(self.out, SetAttribute(Attribute::Underlined))?;
                }
                queue!(self.out, Print(fit(&column.title, width)))?;
            } else if r <= page_rows {
                let idx = r - 1;
                let text = column.items.get(idx).map(String::as_str).unwrap_or("");
                if column.selected == Some(idx) {
                    let attr = if column.focused { Attribute::Reverse } else { Attribute::Bold };
                    queue!(self.out, SetAttribute(attr))?;
                }
                queue!(self.out, Print(fit(text, width)))?;
            } else if r == page_rows + 1 {
                let pager = if column.pages > 1 {
                    format!("{}/{}", column.page + 1, column.pages)
                } else {
                    String::new()
                };
                queue!(self.out, SetForegroundColor(PAGER_COLOR), Print(fit(&pager, width)))?;
            } else {
                let filter = column.filter.as_ref().map(|f| format!("/{}", f)).unwrap_or_default();
                queue!(self.out, Print(fit(&filter, width)))?;
            }
            queue!(self.out, SetAttribute(Attribute::Reset), ResetColor)?;
            used += width + COLUMN_GAP;
        }
        Ok(())
    }
}

/// Truncate or pad to exactly `width` cells
fn fit(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = char_width(c);
        if used + w > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push_str(&" ".repeat(width - used));
    out
}
