//! Terminal front end: runs the editor on a raw-mode terminal
//!
//! `LineReader` owns an `Editor`, the keymap and the history file settings.
//! Each `read_line` call paints the editor inline below the cursor and
//! returns once input is accepted, interrupted or ended.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use thiserror::Error;
use tracing::{debug, trace};

use crate::config::EditorConfig;
use crate::editor::{Editor, EndReason, Status, Termination};
use crate::input::{Action, Key, KeyPress, Keymap, KeymapError};
use crate::render::Screen;
use crate::storage::{load_history, save_history, HistoryFileError};

#[derive(Debug, Error)]
pub enum ReadError {
    /// Interrupt on an empty input
    #[error("interrupted")]
    Interrupted,
    /// End of input on an empty line
    #[error("end of input")]
    EndOfInput,
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    History(#[from] HistoryFileError),
    #[error(transparent)]
    Keymap(#[from] KeymapError),
}

pub struct LineReader {
    editor: Editor,
    keymap: Keymap,
    history_file: Option<PathBuf>,
    auto_save_history: bool,
    max_history_size: usize,
    escape_time: Duration,
}

impl LineReader {
    pub fn new(config: &EditorConfig) -> Result<Self, ReadError> {
        let keymap = Keymap::with_overrides(&config.keys)?;
        let (cols, rows) = crossterm::terminal::size().unwrap_or((80, 24));
        Ok(Self {
            editor: Editor::from_config(config, cols as usize, rows as usize),
            keymap,
            history_file: config.history_file.clone(),
            auto_save_history: config.auto_save_history,
            max_history_size: config.max_history_size,
            escape_time: EditorConfig::escape_time(),
        })
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    pub fn keymap_mut(&mut self) -> &mut Keymap {
        &mut self.keymap
    }

    pub fn set_history_file(&mut self, path: impl Into<PathBuf>) {
        self.history_file = Some(path.into());
    }

    pub fn history_file(&self) -> Option<&Path> {
        self.history_file.as_deref()
    }

    /// Replace the history with the history file contents, if a file is set
    pub fn load_history(&mut self) -> Result<(), ReadError> {
        let Some(path) = &self.history_file else {
            return Ok(());
        };
        let entries = load_history(path)?;
        self.editor.history_mut().set_all(entries, self.max_history_size);
        Ok(())
    }

    pub fn save_history(&self) -> Result<(), ReadError> {
        let Some(path) = &self.history_file else {
            return Ok(());
        };
        save_history(self.editor.history().entries(), path)?;
        Ok(())
    }

    /// Record an entry, saving the file when auto-save is on
    pub fn add_history(&mut self, entry: &str) -> Result<(), ReadError> {
        self.editor.history_mut().add(entry);
        if self.auto_save_history {
            self.save_history()?;
        }
        Ok(())
    }

    /// Edit one input. Raw mode is only held for the duration of the call.
    pub fn read_line(&mut self) -> Result<String, ReadError> {
        let mut screen = Screen::new()?;
        self.editor.reset();
        self.editor.resize(screen.cols as usize, screen.rows as usize);

        screen.enter_raw_mode()?;
        let result = self.run(&mut screen);
        let restored = screen.leave_raw_mode();
        let termination = result?;
        restored?;

        match termination.reason {
            EndReason::Accepted => Ok(termination.text),
            EndReason::EndOfFile => Err(ReadError::EndOfInput),
            EndReason::Interrupted => Err(ReadError::Interrupted),
        }
    }

    fn run(&mut self, screen: &mut Screen) -> Result<Termination, ReadError> {
        screen.render(&self.editor.view())?;
        self.editor.mark_drawn();

        // ESC followed by a key within the escape time counts as Alt+key
        let mut escape_pending = false;

        loop {
            let event = if escape_pending {
                if event::poll(self.escape_time)? {
                    Some(event::read()?)
                } else {
                    None
                }
            } else {
                Some(event::read()?)
            };

            let action = match event {
                None => {
                    escape_pending = false;
                    self.keymap.resolve(&KeyPress::plain(Key::Escape))
                }
                Some(Event::Key(key)) if key.kind != KeyEventKind::Release => {
                    let mut press = KeyPress::from_crossterm(key);
                    if escape_pending {
                        escape_pending = false;
                        press = press.with_alt();
                    } else if press == KeyPress::plain(Key::Escape) {
                        escape_pending = true;
                        continue;
                    }
                    trace!(key = %press, "key");
                    self.keymap.resolve(&press)
                }
                Some(Event::Paste(text)) => Some(Action::InsertText(text)),
                Some(Event::Resize(cols, rows)) => {
                    screen.cols = cols;
                    screen.rows = rows;
                    self.editor.resize(cols as usize, rows as usize);
                    None
                }
                Some(_) => None,
            };

            if let Some(action) = action {
                if action == Action::Refresh {
                    screen.clear()?;
                }
                debug!(action = ?action, "dispatch");
                if let Status::Finished(termination) = self.editor.handle(action) {
                    screen.render(&self.editor.view())?;
                    screen.finish()?;
                    return Ok(termination);
                }
                if let Some(message) = self.editor.take_message() {
                    screen.print_above(&message)?;
                }
            }

            if self.editor.needs_redraw() {
                screen.render(&self.editor.view())?;
                self.editor.mark_drawn();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader_with_file(dir: &Path, auto_save: bool) -> LineReader {
        let config = EditorConfig {
            history_file: Some(dir.join("history")),
            auto_save_history: auto_save,
            max_history_size: 2,
            ..Default::default()
        };
        LineReader::new(&config).unwrap()
    }

    #[test]
    fn test_auto_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let mut reader = reader_with_file(dir.path(), true);
        reader.add_history("one").unwrap();
        reader.add_history("two words").unwrap();
        reader.add_history("three").unwrap();

        let mut other = reader_with_file(dir.path(), false);
        other.load_history().unwrap();
        assert_eq!(other.editor().history().entries(), &["two words".to_string(), "three".to_string()]);
    }

    #[test]
    fn test_without_auto_save_nothing_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let mut reader = reader_with_file(dir.path(), false);
        reader.add_history("one").unwrap();
        assert!(!dir.path().join("history").exists());
        reader.save_history().unwrap();
        assert!(dir.path().join("history").exists());
    }

    #[test]
    fn test_bad_key_override_is_rejected() {
        let mut config = EditorConfig::default();
        config.keys.insert("no_such_action".to_string(), vec!["ctrl+x".to_string()]);
        assert!(matches!(LineReader::new(&config), Err(ReadError::Keymap(_))));
    }
}
