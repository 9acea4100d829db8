//! Key to action table

use std::collections::HashMap;

use thiserror::Error;

use super::action::Action;
use super::key::{Key, KeyPress};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeymapError {
    #[error("unknown action name: {0:?}")]
    UnknownAction(String),
    #[error("invalid key binding {binding:?} for action {action:?}")]
    InvalidBinding { action: String, binding: String },
}

/// Default bindings, emacs/readline flavored
const DEFAULT_BINDINGS: &[(&str, &[&str])] = &[
    ("char_forward", &["right", "ctrl+f"]),
    ("char_backward", &["left", "ctrl+b"]),
    ("word_forward", &["alt+right", "ctrl+right", "alt+f"]),
    ("word_backward", &["alt+left", "ctrl+left", "alt+b"]),
    ("move_up", &["up", "ctrl+p"]),
    ("move_down", &["down", "ctrl+n"]),
    ("line_start", &["home", "ctrl+a"]),
    ("line_end", &["end", "ctrl+e"]),
    ("buffer_start", &["alt+<", "ctrl+home"]),
    ("buffer_end", &["alt+>", "ctrl+end"]),
    ("page_up", &["pgup"]),
    ("page_down", &["pgdown"]),
    ("delete_backward", &["backspace", "ctrl+h"]),
    ("delete_forward", &["delete"]),
    ("delete_word_backward", &["alt+backspace", "ctrl+w"]),
    ("delete_word_forward", &["alt+delete", "alt+d"]),
    ("delete_to_line_end", &["ctrl+k"]),
    ("delete_to_line_start", &["ctrl+u"]),
    ("transpose_backward", &["ctrl+t"]),
    ("uppercase_word_forward", &["alt+u"]),
    ("lowercase_word_forward", &["alt+l"]),
    ("capitalize_word_forward", &["alt+c"]),
    ("insert_newline", &["enter"]),
    ("always_newline", &["alt+enter"]),
    ("start_completion", &["tab"]),
    ("accept_completion", &["ctrl+j"]),
    ("interrupt", &["ctrl+c"]),
    ("end_of_input", &["ctrl+d"]),
    ("start_search", &["ctrl+r"]),
    ("abort_search", &["ctrl+g"]),
    ("history_prev", &["alt+p"]),
    ("history_next", &["alt+n"]),
    ("toggle_hide_prompt", &["alt+."]),
    ("refresh", &["ctrl+l"]),
    ("reflow", &["alt+q"]),
];

/// Lookup table from key presses to actions, built once
#[derive(Debug, Clone)]
pub struct Keymap {
    bindings: HashMap<KeyPress, Action>,
}

impl Default for Keymap {
    fn default() -> Self {
        let mut keymap = Self::empty();
        for (name, keys) in DEFAULT_BINDINGS {
            // The default table only holds valid names and keys
            if let Some(action) = Action::from_name(name) {
                for key in *keys {
                    if let Some(kp) = KeyPress::parse(key) {
                        keymap.bindings.insert(kp, action.clone());
                    }
                }
            }
        }
        keymap
    }
}

impl Keymap {
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Default bindings with per-action overrides. An overridden action
    /// loses all of its default keys.
    pub fn with_overrides(overrides: &HashMap<String, Vec<String>>) -> Result<Self, KeymapError> {
        let mut keymap = Self::default();
        for (name, keys) in overrides {
            let action =
                Action::from_name(name).ok_or_else(|| KeymapError::UnknownAction(name.clone()))?;
            keymap.unbind_action(&action);
            for key in keys {
                keymap.bind(key, action.clone()).map_err(|_| KeymapError::InvalidBinding {
                    action: name.clone(),
                    binding: key.clone(),
                })?;
            }
        }
        Ok(keymap)
    }

    pub fn bind(&mut self, key: &str, action: Action) -> Result<(), KeymapError> {
        let kp = KeyPress::parse(key).ok_or_else(|| KeymapError::InvalidBinding {
            action: action.name().unwrap_or("insert").to_string(),
            binding: key.to_string(),
        })?;
        self.bindings.insert(kp, action);
        Ok(())
    }

    pub fn unbind_action(&mut self, action: &Action) {
        self.bindings.retain(|_, a| a != action);
    }

    /// Action for a key press. Unbound printable chars insert themselves.
    pub fn resolve(&self, press: &KeyPress) -> Option<Action> {
        if let Some(action) = self.bindings.get(press) {
            return Some(action.clone());
        }
        match press.key {
            Key::Char(c) if !press.mods.ctrl && !press.mods.alt && !c.is_control() => {
                Some(Action::Insert(c))
            }
            _ => None,
        }
    }

    /// Keys bound to an action, sorted for display
    pub fn keys_for(&self, action: &Action) -> Vec<String> {
        let mut keys: Vec<String> = self
            .bindings
            .iter()
            .filter(|(_, a)| *a == action)
            .map(|(k, _)| k.to_string())
            .collect();
        keys.sort();
        keys
    }
}
