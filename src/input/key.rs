use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Key modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        alt: false,
        shift: false,
    };
}

impl From<KeyModifiers> for Modifiers {
    fn from(m: KeyModifiers) -> Self {
        Self {
            ctrl: m.contains(KeyModifiers::CONTROL),
            alt: m.contains(KeyModifiers::ALT),
            shift: m.contains(KeyModifiers::SHIFT),
        }
    }
}

/// Abstracted key input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Backspace,
    Delete,
    Enter,
    Tab,
    Escape,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
    Null,
}

impl Key {
    pub fn from_crossterm(event: KeyEvent) -> (Self, Modifiers) {
        let mut modifiers = Modifiers::from(event.modifiers);
        let key = match event.code {
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Delete => Key::Delete,
            KeyCode::Enter => Key::Enter,
            KeyCode::Tab => Key::Tab,
            KeyCode::BackTab => {
                modifiers.shift = true;
                Key::Tab
            }
            KeyCode::Esc => Key::Escape,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            KeyCode::PageUp => Key::PageUp,
            KeyCode::PageDown => Key::PageDown,
            KeyCode::F(n) => Key::F(n),
            KeyCode::Null => Key::Null,
            _ => Key::Null,
        };
        (key, modifiers)
    }

    /// Parse a key name as used in bindings: "a", "enter", "pgup", "f5"...
    pub fn from_name(name: &str) -> Option<Key> {
        let mut chars = name.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Some(Key::Char(c));
        }
        let key = match name.to_ascii_lowercase().as_str() {
            "space" => Key::Char(' '),
            "backspace" => Key::Backspace,
            "delete" | "del" => Key::Delete,
            "enter" | "return" => Key::Enter,
            "tab" => Key::Tab,
            "esc" | "escape" => Key::Escape,
            "up" => Key::Up,
            "down" => Key::Down,
            "left" => Key::Left,
            "right" => Key::Right,
            "home" => Key::Home,
            "end" => Key::End,
            "pgup" | "pageup" => Key::PageUp,
            "pgdown" | "pagedown" => Key::PageDown,
            other => {
                let n: u8 = other.strip_prefix('f')?.parse().ok()?;
                if !(1..=24).contains(&n) {
                    return None;
                }
                Key::F(n)
            }
        };
        Some(key)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(' ') => f.write_str("space"),
            Key::Char(c) => write!(f, "{}", c),
            Key::Backspace => f.write_str("backspace"),
            Key::Delete => f.write_str("delete"),
            Key::Enter => f.write_str("enter"),
            Key::Tab => f.write_str("tab"),
            Key::Escape => f.write_str("esc"),
            Key::Up => f.write_str("up"),
            Key::Down => f.write_str("down"),
            Key::Left => f.write_str("left"),
            Key::Right => f.write_str("right"),
            Key::Home => f.write_str("home"),
            Key::End => f.write_str("end"),
            Key::PageUp => f.write_str("pgup"),
            Key::PageDown => f.write_str("pgdown"),
            Key::F(n) => write!(f, "f{}", n),
            Key::Null => f.write_str("null"),
        }
    }
}

/// A key together with its modifiers, normalized for lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyPress {
    pub key: Key,
    pub mods: Modifiers,
}

impl KeyPress {
    pub fn new(key: Key, mut mods: Modifiers) -> Self {
        // A typed char already carries its shifted form
        if matches!(key, Key::Char(_)) {
            mods.shift = false;
        }
        Self { key, mods }
    }

    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    pub fn from_crossterm(event: KeyEvent) -> Self {
        let (key, mods) = Key::from_crossterm(event);
        Self::new(key, mods)
    }

    /// Same key with alt added, used for ESC-prefixed sequences
    pub fn with_alt(mut self) -> Self {
        self.mods.alt = true;
        self
    }

    /// Parse "ctrl+a", "alt+enter", "shift+tab", "alt+<"...
    pub fn parse(binding: &str) -> Option<KeyPress> {
        let mut mods = Modifiers::NONE;
        let mut rest = binding.trim();
        loop {
            let lower = rest.to_ascii_lowercase();
            if lower.starts_with("ctrl+") && rest.len() > 5 {
                mods.ctrl = true;
                rest = &rest[5..];
            } else if lower.starts_with("alt+") && rest.len() > 4 {
                mods.alt = true;
                rest = &rest[4..];
            } else if lower.starts_with("shift+") && rest.len() > 6 {
                mods.shift = true;
                rest = &rest[6..];
            } else {
                break;
            }
        }
        let mut key = Key::from_name(rest)?;
        // Ctrl combinations arrive as lowercase letters
        if mods.ctrl {
            if let Key::Char(c) = key {
                key = Key::Char(c.to_ascii_lowercase());
            }
        }
        Some(KeyPress::new(key, mods))
    }
}

impl fmt::Display for KeyPress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mods.ctrl {
            f.write_str("ctrl+")?;
        }
        if self.mods.alt {
            f.write_str("alt+")?;
        }
        if self.mods.shift {
            f.write_str("shift+")?;
        }
        write!(f, "{}", self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keypress() {
        let kp = KeyPress::parse("ctrl+a").unwrap();
        assert_eq!(kp.key, Key::Char('a'));
        assert!(kp.mods.ctrl && !kp.mods.alt);

        let kp = KeyPress::parse("alt+<").unwrap();
        assert_eq!(kp.key, Key::Char('<'));
        assert!(kp.mods.alt);

        let kp = KeyPress::parse("alt++").unwrap();
        assert_eq!(kp.key, Key::Char('+'));

        assert_eq!(KeyPress::parse("pgdown"), Some(KeyPress::plain(Key::PageDown)));
        assert_eq!(KeyPress::parse("f12").map(|k| k.key), Some(Key::F(12)));
        assert_eq!(KeyPress::parse("ctrl+"), None);
        assert_eq!(KeyPress::parse("hyper+x"), None);
        assert_eq!(KeyPress::parse("f99"), None);
    }

    #[test]
    fn test_shift_dropped_on_chars() {
        let kp = KeyPress::new(
            Key::Char('A'),
            Modifiers {
                shift: true,
                ..Modifiers::NONE
            },
        );
        assert_eq!(kp, KeyPress::plain(Key::Char('A')));
        assert!(KeyPress::parse("shift+tab").unwrap().mods.shift);
    }

    #[test]
    fn test_display() {
        assert_eq!(KeyPress::parse("ctrl+alt+x").unwrap().to_string(), "ctrl+alt+x");
        assert_eq!(KeyPress::parse("space").unwrap().to_string(), "space");
    }

    #[test]
    fn test_from_crossterm() {
        let ev = KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT);
        let kp = KeyPress::from_crossterm(ev);
        assert_eq!(kp.key, Key::Tab);
        assert!(kp.mods.shift);

        let ev = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL);
        assert_eq!(KeyPress::from_crossterm(ev), KeyPress::parse("ctrl+r").unwrap());
    }
}
