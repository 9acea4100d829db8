mod action;
mod key;
mod keymap;

pub use action::Action;
pub use key::{Key, KeyPress, Modifiers};
pub use keymap::{Keymap, KeymapError};
