//! Multi-line line editor for terminal REPLs
//!
//! The [`editor::Editor`] state machine consumes [`input::Action`]s and
//! produces a [`render::View`]; [`reader::LineReader`] drives it on a
//! raw-mode terminal.

pub mod buffer;
pub mod complete;
pub mod config;
pub mod editor;
pub mod input;
pub mod reader;
pub mod render;
pub mod storage;
pub mod syntax;
pub mod util;

pub use editor::{Editor, EndReason, Status, Termination};
pub use reader::{LineReader, ReadError};
