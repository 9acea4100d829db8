//! Display model and terminal painter

mod screen;
mod view;

pub use screen::Screen;
pub use view::{OverlayColumn, SearchLine, Span, SpanStyle, View, ViewCursor, ViewRow};
