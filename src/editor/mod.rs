mod completion;
mod cursor;
mod history;
mod reflow;
mod search;
mod state;
mod textarea;

pub use completion::{
    overlay_height, CategoryList, CompletionOutcome, CompletionSession, MIN_EDITOR_ROWS,
    MIN_OVERLAY_HEIGHT,
};
pub use cursor::{Cursor, Position};
pub use history::HistoryList;
pub use reflow::{wrap_words, Reflower, WordReflow, DEFAULT_REFLOW_WIDTH};
pub use search::SearchSession;
pub use state::{Editor, EndReason, Status, Termination};
pub use textarea::{DisplayRow, TextArea};
