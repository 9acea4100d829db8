//! Persistent storage for history

mod history_file;

pub use history_file::{
    default_history_path, load_history, load_history_from, save_history, save_history_to,
    HistoryFileError, COOKIE,
};
