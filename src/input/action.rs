//! Editor actions
//!
//! The editor core only ever sees actions; keys are mapped to them by
//! [`super::Keymap`].

macro_rules! named_actions {
    ($($variant:ident => $name:literal,)*) => {
        /// Something the editor can be asked to do
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum Action {
            $($variant,)*
            /// Type a single character
            Insert(char),
            /// Type a string, e.g. from a paste
            InsertText(String),
        }

        impl Action {
            /// Names accepted in key binding configuration
            pub const NAMES: &'static [&'static str] = &[$($name,)*];

            pub fn from_name(name: &str) -> Option<Action> {
                match name {
                    $($name => Some(Action::$variant),)*
                    _ => None,
                }
            }

            /// Configuration name, `None` for the text insertion actions
            pub fn name(&self) -> Option<&'static str> {
                match self {
                    $(Action::$variant => Some($name),)*
                    Action::Insert(_) | Action::InsertText(_) => None,
                }
            }
        }
    };
}

named_actions! {
    CharForward => "char_forward",
    CharBackward => "char_backward",
    WordForward => "word_forward",
    WordBackward => "word_backward",
    MoveUp => "move_up",
    MoveDown => "move_down",
    LineStart => "line_start",
    LineEnd => "line_end",
    BufferStart => "buffer_start",
    BufferEnd => "buffer_end",
    PageUp => "page_up",
    PageDown => "page_down",
    DeleteBackward => "delete_backward",
    DeleteForward => "delete_forward",
    DeleteWordBackward => "delete_word_backward",
    DeleteWordForward => "delete_word_forward",
    DeleteToLineEnd => "delete_to_line_end",
    DeleteToLineStart => "delete_to_line_start",
    TransposeBackward => "transpose_backward",
    UppercaseWordForward => "uppercase_word_forward",
    LowercaseWordForward => "lowercase_word_forward",
    CapitalizeWordForward => "capitalize_word_forward",
    InsertNewline => "insert_newline",
    AlwaysNewline => "always_newline",
    StartCompletion => "start_completion",
    AcceptCompletion => "accept_completion",
    Interrupt => "interrupt",
    EndOfInput => "end_of_input",
    StartSearch => "start_search",
    AbortSearch => "abort_search",
    HistoryPrev => "history_prev",
    HistoryNext => "history_next",
    ToggleHidePrompt => "toggle_hide_prompt",
    Refresh => "refresh",
    Reflow => "reflow",
}
