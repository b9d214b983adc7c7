//! Toadbin Core - editing assistant for the paste input.
//!
//! This crate contains the document, the keystroke assistant and the editor
//! state without any dependencies on windowing or clipboard systems.

pub mod assist;
pub mod buffer;
pub mod config;
pub mod cursor;
pub mod editor;
pub mod history;
pub mod key;
pub mod observer;
pub mod pairs;
pub mod paste;
pub mod syntax;

pub use assist::{Action, Assistant, Change, Edit};
pub use buffer::TextBuffer;
pub use config::{AssistConfig, ConfigError, EnterPolicy};
pub use cursor::Selection;
pub use editor::{Editor, KeyOutcome};
pub use history::{EditOperation, History};
pub use key::{Key, KeyEvent, Modifiers};
pub use observer::{count_label, ChangeEvent, ChangeListener, CharacterCounter};
pub use pairs::BracketPairs;
pub use paste::{PasteError, PasteStore, SaveRequest};
pub use syntax::{detect_language, HighlightListener, Language, SyntaxHighlighter};
