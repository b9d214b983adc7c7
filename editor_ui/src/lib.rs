//! Toadbin UI - host-side glue around the editor.
//!
//! This crate translates winit and textual key input into editor events,
//! copies text with a command-line fallback, and keeps transient
//! notifications for the page.

pub mod clipboard;
pub mod input;
pub mod notifications;

pub use clipboard::{
    ClipboardError, ClipboardProvider, CommandClipboard, Copier, CopyOutcome, CopyTarget,
    SystemClipboard,
};
pub use input::{
    command_for, execute_command, parse_key_notation, EditorCommand, InputHandler, KeyNotationError,
};
pub use notifications::{Notification, NotificationManager, NotificationType};
