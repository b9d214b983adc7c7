//! Input handling and key mapping.
//!
//! Turns winit keyboard events, or textual key notation such as `S-Tab`, into
//! the platform-independent events the editor understands.

use thiserror::Error;
use toadbin_core::{Editor, KeyEvent, KeyOutcome, Modifiers};
use winit::event::ElementState;
use winit::keyboard::{Key, ModifiersState, NamedKey};

/// Represents an editor command.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorCommand {
    /// A keydown for the assistant; unintercepted keys fall back to typing.
    Key(KeyEvent),
    /// Text committed by an input method.
    InsertText(String),
    Undo,
    Redo,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyNotationError {
    #[error("empty key notation")]
    Empty,
    #[error("unknown modifier {0:?} in key notation")]
    UnknownModifier(char),
}

/// Input handler that maps keyboard events to editor commands.
#[derive(Debug, Default)]
pub struct InputHandler {
    modifiers: ModifiersState,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_modifiers_state(&mut self, modifiers: ModifiersState) {
        self.modifiers = modifiers;
    }

    /// Current modifiers in editor terms.
    pub fn modifiers(&self) -> Modifiers {
        Modifiers {
            ctrl: self.modifiers.control_key(),
            shift: self.modifiers.shift_key(),
            alt: self.modifiers.alt_key(),
            meta: self.modifiers.super_key(),
        }
    }

    /// Translates a logical winit key into a keydown event.
    pub fn translate(&self, key: &Key) -> KeyEvent {
        let key = match key {
            Key::Named(NamedKey::Tab) => toadbin_core::Key::Tab,
            Key::Named(NamedKey::Enter) => toadbin_core::Key::Enter,
            Key::Named(NamedKey::Space) => toadbin_core::Key::Char(' '),
            Key::Character(text) => {
                single_char(text).map_or(toadbin_core::Key::Other, toadbin_core::Key::Char)
            }
            _ => toadbin_core::Key::Other,
        };
        KeyEvent::new(key, self.modifiers())
    }

    /// Handles IME commits and other text that arrives without a keydown.
    pub fn handle_char_input(&self, text: &str) -> Option<EditorCommand> {
        if text.is_empty() || text.chars().any(char::is_control) || self.modifiers().primary() {
            return None;
        }
        Some(EditorCommand::InsertText(text.to_string()))
    }

    /// Handle key events using the winit 0.30 API.
    pub fn handle_key_event(&self, key: &Key, state: ElementState) -> Option<EditorCommand> {
        if state != ElementState::Pressed {
            return None;
        }

        Some(command_for(self.translate(key)))
    }
}

/// Maps a keydown to a command: primary+z undoes, primary+shift+z and
/// primary+y redo, anything else goes to the editor as a key.
pub fn command_for(event: KeyEvent) -> EditorCommand {
    let mods = event.modifiers;
    match event.key {
        toadbin_core::Key::Char(ch) if mods.primary() && !mods.alt => {
            match (ch.to_ascii_lowercase(), mods.shift) {
                ('z', false) => EditorCommand::Undo,
                ('z', true) | ('y', _) => EditorCommand::Redo,
                _ => EditorCommand::Key(event),
            }
        }
        _ => EditorCommand::Key(event),
    }
}

fn single_char(text: &str) -> Option<char> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Some(ch),
        _ => None,
    }
}

/// Parses key notation like `C-l`, `S-Tab`, `Enter`, `Space` or `(`.
///
/// Modifier prefixes are `C-` (ctrl), `S-` (shift), `A-` (alt) and `M-`
/// (meta/cmd). Named keys the editor does not know map to `Key::Other`.
pub fn parse_key_notation(notation: &str) -> Result<KeyEvent, KeyNotationError> {
    if notation.is_empty() {
        return Err(KeyNotationError::Empty);
    }

    let mut modifiers = Modifiers::NONE;
    let mut rest = notation;
    while let Some((prefix, tail)) = rest.split_once('-') {
        // "-" on its own or as the last key ("C--") is the minus key.
        if tail.is_empty() {
            break;
        }
        let Some(flag) = single_char(prefix) else {
            break;
        };
        match flag {
            'C' => modifiers.ctrl = true,
            'S' => modifiers.shift = true,
            'A' => modifiers.alt = true,
            'M' | 'D' => modifiers.meta = true,
            other => return Err(KeyNotationError::UnknownModifier(other)),
        }
        rest = tail;
    }

    let key = match rest {
        "Tab" | "tab" => toadbin_core::Key::Tab,
        "Enter" | "enter" | "Ret" | "ret" => toadbin_core::Key::Enter,
        "Space" | "space" => toadbin_core::Key::Char(' '),
        "Minus" | "minus" => toadbin_core::Key::Char('-'),
        other => single_char(other).map_or(toadbin_core::Key::Other, toadbin_core::Key::Char),
    };
    Ok(KeyEvent::new(key, modifiers))
}

/// Runs a command against the editor.
pub fn execute_command(editor: &mut Editor, command: EditorCommand) -> KeyOutcome {
    match command {
        EditorCommand::Key(event) => editor.type_key(&event),
        EditorCommand::InsertText(text) => {
            editor.insert_text(&text);
            KeyOutcome::Handled
        }
        EditorCommand::Undo => {
            editor.undo();
            KeyOutcome::Handled
        }
        EditorCommand::Redo => {
            editor.redo();
            KeyOutcome::Handled
        }
    }
}
