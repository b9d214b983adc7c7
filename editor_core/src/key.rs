//! Platform-independent keydown events.

/// Logical key identifier of a keydown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Tab,
    Enter,
    /// A printable character as produced by the active keyboard layout.
    Char(char),
    /// Any key the assistant never intercepts (arrows, function keys, ...).
    Other,
}

/// Modifier flags held during a keydown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        shift: false,
        alt: false,
        meta: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    pub fn meta() -> Self {
        Self {
            meta: true,
            ..Self::NONE
        }
    }

    /// Ctrl on Linux/Windows, Cmd on macOS; either one counts.
    pub fn primary(&self) -> bool {
        self.ctrl || self.meta
    }

    /// Ctrl+Alt without Meta, which is how AltGr is reported on Windows.
    pub fn is_alt_graph(&self) -> bool {
        self.ctrl && self.alt && !self.meta
    }

    /// True when a modifier that turns a key into a shortcut is held.
    pub fn has_command(&self) -> bool {
        self.ctrl || self.alt || self.meta
    }

    /// Whether a character key with these modifiers produces text.
    pub fn types_text(&self) -> bool {
        !self.has_command() || self.is_alt_graph()
    }
}

/// A keydown event as seen by the editing assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// A key pressed without modifiers.
    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    pub fn char(ch: char) -> Self {
        Self::plain(Key::Char(ch))
    }
}
