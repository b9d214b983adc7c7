//! Main editor logic.

use crate::assist::{Action, Assistant, Edit};
use crate::buffer::TextBuffer;
use crate::config::AssistConfig;
use crate::cursor::Selection;
use crate::history::{EditOperation, History, RevisionKind};
use crate::key::{Key, KeyEvent};
use crate::observer::{ChangeEvent, ChangeListener};
use crate::paste::{self, PasteError, PasteStore};
use std::io;
use std::path::{Path, PathBuf};

/// How the host should treat a keydown after the editor has seen it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Not intercepted; the host applies its default input.
    Ignored,
    /// Intercepted; the default action must be suppressed.
    Handled,
    /// Save shortcut; the host should run the save flow.
    SaveRequested,
}

/// One editor instance: document, selection, history and observers.
///
/// Note: Does not derive Debug because listeners are trait objects.
pub struct Editor {
    /// The text buffer.
    buffer: TextBuffer,
    /// The selection, always within the buffer.
    selection: Selection,
    /// Undo/redo history.
    history: History,
    assistant: Assistant,
    listeners: Vec<Box<dyn ChangeListener>>,
    /// Bumped on every document mutation.
    revision: u64,
    /// Current file path, if any.
    file_path: Option<PathBuf>,
    /// Whether the buffer has changes since it was loaded or saved.
    modified: bool,
    /// A paste save is running for this editor.
    saving: bool,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    /// Creates a new empty editor with the default assistant.
    pub fn new() -> Self {
        Self::with_config(AssistConfig::default())
    }

    pub fn with_config(config: AssistConfig) -> Self {
        Self {
            buffer: TextBuffer::new(),
            selection: Selection::default(),
            history: History::default(),
            assistant: Assistant::new(config),
            listeners: Vec::new(),
            revision: 0,
            file_path: None,
            modified: false,
            saving: false,
        }
    }

    /// Opens a file in the editor. The caret goes to the end of the text.
    pub fn open_file<P: AsRef<Path>>(&mut self, path: P) -> io::Result<()> {
        let path = path.as_ref();
        self.buffer = TextBuffer::from_file(path)?;
        self.selection = Selection::new(self.buffer.len_chars());
        self.history.clear();
        self.file_path = Some(path.to_path_buf());
        self.modified = false;
        self.revision += 1;
        log::debug!(
            "Opened {} ({} chars)",
            path.display(),
            self.buffer.len_chars()
        );
        self.notify();
        Ok(())
    }

    /// Returns the current file path.
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Returns whether the buffer has unsaved changes.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Returns a reference to the buffer.
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn assistant(&self) -> &Assistant {
        &self.assistant
    }

    /// Returns the full document.
    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Moves the selection. Offsets are clamped and never split a `\r\n` pair.
    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = self.buffer.snap_selection(selection);
    }

    /// Registers an observer notified after every document mutation.
    pub fn add_listener(&mut self, listener: Box<dyn ChangeListener>) {
        self.listeners.push(listener);
    }

    /// Replaces the whole document, as a host writing to the input would.
    ///
    /// The replacement is one undoable step; the caret goes to the end.
    pub fn set_text(&mut self, text: &str) {
        let len = self.buffer.len_chars();
        let mut ops = Vec::with_capacity(2);
        if len > 0 {
            ops.push(EditOperation::Delete {
                position: 0,
                text: self.buffer.to_string(),
            });
        }
        if !text.is_empty() {
            ops.push(EditOperation::Insert {
                position: 0,
                text: text.to_string(),
            });
        }
        if ops.is_empty() {
            return;
        }
        self.buffer = TextBuffer::from_str(text);
        let before = self.selection;
        self.selection = Selection::new(self.buffer.len_chars());
        self.commit(ops, before, RevisionKind::Assist);
    }

    /// Host default input: replaces the selection with `text`.
    pub fn insert_text(&mut self, text: &str) {
        if text.is_empty() && !self.selection.has_selection() {
            return;
        }
        let edit = Edit::replace_selection(self.selection, text);
        self.apply(&edit, RevisionKind::Typing);
    }

    /// Feeds one keydown through the assistant.
    pub fn handle_key(&mut self, event: &KeyEvent) -> KeyOutcome {
        self.selection = self.buffer.snap_selection(self.selection);
        let action = self.assistant.handle(&self.buffer, self.selection, event);
        log::debug!("{:?} -> {:?}", event.key, action);

        match action {
            Action::Ignore => KeyOutcome::Ignored,
            Action::Suppress => KeyOutcome::Handled,
            Action::Select(selection) => {
                self.set_selection(selection);
                KeyOutcome::Handled
            }
            Action::Edit(edit) => {
                self.apply(&edit, RevisionKind::Assist);
                KeyOutcome::Handled
            }
            Action::Save => KeyOutcome::SaveRequested,
        }
    }

    /// Feeds a keydown and, when it is not intercepted, performs the host's
    /// default input for printable keys.
    pub fn type_key(&mut self, event: &KeyEvent) -> KeyOutcome {
        let outcome = self.handle_key(event);
        if outcome != KeyOutcome::Ignored {
            return outcome;
        }
        let mods = event.modifiers;
        match event.key {
            Key::Char(ch) if mods.types_text() => self.insert_text(ch.encode_utf8(&mut [0; 4])),
            Key::Enter if !mods.has_command() => self.insert_text("\n"),
            Key::Tab if !mods.has_command() => self.insert_text("\t"),
            _ => {}
        }
        outcome
    }

    /// Undoes the last revision.
    pub fn undo(&mut self) -> bool {
        let Some((ops, selection)) = self.history.undo() else {
            return false;
        };
        self.replay(&ops, selection);
        true
    }

    /// Redoes the last undone revision.
    pub fn redo(&mut self) -> bool {
        let Some((ops, selection)) = self.history.redo() else {
            return false;
        };
        self.replay(&ops, selection);
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history_mut(&mut self) -> &mut History {
        &mut self.history
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Starts a save and returns the document to send.
    ///
    /// Returns `None` while an earlier save of this editor has not finished,
    /// so a repeated shortcut does not create a second paste.
    pub fn begin_save(&mut self) -> Option<String> {
        if self.saving {
            log::debug!("Save already in progress, ignoring");
            return None;
        }
        self.saving = true;
        Some(self.buffer.to_string())
    }

    /// Ends the save started by [`begin_save`](Self::begin_save).
    pub fn finish_save(&mut self, result: &Result<String, PasteError>) {
        self.saving = false;
        match result {
            Ok(_) => self.modified = false,
            Err(e) => log::warn!("Save failed: {}", e),
        }
    }

    /// Saves the document as a new paste and returns the page to open.
    ///
    /// Returns `Ok(None)` when a save of this editor is already running.
    pub fn save_with(&mut self, store: &mut dyn PasteStore) -> Result<Option<String>, PasteError> {
        let Some(code) = self.begin_save() else {
            return Ok(None);
        };
        let result = paste::save_paste(store, &code);
        self.finish_save(&result);
        result.map(Some)
    }

    fn apply(&mut self, edit: &Edit, kind: RevisionKind) {
        let before = self.selection;
        let ops = edit.apply(&mut self.buffer);
        self.selection = edit.selection.clamped(self.buffer.len_chars());
        if ops.is_empty() {
            return;
        }
        self.commit(ops, before, kind);
    }

    fn replay(&mut self, ops: &[EditOperation], selection: Selection) {
        for op in ops {
            op.apply(&mut self.buffer);
        }
        self.selection = selection.clamped(self.buffer.len_chars());
        self.modified = true;
        self.revision += 1;
        self.notify();
    }

    fn commit(&mut self, ops: Vec<EditOperation>, before: Selection, kind: RevisionKind) {
        self.history.record(ops, before, self.selection, kind);
        self.modified = true;
        self.revision += 1;
        self.notify();
    }

    fn notify(&mut self) {
        if self.listeners.is_empty() {
            return;
        }
        let text = self.buffer.to_string();
        let event = ChangeEvent {
            text: &text,
            selection: self.selection,
            revision: self.revision,
        };
        for listener in &mut self.listeners {
            listener.on_change(&event);
        }
    }
}
