//! Undo/Redo history.
//!
//! Every assistant keystroke becomes exactly one revision. Plain typing may be
//! folded into the previous revision so one undo removes a typed word rather
//! than a single character.

use crate::buffer::TextBuffer;
use crate::cursor::Selection;
use std::time::{Duration, Instant};

/// Default time window for coalescing typed characters (in milliseconds).
const COALESCE_WINDOW_MS: u64 = 300;

/// A primitive buffer mutation, positioned as of the moment it ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOperation {
    Insert { position: usize, text: String },
    Delete { position: usize, text: String },
}

impl EditOperation {
    /// Returns the inverse operation (for undo).
    pub fn inverse(&self) -> EditOperation {
        match self {
            EditOperation::Insert { position, text } => EditOperation::Delete {
                position: *position,
                text: text.clone(),
            },
            EditOperation::Delete { position, text } => EditOperation::Insert {
                position: *position,
                text: text.clone(),
            },
        }
    }

    pub fn apply(&self, buffer: &mut TextBuffer) {
        match self {
            EditOperation::Insert { position, text } => buffer.insert(*position, text),
            EditOperation::Delete { position, text } => {
                buffer.remove(*position, *position + text.chars().count())
            }
        }
    }
}

/// Where a revision came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevisionKind {
    /// Host default input (typed characters, pasted text).
    Typing,
    /// An intercepted keystroke. Never merged with neighbours.
    Assist,
}

/// A group of operations undone and redone together.
#[derive(Debug, Clone)]
pub struct Revision {
    /// Operations in order of execution.
    pub operations: Vec<EditOperation>,
    pub selection_before: Selection,
    pub selection_after: Selection,
    pub kind: RevisionKind,
    recorded_at: Instant,
}

impl Revision {
    /// Returns true if `next` continues the typing run of this revision.
    fn can_absorb(&self, next: &Revision, window: Duration) -> bool {
        if self.kind != RevisionKind::Typing || next.kind != RevisionKind::Typing {
            return false;
        }
        if self.recorded_at.elapsed() >= window {
            return false;
        }
        match (self.operations.last(), next.operations.as_slice()) {
            (
                Some(EditOperation::Insert { position: pos1, text: text1 }),
                [EditOperation::Insert { position: pos2, text: text2 }],
            ) => {
                text2.chars().count() == 1
                    && *pos2 == *pos1 + text1.chars().count()
                    && !text1.ends_with('\n')
            }
            _ => false,
        }
    }
}

/// Manages undo/redo history.
#[derive(Debug)]
pub struct History {
    undo_stack: Vec<Revision>,
    redo_stack: Vec<Revision>,
    /// Maximum number of undo levels.
    max_size: usize,
    coalesce_window: Duration,
}

impl Default for History {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl History {
    /// Creates a new history with the given maximum size.
    pub fn new(max_size: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_size: max_size.max(1),
            coalesce_window: Duration::from_millis(COALESCE_WINDOW_MS),
        }
    }

    pub fn set_coalesce_window(&mut self, window: Duration) {
        self.coalesce_window = window;
    }

    /// Records one applied edit. Empty operation lists are dropped.
    pub fn record(
        &mut self,
        operations: Vec<EditOperation>,
        selection_before: Selection,
        selection_after: Selection,
        kind: RevisionKind,
    ) {
        if operations.is_empty() {
            return;
        }
        let revision = Revision {
            operations,
            selection_before,
            selection_after,
            kind,
            recorded_at: Instant::now(),
        };
        self.redo_stack.clear();

        if let Some(last) = self.undo_stack.last_mut() {
            if last.can_absorb(&revision, self.coalesce_window) {
                last.operations.extend(revision.operations);
                last.selection_after = revision.selection_after;
                last.recorded_at = revision.recorded_at;
                return;
            }
        }

        self.undo_stack.push(revision);
        if self.undo_stack.len() > self.max_size {
            let excess = self.undo_stack.len() - self.max_size;
            self.undo_stack.drain(..excess);
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Pops the last revision for undo.
    /// Returns the inverse operations to run and the selection to restore.
    pub fn undo(&mut self) -> Option<(Vec<EditOperation>, Selection)> {
        let revision = self.undo_stack.pop()?;
        let ops = revision
            .operations
            .iter()
            .rev()
            .map(EditOperation::inverse)
            .collect();
        let selection = revision.selection_before;
        self.redo_stack.push(revision);
        Some((ops, selection))
    }

    /// Pops the last undone revision for redo.
    pub fn redo(&mut self) -> Option<(Vec<EditOperation>, Selection)> {
        let revision = self.redo_stack.pop()?;
        let ops = revision.operations.clone();
        let selection = revision.selection_after;
        self.undo_stack.push(revision);
        Some((ops, selection))
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }
}
