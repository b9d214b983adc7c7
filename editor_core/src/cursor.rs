//! Caret and selection handling.

/// A text selection with an anchor and a caret position.
/// When anchor == cursor there is no active selection, only a caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    /// The anchor point (where selection started).
    pub anchor: usize,
    /// The caret position (where selection ends).
    pub cursor: usize,
}

impl Selection {
    /// Creates a caret at the given position.
    pub fn new(pos: usize) -> Self {
        Self {
            anchor: pos,
            cursor: pos,
        }
    }

    /// Creates a selection from anchor to cursor.
    pub fn with_range(anchor: usize, cursor: usize) -> Self {
        Self { anchor, cursor }
    }

    /// Returns true if there's an active selection (anchor != cursor).
    pub fn has_selection(&self) -> bool {
        self.anchor != self.cursor
    }

    /// Returns the start and end of the selection (ordered).
    pub fn range(&self) -> (usize, usize) {
        if self.anchor <= self.cursor {
            (self.anchor, self.cursor)
        } else {
            (self.cursor, self.anchor)
        }
    }

    pub fn start(&self) -> usize {
        self.range().0
    }

    pub fn end(&self) -> usize {
        self.range().1
    }

    /// Returns the selection pulled back inside `[0, len]`.
    ///
    /// A reversed selection keeps its direction; only out-of-range offsets move.
    pub fn clamped(self, len: usize) -> Self {
        Self {
            anchor: self.anchor.min(len),
            cursor: self.cursor.min(len),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_range() {
        let sel = Selection::with_range(10, 5);
        assert_eq!(sel.range(), (5, 10));
        assert!(sel.has_selection());
        assert!(!Selection::new(3).has_selection());
    }

    #[test]
    fn test_clamped() {
        let sel = Selection::with_range(12, 40).clamped(20);
        assert_eq!(sel.range(), (12, 20));
        let caret = Selection::new(99).clamped(4);
        assert_eq!(caret, Selection::new(4));
    }
}
