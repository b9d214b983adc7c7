//! Change notification for observers of one editor (counter, highlighter).

use crate::cursor::Selection;
use std::cell::RefCell;
use std::rc::Rc;

/// Emitted once after every document mutation.
#[derive(Debug, Clone, Copy)]
pub struct ChangeEvent<'a> {
    /// The full document as it is now.
    pub text: &'a str,
    pub selection: Selection,
    /// Increases by one with every mutation of this editor.
    pub revision: u64,
}

pub trait ChangeListener {
    fn on_change(&mut self, event: &ChangeEvent<'_>);
}

/// Lets the host keep a handle on a listener it registered.
impl<L: ChangeListener> ChangeListener for Rc<RefCell<L>> {
    fn on_change(&mut self, event: &ChangeEvent<'_>) {
        self.borrow_mut().on_change(event);
    }
}

/// Formats a character count the way the page shows it.
pub fn count_label(count: usize) -> String {
    format!("{count} character{}", if count == 1 { "" } else { "s" })
}

/// Keeps the character count of the document.
#[derive(Debug, Clone, Default)]
pub struct CharacterCounter {
    count: usize,
}

impl CharacterCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn label(&self) -> String {
        count_label(self.count)
    }
}

impl ChangeListener for CharacterCounter {
    fn on_change(&mut self, event: &ChangeEvent<'_>) {
        self.count = event.text.chars().count();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_label() {
        assert_eq!(count_label(0), "0 characters");
        assert_eq!(count_label(1), "1 character");
        assert_eq!(count_label(42), "42 characters");
    }

    #[test]
    fn test_counter_counts_chars() {
        let counter = Rc::new(RefCell::new(CharacterCounter::new()));
        let mut listener = counter.clone();
        listener.on_change(&ChangeEvent {
            text: "héllo",
            selection: Selection::new(0),
            revision: 1,
        });
        assert_eq!(counter.borrow().count(), 5);
        assert_eq!(counter.borrow().label(), "5 characters");
    }
}
