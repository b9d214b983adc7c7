//! Document buffer backed by ropey.
//!
//! The rope keeps its own line-start index, so every line query below is a
//! lookup rather than a rescan of the whole document.

use crate::cursor::Selection;
use ropey::Rope;
use std::fs;
use std::io::{self, BufReader};
use std::ops::Range;
use std::path::Path;

/// Returns true for characters that count as indentation.
pub fn is_indent_char(ch: char) -> bool {
    ch == ' ' || ch == '\t'
}

/// The editable document of one editor instance.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    rope: Rope,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBuffer {
    /// Creates a new empty text buffer.
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Creates a text buffer from a string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Loads a text buffer from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = fs::File::open(path)?;
        let rope = Rope::from_reader(BufReader::new(file))?;
        Ok(Self { rope })
    }

    /// Returns the total number of characters in the buffer.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Returns the total number of lines in the buffer.
    /// An empty buffer, or one ending in a separator, still has a last (empty) line.
    pub fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Inserts a string at the given character index (clamped to the buffer end).
    pub fn insert(&mut self, char_idx: usize, text: &str) {
        let idx = char_idx.min(self.len_chars());
        self.rope.insert(idx, text);
    }

    /// Removes text in the given character range.
    pub fn remove(&mut self, start: usize, end: usize) {
        let start = start.min(self.len_chars());
        let end = end.min(self.len_chars());
        if start < end {
            self.rope.remove(start..end);
        }
    }

    /// Returns the character at the given index, if it exists.
    pub fn char_at(&self, char_idx: usize) -> Option<char> {
        if char_idx < self.len_chars() {
            Some(self.rope.char(char_idx))
        } else {
            None
        }
    }

    /// Returns the character just before `char_idx`.
    pub fn char_before(&self, char_idx: usize) -> Option<char> {
        char_idx.checked_sub(1).and_then(|idx| self.char_at(idx))
    }

    /// Returns the text in `[start, end)`, clamped to the buffer.
    pub fn slice(&self, start: usize, end: usize) -> String {
        let end = end.min(self.len_chars());
        let start = start.min(end);
        self.rope.slice(start..end).to_string()
    }

    /// Clamps `char_idx` to the buffer and moves it off the inside of a
    /// `\r\n` pair, onto the `\r`.
    pub fn snap(&self, char_idx: usize) -> usize {
        let char_idx = char_idx.min(self.len_chars());
        if self.char_before(char_idx) == Some('\r') && self.char_at(char_idx) == Some('\n') {
            char_idx - 1
        } else {
            char_idx
        }
    }

    /// Returns `selection` with both ends passed through [`snap`](Self::snap).
    pub fn snap_selection(&self, selection: Selection) -> Selection {
        Selection::with_range(self.snap(selection.anchor), self.snap(selection.cursor))
    }

    /// Returns the line containing the given character index.
    pub fn line_of(&self, char_idx: usize) -> usize {
        self.rope.char_to_line(char_idx.min(self.len_chars()))
    }

    /// Returns the character index of the start of a line.
    pub fn line_start(&self, line: usize) -> usize {
        if line >= self.len_lines() {
            self.len_chars()
        } else {
            self.rope.line_to_char(line)
        }
    }

    /// Returns the character index of the end of a line, before its separator.
    pub fn line_end(&self, line: usize) -> usize {
        if line >= self.len_lines() {
            return self.len_chars();
        }
        let slice = self.rope.line(line);
        let mut len = slice.len_chars();
        if len > 0 && slice.char(len - 1) == '\n' {
            len -= 1;
        }
        if len > 0 && slice.char(len - 1) == '\r' {
            len -= 1;
        }
        self.rope.line_to_char(line) + len
    }

    /// Returns the length of a line in characters (excluding its separator).
    pub fn line_len_chars(&self, line: usize) -> usize {
        self.line_end(line) - self.line_start(line)
    }

    /// Returns `(start, end)` of the line containing `char_idx`.
    pub fn line_bounds_at(&self, char_idx: usize) -> (usize, usize) {
        let line = self.line_of(char_idx);
        (self.line_start(line), self.line_end(line))
    }

    /// Returns the lines touched by the closed interval `[start, end]`.
    ///
    /// A line is touched when `start <= line_end` and `end >= line_start`, so a
    /// selection ending exactly at a line start still touches that line.
    pub fn touched_lines(&self, start: usize, end: usize) -> Range<usize> {
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        self.line_of(start)..self.line_of(end) + 1
    }

    /// Returns true if the line begins with `prefix`.
    pub fn line_starts_with(&self, line: usize, prefix: &str) -> bool {
        let start = self.line_start(line);
        let len = prefix.chars().count();
        start + len <= self.line_end(line) && self.slice(start, start + len) == prefix
    }

    /// Returns the run of spaces and tabs that opens the line containing
    /// `char_idx`, cut off at `char_idx` itself.
    pub fn indent_before(&self, char_idx: usize) -> String {
        let char_idx = char_idx.min(self.len_chars());
        let (start, _) = self.line_bounds_at(char_idx);
        self.rope
            .slice(start..char_idx)
            .chars()
            .take_while(|&ch| is_indent_char(ch))
            .collect()
    }

    /// Returns the entire buffer as a string.
    #[allow(clippy::inherent_to_string)]
    pub fn to_string(&self) -> String {
        self.rope.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer() {
        let buf = TextBuffer::new();
        assert!(buf.is_empty());
        assert_eq!(buf.len_chars(), 0);
        assert_eq!(buf.len_lines(), 1);
    }

    #[test]
    fn test_insert_and_remove() {
        let mut buf = TextBuffer::new();
        buf.insert(0, "hello");
        buf.insert(99, " world");
        assert_eq!(buf.to_string(), "hello world");
        buf.remove(5, 11);
        assert_eq!(buf.to_string(), "hello");
        buf.remove(3, 2);
        assert_eq!(buf.to_string(), "hello");
    }

    #[test]
    fn test_line_bounds() {
        let buf = TextBuffer::from_str("abc\ndefgh\n");
        assert_eq!(buf.len_lines(), 3);
        assert_eq!(buf.line_bounds_at(0), (0, 3));
        assert_eq!(buf.line_bounds_at(3), (0, 3));
        assert_eq!(buf.line_bounds_at(4), (4, 9));
        assert_eq!(buf.line_bounds_at(10), (10, 10));
        assert_eq!(buf.line_len_chars(1), 5);
    }

    #[test]
    fn test_crlf_line_end() {
        let buf = TextBuffer::from_str("ab\r\ncd");
        assert_eq!(buf.len_lines(), 2);
        assert_eq!(buf.line_end(0), 2);
        assert_eq!(buf.line_start(1), 4);
        assert_eq!(buf.slice(0, buf.line_end(0)), "ab");
    }

    #[test]
    fn test_snap_out_of_crlf() {
        let buf = TextBuffer::from_str("ab\r\ncd");
        assert_eq!(buf.snap(3), 2);
        assert_eq!(buf.snap(2), 2);
        assert_eq!(buf.snap(4), 4);
        assert_eq!(buf.snap(50), 6);
        assert_eq!(
            buf.snap_selection(Selection::with_range(3, 5)),
            Selection::with_range(2, 5)
        );
    }

    #[test]
    fn test_touched_lines() {
        let buf = TextBuffer::from_str("one\ntwo\nthree");
        assert_eq!(buf.touched_lines(1, 1), 0..1);
        assert_eq!(buf.touched_lines(1, 5), 0..2);
        // Ending exactly at the start of "three" still touches it.
        assert_eq!(buf.touched_lines(0, 8), 0..3);
        assert_eq!(buf.touched_lines(8, 0), 0..3);
    }

    #[test]
    fn test_indent_before() {
        let buf = TextBuffer::from_str("x\n  \tfoo  bar");
        assert_eq!(buf.indent_before(12), "  \t");
        assert_eq!(buf.indent_before(3), " ");
        assert_eq!(buf.indent_before(1), "");
    }

    #[test]
    fn test_line_starts_with() {
        let buf = TextBuffer::from_str("    a\n  b\n");
        assert!(buf.line_starts_with(0, "    "));
        assert!(!buf.line_starts_with(1, "    "));
        assert!(!buf.line_starts_with(2, "    "));
    }

    #[test]
    fn test_char_before() {
        let buf = TextBuffer::from_str("{}");
        assert_eq!(buf.char_before(1), Some('{'));
        assert_eq!(buf.char_before(0), None);
        assert_eq!(buf.char_at(2), None);
    }
}
