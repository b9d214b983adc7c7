//! Text-editing assistant.
//!
//! Given a keydown, the current document and the current selection, decides
//! whether to intercept the key and which edit replaces the host's default
//! input. Nothing here mutates state; the [`Editor`](crate::Editor) applies the
//! resulting [`Action`] as one atomic, undoable step.

use crate::buffer::{is_indent_char, TextBuffer};
use crate::config::AssistConfig;
use crate::cursor::Selection;
use crate::history::EditOperation;
use crate::key::{Key, KeyEvent};

/// Replace `[start, end)` of the pre-edit document with `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

impl Change {
    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self {
            start: at,
            end: at,
            text: text.into(),
        }
    }

    pub fn delete(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            text: String::new(),
        }
    }

    pub fn replace(start: usize, end: usize, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }
}

/// A set of non-overlapping changes plus the selection that follows them.
///
/// Change offsets all refer to the document before the edit and are kept in
/// ascending order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub changes: Vec<Change>,
    pub selection: Selection,
}

impl Edit {
    pub fn new(changes: Vec<Change>, selection: Selection) -> Self {
        Self { changes, selection }
    }

    pub fn single(change: Change, selection: Selection) -> Self {
        Self::new(vec![change], selection)
    }

    /// Default host behaviour for typed text: replace the selection.
    pub fn replace_selection(selection: Selection, text: &str) -> Self {
        let (start, end) = selection.range();
        let caret = start + text.chars().count();
        Self::single(Change::replace(start, end, text), Selection::new(caret))
    }

    /// Applies the changes back to front, so earlier offsets stay valid, and
    /// returns the primitive operations in execution order.
    pub fn apply(&self, buffer: &mut TextBuffer) -> Vec<EditOperation> {
        let mut ops = Vec::with_capacity(self.changes.len() * 2);
        for change in self.changes.iter().rev() {
            if change.start < change.end {
                let removed = buffer.slice(change.start, change.end);
                buffer.remove(change.start, change.end);
                ops.push(EditOperation::Delete {
                    position: change.start,
                    text: removed,
                });
            }
            if !change.text.is_empty() {
                buffer.insert(change.start, &change.text);
                ops.push(EditOperation::Insert {
                    position: change.start,
                    text: change.text.clone(),
                });
            }
        }
        ops
    }
}

/// What the host should do with a keydown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Not intercepted: the host's default input handling applies.
    Ignore,
    /// Intercepted, but neither document nor selection changes.
    Suppress,
    /// Intercepted; only the selection moves.
    Select(Selection),
    /// Intercepted; the document changes.
    Edit(Edit),
    /// Save shortcut.
    Save,
}

/// Keeps the direction of `original` when building a moved selection.
fn directed(original: Selection, start: usize, end: usize) -> Selection {
    if original.anchor <= original.cursor {
        Selection::with_range(start, end)
    } else {
        Selection::with_range(end, start)
    }
}

/// Keystroke interceptor for auto-indent, bracket matching and line selection.
#[derive(Debug, Clone, Default)]
pub struct Assistant {
    config: AssistConfig,
}

impl Assistant {
    pub fn new(config: AssistConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AssistConfig {
        &self.config
    }

    /// Decides how to handle `event` for the given document and selection.
    pub fn handle(&self, buffer: &TextBuffer, selection: Selection, event: &KeyEvent) -> Action {
        let selection = buffer.snap_selection(selection);
        let mods = event.modifiers;

        match event.key {
            Key::Tab if !mods.has_command() => {
                if mods.shift {
                    self.outdent(buffer, selection)
                } else {
                    self.indent(buffer, selection)
                }
            }
            Key::Enter if !mods.has_command() => self.newline(buffer, selection),
            Key::Char(ch) if mods.primary() && !mods.alt => match ch {
                'l' | 'L' => self.select_line(buffer, selection),
                // Physical S key on a Russian layout.
                's' | 'S' | 'ы' | 'Ы' => Action::Save,
                _ => Action::Ignore,
            },
            Key::Char(ch) if mods.types_text() => self.delimiter(buffer, selection, ch),
            _ => Action::Ignore,
        }
    }

    /// Tab.
    pub fn indent(&self, buffer: &TextBuffer, selection: Selection) -> Action {
        let unit = self.config.indent_unit.as_str();
        let unit_len = self.config.indent_len();
        let (start, end) = selection.range();

        let lines = buffer.touched_lines(start, end);
        if !selection.has_selection() || lines.len() == 1 {
            return Action::Edit(Edit::single(
                Change::replace(start, end, unit),
                Selection::new(start + unit_len),
            ));
        }

        let first_start = buffer.line_start(lines.start);
        let count = lines.len();
        let changes = lines
            .map(|line| Change::insert(buffer.line_start(line), unit))
            .collect();

        // A selection that begins at a line start keeps the new indent inside it.
        let new_start = if start == first_start {
            start
        } else {
            start + unit_len
        };
        let new_end = end + unit_len * count;
        Action::Edit(Edit::new(changes, directed(selection, new_start, new_end)))
    }

    /// Shift+Tab. Only ever removes a whole indent unit from a line start.
    pub fn outdent(&self, buffer: &TextBuffer, selection: Selection) -> Action {
        let unit = self.config.indent_unit.as_str();
        let unit_len = self.config.indent_len();
        let (start, end) = selection.range();

        let removed: Vec<usize> = buffer
            .touched_lines(start, end)
            .filter(|&line| buffer.line_starts_with(line, unit))
            .map(|line| buffer.line_start(line))
            .collect();
        if removed.is_empty() {
            return Action::Suppress;
        }

        let map = |pos: usize| -> usize {
            let shift: usize = removed
                .iter()
                .map(|&line_start| {
                    if pos >= line_start + unit_len {
                        unit_len
                    } else {
                        pos.saturating_sub(line_start)
                    }
                })
                .sum();
            pos - shift
        };

        let changes = removed
            .iter()
            .map(|&line_start| Change::delete(line_start, line_start + unit_len))
            .collect();
        let selection = Selection::with_range(map(selection.anchor), map(selection.cursor));
        Action::Edit(Edit::new(changes, selection))
    }

    /// Enter: empty pair, trailing colon, or plain indentation carry-over.
    pub fn newline(&self, buffer: &TextBuffer, selection: Selection) -> Action {
        let unit = self.config.indent_unit.as_str();
        let unit_len = self.config.indent_len();
        let policy = self.config.enter;
        let (start, end) = selection.range();
        let indent = buffer.indent_before(start);
        let indent_len = indent.chars().count();

        if policy.expand_empty_pair && !selection.has_selection() {
            if let (Some(open), Some(close)) = (buffer.char_before(start), buffer.char_at(start)) {
                if self.config.pairs.is_pair(open, close) {
                    let text = format!("\n{indent}{unit}\n{indent}");
                    let caret = start + 1 + indent_len + unit_len;
                    return Action::Edit(Edit::single(
                        Change::insert(start, text),
                        Selection::new(caret),
                    ));
                }
            }
        }

        if policy.indent_after_colon {
            let line_start = buffer.line_start(buffer.line_of(start));
            let before = buffer.slice(line_start, start);
            let trimmed = before.trim_end_matches(is_indent_char);
            if trimmed.ends_with(':') {
                let after_colon = line_start + trimmed.chars().count();
                let line_end = buffer.line_end(buffer.line_of(end));
                let rest_indent = buffer
                    .slice(end, line_end)
                    .chars()
                    .take_while(|&ch| is_indent_char(ch))
                    .count();
                let text = format!("\n{indent}{unit}");
                let caret = after_colon + 1 + indent_len + unit_len;
                return Action::Edit(Edit::single(
                    Change::replace(after_colon, end + rest_indent, text),
                    Selection::new(caret),
                ));
            }
        }

        let caret = start + 1 + indent_len;
        Action::Edit(Edit::single(
            Change::replace(start, end, format!("\n{indent}")),
            Selection::new(caret),
        ))
    }

    /// Typing an opening or closing delimiter.
    pub fn delimiter(&self, buffer: &TextBuffer, selection: Selection, ch: char) -> Action {
        let pairs = &self.config.pairs;
        let (start, end) = selection.range();
        let next = buffer.char_at(start);

        if let Some(close) = pairs.closing_for(ch) {
            if selection.has_selection() {
                let changes = vec![
                    Change::insert(start, ch.to_string()),
                    Change::insert(end, close.to_string()),
                ];
                return Action::Edit(Edit::new(changes, directed(selection, start + 1, end + 1)));
            }
            if pairs.is_quote(ch) && next == Some(ch) {
                return Action::Select(Selection::new(start + 1));
            }
            return Action::Edit(Edit::single(
                Change::insert(start, format!("{ch}{close}")),
                Selection::new(start + 1),
            ));
        }

        if pairs.is_closing(ch) {
            if !selection.has_selection() && next == Some(ch) {
                return Action::Select(Selection::new(start + 1));
            }
            return Action::Edit(Edit::single(
                Change::replace(start, end, ch.to_string()),
                Selection::new(start + 1),
            ));
        }

        Action::Ignore
    }

    /// Ctrl/Cmd+L: select the caret's line without its separator.
    pub fn select_line(&self, buffer: &TextBuffer, selection: Selection) -> Action {
        let (line_start, line_end) = buffer.line_bounds_at(selection.cursor);
        Action::Select(Selection::with_range(line_start, line_end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EnterPolicy;
    use crate::key::Modifiers;

    /// Runs one keystroke and returns the resulting text and selection.
    fn press(text: &str, selection: Selection, event: KeyEvent) -> (String, Selection) {
        press_with(&Assistant::default(), text, selection, event)
    }

    fn press_with(
        assistant: &Assistant,
        text: &str,
        selection: Selection,
        event: KeyEvent,
    ) -> (String, Selection) {
        let mut buffer = TextBuffer::from_str(text);
        match assistant.handle(&buffer, selection, &event) {
            Action::Edit(edit) => {
                edit.apply(&mut buffer);
                (buffer.to_string(), edit.selection)
            }
            Action::Select(sel) => (buffer.to_string(), sel),
            Action::Suppress => (buffer.to_string(), selection),
            other => panic!("unexpected action {other:?}"),
        }
    }

    fn tab() -> KeyEvent {
        KeyEvent::plain(Key::Tab)
    }

    fn shift_tab() -> KeyEvent {
        KeyEvent::new(Key::Tab, Modifiers::shift())
    }

    fn enter() -> KeyEvent {
        KeyEvent::plain(Key::Enter)
    }

    #[test]
    fn test_tab_inserts_unit_at_caret() {
        let (text, sel) = press("ab", Selection::new(1), tab());
        assert_eq!(text, "a    b");
        assert_eq!(sel, Selection::new(5));
    }

    #[test]
    fn test_tab_replaces_single_line_selection() {
        let (text, sel) = press("hello world", Selection::with_range(0, 5), tab());
        assert_eq!(text, "     world");
        assert_eq!(sel, Selection::new(4));
    }

    #[test]
    fn test_tab_indents_every_touched_line() {
        let (text, sel) = press("one\ntwo\nthree", Selection::with_range(1, 9), tab());
        assert_eq!(text, "    one\n    two\n    three");
        assert_eq!(sel, Selection::with_range(5, 21));
        assert_eq!(&text[5..21], "ne\n    two\n    t");
    }

    #[test]
    fn test_tab_selection_from_line_start_keeps_indent_selected() {
        let (text, sel) = press("a\nb\n", Selection::with_range(0, 3), tab());
        assert_eq!(text, "    a\n    b\n");
        assert_eq!(sel, Selection::with_range(0, 11));
    }

    #[test]
    fn test_tab_keeps_selection_direction() {
        let (_, sel) = press("one\ntwo", Selection::with_range(6, 1), tab());
        assert_eq!(sel, Selection::with_range(14, 5));
    }

    #[test]
    fn test_shift_tab_caret() {
        let (text, sel) = press("    foo", Selection::new(6), shift_tab());
        assert_eq!(text, "foo");
        assert_eq!(sel, Selection::new(2));

        // Caret inside the removed prefix clamps to the line start.
        let (text, sel) = press("x\n    foo", Selection::new(4), shift_tab());
        assert_eq!(text, "x\nfoo");
        assert_eq!(sel, Selection::new(2));
    }

    #[test]
    fn test_shift_tab_never_removes_partial_indent() {
        let assistant = Assistant::default();
        let buffer = TextBuffer::from_str("  foo");
        assert_eq!(
            assistant.handle(&buffer, Selection::new(3), &shift_tab()),
            Action::Suppress
        );
    }

    #[test]
    fn test_shift_tab_single_line_selection() {
        let (text, sel) = press("    foo bar", Selection::with_range(6, 9), shift_tab());
        assert_eq!(text, "foo bar");
        assert_eq!(sel, Selection::with_range(2, 5));
    }

    #[test]
    fn test_shift_tab_selection_skips_unindented_lines() {
        let text = "    a\n  b\n        c";
        let (out, sel) = press(text, Selection::with_range(5, 19), shift_tab());
        assert_eq!(out, "a\n  b\n    c");
        assert_eq!(sel, Selection::with_range(1, 11));
    }

    #[test]
    fn test_indent_outdent_round_trip_in_leading_whitespace() {
        for text in ["foo", "  foo", "x\n bar\ny", "\n\n"] {
            let buffer = TextBuffer::from_str(text);
            for caret in 0..=buffer.len_chars() {
                let line = buffer.line_of(caret);
                let in_indent = buffer.slice(buffer.line_start(line), caret).chars().all(is_indent_char);
                if !in_indent || buffer.line_starts_with(line, "    ") {
                    continue;
                }
                let (indented, sel) = press(text, Selection::new(caret), tab());
                let (restored, sel) = press(&indented, sel, shift_tab());
                assert_eq!(restored, text, "caret {caret}");
                assert_eq!(sel, Selection::new(caret), "caret {caret}");
            }
        }
    }

    #[test]
    fn test_multi_line_indent_outdent_round_trip() {
        let text = "fn a() {\nb();\n  c();\n}";
        let original = Selection::with_range(3, 17);
        let (indented, sel) = press(text, original, tab());
        let buffer = TextBuffer::from_str(&indented);
        for line in buffer.touched_lines(sel.start(), sel.end()) {
            assert!(buffer.line_starts_with(line, "    "));
        }
        assert_eq!(buffer.touched_lines(sel.start(), sel.end()).len(), 3);

        let (restored, sel) = press(&indented, sel, shift_tab());
        assert_eq!(restored, text);
        assert_eq!(sel, original);
    }

    #[test]
    fn test_enter_expands_empty_braces() {
        let (text, sel) = press("func() {}", Selection::new(8), enter());
        assert_eq!(text, "func() {\n    \n}");
        assert_eq!(sel, Selection::new(13));
    }

    #[test]
    fn test_enter_expands_pair_with_indent() {
        let (text, sel) = press("  f({})", Selection::new(5), enter());
        assert_eq!(text, "  f({\n      \n  })");
        assert_eq!(sel, Selection::new(12));
    }

    #[test]
    fn test_enter_expands_empty_quotes() {
        let (text, sel) = press("x = ''", Selection::new(5), enter());
        assert_eq!(text, "x = '\n    \n'");
        assert_eq!(sel, Selection::new(10));
    }

    #[test]
    fn test_enter_after_colon() {
        let (text, sel) = press("if x:", Selection::new(5), enter());
        assert_eq!(text, "if x:\n    ");
        assert_eq!(sel, Selection::new(10));
    }

    #[test]
    fn test_enter_after_colon_moves_trimmed_remainder() {
        let (text, sel) = press("label:   rest", Selection::new(9), enter());
        assert_eq!(text, "label:\n    rest");
        assert_eq!(sel, Selection::new(11));

        let (text, sel) = press("  def f():  pass\nx", Selection::new(11), enter());
        assert_eq!(text, "  def f():\n      pass\nx");
        assert_eq!(sel, Selection::new(17));
    }

    #[test]
    fn test_enter_after_colon_replaces_multi_line_selection() {
        let (text, sel) = press("if x:\nfoo\nbar", Selection::with_range(8, 5), enter());
        assert_eq!(text, "if x:\n    o\nbar");
        assert_eq!(sel, Selection::new(10));
    }

    #[test]
    fn test_enter_carries_indentation() {
        let (text, sel) = press("    let x = 1;", Selection::new(14), enter());
        assert_eq!(text, "    let x = 1;\n    ");
        assert_eq!(sel, Selection::new(19));
    }

    #[test]
    fn test_enter_replaces_selection() {
        let (text, sel) = press("\tab cd", Selection::with_range(3, 4), enter());
        assert_eq!(text, "\tab\n\tcd");
        assert_eq!(sel, Selection::new(5));
    }

    #[test]
    fn test_enter_policies_can_be_disabled() {
        let mut config = AssistConfig::default();
        config.enter = EnterPolicy {
            expand_empty_pair: false,
            indent_after_colon: false,
        };
        let assistant = Assistant::new(config);
        let (text, sel) = press_with(&assistant, "{}", Selection::new(1), enter());
        assert_eq!(text, "{\n}");
        assert_eq!(sel, Selection::new(2));
        let (text, _) = press_with(&assistant, "if x:", Selection::new(5), enter());
        assert_eq!(text, "if x:\n");
    }

    #[test]
    fn test_open_paren_then_type_over() {
        let (text, sel) = press("f", Selection::new(1), KeyEvent::char('('));
        assert_eq!(text, "f()");
        assert_eq!(sel, Selection::new(2));

        let (text, sel) = press(&text, sel, KeyEvent::char(')'));
        assert_eq!(text, "f()");
        assert_eq!(sel, Selection::new(3));
    }

    #[test]
    fn test_closing_inserted_when_not_next() {
        let (text, sel) = press("a", Selection::new(1), KeyEvent::char(']'));
        assert_eq!(text, "a]");
        assert_eq!(sel, Selection::new(2));
    }

    #[test]
    fn test_wrap_selection() {
        let (text, sel) = press("say hi now", Selection::with_range(4, 6), KeyEvent::char('['));
        assert_eq!(text, "say [hi] now");
        assert_eq!(sel, Selection::with_range(5, 7));

        let (text, sel) = press("say hi now", Selection::with_range(6, 4), KeyEvent::char('"'));
        assert_eq!(text, "say \"hi\" now");
        assert_eq!(sel, Selection::with_range(7, 5));
    }

    #[test]
    fn test_quotes_pair_and_type_over() {
        let (text, sel) = press("", Selection::new(0), KeyEvent::char('\''));
        assert_eq!(text, "''");
        assert_eq!(sel, Selection::new(1));

        let (text, sel) = press(&text, sel, KeyEvent::char('\''));
        assert_eq!(text, "''");
        assert_eq!(sel, Selection::new(2));
    }

    #[test]
    fn test_plain_characters_are_ignored() {
        let assistant = Assistant::default();
        let buffer = TextBuffer::from_str("abc");
        assert_eq!(
            assistant.handle(&buffer, Selection::new(1), &KeyEvent::char('x')),
            Action::Ignore
        );
        assert_eq!(
            assistant.handle(&buffer, Selection::new(1), &KeyEvent::new(Key::Char('('), Modifiers::ctrl())),
            Action::Ignore
        );
        assert_eq!(
            assistant.handle(&buffer, Selection::new(1), &KeyEvent::new(Key::Tab, Modifiers::ctrl())),
            Action::Ignore
        );
    }

    #[test]
    fn test_select_line() {
        let text = "first\nsecond line\nthird";
        let ctrl_l = KeyEvent::new(Key::Char('l'), Modifiers::ctrl());
        let (_, sel) = press(text, Selection::new(9), ctrl_l);
        assert_eq!(sel, Selection::with_range(6, 17));

        // Idempotent.
        let (_, again) = press(text, sel, ctrl_l);
        assert_eq!(again, sel);

        let cmd_l = KeyEvent::new(Key::Char('l'), Modifiers::meta());
        let (_, sel) = press(text, Selection::new(23), cmd_l);
        assert_eq!(sel, Selection::with_range(18, 23));
    }

    #[test]
    fn test_save_shortcut_any_layout() {
        let assistant = Assistant::default();
        let buffer = TextBuffer::new();
        for ch in ['s', 'S', 'ы'] {
            let event = KeyEvent::new(Key::Char(ch), Modifiers::ctrl());
            assert_eq!(assistant.handle(&buffer, Selection::new(0), &event), Action::Save);
        }
    }

    #[test]
    fn test_caret_inside_crlf_is_snapped() {
        let (text, sel) = press("ab\r\ncd", Selection::new(3), tab());
        assert_eq!(text, "ab    \r\ncd");
        assert_eq!(sel, Selection::new(6));
        assert_eq!(TextBuffer::from_str(&text).len_lines(), 2);
    }

    #[test]
    fn test_alt_graph_characters_are_typed() {
        // AltGr arrives as ctrl+alt on Windows.
        let alt_graph = Modifiers {
            ctrl: true,
            alt: true,
            ..Modifiers::NONE
        };
        let (text, sel) = press("f", Selection::new(1), KeyEvent::new(Key::Char('{'), alt_graph));
        assert_eq!(text, "f{}");
        assert_eq!(sel, Selection::new(2));
    }

    #[test]
    fn test_out_of_range_selection_is_clamped() {
        let (text, sel) = press("ab", Selection::with_range(1, 50), KeyEvent::char('('));
        assert_eq!(text, "a(b)");
        assert_eq!(sel, Selection::with_range(2, 3));
    }
}
