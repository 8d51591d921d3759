//! Editable source buffer for the left pane.
//!
//! A plain line-oriented text buffer with a (row, column) cursor. The column
//! is a character index; conversion to a byte offset happens only at the edit
//! point so multi-byte input cannot split a code point.
//!
//! Key handling deliberately consumes only unmodified and Shift-modified
//! keys. Everything carrying Ctrl or Alt falls through to the global dispatch
//! table, which keeps the section shortcuts working while the editor is
//! focused.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Indentation inserted by Tab and stripped by Shift+Tab.
pub const INDENT_UNIT: &str = "    ";

/// Line buffer with a character-addressed cursor.
pub struct SourceEditor {
    lines: Vec<String>,
    cursor_row: usize,
    cursor_col: usize,
    /// Viewport scroll offset in lines.
    pub scroll: usize,
    dirty: bool,
}

fn byte_index(line: &str, char_col: usize) -> usize {
    line.char_indices()
        .nth(char_col)
        .map(|(i, _)| i)
        .unwrap_or(line.len())
}

impl SourceEditor {
    pub fn new(text: &str) -> Self {
        let mut lines: Vec<String> = text.lines().map(str::to_string).collect();
        if lines.is_empty() {
            lines.push(String::new());
        }
        Self {
            lines,
            cursor_row: 0,
            cursor_col: 0,
            scroll: 0,
            dirty: false,
        }
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor_row, self.cursor_col)
    }

    /// Buffer changed since the last compile.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    fn current_line(&self) -> &str {
        &self.lines[self.cursor_row]
    }

    fn line_char_len(&self, row: usize) -> usize {
        self.lines[row].chars().count()
    }

    fn clamp_col(&mut self) {
        let len = self.line_char_len(self.cursor_row);
        if self.cursor_col > len {
            self.cursor_col = len;
        }
    }

    fn insert_char(&mut self, c: char) {
        let at = byte_index(self.current_line(), self.cursor_col);
        self.lines[self.cursor_row].insert(at, c);
        self.cursor_col += 1;
        self.dirty = true;
    }

    fn insert_str(&mut self, s: &str) {
        let at = byte_index(self.current_line(), self.cursor_col);
        self.lines[self.cursor_row].insert_str(at, s);
        self.cursor_col += s.chars().count();
        self.dirty = true;
    }

    fn insert_newline(&mut self) {
        let at = byte_index(self.current_line(), self.cursor_col);
        let rest = self.lines[self.cursor_row].split_off(at);
        self.lines.insert(self.cursor_row + 1, rest);
        self.cursor_row += 1;
        self.cursor_col = 0;
        self.dirty = true;
    }

    fn backspace(&mut self) {
        if self.cursor_col > 0 {
            let at = byte_index(self.current_line(), self.cursor_col - 1);
            self.lines[self.cursor_row].remove(at);
            self.cursor_col -= 1;
            self.dirty = true;
        } else if self.cursor_row > 0 {
            // Join with the previous line.
            let line = self.lines.remove(self.cursor_row);
            self.cursor_row -= 1;
            self.cursor_col = self.line_char_len(self.cursor_row);
            self.lines[self.cursor_row].push_str(&line);
            self.dirty = true;
        }
    }

    fn delete(&mut self) {
        let len = self.line_char_len(self.cursor_row);
        if self.cursor_col < len {
            let at = byte_index(self.current_line(), self.cursor_col);
            self.lines[self.cursor_row].remove(at);
            self.dirty = true;
        } else if self.cursor_row + 1 < self.lines.len() {
            let line = self.lines.remove(self.cursor_row + 1);
            self.lines[self.cursor_row].push_str(&line);
            self.dirty = true;
        }
    }

    /// Strip up to one indent unit of leading spaces from the current line.
    fn dedent(&mut self) {
        let line = &self.lines[self.cursor_row];
        let leading = line
            .chars()
            .take(INDENT_UNIT.len())
            .take_while(|c| *c == ' ')
            .count();
        if leading == 0 {
            return;
        }
        self.lines[self.cursor_row].drain(..leading);
        self.cursor_col = self.cursor_col.saturating_sub(leading);
        self.dirty = true;
    }

    /// Handle a key event. Returns `true` if the editor consumed it.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        // Ctrl/Alt combinations belong to the global dispatch table.
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return false;
        }

        match key.code {
            KeyCode::Char(c) => self.insert_char(c),
            KeyCode::Enter => self.insert_newline(),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Tab => self.insert_str(INDENT_UNIT),
            KeyCode::BackTab => self.dedent(),
            KeyCode::Left => {
                if self.cursor_col > 0 {
                    self.cursor_col -= 1;
                } else if self.cursor_row > 0 {
                    self.cursor_row -= 1;
                    self.cursor_col = self.line_char_len(self.cursor_row);
                }
            }
            KeyCode::Right => {
                if self.cursor_col < self.line_char_len(self.cursor_row) {
                    self.cursor_col += 1;
                } else if self.cursor_row + 1 < self.lines.len() {
                    self.cursor_row += 1;
                    self.cursor_col = 0;
                }
            }
            KeyCode::Up => {
                if self.cursor_row > 0 {
                    self.cursor_row -= 1;
                    self.clamp_col();
                }
            }
            KeyCode::Down => {
                if self.cursor_row + 1 < self.lines.len() {
                    self.cursor_row += 1;
                    self.clamp_col();
                }
            }
            KeyCode::Home => self.cursor_col = 0,
            KeyCode::End => self.cursor_col = self.line_char_len(self.cursor_row),
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_insert_and_newline() {
        let mut ed = SourceEditor::new("");
        for c in "int".chars() {
            assert!(ed.handle_key(&key(KeyCode::Char(c))));
        }
        ed.handle_key(&key(KeyCode::Enter));
        ed.handle_key(&key(KeyCode::Char('x')));

        assert_eq!(ed.text(), "int\nx");
        assert_eq!(ed.cursor(), (1, 1));
        assert!(ed.is_dirty());
    }

    #[test]
    fn test_backspace_joins_lines() {
        let mut ed = SourceEditor::new("ab\ncd");
        ed.handle_key(&key(KeyCode::Down));
        ed.handle_key(&key(KeyCode::Backspace));
        assert_eq!(ed.text(), "abcd");
        assert_eq!(ed.cursor(), (0, 2));
    }

    #[test]
    fn test_tab_indents_and_backtab_dedents() {
        let mut ed = SourceEditor::new("x");
        ed.handle_key(&key(KeyCode::Tab));
        assert_eq!(ed.text(), "    x");
        assert_eq!(ed.cursor(), (0, 4));

        ed.handle_key(&KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT));
        assert_eq!(ed.text(), "x");
        assert_eq!(ed.cursor(), (0, 0));
    }

    #[test]
    fn test_backtab_strips_partial_indent() {
        let mut ed = SourceEditor::new("  x");
        ed.handle_key(&key(KeyCode::End));
        ed.handle_key(&KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT));
        assert_eq!(ed.text(), "x");
        assert_eq!(ed.cursor(), (0, 1));
    }

    #[test]
    fn test_ctrl_keys_fall_through() {
        let mut ed = SourceEditor::new("x");
        let ctrl_1 = KeyEvent::new(KeyCode::Char('1'), KeyModifiers::CONTROL);
        assert!(!ed.handle_key(&ctrl_1));
        assert_eq!(ed.text(), "x");
        assert!(!ed.is_dirty());
    }

    #[test]
    fn test_vertical_move_clamps_column() {
        let mut ed = SourceEditor::new("abcdef\nab");
        ed.handle_key(&key(KeyCode::End));
        assert_eq!(ed.cursor(), (0, 6));
        ed.handle_key(&key(KeyCode::Down));
        assert_eq!(ed.cursor(), (1, 2));
    }

    #[test]
    fn test_multibyte_insert() {
        let mut ed = SourceEditor::new("é");
        ed.handle_key(&key(KeyCode::End));
        ed.handle_key(&key(KeyCode::Char('x')));
        assert_eq!(ed.text(), "éx");
    }

    #[test]
    fn test_delete_joins_next_line() {
        let mut ed = SourceEditor::new("ab\ncd");
        ed.handle_key(&key(KeyCode::End));
        ed.handle_key(&key(KeyCode::Delete));
        assert_eq!(ed.text(), "abcd");
    }
}
