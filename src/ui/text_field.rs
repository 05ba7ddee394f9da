use crossterm::event::{KeyCode, KeyModifiers};

/// An editable text buffer with a cursor counted in chars, not bytes
#[derive(Debug, Clone, Default)]
pub struct TextField {
    text: String,
    cursor: usize,
    multiline: bool,
}

impl TextField {
    pub fn single_line() -> Self {
        Self::default()
    }

    pub fn multi_line() -> Self {
        Self {
            multiline: true,
            ..Self::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the contents and put the cursor at the end
    pub fn set_text(&mut self, text: &str) {
        self.text = if self.multiline {
            text.to_string()
        } else {
            text.replace('\n', " ")
        };
        self.cursor = self.char_count();
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_index(&self, char_pos: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_pos)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    /// Zero-based (line, column) of the cursor
    pub fn cursor_position(&self) -> (usize, usize) {
        let mut line = 0;
        let mut column = 0;
        for c in self.text.chars().take(self.cursor) {
            if c == '\n' {
                line += 1;
                column = 0;
            } else {
                column += 1;
            }
        }
        (line, column)
    }

    fn line_lengths(&self) -> Vec<usize> {
        self.text.split('\n').map(|l| l.chars().count()).collect()
    }

    fn move_vertically(&mut self, down: bool) -> bool {
        let (line, column) = self.cursor_position();
        let lengths = self.line_lengths();
        let target = if down {
            if line + 1 >= lengths.len() {
                return false;
            }
            line + 1
        } else {
            if line == 0 {
                return false;
            }
            line - 1
        };

        let line_start: usize = lengths[..target].iter().map(|len| len + 1).sum();
        self.cursor = line_start + column.min(lengths[target]);
        true
    }

    fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.text.insert(at, c);
        self.cursor += 1;
    }

    /// Apply a key press; returns whether anything changed
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        match code {
            KeyCode::Char(c)
                if !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.insert(c);
                true
            }
            KeyCode::Enter if self.multiline => {
                self.insert('\n');
                true
            }
            KeyCode::Backspace => {
                if self.cursor == 0 {
                    return false;
                }
                let at = self.byte_index(self.cursor - 1);
                self.text.remove(at);
                self.cursor -= 1;
                true
            }
            KeyCode::Delete => {
                if self.cursor >= self.char_count() {
                    return false;
                }
                let at = self.byte_index(self.cursor);
                self.text.remove(at);
                true
            }
            KeyCode::Left => {
                if self.cursor == 0 {
                    return false;
                }
                self.cursor -= 1;
                true
            }
            KeyCode::Right => {
                if self.cursor >= self.char_count() {
                    return false;
                }
                self.cursor += 1;
                true
            }
            KeyCode::Up if self.multiline => self.move_vertically(false),
            KeyCode::Down if self.multiline => self.move_vertically(true),
            KeyCode::Home => {
                let (_, column) = self.cursor_position();
                self.cursor -= column;
                true
            }
            KeyCode::End => {
                let (line, column) = self.cursor_position();
                let length = self.line_lengths()[line];
                self.cursor += length - column;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(field: &mut TextField, code: KeyCode) -> bool {
        field.handle_key(code, KeyModifiers::NONE)
    }

    fn type_str(field: &mut TextField, s: &str) {
        for c in s.chars() {
            press(field, KeyCode::Char(c));
        }
    }

    #[test]
    fn edits_multibyte_text_by_char() {
        let mut field = TextField::single_line();
        type_str(&mut field, "게임명");
        press(&mut field, KeyCode::Left);
        press(&mut field, KeyCode::Backspace);
        assert_eq!(field.text(), "게명");
        press(&mut field, KeyCode::Delete);
        assert_eq!(field.text(), "게");
        type_str(&mut field, "임");
        assert_eq!(field.text(), "게임");
    }

    #[test]
    fn ignores_control_chords() {
        let mut field = TextField::single_line();
        assert!(!field.handle_key(KeyCode::Char('s'), KeyModifiers::CONTROL));
        assert_eq!(field.text(), "");
    }

    #[test]
    fn enter_only_breaks_lines_when_multiline() {
        let mut single = TextField::single_line();
        assert!(!press(&mut single, KeyCode::Enter));

        let mut multi = TextField::multi_line();
        type_str(&mut multi, "ab");
        press(&mut multi, KeyCode::Enter);
        type_str(&mut multi, "c");
        assert_eq!(multi.text(), "ab\nc");
        assert_eq!(multi.cursor_position(), (1, 1));
    }

    #[test]
    fn vertical_movement_clamps_column() {
        let mut field = TextField::multi_line();
        field.set_text("long line\nab\nlonger again");
        assert_eq!(field.cursor_position(), (2, 12));

        assert!(press(&mut field, KeyCode::Up));
        assert_eq!(field.cursor_position(), (1, 2));
        assert!(press(&mut field, KeyCode::Up));
        assert_eq!(field.cursor_position(), (0, 2));
        assert!(!press(&mut field, KeyCode::Up));

        press(&mut field, KeyCode::End);
        assert_eq!(field.cursor_position(), (0, 9));
        press(&mut field, KeyCode::Home);
        assert_eq!(field.cursor_position(), (0, 0));
    }

    #[test]
    fn single_line_flattens_newlines() {
        let mut field = TextField::single_line();
        field.set_text("a\nb");
        assert_eq!(field.text(), "a b");
    }
}
