/// Minimal text editor state for form fields.
/// Cursor positions are character indices, not byte indices, so
/// multi-byte input behaves correctly.
#[derive(Debug, Clone)]
pub struct Editor {
    pub lines: Vec<String>,
    pub cursor_line: usize,
    pub cursor_col: usize,
}

impl Editor {
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            cursor_line: 0,
            cursor_col: 0,
        }
    }

    pub fn from_string(content: String) -> Self {
        let lines: Vec<String> = if content.is_empty() {
            vec![String::new()]
        } else {
            content.lines().map(|s| s.to_string()).collect()
        };
        let cursor_line = lines.len().saturating_sub(1);
        let cursor_col = lines.last().map(|l| l.chars().count()).unwrap_or(0);
        Self {
            lines,
            cursor_line,
            cursor_col,
        }
    }

    pub fn contents(&self) -> String {
        self.lines.join("\n")
    }

    /// First line only, for single-line fields
    pub fn first_line(&self) -> &str {
        self.lines.first().map(|l| l.as_str()).unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|l| l.trim().is_empty())
    }

    fn current_line_len(&self) -> usize {
        self.lines
            .get(self.cursor_line)
            .map(|l| l.chars().count())
            .unwrap_or(0)
    }

    /// Convert the cursor's character position to a byte offset in the current line
    fn byte_offset(&self) -> usize {
        let line = &self.lines[self.cursor_line];
        line.char_indices()
            .nth(self.cursor_col)
            .map(|(i, _)| i)
            .unwrap_or(line.len())
    }

    pub fn insert_char(&mut self, ch: char) {
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        let offset = self.byte_offset();
        self.lines[self.cursor_line].insert(offset, ch);
        self.cursor_col += 1;
    }

    pub fn insert_newline(&mut self) {
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        let offset = self.byte_offset();
        let rest = self.lines[self.cursor_line].split_off(offset);
        self.lines.insert(self.cursor_line + 1, rest);
        self.cursor_line += 1;
        self.cursor_col = 0;
    }

    /// Backspace: delete the character before the cursor, joining lines
    /// when at the start of a line
    pub fn delete_char(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
            let offset = self.byte_offset();
            self.lines[self.cursor_line].remove(offset);
        } else if self.cursor_line > 0 {
            let removed = self.lines.remove(self.cursor_line);
            self.cursor_line -= 1;
            self.cursor_col = self.lines[self.cursor_line].chars().count();
            self.lines[self.cursor_line].push_str(&removed);
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
        } else if self.cursor_line > 0 {
            self.cursor_line -= 1;
            self.cursor_col = self.current_line_len();
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor_col < self.current_line_len() {
            self.cursor_col += 1;
        } else if self.cursor_line + 1 < self.lines.len() {
            self.cursor_line += 1;
            self.cursor_col = 0;
        }
    }

    pub fn move_up(&mut self) {
        if self.cursor_line > 0 {
            self.cursor_line -= 1;
            self.cursor_col = self.cursor_col.min(self.current_line_len());
        }
    }

    pub fn move_down(&mut self) {
        if self.cursor_line + 1 < self.lines.len() {
            self.cursor_line += 1;
            self.cursor_col = self.cursor_col.min(self.current_line_len());
        }
    }

    pub fn move_to_line_start(&mut self) {
        self.cursor_col = 0;
    }

    pub fn move_to_line_end(&mut self) {
        self.cursor_col = self.current_line_len();
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_contents() {
        let mut editor = Editor::new();
        for ch in "hello".chars() {
            editor.insert_char(ch);
        }
        assert_eq!(editor.contents(), "hello");
        assert_eq!(editor.cursor_col, 5);
    }

    #[test]
    fn test_insert_mid_line() {
        let mut editor = Editor::from_string("hllo".to_string());
        editor.cursor_col = 1;
        editor.insert_char('e');
        assert_eq!(editor.first_line(), "hello");
        assert_eq!(editor.cursor_col, 2);
    }

    #[test]
    fn test_backspace_joins_lines() {
        let mut editor = Editor::from_string("ab\ncd".to_string());
        editor.cursor_line = 1;
        editor.cursor_col = 0;
        editor.delete_char();
        assert_eq!(editor.contents(), "abcd");
        assert_eq!(editor.cursor_line, 0);
        assert_eq!(editor.cursor_col, 2);
    }

    #[test]
    fn test_newline_splits_line() {
        let mut editor = Editor::from_string("abcd".to_string());
        editor.cursor_col = 2;
        editor.insert_newline();
        assert_eq!(editor.contents(), "ab\ncd");
        assert_eq!(editor.cursor_line, 1);
        assert_eq!(editor.cursor_col, 0);
    }

    #[test]
    fn test_multibyte_characters() {
        let mut editor = Editor::from_string("añb".to_string());
        editor.cursor_col = 2;
        editor.delete_char();
        assert_eq!(editor.first_line(), "ab");
    }

    #[test]
    fn test_is_empty_ignores_whitespace() {
        let editor = Editor::from_string("   ".to_string());
        assert!(editor.is_empty());
        let editor = Editor::from_string("x".to_string());
        assert!(!editor.is_empty());
    }
}
