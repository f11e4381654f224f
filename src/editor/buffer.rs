use std::ops::Range;

use ropey::{Rope, RopeSlice};

/// Cursor position in the editor buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based column (byte offset within the line).
    pub col: usize,
    /// Remembered column for vertical movement (sticky column).
    col_memory: usize,
}

impl Cursor {
    /// Create a cursor at line 0, column 0.
    pub const fn new() -> Self {
        Self {
            line: 0,
            col: 0,
            col_memory: 0,
        }
    }

    /// Create a cursor at a specific position.
    pub const fn at(line: usize, col: usize) -> Self {
        Self {
            line,
            col,
            col_memory: col,
        }
    }

    /// Update column and reset column memory to match.
    const fn set_col(&mut self, col: usize) {
        self.col = col;
        self.col_memory = col;
    }

    const fn same_position(self, other: Self) -> bool {
        self.line == other.line && self.col == other.col
    }

    const fn is_before(self, other: Self) -> bool {
        self.line < other.line || (self.line == other.line && self.col < other.col)
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

/// Direction for cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// A text buffer backed by a rope data structure.
///
/// Provides insertion, deletion, selection and line-based queries. Every
/// mutating method reports whether the content actually changed, which is
/// what the session uses as its edit notification.
pub struct EditorBuffer {
    rope: Rope,
    cursor: Cursor,
    anchor: Option<Cursor>,
}

impl EditorBuffer {
    /// Create a new buffer from a string.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            cursor: Cursor::new(),
            anchor: None,
        }
    }

    /// Create an empty buffer.
    pub fn empty() -> Self {
        Self::from_text("")
    }

    /// The current cursor position.
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Total number of lines in the buffer.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Whether the buffer holds no text at all.
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Get the content of a line, without its line break.
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let line = self.rope.line(line_idx);
        let content_end = line.len_chars() - line_break_len(line);
        Some(line.slice(..content_end).to_string())
    }

    /// Length of a line in bytes (without trailing newline).
    pub fn line_len(&self, line_idx: usize) -> usize {
        self.line_at(line_idx).map_or(0, |s| s.len())
    }

    /// The full text content of the buffer.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Replace the whole content, resetting cursor and selection.
    pub fn set_text(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        self.cursor = Cursor::new();
        self.anchor = None;
    }

    /// Remove all content.
    pub fn clear(&mut self) {
        self.set_text("");
    }

    // --- Selection ---

    /// Start a selection at the cursor unless one is already active.
    pub const fn begin_selection(&mut self) {
        if self.anchor.is_none() {
            self.anchor = Some(self.cursor);
        }
    }

    /// Drop the selection without touching the text.
    pub const fn clear_selection(&mut self) {
        self.anchor = None;
    }

    /// Select the entire buffer, leaving the cursor at the end.
    pub fn select_all(&mut self) {
        self.anchor = Some(Cursor::new());
        self.move_to_end();
    }

    /// Whether a non-empty selection is active.
    pub fn has_selection(&self) -> bool {
        self.selection_range().is_some()
    }

    /// Ordered `(start, end)` of the active selection, if it is non-empty.
    pub fn selection_range(&self) -> Option<(Cursor, Cursor)> {
        let anchor = self.anchor?;
        if anchor.same_position(self.cursor) {
            return None;
        }
        if anchor.is_before(self.cursor) {
            Some((anchor, self.cursor))
        } else {
            Some((self.cursor, anchor))
        }
    }

    /// The selected text, if any.
    pub fn selected_text(&self) -> Option<String> {
        let range = self.selection_char_range()?;
        Some(self.rope.slice(range).to_string())
    }

    /// Delete the selected text and place the cursor at its start.
    ///
    /// Returns `true` if anything was removed.
    pub fn delete_selection(&mut self) -> bool {
        let Some(range) = self.selection_char_range() else {
            self.anchor = None;
            return false;
        };
        let start = range.start;
        self.rope.remove(range);
        self.anchor = None;
        self.cursor = self.cursor_from_char_idx(start);
        true
    }

    /// Remove the selection and return its text (Cut).
    pub fn take_selection(&mut self) -> Option<String> {
        let text = self.selected_text()?;
        self.delete_selection();
        Some(text)
    }

    // --- Editing ---

    /// Insert a character at the cursor position, replacing any selection.
    pub fn insert_char(&mut self, ch: char) -> bool {
        if ch == '\n' {
            return self.split_line();
        }
        if is_line_break(ch) {
            return self.insert_str(ch.encode_utf8(&mut [0; 4]));
        }
        self.delete_selection();
        let char_idx = self.cursor_char_idx();
        self.rope.insert_char(char_idx, ch);
        self.cursor.set_col(self.cursor.col + ch.len_utf8());
        true
    }

    /// Insert a string at the cursor position, replacing any selection.
    pub fn insert_str(&mut self, s: &str) -> bool {
        let replaced = self.delete_selection();
        if s.is_empty() {
            return replaced;
        }
        let char_idx = self.cursor_char_idx();
        self.rope.insert(char_idx, s);

        // Move cursor to end of inserted text
        self.cursor = self.cursor_from_char_idx(char_idx + s.chars().count());
        true
    }

    /// Split the current line at the cursor (Enter).
    pub fn split_line(&mut self) -> bool {
        self.delete_selection();
        let char_idx = self.cursor_char_idx();
        self.rope.insert_char(char_idx, '\n');
        self.cursor.line += 1;
        self.cursor.set_col(0);
        true
    }

    /// Delete the character before the cursor (Backspace).
    ///
    /// Returns `true` if anything was deleted.
    pub fn delete_back(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        if self.cursor.col == 0 && self.cursor.line == 0 {
            return false;
        }

        let char_idx = self.cursor_char_idx();
        if self.cursor.col == 0 {
            // Join with previous line, removing its whole line break (LF or CRLF)
            let prev = self.cursor.line - 1;
            let prev_len = self.line_len(prev);
            let prev_content_end =
                self.rope.line_to_char(prev) + self.line_at(prev).map_or(0, |l| l.chars().count());
            self.rope.remove(prev_content_end..char_idx);
            self.cursor.line = prev;
            self.cursor.set_col(prev_len);
        } else {
            let line = self.line_at(self.cursor.line).unwrap_or_default();
            let before = &line[..self.cursor.col];
            let prev_char_len = before.chars().next_back().map_or(1, char::len_utf8);
            self.rope.remove(char_idx - 1..char_idx);
            self.cursor.set_col(self.cursor.col - prev_char_len);
        }
        true
    }

    /// Delete the character at the cursor (Delete).
    ///
    /// Returns `true` if anything was deleted.
    pub fn delete_forward(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        let line_len = self.line_len(self.cursor.line);
        let at_line_end = self.cursor.col >= line_len;

        if at_line_end && self.cursor.line + 1 >= self.line_count() {
            return false;
        }

        let char_idx = self.cursor_char_idx();
        if at_line_end {
            let next_line_start = self.rope.line_to_char(self.cursor.line + 1);
            self.rope.remove(char_idx..next_line_start);
        } else {
            self.rope.remove(char_idx..=char_idx);
        }
        true
    }

    // --- Movement ---

    /// Move the cursor in the given direction.
    pub fn move_cursor(&mut self, direction: Direction) {
        match direction {
            Direction::Left => self.move_left(),
            Direction::Right => self.move_right(),
            Direction::Up => self.move_up(),
            Direction::Down => self.move_down(),
        }
    }

    /// Move cursor to the beginning of the line (Home).
    pub const fn move_home(&mut self) {
        self.cursor.set_col(0);
    }

    /// Move cursor to the end of the line (End).
    pub fn move_end(&mut self) {
        let len = self.line_len(self.cursor.line);
        self.cursor.set_col(len);
    }

    /// Move cursor one word to the left (Ctrl+Left).
    pub fn move_word_left(&mut self) {
        if self.cursor.col == 0 {
            if self.cursor.line > 0 {
                self.cursor.line -= 1;
                self.cursor.set_col(self.line_len(self.cursor.line));
            }
            return;
        }

        let line = self.line_at(self.cursor.line).unwrap_or_default();
        let before = &line[..self.cursor.col];
        let trimmed = before.trim_end();

        if trimmed.is_empty() {
            self.cursor.set_col(0);
            return;
        }

        let pos = trimmed
            .rfind(|c: char| !c.is_alphanumeric() && c != '_')
            .map_or(0, |i| i + trimmed[i..].chars().next().map_or(1, char::len_utf8));
        self.cursor.set_col(pos);
    }

    /// Move cursor one word to the right (Ctrl+Right).
    pub fn move_word_right(&mut self) {
        let line_len = self.line_len(self.cursor.line);

        if self.cursor.col >= line_len {
            if self.cursor.line + 1 < self.line_count() {
                self.cursor.line += 1;
                self.cursor.set_col(0);
            }
            return;
        }

        let line = self.line_at(self.cursor.line).unwrap_or_default();
        let after = &line[self.cursor.col..];

        let word_end = after
            .find(|c: char| !c.is_alphanumeric() && c != '_')
            .unwrap_or(after.len());

        let rest = &after[word_end..];
        let space_end = rest
            .find(|c: char| c.is_alphanumeric() || c == '_')
            .unwrap_or(rest.len());

        self.cursor.set_col(self.cursor.col + word_end + space_end);
    }

    /// Move cursor to a specific line and column.
    pub fn move_to(&mut self, line: usize, col: usize) {
        let max_line = self.line_count().saturating_sub(1);
        self.cursor.line = line.min(max_line);
        let text = self.line_at(self.cursor.line).unwrap_or_default();
        self.cursor.set_col(floor_char_boundary(&text, col));
    }

    /// Move cursor to the start of the buffer (Ctrl+Home).
    pub const fn move_to_start(&mut self) {
        self.cursor.line = 0;
        self.cursor.set_col(0);
    }

    /// Move cursor to the end of the buffer (Ctrl+End).
    pub fn move_to_end(&mut self) {
        let last_line = self.line_count().saturating_sub(1);
        self.cursor.line = last_line;
        self.cursor.set_col(self.line_len(last_line));
    }

    // --- Private helpers ---

    fn cursor_char_idx(&self) -> usize {
        self.char_idx_at(self.cursor)
    }

    /// Convert a line/byte-column position to a ropey char index.
    fn char_idx_at(&self, pos: Cursor) -> usize {
        let line_start = self.rope.line_to_char(pos.line);
        let line = self.line_at(pos.line).unwrap_or_default();
        let byte_col = floor_char_boundary(&line, pos.col);
        line_start + line[..byte_col].chars().count()
    }

    fn cursor_from_char_idx(&self, char_idx: usize) -> Cursor {
        let char_idx = char_idx.min(self.rope.len_chars());
        let line = self.rope.char_to_line(char_idx);
        let col = self.rope.char_to_byte(char_idx) - self.rope.line_to_byte(line);
        Cursor::at(line, col)
    }

    fn selection_char_range(&self) -> Option<Range<usize>> {
        let (start, end) = self.selection_range()?;
        Some(self.char_idx_at(start)..self.char_idx_at(end))
    }

    fn move_left(&mut self) {
        if self.cursor.col > 0 {
            let line = self.line_at(self.cursor.line).unwrap_or_default();
            let before = &line[..self.cursor.col];
            let prev_char_len = before.chars().next_back().map_or(1, char::len_utf8);
            self.cursor.set_col(self.cursor.col - prev_char_len);
        } else if self.cursor.line > 0 {
            self.cursor.line -= 1;
            self.cursor.set_col(self.line_len(self.cursor.line));
        }
    }

    fn move_right(&mut self) {
        let line_len = self.line_len(self.cursor.line);
        if self.cursor.col < line_len {
            let line = self.line_at(self.cursor.line).unwrap_or_default();
            let next_char_len = line[self.cursor.col..]
                .chars()
                .next()
                .map_or(1, char::len_utf8);
            self.cursor.set_col(self.cursor.col + next_char_len);
        } else if self.cursor.line + 1 < self.line_count() {
            self.cursor.line += 1;
            self.cursor.set_col(0);
        }
    }

    fn move_up(&mut self) {
        if self.cursor.line > 0 {
            self.cursor.line -= 1;
            self.clamp_to_col_memory();
        }
    }

    fn move_down(&mut self) {
        if self.cursor.line + 1 < self.line_count() {
            self.cursor.line += 1;
            self.clamp_to_col_memory();
        }
    }

    fn clamp_to_col_memory(&mut self) {
        let text = self.line_at(self.cursor.line).unwrap_or_default();
        self.cursor.col = floor_char_boundary(&text, self.cursor.col_memory);
    }
}

impl crate::session::TextBuffer for EditorBuffer {
    fn text(&self) -> String {
        Self::text(self)
    }

    fn set_text(&mut self, text: &str) {
        Self::set_text(self, text);
    }

    fn clear(&mut self) {
        Self::clear(self);
    }
}

impl Default for EditorBuffer {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for EditorBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorBuffer")
            .field(
                "rope",
                &format_args!("Rope({} lines)", self.rope.len_lines()),
            )
            .field("cursor", &self.cursor)
            .field("anchor", &self.anchor)
            .finish()
    }
}

/// Length in chars of the line break ending `line`.
///
/// Matches every break ropey splits lines on: LF, CR, CRLF, VT, FF, NEL,
/// U+2028 and U+2029.
fn line_break_len(line: RopeSlice<'_>) -> usize {
    let len = line.len_chars();
    let Some(last) = len.checked_sub(1).map(|i| line.char(i)) else {
        return 0;
    };
    match last {
        '\n' if len >= 2 && line.char(len - 2) == '\r' => 2,
        ch if is_line_break(ch) => 1,
        _ => 0,
    }
}

const fn is_line_break(ch: char) -> bool {
    matches!(
        ch,
        '\n' | '\r' | '\u{000B}' | '\u{000C}' | '\u{0085}' | '\u{2028}' | '\u{2029}'
    )
}

/// Largest char boundary in `s` that is `<= idx`.
fn floor_char_boundary(s: &str, idx: usize) -> usize {
    let mut idx = idx.min(s.len());
    while !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- Construction and basic queries ---

    #[test]
    fn test_empty_buffer_has_one_line() {
        let buf = EditorBuffer::empty();
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line_at(0), Some(String::new()));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_from_text_preserves_content() {
        let buf = EditorBuffer::from_text("hello\nworld");
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.line_at(0), Some("hello".to_string()));
        assert_eq!(buf.line_at(1), Some("world".to_string()));
    }

    #[test]
    fn test_from_text_trailing_newline() {
        let buf = EditorBuffer::from_text("hello\n");
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.line_at(1), Some(String::new()));
    }

    #[test]
    fn test_line_at_out_of_bounds_returns_none() {
        let buf = EditorBuffer::from_text("hello");
        assert_eq!(buf.line_at(1), None);
    }

    #[test]
    fn test_text_is_verbatim_including_crlf() {
        let content = "line one\r\nline two\r\n";
        let buf = EditorBuffer::from_text(content);
        assert_eq!(buf.text(), content);
        assert_eq!(buf.line_at(0), Some("line one".to_string()));
    }

    #[test]
    fn test_set_text_resets_cursor_and_selection() {
        let mut buf = EditorBuffer::from_text("hello\nworld");
        buf.move_to(1, 3);
        buf.select_all();
        buf.set_text("fresh");
        assert_eq!(buf.text(), "fresh");
        assert_eq!(buf.cursor(), Cursor::at(0, 0));
        assert!(!buf.has_selection());
    }

    #[test]
    fn test_clear_empties_buffer() {
        let mut buf = EditorBuffer::from_text("hello");
        buf.clear();
        assert!(buf.is_empty());
    }

    // --- Edit reporting ---

    #[test]
    fn test_insert_reports_change() {
        let mut buf = EditorBuffer::from_text("hello");
        assert!(buf.insert_char('!'));
    }

    #[test]
    fn test_noop_deletes_report_no_change() {
        let mut buf = EditorBuffer::from_text("hello");
        assert!(!buf.delete_back());
        buf.move_end();
        assert!(!buf.delete_forward());
        assert_eq!(buf.text(), "hello");
    }

    #[test]
    fn test_insert_str_empty_is_noop() {
        let mut buf = EditorBuffer::from_text("hello");
        assert!(!buf.insert_str(""));
        assert_eq!(buf.text(), "hello");
    }

    // --- Character insertion ---

    #[test]
    fn test_insert_char_in_middle() {
        let mut buf = EditorBuffer::from_text("hllo");
        buf.move_cursor(Direction::Right);
        buf.insert_char('e');
        assert_eq!(buf.line_at(0), Some("hello".to_string()));
        assert_eq!(buf.cursor(), Cursor::at(0, 2));
    }

    #[test]
    fn test_insert_multibyte_char() {
        let mut buf = EditorBuffer::from_text("hello");
        buf.move_end();
        buf.insert_char('é');
        assert_eq!(buf.line_at(0), Some("helloé".to_string()));
        assert_eq!(buf.cursor().col, 7);
    }

    #[test]
    fn test_insert_newline_char_splits_line() {
        let mut buf = EditorBuffer::from_text("ab");
        buf.move_to(0, 1);
        buf.insert_char('\n');
        assert_eq!(buf.text(), "a\nb");
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
    }

    // --- String insertion ---

    #[test]
    fn test_insert_str_single_line() {
        let mut buf = EditorBuffer::from_text("hd");
        buf.move_cursor(Direction::Right);
        buf.insert_str("ello worl");
        assert_eq!(buf.line_at(0), Some("hello world".to_string()));
        assert_eq!(buf.cursor(), Cursor::at(0, 10));
    }

    #[test]
    fn test_insert_str_multi_line_moves_cursor_to_end() {
        let mut buf = EditorBuffer::from_text("ab");
        buf.move_to(0, 1);
        buf.insert_str("1\n22\n333");
        assert_eq!(buf.text(), "a1\n22\n333b");
        assert_eq!(buf.cursor(), Cursor::at(2, 3));
    }

    // --- Line splitting (Enter) ---

    #[test]
    fn test_split_line_in_middle() {
        let mut buf = EditorBuffer::from_text("hello world");
        buf.move_to(0, 5);
        buf.split_line();
        assert_eq!(buf.line_at(0), Some("hello".to_string()));
        assert_eq!(buf.line_at(1), Some(" world".to_string()));
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
    }

    // --- Backspace deletion ---

    #[test]
    fn test_delete_back_removes_char() {
        let mut buf = EditorBuffer::from_text("hello");
        buf.move_to(0, 5);
        assert!(buf.delete_back());
        assert_eq!(buf.line_at(0), Some("hell".to_string()));
        assert_eq!(buf.cursor(), Cursor::at(0, 4));
    }

    #[test]
    fn test_delete_back_joins_lines() {
        let mut buf = EditorBuffer::from_text("hello\nworld");
        buf.move_to(1, 0);
        buf.delete_back();
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line_at(0), Some("helloworld".to_string()));
        assert_eq!(buf.cursor(), Cursor::at(0, 5));
    }

    #[test]
    fn test_delete_back_joins_crlf_lines() {
        let mut buf = EditorBuffer::from_text("hello\r\nworld");
        buf.move_to(1, 0);
        buf.delete_back();
        assert_eq!(buf.text(), "helloworld");
        assert_eq!(buf.cursor(), Cursor::at(0, 5));
    }

    #[test]
    fn test_delete_back_joins_lone_cr_lines() {
        let mut buf = EditorBuffer::from_text("hello\rworld");
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.line_at(0), Some("hello".to_string()));
        buf.move_to(1, 0);
        buf.delete_back();
        assert_eq!(buf.text(), "helloworld");
        assert_eq!(buf.cursor(), Cursor::at(0, 5));
    }

    /// End, type, Backspace, Delete on a line ended by `brk`.
    fn edit_around_break(brk: char) {
        let text = format!("a{brk}b");
        let mut buf = EditorBuffer::from_text(&text);
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.line_at(0), Some("a".to_string()));
        assert_eq!(buf.line_len(0), 1);

        buf.move_end();
        assert_eq!(buf.cursor(), Cursor::at(0, 1));
        buf.insert_char('x');
        assert_eq!(buf.text(), format!("ax{brk}b"));
        assert_eq!(buf.cursor(), Cursor::at(0, 2));

        assert!(buf.delete_back());
        assert_eq!(buf.text(), text);
        assert_eq!(buf.cursor(), Cursor::at(0, 1));

        assert!(buf.delete_forward());
        assert_eq!(buf.text(), "ab");
        assert_eq!(buf.line_count(), 1);
    }

    #[test]
    fn test_edit_around_form_feed_break() {
        edit_around_break('\u{000C}');
    }

    #[test]
    fn test_edit_around_vertical_tab_break() {
        edit_around_break('\u{000B}');
    }

    #[test]
    fn test_edit_around_next_line_break() {
        edit_around_break('\u{0085}');
    }

    #[test]
    fn test_edit_around_line_separator() {
        edit_around_break('\u{2028}');
    }

    #[test]
    fn test_edit_around_paragraph_separator() {
        edit_around_break('\u{2029}');
    }

    #[test]
    fn test_typed_separator_starts_new_line() {
        let mut buf = EditorBuffer::from_text("ab");
        buf.move_to(0, 1);
        buf.insert_char('\u{2028}');
        assert_eq!(buf.text(), "a\u{2028}b");
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
    }

    #[test]
    fn test_backspace_at_line_start_after_unicode_separator() {
        let mut buf = EditorBuffer::from_text("ab\u{2028}cd");
        buf.move_to(1, 0);
        assert!(buf.delete_back());
        assert_eq!(buf.text(), "abcd");
        assert_eq!(buf.cursor(), Cursor::at(0, 2));
    }

    #[test]
    fn test_delete_back_multibyte() {
        let mut buf = EditorBuffer::from_text("café");
        buf.move_end();
        buf.delete_back();
        assert_eq!(buf.line_at(0), Some("caf".to_string()));
    }

    // --- Forward deletion (Delete key) ---

    #[test]
    fn test_delete_forward_removes_char() {
        let mut buf = EditorBuffer::from_text("hello");
        buf.delete_forward();
        assert_eq!(buf.line_at(0), Some("ello".to_string()));
        assert_eq!(buf.cursor(), Cursor::at(0, 0));
    }

    #[test]
    fn test_delete_forward_joins_crlf_lines() {
        let mut buf = EditorBuffer::from_text("hello\r\nworld");
        buf.move_to(0, 5);
        buf.delete_forward();
        assert_eq!(buf.text(), "helloworld");
    }

    // --- Cursor movement ---

    #[test]
    fn test_move_left_wraps_to_prev_line() {
        let mut buf = EditorBuffer::from_text("hello\nworld");
        buf.move_to(1, 0);
        buf.move_cursor(Direction::Left);
        assert_eq!(buf.cursor(), Cursor::at(0, 5));
    }

    #[test]
    fn test_move_right_wraps_to_next_line() {
        let mut buf = EditorBuffer::from_text("hello\nworld");
        buf.move_to(0, 5);
        buf.move_cursor(Direction::Right);
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
    }

    #[test]
    fn test_column_memory_across_short_line() {
        let mut buf = EditorBuffer::from_text("hello\nhi\nworld");
        buf.move_to(0, 4);
        buf.move_cursor(Direction::Down);
        assert_eq!(buf.cursor().col, 2);
        buf.move_cursor(Direction::Down);
        assert_eq!(buf.cursor().line, 2);
        assert_eq!(buf.cursor().col, 4);
    }

    #[test]
    fn test_vertical_move_lands_on_char_boundary() {
        let mut buf = EditorBuffer::from_text("abc\néé");
        buf.move_to(0, 3);
        buf.move_cursor(Direction::Down);
        // "éé" is 4 bytes; byte 3 is inside the second 'é'
        assert_eq!(buf.cursor().col, 2);
    }

    #[test]
    fn test_move_word_left_from_middle_of_word() {
        let mut buf = EditorBuffer::from_text("hello world");
        buf.move_to(0, 8);
        buf.move_word_left();
        assert_eq!(buf.cursor().col, 6);
    }

    #[test]
    fn test_move_word_right_from_start() {
        let mut buf = EditorBuffer::from_text("hello world");
        buf.move_word_right();
        assert_eq!(buf.cursor().col, 6);
    }

    #[test]
    fn test_move_to_clamps_line_and_col() {
        let mut buf = EditorBuffer::from_text("hello");
        buf.move_to(100, 100);
        assert_eq!(buf.cursor(), Cursor::at(0, 5));
    }

    #[test]
    fn test_move_to_end() {
        let mut buf = EditorBuffer::from_text("hello\nworld");
        buf.move_to_end();
        assert_eq!(buf.cursor(), Cursor::at(1, 5));
    }

    // --- Selection ---

    #[test]
    fn test_selection_is_empty_until_cursor_moves() {
        let mut buf = EditorBuffer::from_text("hello");
        buf.begin_selection();
        assert!(!buf.has_selection());
        buf.move_cursor(Direction::Right);
        assert_eq!(buf.selected_text(), Some("h".to_string()));
    }

    #[test]
    fn test_backward_selection_is_ordered() {
        let mut buf = EditorBuffer::from_text("hello world");
        buf.move_to(0, 11);
        buf.begin_selection();
        buf.move_word_left();
        assert_eq!(
            buf.selection_range(),
            Some((Cursor::at(0, 6), Cursor::at(0, 11)))
        );
        assert_eq!(buf.selected_text(), Some("world".to_string()));
    }

    #[test]
    fn test_select_all_spans_lines() {
        let mut buf = EditorBuffer::from_text("one\ntwo");
        buf.select_all();
        assert_eq!(buf.selected_text(), Some("one\ntwo".to_string()));
    }

    #[test]
    fn test_take_selection_removes_text() {
        let mut buf = EditorBuffer::from_text("one\ntwo\nthree");
        buf.move_to(0, 2);
        buf.begin_selection();
        buf.move_to(2, 1);
        assert_eq!(buf.take_selection(), Some("e\ntwo\nt".to_string()));
        assert_eq!(buf.text(), "onhree");
        assert_eq!(buf.cursor(), Cursor::at(0, 2));
        assert!(!buf.has_selection());
    }

    #[test]
    fn test_typing_replaces_selection() {
        let mut buf = EditorBuffer::from_text("hello world");
        buf.begin_selection();
        buf.move_word_right();
        buf.insert_char('X');
        assert_eq!(buf.text(), "Xworld");
    }

    #[test]
    fn test_backspace_deletes_selection_only() {
        let mut buf = EditorBuffer::from_text("abcdef");
        buf.move_to(0, 1);
        buf.begin_selection();
        buf.move_to(0, 3);
        assert!(buf.delete_back());
        assert_eq!(buf.text(), "adef");
    }

    #[test]
    fn test_paste_over_selection() {
        let mut buf = EditorBuffer::from_text("abc");
        buf.select_all();
        buf.insert_str("xyz\n");
        assert_eq!(buf.text(), "xyz\n");
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
    }

    // --- Complex editing sequences ---

    #[test]
    fn test_type_then_backspace_then_type() {
        let mut buf = EditorBuffer::empty();
        buf.insert_char('h');
        buf.insert_char('e');
        buf.insert_char('l');
        buf.delete_back();
        buf.insert_char('l');
        buf.insert_char('p');
        assert_eq!(buf.line_at(0), Some("help".to_string()));
    }
}
