//! Mapping between byte columns and terminal display columns.

use unicode_width::UnicodeWidthChar;

/// Display width of `ch` when it starts at display column `col`.
pub fn char_width_at(ch: char, col: usize, tab_stop: usize) -> usize {
    if ch == '\t' {
        let stop = tab_stop.max(1);
        stop - (col % stop)
    } else {
        ch.width().unwrap_or(0)
    }
}

/// Display width of `text`, expanding tabs to `tab_stop`.
pub fn display_width(text: &str, tab_stop: usize) -> usize {
    text.chars()
        .fold(0, |col, ch| col + char_width_at(ch, col, tab_stop))
}

/// Byte column within `text` whose display position is closest to, but not
/// past, `display_col`.
pub fn byte_col_for_display(text: &str, display_col: usize, tab_stop: usize) -> usize {
    let mut col = 0;
    for (idx, ch) in text.char_indices() {
        let width = char_width_at(ch, col, tab_stop);
        if col + width > display_col {
            return idx;
        }
        col += width;
    }
    text.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tabs_expand_to_next_stop() {
        assert_eq!(display_width("\t", 4), 4);
        assert_eq!(display_width("ab\t", 4), 4);
        assert_eq!(display_width("abcd\tx", 4), 9);
    }

    #[test]
    fn test_wide_chars_count_double() {
        assert_eq!(display_width("日本", 4), 4);
        assert_eq!(display_width("é", 4), 1);
    }

    #[test]
    fn test_byte_col_for_display_snaps_inside_wide_char() {
        let text = "a日b";
        assert_eq!(byte_col_for_display(text, 0, 4), 0);
        assert_eq!(byte_col_for_display(text, 1, 4), 1);
        assert_eq!(byte_col_for_display(text, 2, 4), 1);
        assert_eq!(byte_col_for_display(text, 3, 4), 4);
        assert_eq!(byte_col_for_display(text, 99, 4), text.len());
    }

    #[test]
    fn test_byte_col_for_display_inside_tab() {
        assert_eq!(byte_col_for_display("\tx", 2, 4), 0);
        assert_eq!(byte_col_for_display("\tx", 4, 4), 1);
    }
}
