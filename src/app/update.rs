use std::path::PathBuf;

use crate::app::Model;
use crate::editor::Direction;

/// Lines moved per mouse wheel notch.
pub const WHEEL_LINES: usize = 3;

/// A cursor motion, applied either as a plain move or as a selection extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Step(Direction),
    LineStart,
    LineEnd,
    WordLeft,
    WordRight,
    BufferStart,
    BufferEnd,
    PageUp,
    PageDown,
    /// Absolute buffer position (line, byte column)
    To(usize, usize),
}

/// All possible events and actions in the application.
///
/// These represent user input, system events, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Editing
    /// Insert a typed character
    InsertChar(char),
    /// Insert pasted text
    InsertText(String),
    /// Insert a tab or the equivalent spaces
    InsertTab,
    /// Delete the character before the cursor
    DeleteBack,
    /// Delete the character under the cursor
    DeleteForward,
    /// Break the line at the cursor
    SplitLine,

    // Cursor and selection
    /// Move the cursor, dropping any selection
    Move(Motion),
    /// Move the cursor, extending the selection
    Select(Motion),
    /// Select the whole buffer
    SelectAll,
    /// Drop the selection
    ClearSelection,
    /// Scroll the view up by n lines without moving the cursor
    ScrollUp(usize),
    /// Scroll the view down by n lines without moving the cursor
    ScrollDown(usize),

    // Clipboard
    Copy,
    Cut,
    Paste,

    // File (carried out as side effects)
    /// Start a new untitled document
    NewDocument,
    /// Ask for a file and open it
    OpenFile,
    /// Open a specific file
    OpenPath(PathBuf),
    /// Save to the current path
    Save,
    /// Save under a new path
    SaveAs,

    // Overlays
    /// Toggle help overlay
    ToggleHelp,
    /// Hide help overlay
    HideHelp,
    /// Scroll help overlay up
    HelpScrollUp(usize),
    /// Scroll help overlay down
    HelpScrollDown(usize),

    // Window
    /// Terminal resized
    Resize(u16, u16),
    /// Force a full redraw
    Redraw,

    // Application
    /// Close the document and exit
    Quit,
}

impl Message {
    /// Whether this message is handled by the document session.
    pub const fn is_file_command(&self) -> bool {
        matches!(
            self,
            Self::NewDocument
                | Self::OpenFile
                | Self::OpenPath(_)
                | Self::Save
                | Self::SaveAs
                | Self::Quit
        )
    }
}

/// Pure function that computes the next state from the current state and a message.
///
/// File commands leave the model untouched here; they need dialogs and the
/// filesystem and are carried out by the event loop.
pub fn update(mut model: Model, msg: Message) -> Model {
    match msg {
        // Editing
        Message::InsertChar(ch) => {
            let changed = model.buffer.insert_char(ch);
            model.record_edit(changed);
            model.ensure_cursor_visible();
        }
        Message::InsertText(text) => {
            let text = normalize_pasted_newlines(&text);
            let changed = model.buffer.insert_str(&text);
            model.record_edit(changed);
            model.ensure_cursor_visible();
        }
        Message::InsertTab => {
            let changed = if model.tab_width == 0 {
                model.buffer.insert_char('\t')
            } else {
                let col = model.cursor_display_col();
                let spaces = model.tab_width - (col % model.tab_width);
                model.buffer.insert_str(&" ".repeat(spaces))
            };
            model.record_edit(changed);
            model.ensure_cursor_visible();
        }
        Message::DeleteBack => {
            let changed = model.buffer.delete_back();
            model.record_edit(changed);
            model.ensure_cursor_visible();
        }
        Message::DeleteForward => {
            let changed = model.buffer.delete_forward();
            model.record_edit(changed);
            model.ensure_cursor_visible();
        }
        Message::SplitLine => {
            let changed = model.buffer.split_line();
            model.record_edit(changed);
            model.ensure_cursor_visible();
        }

        // Cursor and selection
        Message::Move(motion) => {
            model.buffer.clear_selection();
            apply_motion(&mut model, motion);
            model.ensure_cursor_visible();
        }
        Message::Select(motion) => {
            model.buffer.begin_selection();
            apply_motion(&mut model, motion);
            model.ensure_cursor_visible();
        }
        Message::SelectAll => {
            model.buffer.select_all();
            model.ensure_cursor_visible();
        }
        Message::ClearSelection => model.buffer.clear_selection(),
        Message::ScrollUp(n) => {
            model.scroll_offset = model.scroll_offset.saturating_sub(n);
        }
        Message::ScrollDown(n) => {
            model.scroll_offset = (model.scroll_offset + n).min(model.max_scroll_offset());
        }

        // Clipboard
        Message::Copy => {
            if let Some(text) = model.buffer.selected_text() {
                model.clipboard = Some(text.clone());
                model.outgoing_clipboard = Some(text);
            }
        }
        Message::Cut => {
            if let Some(text) = model.buffer.take_selection() {
                model.clipboard = Some(text.clone());
                model.outgoing_clipboard = Some(text);
                model.record_edit(true);
                model.ensure_cursor_visible();
            }
        }
        Message::Paste => {
            if let Some(text) = model.clipboard.clone() {
                let changed = model.buffer.insert_str(&text);
                model.record_edit(changed);
                model.ensure_cursor_visible();
            }
        }

        // Overlays
        Message::ToggleHelp => {
            model.help_visible = !model.help_visible;
            model.help_scroll_offset = 0;
        }
        Message::HideHelp => model.help_visible = false,
        Message::HelpScrollUp(n) => {
            model.help_scroll_offset = model.help_scroll_offset.saturating_sub(n);
        }
        Message::HelpScrollDown(n) => {
            model.help_scroll_offset = model.help_scroll_offset.saturating_add(n);
        }

        // Window
        Message::Resize(width, height) => {
            model.width = width;
            model.height = height;
            model.scroll_offset = model.scroll_offset.min(model.max_scroll_offset());
            model.ensure_cursor_visible();
        }
        Message::Redraw => {}

        // Handled in side effects
        Message::NewDocument
        | Message::OpenFile
        | Message::OpenPath(_)
        | Message::Save
        | Message::SaveAs
        | Message::Quit => {}
    }
    model
}

fn apply_motion(model: &mut Model, motion: Motion) {
    let buffer = &mut model.buffer;
    match motion {
        Motion::Step(direction) => buffer.move_cursor(direction),
        Motion::LineStart => buffer.move_home(),
        Motion::LineEnd => buffer.move_end(),
        Motion::WordLeft => buffer.move_word_left(),
        Motion::WordRight => buffer.move_word_right(),
        Motion::BufferStart => buffer.move_to_start(),
        Motion::BufferEnd => buffer.move_to_end(),
        Motion::PageUp | Motion::PageDown => {
            let rows = model.text_rows();
            let direction = if motion == Motion::PageUp {
                Direction::Up
            } else {
                Direction::Down
            };
            for _ in 0..rows {
                model.buffer.move_cursor(direction);
            }
            model.scroll_offset = if direction == Direction::Up {
                model.scroll_offset.saturating_sub(rows)
            } else {
                (model.scroll_offset + rows).min(model.max_scroll_offset())
            };
        }
        Motion::To(line, col) => buffer.move_to(line, col),
    }
}

/// Terminals deliver pasted line breaks as `\r` or `\r\n`.
fn normalize_pasted_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}
