use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::app::update::{Motion, WHEEL_LINES};
use crate::app::{Message, Model};
use crate::editor::Direction;
use crate::editor::display::byte_col_for_display;

use super::event_loop::ResizeDebouncer;

pub(super) fn handle_event(
    event: &Event,
    model: &Model,
    now_ms: u64,
    resize_debouncer: &mut ResizeDebouncer,
) -> Option<Message> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(*key, model),
        Event::Mouse(mouse) => handle_mouse(*mouse, model),
        Event::Paste(text) if !model.help_visible => Some(Message::InsertText(text.clone())),
        Event::Resize(w, h) => {
            resize_debouncer.queue(*w, *h, now_ms);
            None
        }
        _ => None,
    }
}

pub(super) fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
    if model.help_visible {
        return handle_help_key(key);
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    if ctrl && let Some(msg) = handle_ctrl_key(key.code, shift) {
        return Some(msg);
    }

    let motion = match key.code {
        KeyCode::Up => Some(Motion::Step(Direction::Up)),
        KeyCode::Down => Some(Motion::Step(Direction::Down)),
        KeyCode::Left if ctrl => Some(Motion::WordLeft),
        KeyCode::Right if ctrl => Some(Motion::WordRight),
        KeyCode::Left => Some(Motion::Step(Direction::Left)),
        KeyCode::Right => Some(Motion::Step(Direction::Right)),
        KeyCode::Home if ctrl => Some(Motion::BufferStart),
        KeyCode::End if ctrl => Some(Motion::BufferEnd),
        KeyCode::Home => Some(Motion::LineStart),
        KeyCode::End => Some(Motion::LineEnd),
        KeyCode::PageUp => Some(Motion::PageUp),
        KeyCode::PageDown => Some(Motion::PageDown),
        _ => None,
    };
    if let Some(motion) = motion {
        return Some(if shift {
            Message::Select(motion)
        } else {
            Message::Move(motion)
        });
    }

    match key.code {
        KeyCode::F(1) => Some(Message::ToggleHelp),
        KeyCode::F(12) => Some(Message::SaveAs),
        KeyCode::Esc => Some(Message::ClearSelection),
        KeyCode::Enter => Some(Message::SplitLine),
        KeyCode::Backspace => Some(Message::DeleteBack),
        KeyCode::Delete => Some(Message::DeleteForward),
        KeyCode::Tab => Some(Message::InsertTab),
        KeyCode::Char(ch) if !ctrl && !alt => Some(Message::InsertChar(ch)),
        _ => None,
    }
}

fn handle_ctrl_key(code: KeyCode, shift: bool) -> Option<Message> {
    match code {
        KeyCode::Char('n' | 'N') => Some(Message::NewDocument),
        KeyCode::Char('o' | 'O') => Some(Message::OpenFile),
        KeyCode::Char('s' | 'S') if shift => Some(Message::SaveAs),
        KeyCode::Char('S') => Some(Message::SaveAs),
        KeyCode::Char('s') => Some(Message::Save),
        KeyCode::Char('q' | 'Q') => Some(Message::Quit),
        KeyCode::Char('c' | 'C') => Some(Message::Copy),
        KeyCode::Char('x' | 'X') => Some(Message::Cut),
        KeyCode::Char('v' | 'V') => Some(Message::Paste),
        KeyCode::Char('a' | 'A') => Some(Message::SelectAll),
        KeyCode::Char('l' | 'L') => Some(Message::Redraw),
        _ => None,
    }
}

fn handle_help_key(key: KeyEvent) -> Option<Message> {
    match key.code {
        KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('q' | '?') => Some(Message::HideHelp),
        KeyCode::Up | KeyCode::Char('k') => Some(Message::HelpScrollUp(1)),
        KeyCode::Down | KeyCode::Char('j') => Some(Message::HelpScrollDown(1)),
        KeyCode::PageUp => Some(Message::HelpScrollUp(10)),
        KeyCode::PageDown => Some(Message::HelpScrollDown(10)),
        _ => None,
    }
}

pub(super) fn handle_mouse(mouse: MouseEvent, model: &Model) -> Option<Message> {
    if model.help_visible {
        return match mouse.kind {
            MouseEventKind::ScrollUp => Some(Message::HelpScrollUp(WHEEL_LINES)),
            MouseEventKind::ScrollDown => Some(Message::HelpScrollDown(WHEEL_LINES)),
            _ => None,
        };
    }

    match mouse.kind {
        MouseEventKind::ScrollUp => Some(Message::ScrollUp(WHEEL_LINES)),
        MouseEventKind::ScrollDown => Some(Message::ScrollDown(WHEEL_LINES)),
        MouseEventKind::Down(MouseButton::Left) => {
            buffer_position_at(model, mouse.column, mouse.row)
                .map(|(line, col)| Message::Move(Motion::To(line, col)))
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            buffer_position_at(model, mouse.column, mouse.row)
                .map(|(line, col)| Message::Select(Motion::To(line, col)))
        }
        _ => None,
    }
}

/// Buffer position under a terminal cell, clamped to the end of the line.
fn buffer_position_at(model: &Model, column: u16, row: u16) -> Option<(usize, usize)> {
    let row = usize::from(row);
    if row >= model.text_rows() {
        return None;
    }
    let last_line = model.buffer.line_count().saturating_sub(1);
    let line = (model.scroll_offset + row).min(last_line);
    let text_col = usize::from(column.saturating_sub(model.gutter_width()));
    let display_col = model.col_offset + text_col;
    let text = model.buffer.line_at(line).unwrap_or_default();
    Some((line, byte_col_for_display(&text, display_col, model.tab_stop())))
}
