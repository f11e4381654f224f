use std::ops::Range;

use ratatui::prelude::*;
use ratatui::widgets::{Clear, Paragraph};

use crate::app::Model;
use crate::editor::display::char_width_at;

use super::{overlays, status};

/// Shown in the first row while the buffer holds no text.
pub const EMPTY_PLACEHOLDER: &str = "Start typing, or press Ctrl+O to open a file";

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();
    let [text_area, message_area, status_area] = split_editor_rows(area);

    render_text(model, frame, text_area);
    status::render_toast_bar(model, frame, message_area);
    status::render_status_bar(model, frame, status_area);

    if model.help_visible {
        overlays::render_help_overlay(model, frame, area);
    }
}

/// Text area, message line and status bar, top to bottom.
pub fn split_editor_rows(area: Rect) -> [Rect; 3] {
    Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area)
}

fn render_text(model: &Model, frame: &mut Frame, area: Rect) {
    let gutter = model.gutter_width().min(area.width);
    let [gutter_area, body_area] =
        Layout::horizontal([Constraint::Length(gutter), Constraint::Min(0)]).areas(area);

    let buffer = &model.buffer;
    let cursor = buffer.cursor();
    let selection = buffer.selection_range();
    let rows = usize::from(area.height);
    let start = model.scroll_offset;
    let end = (start + rows).min(buffer.line_count());
    let width = usize::from(body_area.width);
    let tab_stop = model.tab_stop();

    let mut numbers: Vec<Line> = Vec::with_capacity(rows);
    let mut content: Vec<Line> = Vec::with_capacity(rows);
    for line_idx in start..end {
        let text = buffer.line_at(line_idx).unwrap_or_default();

        let number_style = if line_idx == cursor.line {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let digits = usize::from(gutter.saturating_sub(1));
        numbers.push(Line::styled(
            format!("{:>digits$} ", line_idx + 1),
            number_style,
        ));

        let selected = selection.and_then(|(from, to)| {
            if line_idx < from.line || line_idx > to.line {
                return None;
            }
            let lo = if line_idx == from.line { from.col } else { 0 };
            let hi = if line_idx == to.line { to.col } else { usize::MAX };
            Some(lo..hi)
        });
        content.push(visible_line(
            &text,
            tab_stop,
            model.col_offset,
            width,
            selected,
        ));
    }
    if buffer.is_empty()
        && let Some(first) = content.first_mut()
    {
        *first = Line::styled(EMPTY_PLACEHOLDER, Style::default().fg(Color::DarkGray));
    }

    frame.render_widget(Clear, area);
    if gutter > 0 {
        frame.render_widget(Paragraph::new(numbers), gutter_area);
    }
    frame.render_widget(Paragraph::new(content), body_area);

    if !model.help_visible {
        let row = cursor.line.checked_sub(start).filter(|r| *r < rows);
        let col = model
            .cursor_display_col()
            .checked_sub(model.col_offset)
            .filter(|c| *c < width);
        if let (Some(row), Some(col)) = (row, col) {
            let x = body_area.x + u16::try_from(col).unwrap_or(u16::MAX);
            let y = body_area.y + u16::try_from(row).unwrap_or(u16::MAX);
            frame.set_cursor_position((x, y));
        }
    }
}

/// The part of `text` between display columns `col_offset` and
/// `col_offset + width`, with tabs expanded and `selected` bytes highlighted.
///
/// A selection that runs past the end of the line shows one highlighted
/// cell for the line break.
pub fn visible_line(
    text: &str,
    tab_stop: usize,
    col_offset: usize,
    width: usize,
    selected: Option<Range<usize>>,
) -> Line<'static> {
    let selection_style = Style::default().bg(Color::Blue).fg(Color::White);
    let limit = col_offset + width;
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut run = String::new();
    let mut run_selected = false;
    let mut col = 0;

    let mut push = |piece: &str, is_selected: bool, run: &mut String, run_selected: &mut bool| {
        if is_selected != *run_selected && !run.is_empty() {
            let style = if *run_selected {
                selection_style
            } else {
                Style::default()
            };
            spans.push(Span::styled(std::mem::take(run), style));
        }
        *run_selected = is_selected;
        run.push_str(piece);
    };

    for (idx, ch) in text.char_indices() {
        if col >= limit {
            break;
        }
        let w = char_width_at(ch, col, tab_stop);
        let is_selected = selected.as_ref().is_some_and(|r| r.contains(&idx));
        if w == 0 {
            // Combining marks ride on the previous cell.
            if !ch.is_control() && col > col_offset {
                push(ch.encode_utf8(&mut [0; 4]), is_selected, &mut run, &mut run_selected);
            }
        } else if col + w > col_offset {
            if ch == '\t' || col < col_offset || col + w > limit {
                // Partially visible wide chars and tabs become blanks.
                let first = col.max(col_offset);
                let last = (col + w).min(limit);
                push(&" ".repeat(last - first), is_selected, &mut run, &mut run_selected);
            } else {
                push(ch.encode_utf8(&mut [0; 4]), is_selected, &mut run, &mut run_selected);
            }
        }
        col += w;
    }

    let selects_break = selected.is_some_and(|r| r.end > text.len());
    if selects_break && col >= col_offset && col < limit {
        push(" ", true, &mut run, &mut run_selected);
    }

    if !run.is_empty() {
        let style = if run_selected {
            selection_style
        } else {
            Style::default()
        };
        spans.push(Span::styled(run, style));
    }
    Line::from(spans)
}
