use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{Model, ToastLevel};
use crate::editor::display::display_width;

/// Left side: document name and modified marker. Right side: cursor position.
pub fn status_text(model: &Model, width: usize) -> String {
    let dirty_indicator = if model.session.is_dirty() {
        " [modified]"
    } else {
        ""
    };
    let left = format!(" {}{dirty_indicator}", model.session.display_name());

    let cursor = model.buffer.cursor();
    let right = format!(
        "Ln {}, Col {}  F1:help ",
        cursor.line + 1,
        model.cursor_display_col() + 1
    );

    let used = display_width(&left, 1) + display_width(&right, 1);
    let gap = width.saturating_sub(used).max(2);
    format!("{left}{}{right}", " ".repeat(gap))
}

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let status = status_text(model, usize::from(area.width));
    let status_bar =
        Paragraph::new(status).style(Style::default().bg(Color::DarkGray).fg(Color::White));
    frame.render_widget(status_bar, area);
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = match level {
        ToastLevel::Info => ("[info]", Style::default().fg(Color::Cyan)),
        ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        ToastLevel::Error => ("[error]", Style::default().bg(Color::Red).fg(Color::White)),
    };
    let toast = Paragraph::new(format!("{prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}
