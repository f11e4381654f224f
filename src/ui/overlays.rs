use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap};

use crate::app::Model;
use crate::editor::display::display_width;
use crate::session::Choice;

/// A modal dialog and its in-progress answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialog {
    /// Save / Discard / Cancel prompt with the highlighted button.
    Confirm { message: String, selected: Choice },
    /// Error the user must acknowledge.
    Warning { message: String },
    /// Single-line path entry.
    PathInput { title: String, input: String },
}

const DIALOG_MIN_WIDTH: u16 = 44;

pub fn render_dialog(dialog: &Dialog, frame: &mut Frame) {
    let area = frame.area();
    match dialog {
        Dialog::Confirm { message, selected } => {
            render_confirm_dialog(message, *selected, frame, area);
        }
        Dialog::Warning { message } => render_warning_dialog(message, frame, area),
        Dialog::PathInput { title, input } => render_path_dialog(title, input, frame, area),
    }
}

fn render_confirm_dialog(message: &str, selected: Choice, frame: &mut Frame, area: Rect) {
    let button = |label: &'static str, choice: Choice| {
        if choice == selected {
            Span::styled(
                label,
                Style::default()
                    .bg(Color::Yellow)
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::raw(label)
        }
    };
    let mut lines = message_lines(message);
    lines.push(Line::raw(""));
    lines.push(
        Line::from(vec![
            button(" [S]ave ", Choice::Save),
            Span::raw("  "),
            button(" [D]iscard ", Choice::Discard),
            Span::raw("  "),
            button(" [C]ancel ", Choice::Cancel),
        ])
        .alignment(Alignment::Center),
    );

    let block = dialog_block("Unsaved Changes", Color::Yellow);
    render_popup(lines, block, frame, area);
}

fn render_warning_dialog(message: &str, frame: &mut Frame, area: Rect) {
    let mut lines = message_lines(message);
    lines.push(Line::raw(""));
    lines.push(Line::styled(
        "Enter to dismiss",
        Style::default().fg(Color::Indexed(245)),
    ));

    let block = dialog_block("Error", Color::Red);
    render_popup(lines, block, frame, area);
}

fn render_path_dialog(title: &str, input: &str, frame: &mut Frame, area: Rect) {
    let popup_width = area.width.saturating_sub(8).clamp(DIALOG_MIN_WIDTH, 72);
    let popup = centered_popup_rect(popup_width, 5, area);
    let inner_width = usize::from(popup.width.saturating_sub(4));

    // Keep the end of a long path in view.
    let prompt_width = inner_width.saturating_sub(3);
    let mut shown = input;
    while display_width(shown, 1) > prompt_width {
        let mut chars = shown.chars();
        chars.next();
        shown = chars.as_str();
    }

    let lines = vec![
        Line::from(vec![
            Span::styled("> ", Style::default().fg(Color::Yellow)),
            Span::raw(shown.to_string()),
        ]),
        Line::raw(""),
        Line::styled(
            "Enter accept \u{2502} Tab complete \u{2502} Esc cancel",
            Style::default().fg(Color::Indexed(245)),
        ),
    ];

    let block = dialog_block(title, Color::Cyan);
    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);

    let cursor_col = u16::try_from(2 + display_width(shown, 1)).unwrap_or(u16::MAX);
    frame.set_cursor_position((popup.x + 2 + cursor_col, popup.y + 1));
}

fn message_lines(message: &str) -> Vec<Line<'static>> {
    message
        .lines()
        .map(|line| Line::raw(line.to_string()))
        .collect()
}

fn dialog_block(title: &str, accent: Color) -> Block<'static> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent))
        .padding(Padding::horizontal(1))
        .style(Style::default().bg(Color::Black).fg(Color::White))
}

/// Size a popup to fit `lines`, wrapping long ones.
fn render_popup(lines: Vec<Line<'static>>, block: Block<'static>, frame: &mut Frame, area: Rect) {
    let longest = lines.iter().map(Line::width).max().unwrap_or(0);
    let wanted = u16::try_from(longest + 4).unwrap_or(u16::MAX);
    let popup_width = wanted
        .clamp(DIALOG_MIN_WIDTH, 72)
        .min(area.width.saturating_sub(4).max(DIALOG_MIN_WIDTH));
    let inner_width = usize::from(popup_width.saturating_sub(4)).max(1);
    let rows: usize = lines
        .iter()
        .map(|line| line.width().div_ceil(inner_width).max(1))
        .sum();
    let popup_height = u16::try_from(rows + 2).unwrap_or(u16::MAX);
    let popup = centered_popup_rect(popup_width, popup_height, area);

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        popup,
    );
}

pub fn render_help_overlay(model: &Model, frame: &mut Frame, area: Rect) {
    let popup_width = area.width.saturating_sub(12).max(48);
    let popup_height = area.height.saturating_sub(6).max(12);
    let popup = centered_popup_rect(popup_width, popup_height, area);

    let global_cfg = model
        .config_global_path
        .as_ref()
        .map_or_else(|| "<unknown>".to_string(), |p| p.display().to_string());
    let local_cfg = model
        .config_local_path
        .as_ref()
        .map_or_else(|| "<none>".to_string(), |p| p.display().to_string());

    let section_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let dim_style = Style::default().fg(Color::Indexed(245));

    let mut all_lines: Vec<Line> = Vec::new();

    // File
    all_lines.push(Line::styled("File", section_style));
    all_lines.push(Line::raw("  Ctrl-n              New document"));
    all_lines.push(Line::raw("  Ctrl-o              Open file"));
    all_lines.push(Line::raw("  Ctrl-s              Save"));
    all_lines.push(Line::raw("  Ctrl-Shift-s / F12  Save as"));
    all_lines.push(Line::raw("  Ctrl-q              Quit"));
    all_lines.push(Line::raw(""));

    // Editing
    all_lines.push(Line::styled("Editing", section_style));
    all_lines.push(Line::raw("  Arrows, Home/End    Move"));
    all_lines.push(Line::raw("  Ctrl+Left/Right     Word movement"));
    all_lines.push(Line::raw("  Ctrl+Home/End       Document start / end"));
    all_lines.push(Line::raw("  PageUp/PageDown     Page"));
    all_lines.push(Line::raw("  Shift+movement      Select"));
    all_lines.push(Line::raw("  Ctrl-a              Select all"));
    all_lines.push(Line::raw("  Ctrl-c / Ctrl-x     Copy / cut"));
    all_lines.push(Line::raw("  Ctrl-v              Paste"));
    all_lines.push(Line::raw("  Mouse click/drag    Move / select"));
    all_lines.push(Line::raw(""));

    // Dialogs
    all_lines.push(Line::styled("Dialogs", section_style));
    all_lines.push(Line::raw("  s / d / c           Save / discard / cancel"));
    all_lines.push(Line::raw("  Tab                 Complete path"));
    all_lines.push(Line::raw("  Esc                 Cancel"));
    all_lines.push(Line::raw(""));

    // Other
    all_lines.push(Line::styled("Other", section_style));
    all_lines.push(Line::raw("  Ctrl-l              Redraw"));
    all_lines.push(Line::raw("  F1                  Toggle help"));
    all_lines.push(Line::raw(""));

    // Config
    all_lines.push(Line::styled("Config", section_style));
    all_lines.push(Line::raw(format!("  Global: {global_cfg}")));
    all_lines.push(Line::raw(format!("  Local override: {local_cfg}")));

    let block = Block::default()
        .title("Help")
        .borders(Borders::ALL)
        .padding(Padding::uniform(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));

    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);

    // Inner area: border(1) + padding(1) on each side = 4
    let inner = Rect::new(
        popup.x + 2,
        popup.y + 2,
        popup.width.saturating_sub(4),
        popup.height.saturating_sub(4),
    );

    // Reserve 1 row at bottom for footer hint
    let content_height_u16 = inner.height.saturating_sub(1);
    let content_height = content_height_u16 as usize;
    let max_scroll = all_lines.len().saturating_sub(content_height);
    let scroll = model.help_scroll_offset.min(max_scroll);

    let end = (scroll + content_height).min(all_lines.len());
    let visible: Vec<Line> = all_lines[scroll..end].to_vec();

    let content_area = Rect::new(inner.x, inner.y, inner.width, content_height_u16);
    frame.render_widget(Paragraph::new(visible), content_area);

    // Footer hint
    let footer_area = Rect::new(inner.x, inner.y + content_height_u16, inner.width, 1);
    let footer = Line::styled("j/k scroll \u{2502} Esc closes", dim_style);
    frame.render_widget(Paragraph::new(footer), footer_area);
}

fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}
