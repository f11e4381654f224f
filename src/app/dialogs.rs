//! Modal dialogs drawn in the terminal.
//!
//! The session calls its collaborators synchronously, so each dialog runs a
//! small nested event loop until the user answers. The last editor frame is
//! kept as a backdrop so the document stays visible behind the dialog.

use std::fs;
use std::path::{MAIN_SEPARATOR, Path, PathBuf, is_separator};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;
use ratatui::buffer::Buffer;
use tracing::warn;

use crate::session::{Choice, FileDialogs, Prompter};
use crate::ui::Dialog;

/// What happened while dialogs were open that the editor still has to apply.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(super) struct DialogOutcome {
    /// Status messages from [`Prompter::inform`].
    pub(super) notices: Vec<String>,
    /// Latest terminal size seen by a dialog loop.
    pub(super) resize: Option<(u16, u16)>,
}

impl DialogOutcome {
    /// Remember events the dialogs consume but the editor must not miss.
    pub(super) fn observe(&mut self, event: &Event) {
        if let Event::Resize(width, height) = *event {
            self.resize = Some((width, height));
        }
    }
}

/// [`FileDialogs`] and [`Prompter`] backed by the terminal.
pub(super) struct TerminalUi<'t> {
    terminal: &'t mut DefaultTerminal,
    backdrop: Buffer,
    outcome: DialogOutcome,
}

impl<'t> TerminalUi<'t> {
    pub(super) fn new(terminal: &'t mut DefaultTerminal, backdrop: Buffer) -> Self {
        Self {
            terminal,
            backdrop,
            outcome: DialogOutcome::default(),
        }
    }

    /// Notices and resizes collected since the dialogs started.
    pub(super) fn finish(self) -> DialogOutcome {
        self.outcome
    }

    fn draw(&mut self, dialog: &Dialog) -> std::io::Result<()> {
        let backdrop = &self.backdrop;
        self.terminal.draw(|frame| {
            if frame.area() == backdrop.area {
                frame.buffer_mut().merge(backdrop);
            }
            crate::ui::render_dialog(dialog, frame);
        })?;
        Ok(())
    }

    /// Redraw `dialog` and feed it events until `step` yields an answer.
    ///
    /// Terminal errors end the dialog with `None`.
    fn run_modal<T>(
        &mut self,
        mut dialog: Dialog,
        mut step: impl FnMut(&mut Dialog, &Event) -> Option<T>,
    ) -> Option<T> {
        loop {
            if let Err(err) = self.draw(&dialog) {
                warn!(error = %err, "failed to draw dialog");
                return None;
            }
            let event = match event::read() {
                Ok(event) => event,
                Err(err) => {
                    warn!(error = %err, "failed to read dialog input");
                    return None;
                }
            };
            self.outcome.observe(&event);
            if let Some(answer) = step(&mut dialog, &event) {
                return Some(answer);
            }
        }
    }

    fn ask_path(&mut self, title: &str, initial: Option<&Path>) -> Option<PathBuf> {
        let dialog = Dialog::PathInput {
            title: title.to_string(),
            input: initial.map(|p| p.display().to_string()).unwrap_or_default(),
        };
        self.run_modal(dialog, |dialog, event| {
            let Dialog::PathInput { input, .. } = dialog else {
                return None;
            };
            if let Event::Paste(text) = event {
                input.extend(text.chars().filter(|c| !c.is_control()));
                return None;
            }
            key_press(event).and_then(|key| path_input_key(input, key))
        })
        .flatten()
    }
}

impl FileDialogs for TerminalUi<'_> {
    fn choose_open_path(&mut self) -> Option<PathBuf> {
        self.ask_path("Open File", None)
    }

    fn choose_save_path(&mut self, suggested: Option<&Path>) -> Option<PathBuf> {
        self.ask_path("Save As", suggested)
    }
}

impl Prompter for TerminalUi<'_> {
    fn warn(&mut self, message: &str) {
        let dialog = Dialog::Warning {
            message: message.to_string(),
        };
        let _ = self.run_modal(dialog, |_, event| key_press(event).and_then(warning_key));
    }

    fn confirm3(&mut self, message: &str) -> Choice {
        let dialog = Dialog::Confirm {
            message: message.to_string(),
            selected: Choice::Save,
        };
        self.run_modal(dialog, |dialog, event| match (dialog, key_press(event)) {
            (Dialog::Confirm { selected, .. }, Some(key)) => confirm_key(selected, key),
            _ => None,
        })
        .unwrap_or(Choice::Cancel)
    }

    fn inform(&mut self, message: &str) {
        self.outcome.notices.push(message.to_string());
    }
}

fn key_press(event: &Event) -> Option<KeyEvent> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(*key),
        _ => None,
    }
}

fn is_interrupt(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('c')) && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Keys for the save/discard/cancel prompt. Arrows move the highlight.
fn confirm_key(selected: &mut Choice, key: KeyEvent) -> Option<Choice> {
    if is_interrupt(key) {
        return Some(Choice::Cancel);
    }
    match key.code {
        KeyCode::Char('s' | 'S' | 'y' | 'Y') => Some(Choice::Save),
        KeyCode::Char('d' | 'D' | 'n' | 'N') => Some(Choice::Discard),
        KeyCode::Char('c' | 'C') | KeyCode::Esc => Some(Choice::Cancel),
        KeyCode::Enter => Some(*selected),
        KeyCode::Right | KeyCode::Tab => {
            *selected = match selected {
                Choice::Save => Choice::Discard,
                Choice::Discard => Choice::Cancel,
                Choice::Cancel => Choice::Save,
            };
            None
        }
        KeyCode::Left | KeyCode::BackTab => {
            *selected = match selected {
                Choice::Save => Choice::Cancel,
                Choice::Discard => Choice::Save,
                Choice::Cancel => Choice::Discard,
            };
            None
        }
        _ => None,
    }
}

fn warning_key(key: KeyEvent) -> Option<()> {
    matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')).then_some(())
}

/// Line editing for the path prompt.
///
/// Returns `Some(Some(path))` on accept, `Some(None)` on cancel and `None`
/// while the user is still typing.
fn path_input_key(input: &mut String, key: KeyEvent) -> Option<Option<PathBuf>> {
    if is_interrupt(key) {
        return Some(None);
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter => {
            let trimmed = input.trim();
            Some((!trimmed.is_empty()).then(|| PathBuf::from(trimmed)))
        }
        KeyCode::Esc => Some(None),
        KeyCode::Backspace => {
            input.pop();
            None
        }
        KeyCode::Tab => {
            if let Some(completed) = complete_path(input) {
                *input = completed;
            }
            None
        }
        KeyCode::Char('u') if ctrl => {
            input.clear();
            None
        }
        KeyCode::Char(ch) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
            input.push(ch);
            None
        }
        _ => None,
    }
}

/// Extend `input` to the longest prefix shared by matching directory entries.
///
/// A single match is completed fully, with a trailing separator for
/// directories. Hidden entries only match when the prefix starts with `.`.
fn complete_path(input: &str) -> Option<String> {
    let split = input.rfind(is_separator).map_or(0, |idx| idx + 1);
    let (dir_part, prefix) = input.split_at(split);
    let dir = if dir_part.is_empty() {
        Path::new(".")
    } else {
        Path::new(dir_part)
    };

    let mut candidates: Vec<(String, bool)> = fs::read_dir(dir)
        .ok()?
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let name = entry.file_name().into_string().ok()?;
            let visible = prefix.starts_with('.') || !name.starts_with('.');
            (visible && name.starts_with(prefix)).then(|| {
                let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());
                (name, is_dir)
            })
        })
        .collect();
    candidates.sort();

    match candidates.as_slice() {
        [] => None,
        [(name, is_dir)] => {
            let suffix = if *is_dir {
                MAIN_SEPARATOR.to_string()
            } else {
                String::new()
            };
            Some(format!("{dir_part}{name}{suffix}"))
        }
        [(first, _), rest @ ..] => {
            let common = rest.iter().fold(first.as_str(), |acc, (name, _)| {
                let len = acc
                    .char_indices()
                    .zip(name.chars())
                    .take_while(|((_, a), b)| a == b)
                    .last()
                    .map_or(0, |((idx, ch), _)| idx + ch.len_utf8());
                &acc[..len]
            });
            (common.len() > prefix.len()).then(|| format!("{dir_part}{common}"))
        }
    }
}
