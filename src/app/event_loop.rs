use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use crossterm::terminal::SetTitle;
use ratatui::DefaultTerminal;
use ratatui::buffer::Buffer;
use tracing::{debug, trace};

use crate::app::{App, Message, Model, ToastLevel, effects, input, update};
use crate::session::Session;

pub(super) struct ResizeDebouncer {
    delay_ms: u64,
    pending: Option<(u16, u16, u64)>,
}

impl ResizeDebouncer {
    pub(super) const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub(super) const fn queue(&mut self, width: u16, height: u16, now_ms: u64) {
        self.pending = Some((width, height, now_ms));
    }

    pub(super) fn take_ready(&mut self, now_ms: u64) -> Option<(u16, u16)> {
        let (width, height, queued_at) = self.pending?;
        if now_ms.saturating_sub(queued_at) >= self.delay_ms {
            self.pending = None;
            Some((width, height))
        } else {
            None
        }
    }

    pub(super) const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl App {
    /// Run the editor until the user quits.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal initialization or the event loop
    /// encounters an I/O failure.
    pub fn run(&mut self) -> Result<()> {
        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal - quill requires an interactive terminal")?;
        let size = terminal.size()?;

        let mut model = Model::new((size.width, size.height));
        model.line_numbers = self.line_numbers;
        model.tab_width = self.tab_width;
        model
            .config_global_path
            .clone_from(&self.config_global_path);
        model.config_local_path.clone_from(&self.config_local_path);

        let startup = match &self.file_path {
            Some(path) if path.exists() => Some(Message::OpenPath(path.clone())),
            Some(path) => {
                debug!(path = %path.display(), "starting with a new file");
                model.session = Session::new().with_suggested_path(Some(path.clone()));
                model.show_toast(ToastLevel::Info, format!("New file: {}", path.display()));
                None
            }
            None => None,
        };

        let result = execute!(stdout(), EnableBracketedPaste, EnableMouseCapture)
            .context("Failed to configure terminal")
            .and_then(|()| Self::event_loop(&mut terminal, &mut model, startup));

        let _ = execute!(stdout(), DisableMouseCapture, DisableBracketedPaste);
        ratatui::restore();

        result
    }

    fn event_loop(
        terminal: &mut DefaultTerminal,
        model: &mut Model,
        startup: Option<Message>,
    ) -> Result<()> {
        let start = Instant::now();
        let mut resize_debouncer = ResizeDebouncer::new(50);
        let mut backdrop = draw(terminal, model)?;
        let mut title = String::new();
        let mut needs_render = true;

        if let Some(msg) = startup {
            dispatch(terminal, model, &mut backdrop, msg)?;
        }

        loop {
            if model.expire_toast(Instant::now()) {
                needs_render = true;
            }

            let now_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
            if let Some((width, height)) = resize_debouncer.take_ready(now_ms) {
                *model = update(std::mem::take(model), Message::Resize(width, height));
                needs_render = true;
            }

            let window_title = model.window_title();
            if window_title != title {
                execute!(stdout(), SetTitle(&window_title))?;
                title = window_title;
            }

            if needs_render {
                backdrop = draw(terminal, model)?;
                needs_render = false;
            }

            if model.should_quit {
                break;
            }

            let poll_ms = if resize_debouncer.is_pending() { 10 } else { 250 };
            if event::poll(Duration::from_millis(poll_ms))? {
                let event_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                let msg = input::handle_event(&event::read()?, model, event_ms, &mut resize_debouncer);
                if let Some(msg) = msg {
                    dispatch(terminal, model, &mut backdrop, msg)?;
                    needs_render = true;
                }

                // Coalesce key repeat bursts and pastes into a single render.
                while !model.should_quit && event::poll(Duration::from_millis(0))? {
                    let drain_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                    let msg =
                        input::handle_event(&event::read()?, model, drain_ms, &mut resize_debouncer);
                    if let Some(msg) = msg {
                        dispatch(terminal, model, &mut backdrop, msg)?;
                        needs_render = true;
                    }
                }
            }
        }
        Ok(())
    }
}

/// Apply `msg` to the model, then run its side effects.
fn dispatch(
    terminal: &mut DefaultTerminal,
    model: &mut Model,
    backdrop: &mut Buffer,
    msg: Message,
) -> Result<()> {
    trace!(?msg, "message");
    let side_msg = msg.clone();
    *model = update(std::mem::take(model), msg);
    if side_msg.is_file_command() {
        // Dialogs are drawn over the current state, not the last idle frame.
        *backdrop = draw(terminal, model)?;
    }
    effects::handle_message_side_effects(terminal, model, backdrop, &side_msg);
    Ok(())
}

fn draw(terminal: &mut DefaultTerminal, model: &Model) -> Result<Buffer> {
    let completed = terminal.draw(|frame| crate::ui::render(model, frame))?;
    Ok(completed.buffer.clone())
}

#[cfg(test)]
mod tests {
    use super::ResizeDebouncer;

    #[test]
    fn test_resize_debouncer_waits_for_quiet_period() {
        let mut debouncer = ResizeDebouncer::new(50);
        debouncer.queue(100, 30, 1_000);
        assert!(debouncer.is_pending());
        assert_eq!(debouncer.take_ready(1_020), None);
        debouncer.queue(120, 40, 1_030);
        assert_eq!(debouncer.take_ready(1_060), None);
        assert_eq!(debouncer.take_ready(1_080), Some((120, 40)));
        assert!(!debouncer.is_pending());
    }
}
