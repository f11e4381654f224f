use std::io::{Write, stdout};

use base64::Engine;
use ratatui::DefaultTerminal;
use ratatui::buffer::Buffer;
use tracing::debug;

use crate::app::dialogs::{DialogOutcome, TerminalUi};
use crate::app::{Message, Model, ToastLevel, update};
use crate::session::{FileSystem, Interaction, OsFileSystem, SessionContext};

/// Carry out the part of `msg` that touches the outside world.
///
/// `backdrop` is the last rendered frame, drawn behind any modal dialog.
pub(super) fn handle_message_side_effects(
    terminal: &mut DefaultTerminal,
    model: &mut Model,
    backdrop: &Buffer,
    msg: &Message,
) {
    if msg.is_file_command() {
        let mut ui = TerminalUi::new(terminal, backdrop.clone());
        run_file_command(model, msg, &mut ui, &OsFileSystem);
        apply_dialog_outcome(model, ui.finish());
        return;
    }

    if let Some(text) = model.outgoing_clipboard.take() {
        export_clipboard(model, &text);
    }
}

/// Run a file command against the document session.
///
/// Errors have already been shown to the user through `ui` by the time the
/// session returns them, so they are only logged here.
pub(super) fn run_file_command(
    model: &mut Model,
    msg: &Message,
    ui: &mut dyn Interaction,
    fs: &dyn FileSystem,
) {
    let mut cx = SessionContext {
        buffer: &mut model.buffer,
        ui,
        fs,
    };
    let result = match msg {
        Message::NewDocument => model.session.new_document(&mut cx),
        Message::OpenFile => model.session.open_with_dialog(&mut cx),
        Message::OpenPath(path) => model.session.open(&mut cx, path),
        Message::Save => model.session.save(&mut cx),
        Message::SaveAs => model.session.save_as(&mut cx),
        Message::Quit => {
            if model.session.request_close(&mut cx).is_proceed() {
                model.should_quit = true;
            } else {
                debug!("quit aborted");
            }
            return;
        }
        _ => return,
    };

    match result {
        Ok(()) => {
            if matches!(
                msg,
                Message::NewDocument | Message::OpenFile | Message::OpenPath(_)
            ) {
                model.reset_scroll();
            }
            model.ensure_cursor_visible();
        }
        Err(err) if err.is_cancelled() => debug!(?msg, "cancelled"),
        Err(err) => debug!(?msg, error = %err, "file command failed"),
    }
}

/// Fold what the dialogs saw back into the model.
pub(super) fn apply_dialog_outcome(model: &mut Model, outcome: DialogOutcome) {
    if let Some((width, height)) = outcome.resize {
        *model = update(std::mem::take(model), Message::Resize(width, height));
    }
    for notice in outcome.notices {
        model.show_toast(ToastLevel::Info, notice);
    }
}

fn export_clipboard(model: &mut Model, text: &str) {
    if text.is_empty() {
        return;
    }
    let chars = text.chars().count();
    match copy_to_clipboard_osc52(text) {
        Ok(()) => model.show_toast(ToastLevel::Info, format!("Copied {chars} character(s)")),
        Err(err) => model.show_toast(ToastLevel::Error, format!("Copy failed: {err}")),
    }
}

fn copy_to_clipboard_osc52(text: &str) -> std::io::Result<()> {
    let osc = osc52_sequence(text);
    let mut out = stdout();
    out.write_all(osc.as_bytes())?;
    out.flush()
}

fn osc52_sequence(text: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x07")
}
