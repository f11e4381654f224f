//! The document session: which file is open and whether it has unsaved edits.
//!
//! [`Session`] holds only the path and the dirty flag. The text buffer,
//! file dialogs, prompts and filesystem are collaborators passed in through
//! a [`SessionContext`], so every transition can be exercised without a
//! terminal.
//!
//! States are the cross product of untitled/named and clean/dirty. A fresh
//! session is untitled and clean.

mod error;
mod fs;

pub use error::SessionError;
pub use fs::OsFileSystem;

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// Text storage the session reads from and writes into.
pub trait TextBuffer {
    fn text(&self) -> String;
    fn set_text(&mut self, text: &str);
    fn clear(&mut self);
}

/// Path pickers. `None` (or an empty path) means the user cancelled.
pub trait FileDialogs {
    fn choose_open_path(&mut self) -> Option<PathBuf>;
    fn choose_save_path(&mut self, suggested: Option<&Path>) -> Option<PathBuf>;
}

/// Modal messages shown to the user.
pub trait Prompter {
    /// Show an error the user must acknowledge.
    fn warn(&mut self, message: &str);

    /// Ask whether to save, discard, or cancel.
    fn confirm3(&mut self, message: &str) -> Choice;

    /// Report a transient status such as "Saved".
    fn inform(&mut self, _message: &str) {}
}

/// Everything the session needs from the user interface.
pub trait Interaction: FileDialogs + Prompter {}

impl<T: FileDialogs + Prompter + ?Sized> Interaction for T {}

/// Persistent storage for documents.
pub trait FileSystem {
    /// Read `path` as UTF-8 text, verbatim.
    ///
    /// # Errors
    ///
    /// Fails when the file is missing, unreadable or not valid UTF-8.
    fn read_utf8(&self, path: &Path) -> Result<String, SessionError>;

    /// Replace `path` with `text` so that no partial file is ever visible.
    ///
    /// # Errors
    ///
    /// Fails on any I/O error; the previous content is left intact.
    fn atomic_write_utf8(&self, path: &Path, text: &str) -> Result<(), SessionError>;
}

/// Answer to the unsaved-changes prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Save,
    Discard,
    Cancel,
}

/// Whether a destructive operation may go ahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Proceed,
    Abort,
}

impl Decision {
    pub const fn is_proceed(self) -> bool {
        matches!(self, Self::Proceed)
    }
}

/// Collaborators borrowed for the duration of one session operation.
pub struct SessionContext<'a> {
    pub buffer: &'a mut dyn TextBuffer,
    pub ui: &'a mut dyn Interaction,
    pub fs: &'a dyn FileSystem,
}

/// Path and dirty state of the open document.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Session {
    path: Option<PathBuf>,
    dirty: bool,
    /// Pre-filled answer for the first Save As of an untitled document.
    suggested_path: Option<PathBuf>,
}

impl Session {
    /// An untitled, clean session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember a path to offer when an untitled document is first saved.
    #[must_use]
    pub fn with_suggested_path(mut self, path: Option<PathBuf>) -> Self {
        self.suggested_path = path.filter(|p| !p.as_os_str().is_empty());
        self
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub const fn is_untitled(&self) -> bool {
        self.path.is_none()
    }

    /// File name for titles and status bars.
    pub fn display_name(&self) -> String {
        self.path
            .as_deref()
            .and_then(Path::file_name)
            .map_or_else(|| "untitled".to_string(), |n| n.to_string_lossy().to_string())
    }

    /// Record a content change. Returns `true` when the session just became dirty.
    pub fn notify_edited(&mut self) -> bool {
        if self.dirty {
            return false;
        }
        self.dirty = true;
        debug!(document = %self.display_name(), "session dirty");
        true
    }

    /// Start an empty untitled document, asking first if there are unsaved edits.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UserCancelled`] when the user backs out.
    pub fn new_document(&mut self, cx: &mut SessionContext<'_>) -> Result<(), SessionError> {
        if !self.confirm_discard_if_dirty(cx).is_proceed() {
            return Err(SessionError::UserCancelled);
        }
        cx.buffer.clear();
        self.path = None;
        self.suggested_path = None;
        self.dirty = false;
        debug!("new untitled document");
        Ok(())
    }

    /// Ask for a file and open it.
    ///
    /// # Errors
    ///
    /// Cancellation, or the read failure already shown to the user.
    pub fn open_with_dialog(&mut self, cx: &mut SessionContext<'_>) -> Result<(), SessionError> {
        if !self.confirm_discard_if_dirty(cx).is_proceed() {
            return Err(SessionError::UserCancelled);
        }
        let candidate = non_empty(cx.ui.choose_open_path()).ok_or(SessionError::UserCancelled)?;
        self.load(cx, &candidate)
    }

    /// Replace the document with the contents of `candidate`.
    ///
    /// On failure the path, dirty flag and buffer are exactly as before.
    ///
    /// # Errors
    ///
    /// Cancellation, or the read failure already shown to the user.
    pub fn open(
        &mut self,
        cx: &mut SessionContext<'_>,
        candidate: &Path,
    ) -> Result<(), SessionError> {
        let candidate =
            non_empty(Some(candidate.to_path_buf())).ok_or(SessionError::UserCancelled)?;
        if !self.confirm_discard_if_dirty(cx).is_proceed() {
            return Err(SessionError::UserCancelled);
        }
        self.load(cx, &candidate)
    }

    /// Save to the current path, or ask for one if the document is untitled.
    ///
    /// # Errors
    ///
    /// Cancellation, or the write failure already shown to the user.
    pub fn save(&mut self, cx: &mut SessionContext<'_>) -> Result<(), SessionError> {
        match self.path.clone() {
            Some(path) => self.write_to_file(cx, &path),
            None => self.save_as(cx),
        }
    }

    /// Ask for a target path and save there.
    ///
    /// # Errors
    ///
    /// Cancellation, or the write failure already shown to the user.
    pub fn save_as(&mut self, cx: &mut SessionContext<'_>) -> Result<(), SessionError> {
        let suggested = self.path.as_deref().or(self.suggested_path.as_deref());
        let target =
            non_empty(cx.ui.choose_save_path(suggested)).ok_or(SessionError::UserCancelled)?;
        self.write_to_file(cx, &target)
    }

    /// Atomically write the buffer to `target`.
    ///
    /// A failed write leaves both the path and the dirty flag untouched.
    ///
    /// # Errors
    ///
    /// The write failure, after it has been shown to the user.
    pub fn write_to_file(
        &mut self,
        cx: &mut SessionContext<'_>,
        target: &Path,
    ) -> Result<(), SessionError> {
        let text = cx.buffer.text();
        match cx.fs.atomic_write_utf8(target, &text) {
            Ok(()) => {
                self.path = Some(target.to_path_buf());
                self.suggested_path = None;
                self.dirty = false;
                debug!(path = %target.display(), bytes = text.len(), "saved");
                cx.ui.inform(&format!("Saved {}", target.display()));
                Ok(())
            }
            Err(err) => {
                warn!(path = %target.display(), error = %err, "save failed");
                cx.ui.warn(&format!("Failed to save the file.\n{err}"));
                Err(err)
            }
        }
    }

    /// Gate for destructive operations.
    ///
    /// Clean sessions proceed immediately. Dirty ones ask the user; choosing
    /// Save proceeds only if the save succeeds.
    pub fn confirm_discard_if_dirty(&mut self, cx: &mut SessionContext<'_>) -> Decision {
        if !self.dirty {
            return Decision::Proceed;
        }
        let message = format!(
            "{} has unsaved changes. Save them first?",
            self.display_name()
        );
        match cx.ui.confirm3(&message) {
            Choice::Save => {
                if self.save(cx).is_ok() {
                    Decision::Proceed
                } else {
                    Decision::Abort
                }
            }
            Choice::Discard => {
                debug!(document = %self.display_name(), "discarding unsaved changes");
                Decision::Proceed
            }
            Choice::Cancel => Decision::Abort,
        }
    }

    /// The window is about to close; same gate as any destructive operation.
    pub fn request_close(&mut self, cx: &mut SessionContext<'_>) -> Decision {
        self.confirm_discard_if_dirty(cx)
    }

    fn load(&mut self, cx: &mut SessionContext<'_>, candidate: &Path) -> Result<(), SessionError> {
        match cx.fs.read_utf8(candidate) {
            Ok(text) => {
                cx.buffer.set_text(&text);
                self.path = Some(candidate.to_path_buf());
                self.suggested_path = None;
                self.dirty = false;
                debug!(path = %candidate.display(), bytes = text.len(), "opened");
                cx.ui.inform(&format!("Opened {}", candidate.display()));
                Ok(())
            }
            Err(err) => {
                warn!(path = %candidate.display(), error = %err, "open failed");
                cx.ui.warn(&format!("Failed to open the file.\n{err}"));
                Err(err)
            }
        }
    }
}

/// Dialogs report "cancelled" as either `None` or an empty path.
fn non_empty(path: Option<PathBuf>) -> Option<PathBuf> {
    path.filter(|p| !p.as_os_str().is_empty())
}
