use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::config::DEFAULT_TAB_WIDTH;
use crate::editor::EditorBuffer;
use crate::editor::display::display_width;
use crate::session::Session;

/// Display tab stop used when Tab inserts a literal tab character.
const LITERAL_TAB_STOP: usize = 8;

/// Rows below the text area: message line and status bar.
const CHROME_ROWS: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// The complete application state.
///
/// All state lives here - no global or scattered state.
#[derive(Debug)]
pub struct Model {
    /// Text being edited
    pub buffer: EditorBuffer,
    /// Path and dirty state of the document
    pub session: Session,
    /// First visible buffer line
    pub scroll_offset: usize,
    /// First visible display column
    pub col_offset: usize,
    /// Terminal width in columns
    pub width: u16,
    /// Terminal height in rows
    pub height: u16,
    /// Whether the line-number gutter is shown
    pub line_numbers: bool,
    /// Spaces inserted for Tab; 0 inserts a literal tab
    pub tab_width: usize,
    /// Internal clipboard register
    pub clipboard: Option<String>,
    /// Text copied since the last frame, to forward to the system clipboard
    pub(super) outgoing_clipboard: Option<String>,
    /// Whether help overlay is visible
    pub help_visible: bool,
    /// Scroll offset inside the help overlay
    pub help_scroll_offset: usize,
    /// Global config path shown in help
    pub config_global_path: Option<PathBuf>,
    /// Local override path shown in help
    pub config_local_path: Option<PathBuf>,
    toast: Option<Toast>,
    /// Whether the app should quit
    pub should_quit: bool,
}

impl Model {
    /// Create an empty, untitled model for a terminal of the given size.
    pub fn new(terminal_size: (u16, u16)) -> Self {
        Self {
            width: terminal_size.0,
            height: terminal_size.1,
            ..Self::default()
        }
    }

    /// Display width of a tab character.
    pub const fn tab_stop(&self) -> usize {
        if self.tab_width == 0 {
            LITERAL_TAB_STOP
        } else {
            self.tab_width
        }
    }

    /// Width of the line-number gutter including its separator column.
    pub fn gutter_width(&self) -> u16 {
        if !self.line_numbers {
            return 0;
        }
        let digits = self.buffer.line_count().max(1).to_string().len();
        u16::try_from(digits + 1).unwrap_or(u16::MAX)
    }

    /// Number of buffer lines visible at once.
    pub fn text_rows(&self) -> usize {
        usize::from(self.height.saturating_sub(CHROME_ROWS)).max(1)
    }

    /// Number of display columns available for text.
    pub fn text_cols(&self) -> usize {
        usize::from(self.width.saturating_sub(self.gutter_width())).max(1)
    }

    /// Display column of the cursor within its line.
    pub fn cursor_display_col(&self) -> usize {
        let cursor = self.buffer.cursor();
        let line = self.buffer.line_at(cursor.line).unwrap_or_default();
        let end = cursor.col.min(line.len());
        line.get(..end)
            .map_or(0, |prefix| display_width(prefix, self.tab_stop()))
    }

    /// Terminal window title, marking unsaved changes with `*`.
    pub fn window_title(&self) -> String {
        let marker = if self.session.is_dirty() { "*" } else { "" };
        format!("{}{marker} - quill", self.session.display_name())
    }

    /// Scroll so the cursor is inside the text area.
    pub(super) fn ensure_cursor_visible(&mut self) {
        let cursor = self.buffer.cursor();
        let rows = self.text_rows();
        if cursor.line < self.scroll_offset {
            self.scroll_offset = cursor.line;
        } else if cursor.line >= self.scroll_offset + rows {
            self.scroll_offset = cursor.line + 1 - rows;
        }

        let col = self.cursor_display_col();
        let cols = self.text_cols();
        if col < self.col_offset {
            self.col_offset = col;
        } else if col >= self.col_offset + cols {
            self.col_offset = col + 1 - cols;
        }
    }

    pub(super) fn max_scroll_offset(&self) -> usize {
        self.buffer.line_count().saturating_sub(self.text_rows())
    }

    /// Mark the session dirty after a buffer change.
    pub(super) fn record_edit(&mut self, changed: bool) {
        if changed {
            self.session.notify_edited();
        }
    }

    pub(super) const fn reset_scroll(&mut self) {
        self.scroll_offset = 0;
        self.col_offset = 0;
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + Duration::from_secs(4),
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }
}

// Implement Default for Model to allow std::mem::take
impl Default for Model {
    fn default() -> Self {
        Self {
            buffer: EditorBuffer::empty(),
            session: Session::new(),
            scroll_offset: 0,
            col_offset: 0,
            width: 80,
            height: 24,
            line_numbers: true,
            tab_width: DEFAULT_TAB_WIDTH,
            clipboard: None,
            outgoing_clipboard: None,
            help_visible: false,
            help_scroll_offset: 0,
            config_global_path: None,
            config_local_path: None,
            toast: None,
            should_quit: false,
        }
    }
}
