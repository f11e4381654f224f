//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering
//!
//! File commands need dialogs and the filesystem, so they bypass `update`
//! and run against the document session as side effects.

mod dialogs;
mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{Model, ToastLevel};
pub use update::{Message, Motion, update};

use std::path::PathBuf;

use crate::config::DEFAULT_TAB_WIDTH;

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    file_path: Option<PathBuf>,
    line_numbers: bool,
    tab_width: usize,
    config_global_path: Option<PathBuf>,
    config_local_path: Option<PathBuf>,
}

impl App {
    /// Create a new application, optionally opening `file_path` at startup.
    pub const fn new(file_path: Option<PathBuf>) -> Self {
        Self {
            file_path,
            line_numbers: true,
            tab_width: DEFAULT_TAB_WIDTH,
            config_global_path: None,
            config_local_path: None,
        }
    }

    /// Show or hide the line-number gutter.
    #[must_use]
    pub const fn with_line_numbers(mut self, enabled: bool) -> Self {
        self.line_numbers = enabled;
        self
    }

    /// Spaces inserted for Tab; 0 inserts a literal tab.
    #[must_use]
    pub const fn with_tab_width(mut self, width: usize) -> Self {
        self.tab_width = width;
        self
    }

    /// Set config paths to show in help.
    #[must_use]
    pub fn with_config_paths(
        mut self,
        global_path: Option<PathBuf>,
        local_path: Option<PathBuf>,
    ) -> Self {
        self.config_global_path = global_path;
        self.config_local_path = local_path;
        self
    }
}
