// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. session::SessionError)
    clippy::module_name_repetitions
)]

//! # Quill
//!
//! A minimal terminal text editor.
//!
//! Quill edits one plain-text document at a time. It tracks whether the
//! document has unsaved changes, asks before throwing them away, and writes
//! files atomically so a failed save never leaves a truncated file behind.
//!
//! ## Architecture
//!
//! Quill uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! The document session is independent of the terminal: it talks to its
//! text buffer, dialogs and filesystem through traits.
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`session`]: Document path, dirty tracking and file operations
//! - [`editor`]: Rope-backed text buffer
//! - [`ui`]: Terminal UI components
//! - [`config`]: Saved default flags

pub mod app;
pub mod config;
pub mod editor;
pub mod session;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::editor::EditorBuffer;
    pub use crate::session::{Session, SessionContext, SessionError};
}
