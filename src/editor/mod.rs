//! Rope-backed text buffer used as the editor's text widget.
//!
//! Provides cursor management, selection and editing primitives,
//! designed for integration into the TEA architecture.

mod buffer;
pub mod display;

pub use buffer::{Cursor, Direction, EditorBuffer};
