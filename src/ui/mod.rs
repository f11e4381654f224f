//! Terminal UI components.
//!
//! Rendering is a pure function of the [`Model`](crate::app::Model); modal
//! dialogs are rendered from their own [`Dialog`] state on top of the last
//! editor frame.

mod overlays;
mod render;
mod status;

pub use overlays::{Dialog, render_dialog};
pub use render::{EMPTY_PLACEHOLDER, render, split_editor_rows, visible_line};
pub use status::status_text;
