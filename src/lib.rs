// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. tree::ViewTree)
    clippy::module_name_repetitions
)]

//! # termview
//!
//! Terminal text views with wrapped buffers, cursor navigation and undo
//! history.
//!
//! A [`View`](ui::view::View) owns a [`TextBuffer`](editor::buffer::TextBuffer),
//! the [`Viewport`](ui::viewport::Viewport) that segments it into wrapped view
//! lines, a cursor relative to a scroll origin, and a
//! [`CommandLog`](history::CommandLog) of invertible edits. Views are arranged
//! by name in a [`ViewTree`](ui::tree::ViewTree) and drawn with `ratatui`.
//!
//! ## Modules
//!
//! - [`editor`]: Text storage, edits and the key table
//! - [`history`]: Undo/redo commands with coalescing
//! - [`ui`]: Views, viewport mapping, navigation, tree and rendering
//! - [`app`]: Demo host with its event loop and work queue
//! - [`config`]: Flag files and defaults
//! - [`error`]: Error types

pub mod app;
pub mod config;
pub mod editor;
pub mod error;
pub mod history;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::editor::buffer::{Position, TextBuffer};
    pub use crate::editor::keymap::{DefaultEditor, Editor, EditorFn};
    pub use crate::error::{TreeError, ViewError};
    pub use crate::history::{Command, CommandLog};
    pub use crate::ui::tree::ViewTree;
    pub use crate::ui::view::View;
    pub use crate::ui::viewport::Viewport;
}
