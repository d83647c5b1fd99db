//! Text storage and the editing operations layered on top of it.
//!
//! - [`buffer`]: line/rune storage with primitive mutations
//! - [`edit`]: cursor-aware edits that record undoable commands
//! - [`keymap`]: key event to edit mapping

pub mod buffer;
pub mod keymap;

mod edit;

pub use buffer::{FILLER, Padding, Position, TextBuffer, WriteMode, WriteOutcome};
pub use keymap::{DefaultEditor, EditAction, Editor, EditorFn};
