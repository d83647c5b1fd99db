//! Terminal UI components.
//!
//! - [`view`]: the text window with cursor, viewport and history
//! - [`viewport`]: wrapped view lines and coordinate mapping
//! - [`navigator`]: cursor movement primitives
//! - [`tree`]: named views arranged in groups
//! - [`render`]: ratatui widget for drawing a view

pub mod navigator;
pub mod render;
pub mod tree;
pub mod view;
pub mod viewport;

pub use tree::{NodeId, NodeKind, ROOT, ViewTree, inner_area};
pub use view::View;
pub use viewport::{ViewLine, Viewport};

/// Share of the screen width given to the main view when the history panel
/// is shown.
pub const MAIN_WIDTH_PERCENT: u16 = 70;
pub const HISTORY_WIDTH_PERCENT: u16 = 30;
