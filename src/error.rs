//! Error types shared by the buffer, viewport and view tree.

use thiserror::Error;

/// Failures reported by buffer and viewport primitives.
///
/// Navigation never produces these; editor operations swallow the ones that
/// correspond to ordinary boundaries (see [`crate::editor`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ViewError {
    /// A coordinate lies outside the valid range.
    #[error("invalid position ({x}, {y})")]
    InvalidPosition { x: usize, y: usize },
    /// A merge was requested on the final line.
    #[error("cannot merge the last line")]
    LastLine,
    /// Wrapping is enabled but the wrap width is zero.
    #[error("wrap width must be positive")]
    WrapWidthZero,
    /// A lookup found nothing at the requested position.
    #[error("position not found")]
    NotFound,
}

impl ViewError {
    pub(crate) const fn invalid(x: usize, y: usize) -> Self {
        Self::InvalidPosition { x, y }
    }
}

/// Failures reported by the [`crate::ui::tree::ViewTree`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("unknown view: {0}")]
    UnknownView(String),
    #[error("unknown group: {0}")]
    UnknownGroup(String),
    #[error("node names must not be empty")]
    InvalidName,
    #[error("invalid area for {0}")]
    InvalidArea(String),
}
