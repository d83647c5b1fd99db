//! Invertible edit commands.
//!
//! Positions are buffer coordinates of the cursor before the edit ran.

use std::fmt;

use crate::editor::buffer::{Padding, Position, TextBuffer, WriteMode};
use crate::error::ViewError;

/// Discriminant used to decide whether two commands may coalesce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Write,
    BackDelete,
    FwdDelete,
    BackDeleteLine,
    FwdDeleteLine,
    NewLine,
    MoveLineUp,
    MoveLineDown,
}

/// One atomic edit plus the data needed to redo and undo it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Runes written left to right starting at `at`.
    Write {
        at: Position,
        chars: Vec<char>,
        /// Rune overwritten by each written rune, `None` where it was inserted.
        replaced: Vec<Option<char>>,
        padding: Padding,
    },
    /// Runes removed leftwards from `at`, kept in buffer order.
    BackDelete { at: Position, chars: Vec<char> },
    /// Runes removed under `at`, kept in buffer order.
    FwdDelete { at: Position, chars: Vec<char> },
    /// `count` line joins ending at `at`, the join point of the first line.
    BackDeleteLine { at: Position, count: usize },
    /// `count` joins of the following line onto `at.y`.
    FwdDeleteLine { at: Position, count: usize },
    /// `count` line breaks at `at`.
    NewLine {
        at: Position,
        count: usize,
        padding_lines: usize,
    },
    /// Line `at.y` moved up by `count`.
    MoveLineUp { at: Position, count: usize },
    /// Line `at.y` moved down by `count`.
    MoveLineDown { at: Position, count: usize },
}

impl Command {
    pub fn write(at: Position, ch: char, replaced: Option<char>, padding: Padding) -> Self {
        Self::Write {
            at,
            chars: vec![ch],
            replaced: vec![replaced],
            padding,
        }
    }

    pub fn back_delete(at: Position, ch: char) -> Self {
        Self::BackDelete {
            at,
            chars: vec![ch],
        }
    }

    pub fn fwd_delete(at: Position, ch: char) -> Self {
        Self::FwdDelete {
            at,
            chars: vec![ch],
        }
    }

    pub const fn kind(&self) -> CommandKind {
        match self {
            Self::Write { .. } => CommandKind::Write,
            Self::BackDelete { .. } => CommandKind::BackDelete,
            Self::FwdDelete { .. } => CommandKind::FwdDelete,
            Self::BackDeleteLine { .. } => CommandKind::BackDeleteLine,
            Self::FwdDeleteLine { .. } => CommandKind::FwdDeleteLine,
            Self::NewLine { .. } => CommandKind::NewLine,
            Self::MoveLineUp { .. } => CommandKind::MoveLineUp,
            Self::MoveLineDown { .. } => CommandKind::MoveLineDown,
        }
    }

    /// Fold `next` into `self` if it continues the same edit.
    ///
    /// Returns `next` back when the kinds differ or the positions are not
    /// contiguous.
    pub fn merge(&mut self, next: Self) -> Result<(), Self> {
        match (self, next) {
            (
                Self::Write {
                    at,
                    chars,
                    replaced,
                    ..
                },
                Self::Write {
                    at: n_at,
                    chars: n_chars,
                    replaced: n_replaced,
                    padding: n_padding,
                },
            ) if n_at.y == at.y && n_at.x == at.x + chars.len() && n_padding.is_empty() => {
                chars.extend(n_chars);
                replaced.extend(n_replaced);
                Ok(())
            }
            (
                Self::BackDelete { at, chars },
                Self::BackDelete {
                    at: n_at,
                    chars: mut n_chars,
                },
            ) if n_at.y == at.y && at.x.checked_sub(chars.len()) == Some(n_at.x) => {
                n_chars.append(chars);
                *chars = n_chars;
                Ok(())
            }
            (
                Self::FwdDelete { at, chars },
                Self::FwdDelete {
                    at: n_at,
                    chars: n_chars,
                },
            ) if n_at == *at => {
                chars.extend(n_chars);
                Ok(())
            }
            (
                Self::BackDeleteLine { at, count },
                Self::BackDeleteLine {
                    at: n_at,
                    count: n_count,
                },
            ) if at.x == 0 && n_at.y + 1 == at.y => {
                *at = n_at;
                *count += n_count;
                Ok(())
            }
            (
                Self::FwdDeleteLine { at, count },
                Self::FwdDeleteLine {
                    at: n_at,
                    count: n_count,
                },
            ) if n_at == *at => {
                *count += n_count;
                Ok(())
            }
            (
                Self::NewLine { at, count, .. },
                Self::NewLine {
                    at: n_at,
                    count: n_count,
                    padding_lines: 0,
                },
            ) if n_at.x == 0 && n_at.y == at.y + *count => {
                *count += n_count;
                Ok(())
            }
            (
                Self::MoveLineUp { at, count },
                Self::MoveLineUp {
                    at: n_at,
                    count: n_count,
                },
            ) if at.y.checked_sub(*count) == Some(n_at.y) => {
                *count += n_count;
                Ok(())
            }
            (
                Self::MoveLineDown { at, count },
                Self::MoveLineDown {
                    at: n_at,
                    count: n_count,
                },
            ) if n_at.y == at.y + *count => {
                *count += n_count;
                Ok(())
            }
            (_, next) => Err(next),
        }
    }

    /// Re-apply the edit; returns where the cursor belongs afterwards.
    ///
    /// # Errors
    ///
    /// Propagates buffer failures when the buffer no longer matches the
    /// state the command was recorded against.
    pub fn apply(&self, buf: &mut TextBuffer) -> Result<Position, ViewError> {
        match self {
            Self::Write {
                at,
                chars,
                replaced,
                ..
            } => {
                for (i, (&ch, old)) in chars.iter().zip(replaced).enumerate() {
                    let mode = if old.is_some() {
                        WriteMode::Overwrite
                    } else {
                        WriteMode::Insert
                    };
                    buf.write_rune(at.x + i, at.y, ch, mode)?;
                }
                Ok(Position::new(at.x + chars.len(), at.y))
            }
            Self::BackDelete { at, chars } => {
                let start = at.x.saturating_sub(chars.len());
                for i in 0..chars.len() {
                    buf.delete_rune(at.x - i - 1, at.y)?;
                }
                Ok(Position::new(start, at.y))
            }
            Self::FwdDelete { at, chars } => {
                for _ in chars {
                    buf.delete_rune(at.x, at.y)?;
                }
                Ok(*at)
            }
            Self::BackDeleteLine { at, count } | Self::FwdDeleteLine { at, count } => {
                for _ in 0..*count {
                    buf.merge_lines(at.y)?;
                }
                Ok(*at)
            }
            Self::NewLine { at, count, .. } => {
                buf.ensure_line(at.y);
                for _ in 0..*count {
                    buf.break_line(at.x, at.y)?;
                }
                Ok(Position::new(0, at.y + count))
            }
            Self::MoveLineUp { at, count } => {
                for y in (at.y + 1 - count..=at.y).rev() {
                    buf.permute_lines(y, y - 1)?;
                }
                Ok(Position::new(at.x, at.y - count))
            }
            Self::MoveLineDown { at, count } => {
                for y in at.y..at.y + count {
                    buf.permute_lines(y, y + 1)?;
                }
                Ok(Position::new(at.x, at.y + count))
            }
        }
    }

    /// Apply the inverse edit; returns where the cursor belongs afterwards.
    ///
    /// # Errors
    ///
    /// Same as [`Command::apply`].
    pub fn revert(&self, buf: &mut TextBuffer) -> Result<Position, ViewError> {
        match self {
            Self::Write {
                at,
                chars,
                replaced,
                padding,
            } => {
                for (i, old) in replaced.iter().enumerate().take(chars.len()).rev() {
                    match old {
                        Some(ch) => {
                            buf.write_rune(at.x + i, at.y, *ch, WriteMode::Overwrite)?;
                        }
                        None => {
                            buf.delete_rune(at.x + i, at.y)?;
                        }
                    }
                }
                buf.remove_padding(at.x, at.y, *padding);
                Ok(*at)
            }
            Self::BackDelete { at, chars } => {
                let start = at.x.saturating_sub(chars.len());
                for (i, &ch) in chars.iter().enumerate() {
                    buf.write_rune(start + i, at.y, ch, WriteMode::Insert)?;
                }
                Ok(*at)
            }
            Self::FwdDelete { at, chars } => {
                for &ch in chars.iter().rev() {
                    buf.write_rune(at.x, at.y, ch, WriteMode::Insert)?;
                }
                Ok(*at)
            }
            Self::BackDeleteLine { at, count } => {
                buf.break_line(at.x, at.y)?;
                for i in 1..*count {
                    buf.break_line(0, at.y + i)?;
                }
                Ok(Position::new(0, at.y + count))
            }
            Self::FwdDeleteLine { at, count } => {
                for _ in 0..*count {
                    buf.break_line(at.x, at.y)?;
                }
                Ok(*at)
            }
            Self::NewLine {
                at,
                count,
                padding_lines,
            } => {
                for _ in 0..*count {
                    buf.merge_lines(at.y)?;
                }
                buf.remove_padding(
                    at.x,
                    at.y,
                    Padding {
                        lines: *padding_lines,
                        cells: 0,
                    },
                );
                Ok(*at)
            }
            Self::MoveLineUp { at, count } => {
                for y in at.y - count..at.y {
                    buf.permute_lines(y, y + 1)?;
                }
                Ok(*at)
            }
            Self::MoveLineDown { at, count } => {
                for y in (at.y + 1..=at.y + count).rev() {
                    buf.permute_lines(y, y - 1)?;
                }
                Ok(*at)
            }
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Write { chars, .. } => {
                write!(f, "Write : {}", chars.iter().collect::<String>())
            }
            Self::BackDelete { chars, .. } | Self::FwdDelete { chars, .. } => {
                write!(f, "Delete : {}", chars.iter().collect::<String>())
            }
            Self::BackDeleteLine { count, .. } => write!(f, "{count} DelLine(s)"),
            Self::FwdDeleteLine { count, .. } => write!(f, "{count} FwdDelLine(s)"),
            Self::NewLine { count, .. } => write!(f, "{count} NewLine(s)"),
            Self::MoveLineUp { at, count } => {
                write!(f, "MoveLine {} -> {}", at.y + 1, at.y - count + 1)
            }
            Self::MoveLineDown { at, count } => {
                write!(f, "MoveLine {} -> {}", at.y + 1, at.y + count + 1)
            }
        }
    }
}
