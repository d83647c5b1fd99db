//! Undo/redo history with coalescing of consecutive edits.

mod command;

pub use command::{Command, CommandKind};

use tracing::{debug, warn};
use unicode_width::UnicodeWidthChar;

use crate::editor::buffer::{Position, TextBuffer};
use crate::error::ViewError;

const UNDO_MARKER: &str = "     - UNDO -";
const REDO_MARKER: &str = "     - REDO -";
const END_MARKER: &str = "     -      -";

/// Undo and redo stacks plus the flag that allows the next command to merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLog {
    undo: Vec<Command>,
    redo: Vec<Command>,
    mergeable: bool,
}

impl CommandLog {
    pub const fn new() -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            mergeable: false,
        }
    }

    /// Record an executed command, folding it into the previous one when
    /// possible. Always empties the redo stack.
    pub fn exec(&mut self, cmd: Command) {
        self.redo.clear();
        let pending = match self.undo.last_mut() {
            Some(top) if self.mergeable && top.kind() == cmd.kind() => top.merge(cmd).err(),
            _ => Some(cmd),
        };
        if let Some(cmd) = pending {
            debug!(command = %cmd, "exec");
            self.undo.push(cmd);
        }
        self.mergeable = true;
    }

    /// Stop the next command from merging into the current top entry.
    pub const fn cut(&mut self) {
        self.mergeable = false;
    }

    /// Revert the most recent command.
    ///
    /// Returns the cursor position to restore, `None` when there is nothing to
    /// undo.
    ///
    /// # Errors
    ///
    /// Propagates buffer failures from replaying the inverse.
    pub fn undo(&mut self, buf: &mut TextBuffer) -> Result<Option<Position>, ViewError> {
        let Some(cmd) = self.undo.pop() else {
            return Ok(None);
        };
        self.mergeable = false;
        debug!(command = %cmd, "undo");
        let result = cmd.revert(buf);
        self.redo.push(cmd);
        result.map(Some).inspect_err(|err| warn!(%err, "undo replay failed"))
    }

    /// Re-apply the most recently undone command.
    ///
    /// # Errors
    ///
    /// Propagates buffer failures from replaying the command.
    pub fn redo(&mut self, buf: &mut TextBuffer) -> Result<Option<Position>, ViewError> {
        let Some(cmd) = self.redo.pop() else {
            return Ok(None);
        };
        self.mergeable = false;
        debug!(command = %cmd, "redo");
        let result = cmd.apply(buf);
        self.undo.push(cmd);
        result.map(Some).inspect_err(|err| warn!(%err, "redo replay failed"))
    }

    /// Forget all history.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
        self.mergeable = false;
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub const fn is_mergeable(&self) -> bool {
        self.mergeable
    }

    /// Most recent undo entry.
    pub fn last(&self) -> Option<&Command> {
        self.undo.last()
    }

    /// Lay the history out for a `width` x `height` panel.
    ///
    /// Older undo entries sit above the UNDO marker, which stays on row
    /// `height / 2 - 1`; the next redo entry follows the REDO marker and the
    /// remaining redo entries come after the closing marker.
    pub fn render(&self, width: usize, height: usize) -> Vec<String> {
        let above = (height / 2).saturating_sub(1);
        let older = self.undo.len().saturating_sub(1);
        let shown = older.min(above);

        let mut rows = Vec::with_capacity(height.max(6));
        rows.resize(above - shown, String::new());
        rows.extend(
            self.undo[older - shown..older]
                .iter()
                .map(|cmd| describe(cmd, width)),
        );
        rows.push(UNDO_MARKER.to_string());
        rows.push(self.undo.last().map(|c| describe(c, width)).unwrap_or_default());
        rows.push(REDO_MARKER.to_string());
        rows.push(self.redo.last().map(|c| describe(c, width)).unwrap_or_default());
        rows.push(END_MARKER.to_string());
        rows.extend(
            self.redo
                .iter()
                .rev()
                .skip(1)
                .map(|cmd| describe(cmd, width)),
        );
        rows.truncate(height);
        rows
    }
}

/// Command description cut to fit `width` display columns.
fn describe(cmd: &Command, width: usize) -> String {
    let info = cmd.to_string();
    let display: usize = info.chars().map(|c| c.width().unwrap_or(0)).sum();
    if display < width {
        return info;
    }
    let budget = width.saturating_sub(3);
    let mut used = 0;
    let mut out: String = info
        .chars()
        .take_while(|c| {
            used += c.width().unwrap_or(0);
            used <= budget
        })
        .collect();
    out.push_str("...");
    out
}
