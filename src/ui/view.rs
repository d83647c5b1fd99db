//! The [`View`] window: one text buffer with its viewport, cursor and history.

use std::io;

use tracing::debug;

use crate::editor::buffer::{FILLER, Position, TextBuffer};
use crate::error::ViewError;
use crate::history::CommandLog;
use crate::ui::viewport::{ViewLine, Viewport};

/// A rectangular text window.
///
/// `width` and `height` are the inner size in cells. The origin is the
/// view-space offset of the top-left visible cell and the cursor is relative
/// to it.
#[derive(Debug, Clone)]
pub struct View {
    name: String,
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) origin: Position,
    pub(crate) cursor: Position,
    pub(crate) buffer: TextBuffer,
    pub(crate) viewport: Viewport,
    pub(crate) history: CommandLog,
    pending: Vec<u8>,
    /// View line count when autoscroll last ran.
    scrolled_len: usize,
    read_cache: Vec<u8>,
    read_offset: usize,

    /// Keys reach the editor only when set.
    pub editable: bool,
    /// Writes replace the rune under the cursor instead of inserting.
    pub overwrite: bool,
    pub wrap: bool,
    /// Keep the last line visible when content grows past the bottom.
    pub autoscroll: bool,
    /// Draw a border around the view.
    pub frame: bool,
    pub hidden: bool,
    pub title: String,
    pub footer: String,
    /// Draw every content cell with this character.
    pub mask: Option<char>,
}

impl View {
    pub fn new(name: impl Into<String>, width: usize, height: usize) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            origin: Position::default(),
            cursor: Position::default(),
            buffer: TextBuffer::new(),
            viewport: Viewport::new(),
            history: CommandLog::new(),
            pending: Vec::new(),
            scrolled_len: 0,
            read_cache: Vec::new(),
            read_offset: 0,
            editable: false,
            overwrite: false,
            wrap: false,
            autoscroll: false,
            frame: true,
            hidden: false,
            title: String::new(),
            footer: String::new(),
            mask: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inner size as (width, height).
    pub const fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        if (width, height) != (self.width, self.height) {
            debug!(view = %self.name, width, height, "resize");
        }
        self.width = width;
        self.height = height;
    }

    /// Segment width when wrapping; one column is kept for the cursor.
    pub const fn wrap_width(&self) -> Option<usize> {
        if self.wrap {
            Some(self.width.saturating_sub(1))
        } else {
            None
        }
    }

    /// Bring the viewport up to date with the buffer.
    ///
    /// # Errors
    ///
    /// [`ViewError::WrapWidthZero`] when wrapping in a view too narrow to
    /// hold a segment.
    pub fn sync(&mut self) -> Result<(), ViewError> {
        if self.wrap {
            self.origin.x = 0;
        }
        self.viewport
            .regenerate(&self.buffer, self.wrap_width())
            .map(|_| ())
    }

    /// Regenerate for navigation, which never fails.
    pub(crate) fn refresh(&mut self) {
        if let Err(err) = self.sync() {
            debug!(view = %self.name, %err, "viewport left stale");
        }
    }

    pub const fn cursor(&self) -> Position {
        self.cursor
    }

    pub const fn origin(&self) -> Position {
        self.origin
    }

    /// Place the cursor relative to the origin.
    ///
    /// # Errors
    ///
    /// [`ViewError::InvalidPosition`] if (x, y) lies outside the inner size.
    pub fn set_cursor(&mut self, x: usize, y: usize) -> Result<(), ViewError> {
        if x >= self.width || y >= self.height {
            return Err(ViewError::invalid(x, y));
        }
        self.cursor = Position::new(x, y);
        Ok(())
    }

    pub const fn set_origin(&mut self, x: usize, y: usize) {
        self.origin = Position::new(x, y);
    }

    /// Buffer position under the cursor-relative point (x, y).
    ///
    /// # Errors
    ///
    /// [`ViewError::NotFound`] on an empty buffer for anything but the
    /// first cell.
    pub fn real_position(&mut self, x: usize, y: usize) -> Result<Position, ViewError> {
        self.sync()?;
        self.viewport
            .real_position(self.origin.x + x, self.origin.y + y)
    }

    /// Buffer position under the cursor.
    ///
    /// # Errors
    ///
    /// Same as [`View::real_position`].
    pub fn real_cursor(&mut self) -> Result<Position, ViewError> {
        self.real_position(self.cursor.x, self.cursor.y)
    }

    pub(crate) fn real_cursor_cached(&self) -> Result<Position, ViewError> {
        self.viewport.real_position(
            self.origin.x + self.cursor.x,
            self.origin.y + self.cursor.y,
        )
    }

    /// View line under the cursor row, if any.
    pub(crate) fn current_line(&self) -> Option<ViewLine> {
        self.viewport
            .get(self.origin.y + self.cursor.y)
            .copied()
    }

    pub const fn text_buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub const fn history(&self) -> &CommandLog {
        &self.history
    }

    /// Lines of the buffer joined by `'\n'`, filler shown as spaces.
    pub fn buffer(&self) -> String {
        self.buffer.text()
    }

    /// The buffer as currently segmented for display.
    pub fn view_buffer(&mut self) -> String {
        self.refresh();
        self.viewport.visible_text(&self.buffer)
    }

    /// Buffer line shown on cursor-relative row `y`.
    ///
    /// # Errors
    ///
    /// [`ViewError::InvalidPosition`] when the row maps below the content.
    pub fn line(&mut self, y: usize) -> Result<String, ViewError> {
        let pos = self.real_position(0, y)?;
        self.buffer
            .line_string(pos.y)
            .ok_or(ViewError::invalid(0, pos.y))
    }

    /// Space-delimited word under the cursor-relative point (x, y).
    ///
    /// # Errors
    ///
    /// [`ViewError::InvalidPosition`] when (x, y) holds no rune.
    pub fn word(&mut self, x: usize, y: usize) -> Result<String, ViewError> {
        let pos = self.real_position(x, y)?;
        let line = self
            .buffer
            .line(pos.y)
            .filter(|line| pos.x < line.len())
            .ok_or(ViewError::invalid(pos.x, pos.y))?;
        let is_break = |c: &char| *c == ' ' || *c == FILLER;
        let start = line[..pos.x]
            .iter()
            .rposition(is_break)
            .map_or(0, |i| i + 1);
        let end = line[pos.x..]
            .iter()
            .position(is_break)
            .map_or(line.len(), |i| pos.x + i);
        Ok(line[start..end].iter().collect())
    }

    /// Append streamed text; see [`TextBuffer::append_text`].
    pub fn write_str(&mut self, text: &str) {
        self.buffer.append_text(text);
    }

    /// Drop the buffer, history and any half-received UTF-8 sequence.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.history.clear();
        self.pending.clear();
        self.scrolled_len = 0;
        self.origin = Position::default();
        self.cursor = Position::default();
    }

    /// Revert the last command and move the cursor to where it was.
    ///
    /// Returns `Ok(false)` when there is nothing to undo.
    ///
    /// # Errors
    ///
    /// Propagates a buffer failure during replay.
    pub fn undo(&mut self) -> Result<bool, ViewError> {
        match self.history.undo(&mut self.buffer)? {
            Some(pos) => {
                self.move_to_real(pos);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Re-apply the last undone command.
    ///
    /// # Errors
    ///
    /// Propagates a buffer failure during replay.
    pub fn redo(&mut self) -> Result<bool, ViewError> {
        match self.history.redo(&mut self.buffer)? {
            Some(pos) => {
                self.move_to_real(pos);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Host-level cursor motion: ends any coalescing edit, then moves.
    pub fn navigate(&mut self, dx: isize, dy: isize) {
        self.history.cut();
        self.move_cursor(dx, dy, false);
    }

    /// Pull the cursor back inside the inner size, scrolling so it stays on
    /// the same view cell where the origin can move.
    pub(crate) fn clamp_cursor(&mut self) {
        let max_y = self.height.saturating_sub(1);
        if self.cursor.y > max_y {
            self.origin.y += self.cursor.y - max_y;
            self.cursor.y = max_y;
        }
        let max_x = self.width.saturating_sub(1);
        if self.cursor.x > max_x {
            if !self.wrap {
                self.origin.x += self.cursor.x - max_x;
            }
            self.cursor.x = max_x;
        }
    }

    /// Scroll so the last view line sits on the bottom row once content has
    /// grown. The cursor keeps its view line while it stays on screen.
    pub(crate) fn autoscroll_to_end(&mut self) {
        let len = self.viewport.len();
        let grew = len > self.scrolled_len;
        self.scrolled_len = len;
        if !(self.autoscroll && grew && len > self.height) {
            return;
        }
        let top = len - self.height;
        if top > self.origin.y {
            let delta = top - self.origin.y;
            self.origin.y = top;
            self.cursor.y = self.cursor.y.saturating_sub(delta);
        }
    }

    /// Restart [`io::Read`] from the beginning with a fresh snapshot.
    pub fn rewind(&mut self) {
        self.read_offset = 0;
    }

    fn ingest(&mut self) {
        let mut text = String::new();
        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(valid) => {
                    text.push_str(valid);
                    self.pending.clear();
                    break;
                }
                Err(err) => {
                    let valid = err.valid_up_to();
                    text.push_str(&String::from_utf8_lossy(&self.pending[..valid]));
                    match err.error_len() {
                        Some(bad) => {
                            text.push(char::REPLACEMENT_CHARACTER);
                            self.pending.drain(..valid + bad);
                        }
                        None => {
                            self.pending.drain(..valid);
                            break;
                        }
                    }
                }
            }
        }
        if !text.is_empty() {
            self.buffer.append_text(&text);
        }
    }
}

/// Reads [`View::buffer`] as UTF-8, snapshotted on the first read after a
/// [`View::rewind`].
impl io::Read for View {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        if self.read_offset == 0 {
            self.read_cache = self.buffer().into_bytes();
        }
        let rest = self.read_cache.get(self.read_offset..).unwrap_or_default();
        let n = rest.len().min(out.len());
        out[..n].copy_from_slice(&rest[..n]);
        self.read_offset += n;
        Ok(n)
    }
}

impl io::Write for View {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(bytes);
        self.ingest();
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
