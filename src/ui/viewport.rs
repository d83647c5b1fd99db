//! Wrapped view lines derived from a [`TextBuffer`].
//!
//! The [`Viewport`] splits buffer lines into [`ViewLine`] segments and maps
//! coordinates between the two spaces. It is pure derived state: it is rebuilt
//! whenever the buffer revision or the wrap width changes and never mutates
//! the buffer.

use tracing::trace;

use crate::editor::buffer::{Position, TextBuffer};
use crate::error::ViewError;

/// One displayable segment of a buffer line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewLine {
    /// Index of the buffer line this segment belongs to.
    pub source: usize,
    /// Column of the segment's first rune within the buffer line.
    pub offset: usize,
    /// Number of runes in the segment.
    pub len: usize,
}

impl ViewLine {
    /// Whether this segment continues a wrapped line rather than starting one.
    pub const fn is_continuation(&self) -> bool {
        self.offset > 0
    }

    /// One past the last buffer column covered by the segment.
    pub const fn end(&self) -> usize {
        self.offset + self.len
    }

    /// Borrow the segment's runes from `buffer`.
    pub fn chars<'a>(&self, buffer: &'a TextBuffer) -> &'a [char] {
        buffer
            .line(self.source)
            .and_then(|line| line.get(self.offset..self.end()))
            .unwrap_or(&[])
    }
}

/// Wrapped segmentation of a buffer plus the state needed to detect staleness.
///
/// # Example
///
/// ```
/// use termview::editor::buffer::TextBuffer;
/// use termview::ui::viewport::Viewport;
///
/// let buf = TextBuffer::from_lines(["Hello!"]);
/// let mut vp = Viewport::new();
/// vp.regenerate(&buf, Some(5)).unwrap();
/// assert_eq!(vp.len(), 2);
/// assert_eq!(vp.visible_text(&buf), "Hello\n!");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewport {
    lines: Vec<ViewLine>,
    revision: Option<u64>,
    wrap: Option<usize>,
}

impl Viewport {
    pub const fn new() -> Self {
        Self {
            lines: Vec::new(),
            revision: None,
            wrap: None,
        }
    }

    /// Rebuild the segmentation if `buffer` or `wrap` changed since last time.
    ///
    /// `wrap` is the segment width when wrapping, `None` for one segment per
    /// line. Returns whether a rebuild happened.
    ///
    /// # Errors
    ///
    /// [`ViewError::WrapWidthZero`] when `wrap` is `Some(0)`.
    pub fn regenerate(
        &mut self,
        buffer: &TextBuffer,
        wrap: Option<usize>,
    ) -> Result<bool, ViewError> {
        if wrap == Some(0) {
            return Err(ViewError::WrapWidthZero);
        }
        if !self.is_tainted(buffer, wrap) {
            return Ok(false);
        }

        self.lines.clear();
        for source in 0..buffer.line_count() {
            let len = buffer.line_len(source);
            match wrap {
                Some(width) if len > width => {
                    let mut offset = 0;
                    while offset < len {
                        let seg = width.min(len - offset);
                        self.lines.push(ViewLine {
                            source,
                            offset,
                            len: seg,
                        });
                        offset += seg;
                    }
                }
                _ => self.lines.push(ViewLine {
                    source,
                    offset: 0,
                    len,
                }),
            }
        }
        self.revision = Some(buffer.revision());
        self.wrap = wrap;
        trace!(
            view_lines = self.lines.len(),
            revision = buffer.revision(),
            ?wrap,
            "viewport regenerated"
        );
        Ok(true)
    }

    /// Whether the segmentation is stale for `buffer` at `wrap`.
    pub fn is_tainted(&self, buffer: &TextBuffer, wrap: Option<usize>) -> bool {
        self.revision != Some(buffer.revision()) || self.wrap != wrap
    }

    /// Force the next [`Viewport::regenerate`] to rebuild.
    pub const fn invalidate(&mut self) {
        self.revision = None;
    }

    pub fn lines(&self) -> &[ViewLine] {
        &self.lines
    }

    pub fn get(&self, vy: usize) -> Option<&ViewLine> {
        self.lines.get(vy)
    }

    pub const fn len(&self) -> usize {
        self.lines.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Map absolute view coordinates to a buffer position.
    ///
    /// Rows past the last segment extrapolate below the content, one buffer
    /// line per row, keeping `vx` as the column.
    ///
    /// # Errors
    ///
    /// [`ViewError::NotFound`] for anything but (0, 0) when there are no
    /// view lines.
    pub fn real_position(&self, vx: usize, vy: usize) -> Result<Position, ViewError> {
        let Some(last) = self.lines.last() else {
            return if vx == 0 && vy == 0 {
                Ok(Position::new(0, 0))
            } else {
                Err(ViewError::NotFound)
            };
        };
        match self.lines.get(vy) {
            Some(vl) => Ok(Position::new(vl.offset + vx, vl.source)),
            None => {
                let past = vy - (self.lines.len() - 1);
                Ok(Position::new(vx, last.source + past))
            }
        }
    }

    /// Map a buffer position to absolute view coordinates.
    ///
    /// A column on the boundary between two segments resolves to the start of
    /// the later one; the end of a line resolves to the end of its last
    /// segment. Lines below the content extrapolate like
    /// [`Viewport::real_position`].
    ///
    /// # Errors
    ///
    /// [`ViewError::NotFound`] for anything but (0, 0) when there are no
    /// view lines.
    pub fn view_position(&self, bx: usize, by: usize) -> Result<Position, ViewError> {
        let Some(last) = self.lines.last() else {
            return if bx == 0 && by == 0 {
                Ok(Position::new(0, 0))
            } else {
                Err(ViewError::NotFound)
            };
        };
        if by > last.source {
            let vy = self.lines.len() - 1 + (by - last.source);
            return Ok(Position::new(bx, vy));
        }

        let start = self.lines.partition_point(|vl| vl.source < by);
        let mut found = None;
        for (vy, vl) in self.lines.iter().enumerate().skip(start) {
            if vl.source != by || vl.offset > bx {
                break;
            }
            found = Some((vy, vl));
            if bx < vl.end() {
                break;
            }
        }
        found
            .map(|(vy, vl)| Position::new(bx - vl.offset, vy))
            .ok_or(ViewError::NotFound)
    }

    /// The segmentation as text, one segment per line.
    pub fn visible_text(&self, buffer: &TextBuffer) -> String {
        self.lines
            .iter()
            .map(|vl| {
                vl.chars(buffer)
                    .iter()
                    .map(|&c| if c == crate::editor::buffer::FILLER { ' ' } else { c })
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
