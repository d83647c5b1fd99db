use crate::error::ViewError;

/// Cell written into gaps when a rune lands past the end of a line.
///
/// Read-back and rendering show it as a space.
pub const FILLER: char = '\0';

/// Absolute position inside a [`TextBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Position {
    /// Zero-based column (rune index within the line).
    pub x: usize,
    /// Zero-based line index.
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// How [`TextBuffer::write_rune`] treats an existing rune at the target column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Shift the rest of the line right.
    #[default]
    Insert,
    /// Replace the rune under the target column.
    Overwrite,
}

/// Lines and cells added by a write that landed outside the current content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Padding {
    /// Empty lines appended so the target line exists.
    pub lines: usize,
    /// Filler cells appended so the target column exists.
    pub cells: usize,
}

impl Padding {
    pub const fn is_empty(self) -> bool {
        self.lines == 0 && self.cells == 0
    }
}

/// What a single [`TextBuffer::write_rune`] changed, enough to invert it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteOutcome {
    /// The rune that was overwritten, if the write replaced one.
    pub replaced: Option<char>,
    pub padding: Padding,
}

/// Line/rune storage owned by a single view.
///
/// Every mutation bumps [`TextBuffer::revision`], which is how viewports learn
/// that their wrapped lines are stale.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    lines: Vec<Vec<char>>,
    revision: u64,
}

impl TextBuffer {
    /// Create a buffer with no lines.
    pub const fn new() -> Self {
        Self {
            lines: Vec::new(),
            revision: 0,
        }
    }

    /// Create a buffer from ready-made lines.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            lines: lines
                .into_iter()
                .map(|line| line.as_ref().chars().collect())
                .collect(),
            revision: 0,
        }
    }

    /// Monotonic mutation counter (the taint mark).
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    pub const fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Whether the buffer holds no lines at all.
    ///
    /// A buffer with one empty line is not empty.
    pub const fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Runes of line `y`, or `None` past the last line.
    pub fn line(&self, y: usize) -> Option<&[char]> {
        self.lines.get(y).map(Vec::as_slice)
    }

    /// Length of line `y` in runes; zero for lines that do not exist.
    pub fn line_len(&self, y: usize) -> usize {
        self.lines.get(y).map_or(0, Vec::len)
    }

    pub fn rune(&self, x: usize, y: usize) -> Option<char> {
        self.lines.get(y).and_then(|line| line.get(x)).copied()
    }

    /// Line `y` as a string, filler cells shown as spaces.
    pub fn line_string(&self, y: usize) -> Option<String> {
        self.line(y).map(render_cells)
    }

    /// All lines joined by `'\n'`, filler cells shown as spaces.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|line| render_cells(line))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Write `ch` at (x, y), growing the buffer as needed.
    ///
    /// # Errors
    ///
    /// Never fails today; the `Result` keeps the primitive uniform with the
    /// other mutations.
    pub fn write_rune(
        &mut self,
        x: usize,
        y: usize,
        ch: char,
        mode: WriteMode,
    ) -> Result<WriteOutcome, ViewError> {
        self.touch();
        let mut outcome = WriteOutcome {
            padding: Padding {
                lines: self.ensure_line(y),
                cells: 0,
            },
            ..WriteOutcome::default()
        };

        let line = &mut self.lines[y];
        if x > line.len() {
            outcome.padding.cells = x - line.len();
            line.resize(x, FILLER);
        }
        if x == line.len() {
            line.push(ch);
        } else if mode == WriteMode::Overwrite {
            outcome.replaced = Some(std::mem::replace(&mut line[x], ch));
        } else {
            line.insert(x, ch);
        }
        Ok(outcome)
    }

    /// Remove and return the rune at (x, y).
    ///
    /// # Errors
    ///
    /// [`ViewError::InvalidPosition`] if (x, y) holds no rune.
    pub fn delete_rune(&mut self, x: usize, y: usize) -> Result<char, ViewError> {
        self.touch();
        match self.lines.get_mut(y) {
            Some(line) if x < line.len() => Ok(line.remove(x)),
            _ => Err(ViewError::invalid(x, y)),
        }
    }

    /// Split line `y` at column `x`; text from `x` on moves to a new line below.
    ///
    /// # Errors
    ///
    /// [`ViewError::InvalidPosition`] if line `y` does not exist.
    pub fn break_line(&mut self, x: usize, y: usize) -> Result<(), ViewError> {
        self.touch();
        let Some(line) = self.lines.get_mut(y) else {
            return Err(ViewError::invalid(x, y));
        };
        let right = if x < line.len() {
            line.split_off(x)
        } else {
            Vec::new()
        };
        self.lines.insert(y + 1, right);
        Ok(())
    }

    /// Append line `y + 1` onto line `y` and remove it.
    ///
    /// # Errors
    ///
    /// [`ViewError::InvalidPosition`] if `y` is not a line,
    /// [`ViewError::LastLine`] if `y` is the final line.
    pub fn merge_lines(&mut self, y: usize) -> Result<(), ViewError> {
        self.touch();
        if y >= self.lines.len() {
            return Err(ViewError::invalid(0, y));
        }
        if y + 1 == self.lines.len() {
            return Err(ViewError::LastLine);
        }
        let next = self.lines.remove(y + 1);
        self.lines[y].extend(next);
        Ok(())
    }

    /// Swap lines `y1` and `y2`.
    ///
    /// # Errors
    ///
    /// [`ViewError::InvalidPosition`] if either index is out of range.
    pub fn permute_lines(&mut self, y1: usize, y2: usize) -> Result<(), ViewError> {
        self.touch();
        let len = self.lines.len();
        if y1 >= len || y2 >= len {
            return Err(ViewError::invalid(0, y1.max(y2)));
        }
        self.lines.swap(y1, y2);
        Ok(())
    }

    /// Append empty lines until line `y` exists; returns how many were added.
    pub fn ensure_line(&mut self, y: usize) -> usize {
        let missing = (y + 1).saturating_sub(self.lines.len());
        if missing > 0 {
            self.touch();
            self.lines.resize_with(y + 1, Vec::new);
        }
        missing
    }

    /// Undo the growth recorded in `padding` for a write that targeted (x, y).
    ///
    /// The written rune itself must already be gone.
    pub fn remove_padding(&mut self, x: usize, y: usize, padding: Padding) {
        if padding.is_empty() {
            return;
        }
        self.touch();
        if padding.cells > 0
            && let Some(line) = self.lines.get_mut(y)
        {
            let keep = x.saturating_sub(padding.cells);
            if line.len() > keep && line[keep..].iter().all(|&c| c == FILLER) {
                line.truncate(keep);
            }
        }
        if padding.lines > 0 {
            let keep = self.lines.len().saturating_sub(padding.lines);
            self.lines.truncate(keep);
        }
    }

    /// Append streamed text: `'\n'` opens a new line, `'\r'` clears the
    /// current one.
    pub fn append_text(&mut self, text: &str) {
        self.touch();
        for ch in text.chars() {
            match ch {
                '\n' => {
                    if self.lines.is_empty() {
                        self.lines.push(Vec::new());
                    }
                    self.lines.push(Vec::new());
                }
                '\r' => match self.lines.last_mut() {
                    Some(line) => line.clear(),
                    None => self.lines.push(Vec::new()),
                },
                _ => match self.lines.last_mut() {
                    Some(line) => line.push(ch),
                    None => self.lines.push(vec![ch]),
                },
            }
        }
    }

    /// Drop every line.
    pub fn clear(&mut self) {
        self.touch();
        self.lines.clear();
    }

    const fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

fn render_cells(cells: &[char]) -> String {
    cells
        .iter()
        .map(|&c| if c == FILLER { ' ' } else { c })
        .collect()
}

impl std::fmt::Debug for TextBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextBuffer")
            .field("lines", &format_args!("{} lines", self.lines.len()))
            .field("revision", &self.revision)
            .finish()
    }
}
