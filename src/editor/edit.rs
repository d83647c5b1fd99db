//! Editing operations on a [`View`].
//!
//! Each operation mutates the buffer at the cursor's real position, moves the
//! cursor and records an invertible [`Command`]. They return `Ok(true)` when
//! an edit happened and `Ok(false)` when the cursor sat on a boundary that
//! makes the edit a no-op.

use tracing::debug;

use crate::editor::buffer::{Position, WriteMode};
use crate::error::ViewError;
use crate::history::Command;
use crate::ui::view::View;

impl View {
    /// Write `ch` at the cursor and step past it.
    ///
    /// # Errors
    ///
    /// [`ViewError::WrapWidthZero`] when the view is too narrow to wrap.
    pub fn edit_write(&mut self, ch: char) -> Result<bool, ViewError> {
        let Some(at) = self.edit_position()? else {
            return Ok(false);
        };
        let mode = if self.overwrite {
            WriteMode::Overwrite
        } else {
            WriteMode::Insert
        };
        let outcome = self.buffer.write_rune(at.x, at.y, ch, mode)?;
        self.step_right(true);
        self.history
            .exec(Command::write(at, ch, outcome.replaced, outcome.padding));
        Ok(true)
    }

    /// Break the line at the cursor and move to the start of the new line.
    ///
    /// The cursor stays put when it sits at the start of a wrapped
    /// continuation, since the new line then starts on the same row.
    ///
    /// # Errors
    ///
    /// [`ViewError::WrapWidthZero`] when the view is too narrow to wrap.
    pub fn edit_new_line(&mut self) -> Result<bool, ViewError> {
        let Some(at) = self.edit_position()? else {
            return Ok(false);
        };
        let stays = self.wrap
            && self.cursor.x == 0
            && self.current_line().is_some_and(|vl| vl.is_continuation());

        let padding_lines = self.buffer.ensure_line(at.y);
        self.buffer.break_line(at.x, at.y)?;
        if !stays {
            self.origin.x = 0;
            self.cursor.x = 0;
            self.step_down(true);
        }
        self.history.exec(Command::NewLine {
            at,
            count: 1,
            padding_lines,
        });
        Ok(true)
    }

    /// Delete the rune before (`backward`) or under the cursor, joining lines
    /// at line boundaries.
    ///
    /// # Errors
    ///
    /// [`ViewError::WrapWidthZero`] when the view is too narrow to wrap.
    pub fn edit_delete(&mut self, backward: bool) -> Result<bool, ViewError> {
        let Some(at) = self.edit_position()? else {
            return Ok(false);
        };
        if at.y >= self.buffer.line_count() {
            self.move_cursor(-1, 0, true);
            return Ok(false);
        }
        let len = self.buffer.line_len(at.y);

        if backward {
            if at.x == 0 {
                if at.y == 0 {
                    debug!(view = %self.name(), "delete at buffer start");
                    return Ok(false);
                }
                let join = Position::new(self.buffer.line_len(at.y - 1), at.y - 1);
                self.buffer.merge_lines(join.y)?;
                self.move_to_real(join);
                self.history
                    .exec(Command::BackDeleteLine { at: join, count: 1 });
            } else if at.x > len {
                self.move_cursor(-1, 0, true);
                return Ok(false);
            } else {
                let removed = self.buffer.delete_rune(at.x - 1, at.y)?;
                self.move_to_real(Position::new(at.x - 1, at.y));
                self.history.exec(Command::back_delete(at, removed));
            }
        } else if at.x >= len {
            let join = Position::new(len, at.y);
            match self.buffer.merge_lines(at.y) {
                Ok(()) => {}
                Err(ViewError::LastLine) => {
                    debug!(view = %self.name(), "delete at buffer end");
                    return Ok(false);
                }
                Err(err) => return Err(err),
            }
            self.move_to_real(join);
            self.history
                .exec(Command::FwdDeleteLine { at: join, count: 1 });
        } else {
            let removed = self.buffer.delete_rune(at.x, at.y)?;
            self.move_to_real(at);
            self.history.exec(Command::fwd_delete(at, removed));
        }
        Ok(true)
    }

    /// Swap the cursor's line with its neighbour above (`up`) or below and
    /// follow it.
    ///
    /// # Errors
    ///
    /// [`ViewError::WrapWidthZero`] when the view is too narrow to wrap.
    pub fn edit_move_line(&mut self, up: bool) -> Result<bool, ViewError> {
        let Some(at) = self.edit_position()? else {
            return Ok(false);
        };
        let count = self.buffer.line_count();
        let target = if up {
            at.y.checked_sub(1)
        } else {
            Some(at.y + 1)
        };
        let Some(target) = target.filter(|&y| y < count && at.y < count) else {
            debug!(view = %self.name(), up, "no line to swap with");
            return Ok(false);
        };
        self.buffer.permute_lines(at.y, target)?;
        self.move_to_real(Position::new(at.x, target));
        self.history.exec(if up {
            Command::MoveLineUp { at, count: 1 }
        } else {
            Command::MoveLineDown { at, count: 1 }
        });
        Ok(true)
    }

    /// Real cursor position for an edit; `None` when there is none.
    fn edit_position(&mut self) -> Result<Option<Position>, ViewError> {
        match self.real_cursor() {
            Ok(pos) => Ok(Some(pos)),
            Err(ViewError::NotFound) => {
                debug!(view = %self.name(), cursor = ?self.cursor, "cursor outside content");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::editor::buffer::{Position, TextBuffer};
    use crate::ui::view::View;

    fn editable(width: usize, height: usize, wrap: bool) -> View {
        let mut view = View::new("edit", width, height);
        view.editable = true;
        view.wrap = wrap;
        view
    }

    fn type_str(view: &mut View, text: &str) {
        for ch in text.chars() {
            view.edit_write(ch).unwrap();
        }
    }

    // --- writing ---

    #[test]
    fn test_write_into_empty_view() {
        let mut view = editable(6, 3, true);
        type_str(&mut view, "Hello");
        assert_eq!(view.buffer(), "Hello");
        assert_eq!(view.view_buffer(), "Hello");
        assert_eq!(view.cursor(), Position::new(5, 0));
    }

    #[test]
    fn test_write_across_wrap_boundary() {
        let mut view = editable(6, 3, true);
        type_str(&mut view, "Hello!");
        assert_eq!(view.buffer(), "Hello!");
        assert_eq!(view.view_buffer(), "Hello\n!");
        assert_eq!(view.cursor(), Position::new(1, 1));
    }

    #[test]
    fn test_six_steps_left_reach_buffer_start() {
        let mut view = editable(6, 3, true);
        type_str(&mut view, "Hello!");
        for _ in 0..6 {
            view.step_left();
        }
        assert_eq!(view.cursor(), Position::new(0, 0));
        assert_eq!(view.real_cursor(), Ok(Position::new(0, 0)));
    }

    #[test]
    fn test_overwrite_mode_replaces() {
        let mut view = editable(20, 3, false);
        type_str(&mut view, "abc");
        view.navigate(-3, 0);
        view.overwrite = true;
        type_str(&mut view, "XY");
        assert_eq!(view.buffer(), "XYc");
        view.undo().unwrap();
        assert_eq!(view.buffer(), "abc");
        assert_eq!(view.real_cursor(), Ok(Position::new(0, 0)));
    }

    #[test]
    fn test_write_scrolls_horizontally_without_wrap() {
        let mut view = editable(4, 1, false);
        type_str(&mut view, "abcdef");
        assert_eq!(view.origin(), Position::new(3, 0));
        assert_eq!(view.cursor(), Position::new(3, 0));
        assert_eq!(view.real_cursor(), Ok(Position::new(6, 0)));
    }

    // --- new lines ---

    #[test]
    fn test_new_line_splits_at_cursor() {
        let mut view = editable(20, 5, false);
        type_str(&mut view, "hello world");
        view.navigate(-6, 0);
        view.edit_new_line().unwrap();
        assert_eq!(view.buffer(), "hello\n world");
        assert_eq!(view.cursor(), Position::new(0, 1));
    }

    #[test]
    fn test_new_line_at_start_of_continuation_keeps_row() {
        let mut view = editable(6, 5, true);
        type_str(&mut view, "Hello!");
        view.step_left();
        assert_eq!(view.cursor(), Position::new(0, 1));
        view.edit_new_line().unwrap();
        assert_eq!(view.buffer(), "Hello\n!");
        assert_eq!(view.cursor(), Position::new(0, 1));
        assert_eq!(view.real_cursor(), Ok(Position::new(0, 1)));
    }

    #[test]
    fn test_consecutive_new_lines_coalesce() {
        let mut view = editable(20, 5, false);
        type_str(&mut view, "ab");
        view.history.cut();
        view.edit_new_line().unwrap();
        view.edit_new_line().unwrap();
        assert_eq!(view.buffer(), "ab\n\n");
        assert_eq!(view.history().undo_len(), 2);
        view.undo().unwrap();
        assert_eq!(view.buffer(), "ab");
        assert_eq!(view.real_cursor(), Ok(Position::new(2, 0)));
    }

    #[test]
    fn test_new_line_below_content_pads_and_undoes() {
        let mut view = editable(20, 5, false);
        view.buffer = TextBuffer::from_lines(["a"]);
        view.set_cursor(0, 2).unwrap();
        view.edit_new_line().unwrap();
        assert_eq!(view.text_buffer().line_count(), 4);
        view.undo().unwrap();
        assert_eq!(view.buffer(), "a");
        assert_eq!(view.text_buffer().line_count(), 1);
    }

    // --- deletion ---

    #[test]
    fn test_backspace_mid_line() {
        let mut view = editable(20, 5, false);
        type_str(&mut view, "abc");
        view.edit_delete(true).unwrap();
        view.edit_delete(true).unwrap();
        assert_eq!(view.buffer(), "a");
        assert_eq!(view.history().undo_len(), 2);
        view.undo().unwrap();
        assert_eq!(view.buffer(), "abc");
        assert_eq!(view.real_cursor(), Ok(Position::new(3, 0)));
    }

    #[test]
    fn test_backspace_at_line_start_merges_and_undo_splits() {
        let mut view = editable(20, 5, false);
        view.buffer = TextBuffer::from_lines(["abc", "def"]);
        view.set_cursor(0, 1).unwrap();
        assert_eq!(view.edit_delete(true), Ok(true));
        assert_eq!(view.buffer(), "abcdef");
        assert_eq!(view.cursor(), Position::new(3, 0));

        view.undo().unwrap();
        assert_eq!(view.buffer(), "abc\ndef");
        assert_eq!(view.real_cursor(), Ok(Position::new(0, 1)));
        view.redo().unwrap();
        assert_eq!(view.buffer(), "abcdef");
        assert_eq!(view.real_cursor(), Ok(Position::new(3, 0)));
    }

    #[test]
    fn test_backspace_at_buffer_start_is_noop() {
        let mut view = editable(20, 5, false);
        view.buffer = TextBuffer::from_lines(["abc"]);
        assert_eq!(view.edit_delete(true), Ok(false));
        assert!(!view.history().can_undo());
    }

    #[test]
    fn test_backspace_across_wrapped_lines() {
        let mut view = editable(6, 5, true);
        type_str(&mut view, "Hello!");
        view.edit_delete(true).unwrap();
        assert_eq!(view.buffer(), "Hello");
        assert_eq!(view.cursor(), Position::new(5, 0));
    }

    #[test]
    fn test_forward_delete_mid_line_and_at_end() {
        let mut view = editable(20, 5, false);
        view.buffer = TextBuffer::from_lines(["ab", "cd"]);
        view.edit_delete(false).unwrap();
        assert_eq!(view.buffer(), "b\ncd");
        view.navigate(1, 0);
        view.edit_delete(false).unwrap();
        assert_eq!(view.buffer(), "bcd");
        assert_eq!(view.real_cursor(), Ok(Position::new(1, 0)));
        view.undo().unwrap();
        assert_eq!(view.buffer(), "b\ncd");
    }

    #[test]
    fn test_forward_delete_at_buffer_end_is_noop() {
        let mut view = editable(20, 5, false);
        view.buffer = TextBuffer::from_lines(["ab"]);
        view.navigate(2, 0);
        assert_eq!(view.edit_delete(false), Ok(false));
        assert_eq!(view.buffer(), "ab");
    }

    // --- line moves ---

    #[test]
    fn test_move_line_down_and_undo() {
        let mut view = editable(20, 5, false);
        view.buffer = TextBuffer::from_lines(["one", "two", "three"]);
        view.navigate(1, 0);
        view.edit_move_line(false).unwrap();
        view.edit_move_line(false).unwrap();
        assert_eq!(view.buffer(), "two\nthree\none");
        assert_eq!(view.real_cursor(), Ok(Position::new(1, 2)));
        assert_eq!(view.history().undo_len(), 1);
        assert_eq!(view.edit_move_line(false), Ok(false));

        view.undo().unwrap();
        assert_eq!(view.buffer(), "one\ntwo\nthree");
        assert_eq!(view.real_cursor(), Ok(Position::new(1, 0)));
    }

    #[test]
    fn test_move_first_line_up_is_noop() {
        let mut view = editable(20, 5, false);
        view.buffer = TextBuffer::from_lines(["one", "two"]);
        assert_eq!(view.edit_move_line(true), Ok(false));
    }

    // --- undo law ---

    #[test]
    fn test_cut_separates_undo_entries() {
        let mut view = editable(20, 5, false);
        view.edit_write('a').unwrap();
        view.history.cut();
        view.edit_write('b').unwrap();
        view.undo().unwrap();
        assert_eq!(view.buffer(), "a");
        view.undo().unwrap();
        assert_eq!(view.buffer(), "");
        assert_eq!(view.undo(), Ok(false));
    }
}
