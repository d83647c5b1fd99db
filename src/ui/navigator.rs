//! Cursor movement over wrapped and scrolled view lines.
//!
//! Every primitive first brings the viewport up to date, then updates the
//! (origin, cursor) pair. None of them fail: at the edges of the buffer they
//! simply stop.

use crate::editor::buffer::Position;
use crate::ui::view::View;

impl View {
    /// Move one rune forward.
    ///
    /// In write mode the cursor may step one cell past the end of a line.
    pub fn step_right(&mut self, write: bool) {
        self.refresh();
        if self.buffer.is_empty() || (self.on_last_line() && self.at_eol()) {
            return;
        }
        let eol = self.at_eol();
        let eov = self.at_eov();

        if eol && write {
            if eov && !self.wrap {
                self.origin.x += 1;
            } else {
                self.cursor.x += 1;
            }
        } else if eol || (eov && self.wrap) {
            let row = self.row();
            let continues = match (self.viewport.get(row), self.viewport.get(row + 1)) {
                (Some(cur), Some(next)) => {
                    !eol && next.source == cur.source && next.is_continuation()
                }
                _ => false,
            };
            self.next_row();
            self.origin.x = 0;
            self.cursor.x = usize::from(continues);
        } else if eov {
            self.origin.x += 1;
        } else {
            self.cursor.x += 1;
        }
    }

    /// Move one rune backward, crossing to the end of the previous view line
    /// at the start of a row.
    pub fn step_left(&mut self) {
        self.refresh();
        if self.on_first_row() && self.at_bol() {
            return;
        }
        if self.at_bol() {
            let row = self.row();
            let target = match (self.viewport.get(row - 1), self.viewport.get(row)) {
                (Some(prev), Some(cur)) if cur.is_continuation() && cur.source == prev.source => {
                    prev.len.saturating_sub(1)
                }
                (Some(prev), _) => prev.len,
                (None, _) => 0,
            };
            self.prev_row();
            self.adjust_to_width(target);
        } else if self.cursor.x == 0 {
            self.origin.x -= 1;
        } else {
            self.cursor.x -= 1;
        }
    }

    /// Move one view line up without touching the column.
    pub fn step_up(&mut self) {
        self.refresh();
        if self.on_first_row() {
            return;
        }
        self.prev_row();
    }

    /// Move one view line down without touching the column.
    ///
    /// In write mode the cursor may land one row below the last view line.
    pub fn step_down(&mut self, write: bool) {
        self.refresh();
        if self.buffer.is_empty() {
            return;
        }
        let row = self.row();
        let len = self.viewport.len();
        if (write && row >= len) || (!write && row + 1 >= len) {
            return;
        }
        self.next_row();
    }

    /// Clamp the column to the view line under the cursor.
    pub fn adjust_position_to_current_line(&mut self) {
        self.refresh();
        let len = self.current_line().map_or(0, |vl| vl.len);
        if self.origin.x + self.cursor.x > len {
            self.adjust_to_width(len);
        }
    }

    /// Move by `dy` rows then `dx` runes, clamping to line lengths along the
    /// way. Forward motion in write mode is not clamped.
    pub fn move_cursor(&mut self, dx: isize, dy: isize, write: bool) {
        for _ in 0..dy.unsigned_abs() {
            if dy < 0 {
                self.step_up();
            } else {
                self.step_down(write);
            }
        }
        if !write {
            self.adjust_position_to_current_line();
        }
        for _ in 0..dx.unsigned_abs() {
            if dx < 0 {
                self.step_left();
            } else {
                self.step_right(write);
            }
            if !(write && dx > 0) {
                self.adjust_position_to_current_line();
            }
        }
    }

    /// Put the cursor on buffer position `pos`, scrolling it into view.
    pub fn move_to_real(&mut self, pos: Position) {
        self.refresh();
        let Ok(target) = self.viewport.view_position(pos.x, pos.y) else {
            self.origin = Position::default();
            self.cursor = Position::default();
            return;
        };

        let height = self.height.max(1);
        if target.y < self.origin.y {
            self.origin.y = target.y;
            self.cursor.y = 0;
        } else if target.y - self.origin.y >= height {
            self.origin.y = target.y + 1 - height;
            self.cursor.y = height - 1;
        } else {
            self.cursor.y = target.y - self.origin.y;
        }

        if self.wrap {
            self.origin.x = 0;
            self.cursor.x = target.x;
        } else {
            self.adjust_to_width(target.x);
        }
    }

    /// Place the column so that view column `w` is under the cursor,
    /// scrolling horizontally when not wrapping.
    pub(crate) fn adjust_to_width(&mut self, w: usize) {
        if self.wrap {
            self.cursor.x = w;
            return;
        }
        let width = self.width.max(1);
        if w < self.origin.x {
            self.origin.x = w;
            self.cursor.x = 0;
        } else if w - self.origin.x < width {
            self.cursor.x = w - self.origin.x;
        } else {
            self.origin.x = w + 1 - width;
            self.cursor.x = width - 1;
        }
    }

    // --- Private helpers ---

    const fn row(&self) -> usize {
        self.origin.y + self.cursor.y
    }

    fn next_row(&mut self) {
        if self.cursor.y + 1 >= self.height {
            self.origin.y += 1;
        } else {
            self.cursor.y += 1;
        }
    }

    const fn prev_row(&mut self) {
        if self.cursor.y == 0 {
            self.origin.y = self.origin.y.saturating_sub(1);
        } else {
            self.cursor.y -= 1;
        }
    }

    const fn at_bol(&self) -> bool {
        self.origin.x == 0 && self.cursor.x == 0
    }

    const fn at_eov(&self) -> bool {
        self.cursor.x + 1 >= self.width
    }

    const fn on_first_row(&self) -> bool {
        self.row() == 0
    }

    fn at_eol(&self) -> bool {
        self.real_cursor_cached()
            .is_ok_and(|pos| pos.x >= self.buffer.line_len(pos.y))
    }

    fn on_last_line(&self) -> bool {
        self.real_cursor_cached()
            .is_ok_and(|pos| pos.y + 1 >= self.buffer.line_count())
    }
}

#[cfg(test)]
mod tests {
    use crate::editor::buffer::{Position, TextBuffer};
    use crate::ui::view::View;

    fn view_with(lines: &[&str], width: usize, height: usize, wrap: bool) -> View {
        let mut view = View::new("nav", width, height);
        view.buffer = TextBuffer::from_lines(lines.iter().copied());
        view.wrap = wrap;
        view
    }

    fn real(view: &mut View) -> Position {
        view.real_cursor().unwrap()
    }

    // --- step_right ---

    #[test]
    fn test_step_right_on_empty_buffer_is_noop() {
        let mut view = view_with(&[], 10, 3, false);
        view.step_right(false);
        view.step_right(true);
        assert_eq!(view.cursor(), Position::new(0, 0));
    }

    #[test]
    fn test_step_right_stops_at_end_of_last_line() {
        let mut view = view_with(&["ab"], 10, 3, false);
        view.move_cursor(5, 0, false);
        assert_eq!(view.cursor(), Position::new(2, 0));
    }

    #[test]
    fn test_step_right_crosses_to_next_line() {
        let mut view = view_with(&["ab", "cd"], 10, 3, false);
        view.move_cursor(3, 0, false);
        assert_eq!(view.cursor(), Position::new(0, 1));
        assert_eq!(real(&mut view), Position::new(0, 1));
    }

    #[test]
    fn test_step_right_crosses_wrap_boundary_at_column_one() {
        let mut view = view_with(&["Hello!"], 6, 3, true);
        view.move_cursor(5, 0, false);
        assert_eq!(view.cursor(), Position::new(5, 0));
        view.step_right(false);
        assert_eq!(view.cursor(), Position::new(1, 1));
        assert_eq!(real(&mut view), Position::new(6, 0));
    }

    #[test]
    fn test_step_right_scrolls_horizontally_without_wrap() {
        let mut view = view_with(&["abcdefghij"], 4, 1, false);
        view.move_cursor(6, 0, false);
        assert_eq!(view.cursor(), Position::new(3, 0));
        assert_eq!(view.origin(), Position::new(3, 0));
        assert_eq!(real(&mut view), Position::new(6, 0));
    }

    #[test]
    fn test_write_mode_step_past_line_end_scrolls_without_wrap() {
        let mut view = view_with(&["abc", "z"], 4, 1, false);
        view.move_cursor(3, 0, false);
        assert_eq!(view.cursor(), Position::new(3, 0));
        view.move_cursor(3, 0, true);
        assert_eq!(view.cursor(), Position::new(3, 0));
        assert_eq!(view.origin(), Position::new(3, 0));
        assert_eq!(real(&mut view), Position::new(6, 0));
    }

    #[test]
    fn test_step_right_scrolls_origin_on_bottom_row() {
        let mut view = view_with(&["a", "b", "c"], 10, 2, false);
        view.move_cursor(0, 1, false);
        view.move_cursor(2, 0, false);
        assert_eq!(view.origin(), Position::new(0, 1));
        assert_eq!(view.cursor(), Position::new(0, 1));
        assert_eq!(real(&mut view), Position::new(0, 2));
    }

    // --- step_left ---

    #[test]
    fn test_step_left_at_start_is_noop() {
        let mut view = view_with(&["abc"], 10, 3, false);
        view.step_left();
        assert_eq!(view.cursor(), Position::new(0, 0));
    }

    #[test]
    fn test_step_left_to_end_of_previous_line() {
        let mut view = view_with(&["abc", "de"], 10, 3, false);
        view.set_cursor(0, 1).unwrap();
        view.step_left();
        assert_eq!(view.cursor(), Position::new(3, 0));
    }

    #[test]
    fn test_step_left_scrolls_back_horizontally() {
        let mut view = view_with(&["abcdefghij"], 4, 1, false);
        view.set_origin(3, 0);
        view.step_left();
        assert_eq!(view.origin(), Position::new(2, 0));
        assert_eq!(view.cursor(), Position::new(0, 0));
    }

    #[test]
    fn test_step_left_to_long_previous_line_scrolls() {
        let mut view = view_with(&["abcdefghij", "x"], 4, 3, false);
        view.set_cursor(0, 1).unwrap();
        view.step_left();
        assert_eq!(view.origin(), Position::new(7, 0));
        assert_eq!(view.cursor(), Position::new(3, 0));
        assert_eq!(real(&mut view), Position::new(10, 0));
    }

    #[test]
    fn test_step_left_from_top_row_scrolls_origin() {
        let mut view = view_with(&["ab", "cd"], 10, 1, false);
        view.set_origin(0, 1);
        view.step_left();
        assert_eq!(view.origin(), Position::new(0, 0));
        assert_eq!(view.cursor(), Position::new(2, 0));
    }

    // --- vertical ---

    #[test]
    fn test_step_down_stops_at_last_line() {
        let mut view = view_with(&["a", "b"], 10, 5, false);
        view.move_cursor(0, 4, false);
        assert_eq!(view.cursor(), Position::new(0, 1));
    }

    #[test]
    fn test_step_down_in_write_mode_goes_one_past() {
        let mut view = view_with(&["a", "b"], 10, 5, false);
        view.move_cursor(0, 4, true);
        assert_eq!(view.cursor(), Position::new(0, 2));
        assert_eq!(real(&mut view), Position::new(0, 2));
    }

    #[test]
    fn test_vertical_move_clamps_column() {
        let mut view = view_with(&["abcdef", "ab"], 10, 5, false);
        view.move_cursor(5, 0, false);
        view.move_cursor(0, 1, false);
        assert_eq!(view.cursor(), Position::new(2, 1));
    }

    #[test]
    fn test_step_up_keeps_column() {
        let mut view = view_with(&["ab", "abcdef"], 10, 5, false);
        view.set_cursor(5, 1).unwrap();
        view.step_up();
        assert_eq!(view.cursor(), Position::new(5, 0));
        view.adjust_position_to_current_line();
        assert_eq!(view.cursor(), Position::new(2, 0));
    }

    #[test]
    fn test_step_up_scrolls_origin_from_top_row() {
        let mut view = view_with(&["a", "b", "c"], 10, 2, false);
        view.set_origin(0, 2);
        view.step_up();
        assert_eq!(view.origin(), Position::new(0, 1));
        assert_eq!(view.cursor(), Position::new(0, 0));
    }

    // --- move_to_real ---

    #[test]
    fn test_move_to_real_scrolls_into_view() {
        let lines: Vec<String> = (0..20).map(|i| format!("line {i}")).collect();
        let mut view = View::new("v", 10, 5);
        view.buffer = TextBuffer::from_lines(&lines);
        view.move_to_real(Position::new(3, 12));
        assert_eq!(view.origin(), Position::new(0, 8));
        assert_eq!(view.cursor(), Position::new(3, 4));
        view.move_to_real(Position::new(0, 2));
        assert_eq!(view.origin(), Position::new(0, 2));
        assert_eq!(view.cursor(), Position::new(0, 0));
    }

    #[test]
    fn test_move_to_real_on_wrap_boundary() {
        let mut view = view_with(&["Hello!"], 6, 3, true);
        view.move_to_real(Position::new(5, 0));
        assert_eq!(view.cursor(), Position::new(0, 1));
        view.move_to_real(Position::new(6, 0));
        assert_eq!(view.cursor(), Position::new(1, 1));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn steps_move_real_position_by_one(
                lines in prop::collection::vec("[a-z]{0,14}", 1..6),
                width in 2..9usize,
                height in 1..5usize,
                wrap in any::<bool>(),
                moves in prop::collection::vec(any::<bool>(), 1..40),
            ) {
                let mut view = View::new("p", width, height);
                view.buffer = TextBuffer::from_lines(&lines);
                view.wrap = wrap;
                let last = lines.len() - 1;
                let end = Position::new(lines[last].chars().count(), last);

                for forward in moves {
                    let before = view.real_cursor().unwrap();
                    if forward {
                        view.move_cursor(1, 0, false);
                    } else {
                        view.move_cursor(-1, 0, false);
                    }
                    let after = view.real_cursor().unwrap();
                    let at_boundary = if forward {
                        before == end
                    } else {
                        before == Position::new(0, 0)
                    };
                    if at_boundary {
                        prop_assert_eq!(before, after);
                        continue;
                    }
                    let (first, second) = if forward { (before, after) } else { (after, before) };
                    if first.y == second.y {
                        prop_assert_eq!(first.x + 1, second.x);
                    } else {
                        prop_assert_eq!(first.y + 1, second.y);
                        prop_assert_eq!(second.x, 0);
                        prop_assert_eq!(first.x, view.text_buffer().line_len(first.y));
                    }
                }
            }
        }
    }
}
