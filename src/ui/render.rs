use ratatui::prelude::*;
use ratatui::widgets::{Block, Clear, Paragraph};

use crate::editor::buffer::FILLER;
use crate::ui::tree::inner_area;
use crate::ui::view::View;

/// Paint a view: optional frame with title and footer, then the visible
/// segment of every view line under the origin.
///
/// Rendering resizes the view to the area it is given, pulls the cursor
/// back inside it and applies autoscroll, so it takes the view mutably.
impl Widget for &mut View {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.hidden {
            return;
        }
        let inner = inner_area(self, area);
        if self.frame {
            let mut block = Block::bordered();
            if !self.title.is_empty() {
                block = block.title(self.title.clone());
            }
            if !self.footer.is_empty() {
                block = block.title_bottom(Line::from(self.footer.clone()).right_aligned());
            }
            block.render(area, buf);
        }

        self.resize(usize::from(inner.width), usize::from(inner.height));
        self.clamp_cursor();
        self.refresh();
        self.autoscroll_to_end();

        Clear.render(inner, buf);
        Paragraph::new(self.visible_lines()).render(inner, buf);
    }
}

impl View {
    /// Screen cell for the cursor inside `inner`.
    ///
    /// Reads the state left by the last render, which keeps the cursor
    /// inside the view.
    pub fn screen_cursor(&self, inner: Rect) -> ratatui::layout::Position {
        ratatui::layout::Position::new(
            inner.x.saturating_add(u16::try_from(self.cursor.x).unwrap_or(u16::MAX)),
            inner.y.saturating_add(u16::try_from(self.cursor.y).unwrap_or(u16::MAX)),
        )
    }

    fn visible_lines(&self) -> Vec<Line<'static>> {
        let max_x = if self.wrap {
            self.width.saturating_sub(1)
        } else {
            self.width
        };
        self.viewport
            .lines()
            .iter()
            .skip(self.origin.y)
            .take(self.height)
            .map(|vl| {
                vl.chars(&self.buffer)
                    .iter()
                    .skip(self.origin.x)
                    .take(max_x)
                    .map(|&c| self.mask.unwrap_or(if c == FILLER { ' ' } else { c }))
                    .collect::<String>()
            })
            .map(Line::from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use crate::editor::buffer::{Position, TextBuffer};
    use crate::ui::view::View;

    fn draw(view: &mut View, width: u16, height: u16) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|frame| frame.render_widget(&mut *view, frame.area()))
            .unwrap();
        let buffer = terminal.backend().buffer();
        (0..buffer.area.height)
            .map(|row| {
                (0..buffer.area.width)
                    .map(|col| buffer[(col, row)].symbol())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_render_frame_title_and_content() {
        let mut view = View::new("main", 0, 0);
        view.title = "Notes".into();
        view.write_str("hello\nworld");
        let rows = draw(&mut view, 10, 4);
        assert_eq!(rows[0], "┌Notes───┐");
        assert_eq!(rows[1], "│hello   │");
        assert_eq!(rows[2], "│world   │");
        assert_eq!(view.size(), (8, 2));
    }

    #[test]
    fn test_render_without_frame_uses_whole_area() {
        let mut view = View::new("plain", 0, 0);
        view.frame = false;
        view.write_str("abc");
        let rows = draw(&mut view, 5, 1);
        assert_eq!(rows[0], "abc  ");
    }

    #[test]
    fn test_render_filler_as_space_and_mask() {
        let mut view = View::new("pw", 0, 0);
        view.frame = false;
        view.buffer = TextBuffer::from_lines(["a\0b"]);
        assert_eq!(draw(&mut view, 4, 1)[0], "a b ");
        view.mask = Some('*');
        assert_eq!(draw(&mut view, 4, 1)[0], "*** ");
    }

    #[test]
    fn test_render_wrapped_segments() {
        let mut view = View::new("wrap", 0, 0);
        view.frame = false;
        view.wrap = true;
        view.write_str("Hello!");
        let rows = draw(&mut view, 6, 3);
        assert_eq!(rows, vec!["Hello ", "!     ", "      "]);
    }

    #[test]
    fn test_render_respects_origin() {
        let mut view = View::new("scroll", 0, 0);
        view.frame = false;
        view.write_str("0123456\nabcdefg\nxyz");
        view.set_origin(2, 1);
        let rows = draw(&mut view, 3, 2);
        assert_eq!(rows, vec!["cde", "z  "]);
    }

    #[test]
    fn test_autoscroll_on_render() {
        let mut view = View::new("log", 0, 0);
        view.frame = false;
        view.autoscroll = true;
        view.write_str("1\n2\n3\n4\n5");
        let rows = draw(&mut view, 2, 2);
        assert_eq!(rows, vec!["4 ", "5 "]);
    }

    #[test]
    fn test_hidden_view_draws_nothing() {
        let mut view = View::new("h", 0, 0);
        view.hidden = true;
        view.write_str("secret");
        let rows = draw(&mut view, 8, 3);
        assert!(rows.iter().all(|row| row.trim().is_empty()));
    }

    #[test]
    fn test_render_clamps_cursor_into_smaller_area() {
        let mut view = View::new("main", 10, 5);
        view.frame = false;
        view.editable = true;
        view.buffer = TextBuffer::from_lines(["l0", "l1", "l2", "l3", "l4"]);
        view.set_cursor(0, 4).unwrap();

        let mut terminal = Terminal::new(TestBackend::new(10, 2)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                frame.render_widget(&mut view, area);
                frame.set_cursor_position(view.screen_cursor(area));
            })
            .unwrap();
        terminal.backend_mut().assert_cursor_position((0, 1));
        assert_eq!(view.cursor(), Position::new(0, 1));

        view.edit_write('X').unwrap();
        assert_eq!(view.buffer(), "l0\nl1\nl2\nl3\nXl4");
        assert_eq!(draw(&mut view, 10, 2), vec!["l3        ", "Xl4       "]);
    }

    #[test]
    fn test_render_clamps_column_by_scrolling() {
        let mut view = View::new("c", 0, 0);
        view.frame = false;
        view.buffer = TextBuffer::from_lines(["abcdefgh"]);
        view.resize(8, 1);
        view.set_cursor(6, 0).unwrap();
        let rows = draw(&mut view, 4, 1);
        assert_eq!(view.cursor(), Position::new(3, 0));
        assert_eq!(rows, vec!["defg"]);
        assert_eq!(view.real_cursor(), Ok(Position::new(6, 0)));
    }
}
