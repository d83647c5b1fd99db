use ratatui::layout::{Constraint, Direction, Layout, Rect};
use tracing::debug;

use crate::editor::keymap::{DefaultEditor, Editor};
use crate::ui::tree::{ROOT, ViewTree};
use crate::ui::view::View;
use crate::ui::{HISTORY_WIDTH_PERCENT, MAIN_WIDTH_PERCENT};

pub const MAIN_VIEW: &str = "main";
pub const HISTORY_VIEW: &str = "history";

/// The complete application state.
///
/// All state lives here - no global or scattered state.
pub struct Model {
    /// Every view on screen, drawn in tree order
    pub tree: ViewTree,
    /// Name of the view receiving keys
    pub focus: String,
    /// Key strategy for the focused view
    pub editor: Box<dyn Editor>,
    pub history_visible: bool,
    /// Last task failure, shown in the main footer until the next edit
    pub status: Option<String>,
    pub should_quit: bool,
    size: (u16, u16),
}

impl Default for Model {
    fn default() -> Self {
        Self::new((80, 24))
    }
}

impl Model {
    /// Create the main view and history panel for a terminal of `size`.
    pub fn new(size: (u16, u16)) -> Self {
        let mut model = Self {
            tree: ViewTree::new(Rect::new(0, 0, size.0, size.1)),
            focus: MAIN_VIEW.to_string(),
            editor: Box::new(DefaultEditor),
            history_visible: true,
            status: None,
            should_quit: false,
            size,
        };
        model.layout();
        if let Some(main) = model.tree.view_mut(MAIN_VIEW) {
            main.editable = true;
            main.title = " termview ".to_string();
        }
        if let Some(history) = model.tree.view_mut(HISTORY_VIEW) {
            history.title = " history ".to_string();
        }
        model.refresh_history();
        model
    }

    pub const fn size(&self) -> (u16, u16) {
        self.size
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.size = (width, height);
        self.layout();
    }

    /// Place the main view and, when shown, the history panel beside it.
    pub fn layout(&mut self) {
        let area = Rect::new(0, 0, self.size.0, self.size.1);
        self.tree.set_root_area(area);
        let (main_area, history_area) = if self.history_visible {
            let chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Percentage(MAIN_WIDTH_PERCENT),
                    Constraint::Percentage(HISTORY_WIDTH_PERCENT),
                ])
                .split(area);
            (chunks[0], Some(chunks[1]))
        } else {
            (area, None)
        };

        if let Err(err) = self.tree.set_view(ROOT, MAIN_VIEW, main_area) {
            debug!(%err, "main view not placed");
        }
        match history_area {
            Some(history_area) => match self.tree.set_view(ROOT, HISTORY_VIEW, history_area) {
                Ok(history) => history.hidden = false,
                Err(err) => debug!(%err, "history view not placed"),
            },
            None => {
                if let Some(history) = self.tree.view_mut(HISTORY_VIEW) {
                    history.hidden = true;
                }
            }
        }
    }

    pub fn main_view(&self) -> Option<&View> {
        self.tree.view(MAIN_VIEW)
    }

    pub fn main_view_mut(&mut self) -> Option<&mut View> {
        self.tree.view_mut(MAIN_VIEW)
    }

    pub fn focused_view_mut(&mut self) -> Option<&mut View> {
        self.tree.view_mut(&self.focus)
    }

    /// Focus `name` if it is an editable view.
    pub fn focus_view(&mut self, name: &str) -> bool {
        let editable = self.tree.view(name).is_some_and(|view| view.editable);
        if editable {
            self.focus = name.to_string();
        }
        editable
    }

    /// Rewrite the history panel from the main view's command log, and the
    /// main footer from its cursor.
    pub fn refresh_history(&mut self) {
        let footer = self.footer_text();
        if let Some(main) = self.tree.view_mut(MAIN_VIEW) {
            main.footer = footer;
        }
        if !self.history_visible {
            return;
        }
        let Some((width, height)) = self.tree.view(HISTORY_VIEW).map(View::size) else {
            return;
        };
        let Some(rows) = self
            .main_view()
            .map(|main| main.history().render(width, height))
        else {
            return;
        };
        if let Some(history) = self.tree.view_mut(HISTORY_VIEW) {
            history.clear();
            history.write_str(&rows.join("\n"));
        }
    }

    fn footer_text(&mut self) -> String {
        let Some(main) = self.tree.view_mut(MAIN_VIEW) else {
            return String::new();
        };
        let mode = if main.overwrite { "OVR" } else { "INS" };
        let pos = main.real_cursor().unwrap_or_default();
        match &self.status {
            Some(status) => format!(" {status} "),
            None => format!(" Ln {}, Col {} {mode} ", pos.y + 1, pos.x + 1),
        }
    }
}
