use crossterm::event::KeyEvent;
use tracing::{debug, warn};

use crate::app::Model;
use crate::editor::buffer::Position;
use crate::editor::keymap::{EditAction, Editor};
use crate::error::ViewError;
use crate::ui::tree::{ROOT, inner_area};
use crate::ui::view::View;

/// All possible events and actions in the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Editing
    /// Key for the focused view's editor
    Edit(KeyEvent),
    NewLine,
    /// Move the cursor line up or down
    MoveLine { up: bool },
    Undo,
    Redo,

    // Navigation
    /// Move the cursor by runes and rows
    Navigate { dx: isize, dy: isize },
    /// Put the cursor under a screen cell
    Click { column: u16, row: u16 },
    FocusNext,
    FocusPrev,

    // Layout
    ToggleHistory,
    ToggleWrap,
    Resize(u16, u16),

    // Application
    Quit,
}

/// Apply `msg` to the model.
pub fn update(mut model: Model, msg: Message) -> Model {
    let result = match msg {
        Message::Edit(key) => edit_focused(&mut model, |view, editor| editor.edit(view, &key)),
        Message::NewLine => edit_focused(&mut model, |view, _| view.apply(EditAction::NewLine)),
        Message::MoveLine { up } => {
            edit_focused(&mut model, |view, _| view.apply(EditAction::MoveLine { up }))
        }
        Message::Undo => edit_focused(&mut model, |view, _| view.undo()),
        Message::Redo => edit_focused(&mut model, |view, _| view.redo()),
        Message::Navigate { dx, dy } => {
            if let Some(view) = model.focused_view_mut() {
                view.navigate(dx, dy);
            }
            Ok(false)
        }
        Message::Click { column, row } => {
            click(&mut model, column, row);
            Ok(false)
        }
        Message::FocusNext => {
            cycle_focus(&mut model, true);
            Ok(false)
        }
        Message::FocusPrev => {
            cycle_focus(&mut model, false);
            Ok(false)
        }
        Message::ToggleHistory => {
            model.history_visible = !model.history_visible;
            model.layout();
            Ok(false)
        }
        Message::ToggleWrap => {
            if let Some(view) = model.focused_view_mut() {
                let pos = view.real_cursor().unwrap_or_default();
                view.wrap = !view.wrap;
                view.move_to_real(pos);
            }
            Ok(false)
        }
        Message::Resize(width, height) => {
            model.resize(width, height);
            Ok(false)
        }
        Message::Quit => {
            model.should_quit = true;
            Ok(false)
        }
    };

    match result {
        Ok(true) => model.status = None,
        Ok(false) => {}
        Err(err) => {
            warn!(%err, "edit failed");
            model.status = Some(err.to_string());
        }
    }
    model.refresh_history();
    model
}

fn edit_focused(
    model: &mut Model,
    f: impl FnOnce(&mut View, &dyn Editor) -> Result<bool, ViewError>,
) -> Result<bool, ViewError> {
    let Model { tree, focus, editor, .. } = model;
    match tree.view_mut(focus) {
        Some(view) if view.editable => f(view, &**editor),
        _ => Ok(false),
    }
}

fn click(model: &mut Model, column: u16, row: u16) {
    let Some(name) = model.tree.view_at(column, row).map(ToOwned::to_owned) else {
        return;
    };
    if !model.focus_view(&name) {
        return;
    }
    let Some(area) = model.tree.area(&name) else {
        return;
    };
    let Some(view) = model.tree.view_mut(&name) else {
        return;
    };
    let inner = inner_area(view, area);
    if !inner.contains(ratatui::layout::Position::new(column, row)) {
        return;
    }
    let x = usize::from(column - inner.x);
    let y = usize::from(row - inner.y);
    view.history.cut();
    match view.real_position(x, y) {
        Ok(pos) => {
            let buf = view.text_buffer();
            let y = pos.y.min(buf.line_count().saturating_sub(1));
            let x = pos.x.min(buf.line_len(y));
            view.move_to_real(Position::new(x, y));
        }
        Err(err) => debug!(%err, "click outside content"),
    }
}

fn cycle_focus(model: &mut Model, forward: bool) {
    let rotated = if forward {
        model.tree.round_robin_forward(ROOT)
    } else {
        model.tree.round_robin_backward(ROOT)
    };
    match rotated {
        Ok(Some(top)) => {
            let top = top.to_owned();
            model.focus_view(&top);
        }
        Ok(None) => {}
        Err(err) => debug!(%err, "focus cycle skipped"),
    }
}
