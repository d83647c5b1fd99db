//! Key event to edit action mapping.
//!
//! The [`Editor`] trait is the seam a host uses to replace the key table.
//! [`DefaultEditor`] covers plain typing; line breaks, navigation and history
//! are left to the host's own bindings.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::error::ViewError;
use crate::ui::view::View;

/// One editing intent resolved from a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    Write(char),
    Delete { backward: bool },
    NewLine,
    MoveLine { up: bool },
    ToggleOverwrite,
}

/// Strategy turning key events into edits on a view.
pub trait Editor {
    /// Handle `key` on `view`; returns whether the buffer changed.
    ///
    /// # Errors
    ///
    /// Propagates genuine view failures; boundary no-ops are `Ok(false)`.
    fn edit(&self, view: &mut View, key: &KeyEvent) -> Result<bool, ViewError>;
}

/// The built-in key table.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEditor;

impl DefaultEditor {
    /// Resolve `key` to an action, ignoring releases.
    pub fn action_for(key: &KeyEvent) -> Option<EditAction> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        let plain = key.modifiers.difference(KeyModifiers::SHIFT).is_empty();
        match key.code {
            KeyCode::Char('h') if key.modifiers == KeyModifiers::CONTROL => {
                Some(EditAction::Delete { backward: true })
            }
            KeyCode::Char(ch) if plain => Some(EditAction::Write(ch)),
            KeyCode::Backspace => Some(EditAction::Delete { backward: true }),
            KeyCode::Delete => Some(EditAction::Delete { backward: false }),
            KeyCode::Insert => Some(EditAction::ToggleOverwrite),
            _ => None,
        }
    }
}

impl Editor for DefaultEditor {
    fn edit(&self, view: &mut View, key: &KeyEvent) -> Result<bool, ViewError> {
        Self::action_for(key).map_or(Ok(false), |action| view.apply(action))
    }
}

/// Adapter that lets a closure act as an [`Editor`].
///
/// ```
/// use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
/// use termview::editor::keymap::{Editor, EditorFn};
/// use termview::ui::view::View;
///
/// let shouty = EditorFn(|view: &mut View, key: &KeyEvent| match key.code {
///     KeyCode::Char(c) => view.edit_write(c.to_ascii_uppercase()),
///     _ => Ok(false),
/// });
/// let mut view = View::new("v", 10, 2);
/// shouty
///     .edit(&mut view, &KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE))
///     .unwrap();
/// assert_eq!(view.buffer(), "A");
/// ```
pub struct EditorFn<F>(pub F);

impl<F> Editor for EditorFn<F>
where
    F: Fn(&mut View, &KeyEvent) -> Result<bool, ViewError>,
{
    fn edit(&self, view: &mut View, key: &KeyEvent) -> Result<bool, ViewError> {
        (self.0)(view, key)
    }
}

impl View {
    /// Run a resolved [`EditAction`].
    ///
    /// # Errors
    ///
    /// Same as the underlying edit operation.
    pub fn apply(&mut self, action: EditAction) -> Result<bool, ViewError> {
        match action {
            EditAction::Write(ch) => self.edit_write(ch),
            EditAction::Delete { backward } => self.edit_delete(backward),
            EditAction::NewLine => self.edit_new_line(),
            EditAction::MoveLine { up } => self.edit_move_line(up),
            EditAction::ToggleOverwrite => {
                self.overwrite = !self.overwrite;
                Ok(false)
            }
        }
    }
}
