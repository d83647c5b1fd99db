use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::app::Message;

/// Map a terminal event to a message; keys the host does not bind go to the
/// focused view's editor.
pub fn handle_event(event: &Event) -> Option<Message> {
    match event {
        Event::Key(key) => handle_key(key),
        Event::Mouse(mouse) => handle_mouse(mouse),
        Event::Resize(width, height) => Some(Message::Resize(*width, *height)),
        _ => None,
    }
}

pub fn handle_key(key: &KeyEvent) -> Option<Message> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let msg = match key.code {
        KeyCode::Char('q' | 'c') if ctrl => Message::Quit,
        KeyCode::Char('z') if ctrl => Message::Undo,
        KeyCode::Char('y') if ctrl => Message::Redo,
        KeyCode::Char('w') if ctrl => Message::ToggleWrap,
        KeyCode::Char('g') if ctrl => Message::ToggleHistory,
        KeyCode::Up if alt => Message::MoveLine { up: true },
        KeyCode::Down if alt => Message::MoveLine { up: false },
        KeyCode::Enter => Message::NewLine,
        KeyCode::Left => Message::Navigate { dx: -1, dy: 0 },
        KeyCode::Right => Message::Navigate { dx: 1, dy: 0 },
        KeyCode::Up => Message::Navigate { dx: 0, dy: -1 },
        KeyCode::Down => Message::Navigate { dx: 0, dy: 1 },
        KeyCode::Tab => Message::FocusNext,
        KeyCode::BackTab => Message::FocusPrev,
        _ => Message::Edit(*key),
    };
    Some(msg)
}

pub fn handle_mouse(mouse: &MouseEvent) -> Option<Message> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(Message::Click {
            column: mouse.column,
            row: mouse.row,
        }),
        _ => None,
    }
}
