use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::browser::Intent;

/// Map a key press onto what the screens understand. Keys with no meaning
/// anywhere map to `None`.
pub(super) fn intent_for(key: KeyEvent) -> Option<Intent> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Intent::Quit),
            _ => None,
        };
    }
    let intent = match key.code {
        KeyCode::Up => Intent::Up,
        KeyCode::Down => Intent::Down,
        KeyCode::PageUp => Intent::PageUp,
        KeyCode::PageDown => Intent::PageDown,
        KeyCode::Home => Intent::Home,
        KeyCode::End => Intent::End,
        KeyCode::Enter => Intent::Confirm,
        KeyCode::Esc => Intent::Cancel,
        KeyCode::Backspace => Intent::Backspace,
        KeyCode::Left => Intent::Left,
        KeyCode::Right => Intent::Right,
        KeyCode::Char(c) => Intent::Char(c),
        _ => return None,
    };
    Some(intent)
}
