//! Terminal input mapping.

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

/// What a terminal event asks the preview screen to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Leave the screen.
    Quit,
    /// Open the previewed link.
    OpenLink,
    /// Open the preview image in the viewer.
    PreviewImage,
    /// Left click at a cell.
    Click {
        /// Column of the click.
        column: u16,
        /// Row of the click.
        row: u16,
    },
}

/// Maps a terminal event to an action. Key releases and repeats are ignored.
#[must_use]
pub fn input_action(event: &Event) -> Option<InputAction> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => key_action(key),
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            ..
        }) => Some(InputAction::Click {
            column: *column,
            row: *row,
        }),
        _ => None,
    }
}

fn key_action(key: &KeyEvent) -> Option<InputAction> {
    if is_quit_event(key) {
        return Some(InputAction::Quit);
    }

    match key.code {
        KeyCode::Enter | KeyCode::Char('o') => Some(InputAction::OpenLink),
        KeyCode::Char('i') => Some(InputAction::PreviewImage),
        _ => None,
    }
}

/// Checks if key is a quit event.
#[must_use]
pub fn is_quit_event(key: &KeyEvent) -> bool {
    matches!(
        key,
        KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            ..
        } | KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            ..
        } | KeyEvent {
            code: KeyCode::Esc,
            modifiers: KeyModifiers::NONE,
            ..
        }
    )
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyEventState;

    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new_with_kind(code, modifiers, KeyEventKind::Press))
    }

    #[test]
    fn test_quit_events() {
        assert_eq!(
            input_action(&key(KeyCode::Char('q'), KeyModifiers::NONE)),
            Some(InputAction::Quit)
        );
        assert_eq!(
            input_action(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(InputAction::Quit)
        );
        assert_eq!(
            input_action(&key(KeyCode::Esc, KeyModifiers::NONE)),
            Some(InputAction::Quit)
        );
    }

    #[test]
    fn test_preview_keys() {
        assert_eq!(
            input_action(&key(KeyCode::Enter, KeyModifiers::NONE)),
            Some(InputAction::OpenLink)
        );
        assert_eq!(
            input_action(&key(KeyCode::Char('o'), KeyModifiers::NONE)),
            Some(InputAction::OpenLink)
        );
        assert_eq!(
            input_action(&key(KeyCode::Char('i'), KeyModifiers::NONE)),
            Some(InputAction::PreviewImage)
        );
        assert_eq!(input_action(&key(KeyCode::Char('a'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn test_key_release_ignored() {
        let release = Event::Key(KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert_eq!(input_action(&release), None);
    }

    #[test]
    fn test_left_click() {
        let click = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 4,
            row: 7,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(
            input_action(&click),
            Some(InputAction::Click { column: 4, row: 7 })
        );
    }
}
