use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use runtime::{Key, ViewportEvent};

/// Decode a terminal event; anything the viewer does not react to is `None`.
pub fn translate_event(event: Event) -> Option<ViewportEvent> {
    match event {
        Event::Resize(width, height) => Some(ViewportEvent::Resize {
            width: usize::from(width),
            height: usize::from(height),
        }),
        Event::Key(key) => translate_key(key).map(ViewportEvent::Key),
        _ => None,
    }
}

pub fn translate_key(key: KeyEvent) -> Option<Key> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => Some(Key::Interrupt),
        KeyCode::Char('u') if ctrl => Some(Key::ClearLine),
        KeyCode::Char(_) if ctrl => None,
        KeyCode::Char(c) => Some(Key::Char(c)),
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Esc => Some(Key::Esc),
        KeyCode::Left => Some(Key::Left),
        KeyCode::Right => Some(Key::Right),
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{
        Event, KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers,
    };
    use runtime::{Key, ViewportEvent};

    use super::{translate_event, translate_key};

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn control_chords() {
        assert_eq!(
            translate_key(press(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Key::Interrupt)
        );
        assert_eq!(
            translate_key(press(KeyCode::Char('u'), KeyModifiers::CONTROL)),
            Some(Key::ClearLine)
        );
        assert_eq!(translate_key(press(KeyCode::Char('x'), KeyModifiers::CONTROL)), None);
    }

    #[test]
    fn plain_and_shifted_chars_pass_through() {
        assert_eq!(
            translate_key(press(KeyCode::Char('q'), KeyModifiers::NONE)),
            Some(Key::Char('q'))
        );
        assert_eq!(
            translate_key(press(KeyCode::Char('Q'), KeyModifiers::SHIFT)),
            Some(Key::Char('Q'))
        );
        assert_eq!(translate_key(press(KeyCode::Left, KeyModifiers::NONE)), Some(Key::Left));
        assert_eq!(translate_key(press(KeyCode::F(5), KeyModifiers::NONE)), None);
    }

    #[test]
    fn releases_are_ignored() {
        let release = KeyEvent {
            code: KeyCode::Enter,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(translate_key(release), None);
    }

    #[test]
    fn resize_events() {
        assert_eq!(
            translate_event(Event::Resize(120, 40)),
            Some(ViewportEvent::Resize {
                width: 120,
                height: 40
            })
        );
        assert_eq!(translate_event(Event::FocusGained), None);
    }
}
