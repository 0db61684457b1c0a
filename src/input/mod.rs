use crate::app::actions::Action;
use crate::app::events::{Event, InputEvent};
use crossterm::event::{self, Event as CtEvent, KeyCode, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;

pub fn spawn_input_task(tx: mpsc::Sender<Event>) {
    tokio::task::spawn_blocking(move || {
        loop {
            if event::poll(std::time::Duration::from_millis(250)).unwrap_or(false) {
                let ev = match event::read() {
                    Ok(CtEvent::Key(k)) if k.kind == KeyEventKind::Press => InputEvent::Key(k),
                    Ok(CtEvent::Resize(_, _)) => InputEvent::Resize,
                    Ok(_) | Err(_) => continue,
                };
                if tx.blocking_send(Event::Input(ev)).is_err() {
                    break;
                }
            } else if tx.is_closed() {
                break;
            }
        }
    });
}

pub fn map_input_to_action(ev: InputEvent) -> Option<Action> {
    match ev {
        InputEvent::Resize => Some(Action::Resize),
        InputEvent::Key(k) => handle_key(k),
    }
}

fn handle_key(k: crossterm::event::KeyEvent) -> Option<Action> {
    match k.code {
        // Quit
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('c') if k.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Quit),

        // Playback
        KeyCode::Char(' ') => Some(Action::TogglePause),
        KeyCode::Char('x') => Some(Action::Stop),
        KeyCode::Char('n') => Some(Action::NextTrack),
        KeyCode::Char('p') => Some(Action::PrevTrack),
        KeyCode::Char(']') | KeyCode::Right => Some(Action::SeekForward),
        KeyCode::Char('[') | KeyCode::Left => Some(Action::SeekBack),
        KeyCode::Char(c @ '0'..='9') => c.to_digit(10).map(|d| Action::SeekTenths(d as u8)),

        // Volume
        KeyCode::Char('=') | KeyCode::Char('+') | KeyCode::Up => Some(Action::VolumeUp),
        KeyCode::Char('-') | KeyCode::Char('_') | KeyCode::Down => Some(Action::VolumeDown),
        KeyCode::Char('m') => Some(Action::ToggleMute),

        // Modes
        KeyCode::Char('r') => Some(Action::CycleRepeat),
        KeyCode::Char('s') => Some(Action::ToggleShuffle),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;

    fn key(code: KeyCode) -> Option<Action> {
        map_input_to_action(InputEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    #[test]
    fn test_playback_keys() {
        assert_eq!(key(KeyCode::Char(' ')), Some(Action::TogglePause));
        assert_eq!(key(KeyCode::Char('n')), Some(Action::NextTrack));
        assert_eq!(key(KeyCode::Char('p')), Some(Action::PrevTrack));
        assert_eq!(key(KeyCode::Char(']')), Some(Action::SeekForward));
        assert_eq!(key(KeyCode::Char('[')), Some(Action::SeekBack));
        assert_eq!(key(KeyCode::Char('x')), Some(Action::Stop));
        assert_eq!(key(KeyCode::Char('0')), Some(Action::SeekTenths(0)));
        assert_eq!(key(KeyCode::Char('7')), Some(Action::SeekTenths(7)));
    }

    #[test]
    fn test_mode_and_volume_keys() {
        assert_eq!(key(KeyCode::Char('+')), Some(Action::VolumeUp));
        assert_eq!(key(KeyCode::Char('-')), Some(Action::VolumeDown));
        assert_eq!(key(KeyCode::Char('m')), Some(Action::ToggleMute));
        assert_eq!(key(KeyCode::Char('r')), Some(Action::CycleRepeat));
        assert_eq!(key(KeyCode::Char('s')), Some(Action::ToggleShuffle));
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(key(KeyCode::Char('q')), Some(Action::Quit));
        assert_eq!(key(KeyCode::Esc), Some(Action::Quit));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_input_to_action(InputEvent::Key(ctrl_c)), Some(Action::Quit));
    }

    #[test]
    fn test_unbound_keys_and_resize() {
        assert_eq!(key(KeyCode::Char('z')), None);
        assert_eq!(key(KeyCode::Enter), None);
        assert_eq!(map_input_to_action(InputEvent::Resize), Some(Action::Resize));
    }
}
