use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseEventKind};

use crate::core::profile::ProfileField;

/// TUI-specific input events
#[derive(Debug, Clone, PartialEq)]
pub enum TuiEvent {
    /// Ctrl+C: quit regardless of state
    ForceQuit,
    /// Esc: cancel the in-flight response
    Escape,
    Submit,
    /// Ctrl+T / Ctrl+G / Ctrl+L advance a profile selector
    CycleProfile(ProfileField),

    InputChar(char),
    Paste(String),
    Backspace,
    Delete,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,

    ScrollUp,
    ScrollDown,
    ScrollPageUp,
    ScrollPageDown,
    Resize,
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> Option<TuiEvent> {
    poll_event_timeout(Duration::ZERO)
}

/// Poll for an event, blocking up to `timeout`.
pub fn poll_event_timeout(timeout: Duration) -> Option<TuiEvent> {
    if !event::poll(timeout).unwrap_or(false) {
        return None;
    }
    match event::read() {
        Ok(event) => translate(event),
        Err(e) => {
            log::warn!("Failed to read terminal event: {e}");
            None
        }
    }
}

/// Maps a raw crossterm event to a `TuiEvent`.
fn translate(event: Event) -> Option<TuiEvent> {
    match event {
        Event::Key(key_event) => {
            // Ignore key releases reported by the keyboard enhancement protocol
            if key_event.kind == KeyEventKind::Release {
                return None;
            }
            log::debug!(
                "Key event: {:?} with modifiers {:?}",
                key_event.code,
                key_event.modifiers
            );
            match (key_event.modifiers, key_event.code) {
                (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(TuiEvent::ForceQuit),
                (KeyModifiers::CONTROL, KeyCode::Char('t')) => {
                    Some(TuiEvent::CycleProfile(ProfileField::SkinType))
                }
                (KeyModifiers::CONTROL, KeyCode::Char('g')) => {
                    Some(TuiEvent::CycleProfile(ProfileField::FitnessGoal))
                }
                (KeyModifiers::CONTROL, KeyCode::Char('l')) => {
                    Some(TuiEvent::CycleProfile(ProfileField::ActivityLevel))
                }
                (KeyModifiers::CONTROL, _) => None,
                (_, KeyCode::Char(c)) => Some(TuiEvent::InputChar(c)),
                (_, KeyCode::Backspace) => Some(TuiEvent::Backspace),
                (_, KeyCode::Delete) => Some(TuiEvent::Delete),
                (_, KeyCode::Enter) => Some(TuiEvent::Submit),
                (_, KeyCode::Esc) => Some(TuiEvent::Escape),
                (_, KeyCode::Left) => Some(TuiEvent::CursorLeft),
                (_, KeyCode::Right) => Some(TuiEvent::CursorRight),
                (_, KeyCode::Home) => Some(TuiEvent::CursorHome),
                (_, KeyCode::End) => Some(TuiEvent::CursorEnd),
                (_, KeyCode::Up) => Some(TuiEvent::ScrollUp),
                (_, KeyCode::Down) => Some(TuiEvent::ScrollDown),
                (_, KeyCode::PageUp) => Some(TuiEvent::ScrollPageUp),
                (_, KeyCode::PageDown) => Some(TuiEvent::ScrollPageDown),
                _ => None,
            }
        }
        Event::Mouse(mouse_event) => match mouse_event.kind {
            MouseEventKind::ScrollUp => Some(TuiEvent::ScrollUp),
            MouseEventKind::ScrollDown => Some(TuiEvent::ScrollDown),
            _ => None,
        },
        Event::Paste(data) => Some(TuiEvent::Paste(data)),
        Event::Resize(_, _) => Some(TuiEvent::Resize),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;

    fn key(modifiers: KeyModifiers, code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn control_keys_map_to_profile_selectors() {
        assert_eq!(
            translate(key(KeyModifiers::CONTROL, KeyCode::Char('t'))),
            Some(TuiEvent::CycleProfile(ProfileField::SkinType))
        );
        assert_eq!(
            translate(key(KeyModifiers::CONTROL, KeyCode::Char('g'))),
            Some(TuiEvent::CycleProfile(ProfileField::FitnessGoal))
        );
        assert_eq!(
            translate(key(KeyModifiers::CONTROL, KeyCode::Char('l'))),
            Some(TuiEvent::CycleProfile(ProfileField::ActivityLevel))
        );
        assert_eq!(
            translate(key(KeyModifiers::CONTROL, KeyCode::Char('c'))),
            Some(TuiEvent::ForceQuit)
        );
    }

    #[test]
    fn unbound_control_chars_are_not_typed() {
        assert_eq!(translate(key(KeyModifiers::CONTROL, KeyCode::Char('x'))), None);
    }

    #[test]
    fn plain_and_shifted_chars_are_input() {
        assert_eq!(
            translate(key(KeyModifiers::NONE, KeyCode::Char('a'))),
            Some(TuiEvent::InputChar('a'))
        );
        assert_eq!(
            translate(key(KeyModifiers::SHIFT, KeyCode::Char('A'))),
            Some(TuiEvent::InputChar('A'))
        );
        assert_eq!(
            translate(key(KeyModifiers::NONE, KeyCode::Enter)),
            Some(TuiEvent::Submit)
        );
    }

    #[test]
    fn paste_and_resize_pass_through() {
        assert_eq!(
            translate(Event::Paste("hello".to_string())),
            Some(TuiEvent::Paste("hello".to_string()))
        );
        assert_eq!(translate(Event::Resize(80, 24)), Some(TuiEvent::Resize));
    }
}
