use std::io;
use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    Tick,
    Quit,
    MoveUp,
    MoveDown,
    Open,
    Back,
    Home,
    ScrollUp,
    ScrollDown,
    Escape,
    InputChar(char),
    Backspace,
    MouseScrollUp,
    MouseScrollDown,
}

fn map_key_event(key_event: KeyEvent) -> AppEvent {
    if key_event.kind != KeyEventKind::Press {
        return AppEvent::Tick;
    }

    if key_event.modifiers.contains(KeyModifiers::CONTROL) {
        return match key_event.code {
            KeyCode::Char('c') => AppEvent::Quit,
            KeyCode::Char('u') => AppEvent::ScrollUp,
            KeyCode::Char('d') => AppEvent::ScrollDown,
            _ => AppEvent::Tick,
        };
    }

    match key_event.code {
        KeyCode::Up => AppEvent::MoveUp,
        KeyCode::Down => AppEvent::MoveDown,
        KeyCode::Enter | KeyCode::Right => AppEvent::Open,
        KeyCode::Left => AppEvent::Back,
        KeyCode::Home => AppEvent::Home,
        KeyCode::PageUp => AppEvent::ScrollUp,
        KeyCode::PageDown => AppEvent::ScrollDown,
        KeyCode::Esc => AppEvent::Escape,
        KeyCode::Backspace => AppEvent::Backspace,
        KeyCode::Char(c) => AppEvent::InputChar(c),
        _ => AppEvent::Tick,
    }
}

fn map_mouse_event_kind(kind: MouseEventKind) -> AppEvent {
    match kind {
        MouseEventKind::ScrollUp => AppEvent::MouseScrollUp,
        MouseEventKind::ScrollDown => AppEvent::MouseScrollDown,
        _ => AppEvent::Tick,
    }
}

pub fn next_event() -> io::Result<AppEvent> {
    if event::poll(Duration::from_millis(16))? {
        match event::read()? {
            Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                return Ok(map_key_event(key_event));
            }
            Event::Mouse(mouse_event) => return Ok(map_mouse_event_kind(mouse_event.kind)),
            _ => {}
        }
    }

    Ok(AppEvent::Tick)
}
