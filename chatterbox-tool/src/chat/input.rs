use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};

use super::app::{AppMode, ChatApp};

pub fn handle_event(app: &mut ChatApp, event: Event) {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, key),
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::ScrollUp => app.scroll_up(),
            MouseEventKind::ScrollDown => app.scroll_down(),
            _ => {}
        },
        _ => {}
    }
}

fn handle_key(app: &mut ChatApp, key: KeyEvent) {
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }
        (KeyCode::Up, KeyModifiers::CONTROL) => app.scroll_up(),
        (KeyCode::Down, KeyModifiers::CONTROL) => app.scroll_down(),
        (KeyCode::PageUp, _) => app.page_up(),
        (KeyCode::PageDown, _) => app.page_down(),
        _ if app.mode == AppMode::Chat => handle_edit_key(app, key),
        _ => {}
    }
}

fn handle_edit_key(app: &mut ChatApp, key: KeyEvent) {
    match (key.code, key.modifiers) {
        (KeyCode::Enter, KeyModifiers::NONE) => app.send_message(),
        (KeyCode::Backspace, _) => app.input.backspace(),
        (KeyCode::Delete, _) => app.input.delete(),
        (KeyCode::Left, _) => app.input.move_left(),
        (KeyCode::Right, _) => app.input.move_right(),
        (KeyCode::Home, _) => app.input.move_home(),
        (KeyCode::End, _) => app.input.move_end(),
        (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => app.input.insert_char(c),
        _ => {}
    }
}
