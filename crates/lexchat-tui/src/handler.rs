use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, InputMode};
use crate::tui::AppEvent;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.tick_animation(),
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Ctrl-C quits from anywhere
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    // The API key popup captures all input while it is open
    if app.show_api_key_input {
        handle_api_key_input(app, key);
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_editing_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('i') | KeyCode::Enter => app.input_mode = InputMode::Editing,
        KeyCode::Char('j') | KeyCode::Down => app.scroll_down(),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_up(),
        KeyCode::Char('G') => app.scroll_to_bottom(),
        KeyCode::Char('K') => app.open_api_key_input(),
        _ => {}
    }
}

fn handle_editing_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.input_mode = InputMode::Normal,
        KeyCode::Enter => app.submit_input(),
        KeyCode::Backspace => {
            if app.cursor > 0 {
                app.cursor -= 1;
                let byte_pos = char_to_byte_index(&app.input, app.cursor);
                app.input.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            let char_count = app.input.chars().count();
            if app.cursor < char_count {
                let byte_pos = char_to_byte_index(&app.input, app.cursor);
                app.input.remove(byte_pos);
            }
        }
        KeyCode::Left => app.cursor = app.cursor.saturating_sub(1),
        KeyCode::Right => {
            let char_count = app.input.chars().count();
            app.cursor = (app.cursor + 1).min(char_count);
        }
        KeyCode::Home => app.cursor = 0,
        KeyCode::End => app.cursor = app.input.chars().count(),
        KeyCode::Up => app.scroll_up(),
        KeyCode::Down => app.scroll_down(),
        KeyCode::Char(c) => {
            let byte_pos = char_to_byte_index(&app.input, app.cursor);
            app.input.insert(byte_pos, c);
            app.cursor += 1;
        }
        _ => {}
    }
}

fn handle_api_key_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.show_api_key_input = false;
            app.api_key_input.clear();
            app.api_key_cursor = 0;
        }
        KeyCode::Enter => app.apply_api_key(),
        KeyCode::Backspace => {
            if app.api_key_cursor > 0 {
                app.api_key_cursor -= 1;
                let byte_pos = char_to_byte_index(&app.api_key_input, app.api_key_cursor);
                app.api_key_input.remove(byte_pos);
            }
        }
        KeyCode::Left => app.api_key_cursor = app.api_key_cursor.saturating_sub(1),
        KeyCode::Right => {
            let char_count = app.api_key_input.chars().count();
            app.api_key_cursor = (app.api_key_cursor + 1).min(char_count);
        }
        KeyCode::Char(c) => {
            let byte_pos = char_to_byte_index(&app.api_key_input, app.api_key_cursor);
            app.api_key_input.insert(byte_pos, c);
            app.api_key_cursor += 1;
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexchat_core::{ApiKeyStore, ChatSession, GeminiClient};
    use std::path::PathBuf;

    fn test_app(api_key: &str) -> App {
        App {
            should_quit: false,
            input_mode: InputMode::Editing,
            session: ChatSession::new(),
            keys: ApiKeyStore::new(api_key, PathBuf::from("unused-config.json")),
            client: GeminiClient::new(api_key),
            model: "gemini-1.5-flash".to_string(),
            input: String::new(),
            cursor: 0,
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            query_task: None,
            animation_frame: 0,
            show_api_key_input: false,
            api_key_input: String::new(),
            api_key_cursor: 0,
        }
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::from(code));
    }

    #[test]
    fn char_to_byte_index_handles_multibyte_input() {
        let s = "§1 BGB";
        assert_eq!(char_to_byte_index(s, 0), 0);
        assert_eq!(char_to_byte_index(s, 1), 2);
        assert_eq!(char_to_byte_index(s, 6), s.len());
    }

    #[test]
    fn typing_inserts_at_the_cursor() {
        let mut app = test_app("test-key");
        for c in "law".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Home);
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.input, "alaw");
        assert_eq!(app.cursor, 1);
    }

    #[test]
    fn backspace_removes_the_char_before_the_cursor() {
        let mut app = test_app("test-key");
        for c in "laws".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.input, "law");
        assert_eq!(app.cursor, 3);
    }

    #[test]
    fn enter_with_a_missing_key_opens_the_popup() {
        let mut app = test_app("");
        for c in "hello".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);

        assert!(app.show_api_key_input);
        assert!(app.session.messages().is_empty());
        assert!(app.query_task.is_none());
    }

    #[test]
    fn enter_with_empty_input_does_nothing() {
        let mut app = test_app("test-key");
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Enter);

        assert!(app.session.messages().is_empty());
        assert!(app.query_task.is_none());
    }

    #[test]
    fn popup_captures_keys_and_escape_discards() {
        let mut app = test_app("");
        app.open_api_key_input();
        for c in "abc".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        assert_eq!(app.api_key_input, "abc");
        assert!(app.input.is_empty());

        press(&mut app, KeyCode::Esc);
        assert!(!app.show_api_key_input);
        assert!(app.api_key_input.is_empty());
        assert!(!app.keys.is_present());
    }
}
