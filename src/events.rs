use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::debug;

use crate::app_state::{AppState, Focus};
use crate::widget::PendingTurn;

/// What the event loop should do after a key press.
#[derive(Debug, PartialEq)]
pub enum Action {
    None,
    Dispatch(PendingTurn),
    Quit,
}

pub fn handle_key_event(app: &mut AppState, key: KeyEvent) -> Action {
    if key.kind == KeyEventKind::Release {
        return Action::None;
    }

    // Help overlay swallows everything except its own toggles
    if app.show_help {
        if matches!(key.code, KeyCode::F(1) | KeyCode::Esc) {
            app.show_help = false;
        }
        return Action::None;
    }

    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,
        (KeyCode::F(1), _) => {
            app.show_help = true;
            Action::None
        }

        // Scrolling
        (KeyCode::PageUp, _) => {
            app.transcript_view.scroll_up(5);
            app.widget.release_bottom();
            Action::None
        }
        (KeyCode::PageDown, _) => {
            app.transcript_view.scroll_down(5);
            Action::None
        }

        (KeyCode::Tab, _) | (KeyCode::BackTab, _) => {
            app.toggle_focus();
            Action::None
        }

        _ => match app.focus {
            Focus::Input => handle_input_key(app, key),
            Focus::Options(_) => handle_option_key(app, key),
        },
    }
}

fn submit(app: &mut AppState) -> Action {
    app.sync_input_from_textarea();
    match app.widget.begin_submit() {
        Ok(turn) => Action::Dispatch(turn),
        Err(reason) => {
            debug!(?reason, "Nothing sent");
            Action::None
        }
    }
}

fn handle_input_key(app: &mut AppState, key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        // Enter and the send binding are the same action
        (KeyCode::Enter, KeyModifiers::NONE) | (KeyCode::Char('s'), KeyModifiers::CONTROL) => {
            submit(app)
        }
        // Already on the input pane
        (KeyCode::Esc, _) => Action::None,
        _ => {
            app.textarea.input(key);
            app.sync_input_from_textarea();
            Action::None
        }
    }
}

fn handle_option_key(app: &mut AppState, key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Up => {
            app.select_previous_option();
            Action::None
        }
        KeyCode::Down => {
            app.select_next_option();
            Action::None
        }
        KeyCode::Enter => {
            let Some((entry, option)) = app.selected_control() else {
                return Action::None;
            };
            match app.widget.activate_option(entry, option) {
                Ok(turn) => {
                    app.focus = Focus::Input;
                    app.sync_textarea_from_widget();
                    Action::Dispatch(turn)
                }
                Err(reason) => {
                    debug!(?reason, "Option not sent");
                    Action::None
                }
            }
        }
        KeyCode::Esc => {
            app.focus = Focus::Input;
            Action::None
        }
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ChatReply;
    use crate::transcript::Role;
    use crate::widget::TurnOrigin;

    fn press(app: &mut AppState, code: KeyCode) -> Action {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut AppState, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_enter_dispatches_typed_turn() {
        let mut app = AppState::new("http://localhost:8000");
        type_text(&mut app, "hello");
        assert_eq!(app.widget.input(), "hello");

        match press(&mut app, KeyCode::Enter) {
            Action::Dispatch(turn) => {
                assert_eq!(turn.origin, TurnOrigin::Typed);
                assert_eq!(turn.user_input, "hello");
            }
            other => panic!("expected dispatch, got {:?}", other),
        }
        assert!(app.widget.is_busy());
    }

    #[test]
    fn test_ctrl_s_is_the_send_control() {
        let mut app = AppState::new("http://localhost:8000");
        type_text(&mut app, "hi");
        let action = handle_key_event(
            &mut app,
            KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL),
        );
        assert!(matches!(action, Action::Dispatch(_)));
    }

    #[test]
    fn test_enter_on_blank_input_does_nothing() {
        let mut app = AppState::new("http://localhost:8000");
        type_text(&mut app, "   ");
        assert_eq!(press(&mut app, KeyCode::Enter), Action::None);
        assert!(!app.widget.is_busy());
    }

    #[test]
    fn test_enter_while_busy_does_nothing() {
        let mut app = AppState::new("http://localhost:8000");
        type_text(&mut app, "one");
        assert!(matches!(press(&mut app, KeyCode::Enter), Action::Dispatch(_)));
        type_text(&mut app, " two");
        assert_eq!(press(&mut app, KeyCode::Enter), Action::None);
    }

    #[test]
    fn test_option_activation_from_keyboard() {
        let mut app = AppState::new("http://localhost:8000");
        type_text(&mut app, "go");
        let Action::Dispatch(turn) = press(&mut app, KeyCode::Enter) else {
            panic!("expected dispatch");
        };
        app.widget.complete(turn, Ok(ChatReply::options(["A", "B"])));
        app.sync_textarea_from_widget();

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Down);
        let Action::Dispatch(turn) = press(&mut app, KeyCode::Enter) else {
            panic!("expected dispatch");
        };
        assert_eq!(turn.origin, TurnOrigin::Option);
        assert_eq!(turn.user_input, "B");
        assert_eq!(app.focus, Focus::Input);

        let last = app.transcript().last().unwrap();
        assert_eq!(last.role, Role::User);
        assert_eq!(last.text(), Some("B"));
    }

    #[test]
    fn test_quit_keys() {
        let mut app = AppState::new("http://localhost:8000");
        assert_eq!(
            handle_key_event(&mut app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Action::Quit
        );
    }

    #[test]
    fn test_esc_on_input_keeps_session() {
        let mut app = AppState::new("http://localhost:8000");
        type_text(&mut app, "draft");
        assert_eq!(press(&mut app, KeyCode::Esc), Action::None);
        assert_eq!(app.focus, Focus::Input);
        assert_eq!(app.textarea_text(), "draft");
        assert_eq!(app.widget.input(), "draft");
    }

    #[test]
    fn test_help_overlay_swallows_keys() {
        let mut app = AppState::new("http://localhost:8000");
        press(&mut app, KeyCode::F(1));
        assert!(app.show_help);
        type_text(&mut app, "x");
        assert_eq!(app.textarea_text(), "");
        press(&mut app, KeyCode::Esc);
        assert!(!app.show_help);
    }

    #[test]
    fn test_page_up_stops_following_bottom() {
        let mut app = AppState::new("http://localhost:8000");
        type_text(&mut app, "go");
        let Action::Dispatch(turn) = press(&mut app, KeyCode::Enter) else {
            panic!("expected dispatch");
        };
        app.widget.complete(turn, Ok(ChatReply::response("ok")));
        assert!(app.widget.follows_bottom());
        press(&mut app, KeyCode::PageUp);
        assert!(!app.widget.follows_bottom());
    }
}
