//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Input editing
    StartEditing,
    StopEditing,
    CharInput(char),
    Backspace,
    CursorLeft,
    CursorRight,

    // Form
    Submit,

    // List
    ScrollUp,
    ScrollDown,

    // Popups
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// Convert a key event to a UiEvent based on current UI context.
///
/// While the post list is still loading only quitting is possible.
pub fn key_to_ui_event(
    key: KeyEvent,
    input_mode: InputMode,
    loaded: bool,
    show_help: bool,
) -> Option<UiEvent> {
    use crossterm::event::KeyEventKind;

    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(UiEvent::Quit);
    }

    if !loaded {
        return match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(UiEvent::Quit),
            _ => None,
        };
    }

    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    match input_mode {
        InputMode::Normal => match key.code {
            KeyCode::Char('q') => Some(UiEvent::Quit),
            KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
            KeyCode::Char('e') | KeyCode::Char('i') => Some(UiEvent::StartEditing),
            KeyCode::Char('s') | KeyCode::Enter => Some(UiEvent::Submit),
            KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::ScrollUp),
            KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::ScrollDown),
            _ => None,
        },
        InputMode::Editing => match key.code {
            KeyCode::Esc => Some(UiEvent::StopEditing),
            KeyCode::Left => Some(UiEvent::CursorLeft),
            KeyCode::Right => Some(UiEvent::CursorRight),
            KeyCode::Backspace => Some(UiEvent::Backspace),
            KeyCode::Enter => Some(UiEvent::Submit),
            KeyCode::Up => Some(UiEvent::ScrollUp),
            KeyCode::Down => Some(UiEvent::ScrollDown),
            KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_loading_only_allows_quit() {
        let key = press(KeyCode::Char('e'));
        assert_eq!(key_to_ui_event(key, InputMode::Normal, false, false), None);

        let key = press(KeyCode::Char('q'));
        assert_eq!(
            key_to_ui_event(key, InputMode::Normal, false, false),
            Some(UiEvent::Quit)
        );
    }

    #[test]
    fn test_editing_captures_letters() {
        let key = press(KeyCode::Char('q'));
        assert_eq!(
            key_to_ui_event(key, InputMode::Editing, true, false),
            Some(UiEvent::CharInput('q'))
        );
    }

    #[test]
    fn test_enter_submits_in_both_modes() {
        for mode in [InputMode::Normal, InputMode::Editing] {
            assert_eq!(
                key_to_ui_event(press(KeyCode::Enter), mode, true, false),
                Some(UiEvent::Submit)
            );
        }
    }

    #[test]
    fn test_ctrl_c_quits_while_editing() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(
            key_to_ui_event(key, InputMode::Editing, true, false),
            Some(UiEvent::Quit)
        );
    }

    #[test]
    fn test_help_swallows_next_key() {
        let key = press(KeyCode::Char('s'));
        assert_eq!(
            key_to_ui_event(key, InputMode::Normal, true, true),
            Some(UiEvent::CloseHelp)
        );
    }
}
