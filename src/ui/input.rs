use crate::ui::message::{AppMessage, ViewRoute};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Global key bindings, consulted after the active view declined a key.
pub struct InputHandler;

impl InputHandler {
    pub fn handle_key(key: KeyEvent) -> Option<AppMessage> {
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(AppMessage::Quit),
            (KeyCode::Char(' '), _) => Some(AppMessage::TogglePlayPause),
            (KeyCode::Char('+'), _) => Some(AppMessage::VolumeUp),
            (KeyCode::Char('='), _) => Some(AppMessage::VolumeUp),
            (KeyCode::Char('-'), _) => Some(AppMessage::VolumeDown),
            (KeyCode::Char('H'), _) => Some(AppMessage::SeekBackward),
            (KeyCode::Char('L'), _) => Some(AppMessage::SeekForward),
            (KeyCode::Char('m'), _) => Some(AppMessage::ToggleMute),
            (KeyCode::Char('d'), _) => Some(AppMessage::Download),
            (KeyCode::Char('s'), _) => Some(AppMessage::NavigateTo(ViewRoute::Settings)),
            (KeyCode::Esc, _) => Some(AppMessage::GoBack),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_player_keys() {
        let key = |code| KeyEvent::new(code, KeyModifiers::NONE);

        assert_eq!(
            InputHandler::handle_key(key(KeyCode::Char(' '))),
            Some(AppMessage::TogglePlayPause)
        );
        assert_eq!(
            InputHandler::handle_key(KeyEvent::new(KeyCode::Char('L'), KeyModifiers::SHIFT)),
            Some(AppMessage::SeekForward)
        );
        assert_eq!(
            InputHandler::handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(AppMessage::Quit)
        );
        assert_eq!(InputHandler::handle_key(key(KeyCode::Char('x'))), None);
    }
}
