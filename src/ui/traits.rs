use ratatui::crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};

use crate::event::events::Event;
use crate::ui::{context::AppContext, state::AppState};

/// What a view asks of the app after handling a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Back,
    /// The view consumed the key.
    None,
}

/// A screen in the router stack. Returning `None` from `handle_input` lets
/// the global key bindings have the key.
pub trait View: Send {
    fn render(&mut self, f: &mut Frame, area: Rect, state: &AppState, ctx: &AppContext);
    fn handle_input(&mut self, key: KeyEvent, state: &AppState, ctx: &AppContext)
    -> Option<Action>;
    /// Pasted text. Returns true if the view took it.
    fn handle_paste(&mut self, _text: &str, _ctx: &AppContext) -> bool {
        false
    }
    fn on_event(&mut self, _event: &Event, _ctx: &AppContext) {}
    fn title(&self) -> &str;
}
