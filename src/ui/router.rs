use crate::event::events::Event;
use crate::ui::context::AppContext;
use crate::ui::state::AppState;
use crate::ui::traits::{Action, View};
use ratatui::Frame;
use ratatui::crossterm::event::KeyEvent;
use ratatui::layout::Rect;

pub struct Router {
    pub stack: Vec<Box<dyn View>>,
}

impl Router {
    pub fn new(initial_view: Box<dyn View>) -> Self {
        Self {
            stack: vec![initial_view],
        }
    }

    pub fn push(&mut self, view: Box<dyn View>) {
        self.stack.push(view);
    }

    /// The root view is never popped.
    pub fn pop(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn active_title(&self) -> &str {
        self.stack.last().map_or("", |v| v.title())
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, state: &AppState, ctx: &AppContext) {
        if let Some(view) = self.stack.last_mut() {
            view.render(f, area, state, ctx);
        }
    }

    pub fn handle_input(
        &mut self,
        key: KeyEvent,
        state: &AppState,
        ctx: &AppContext,
    ) -> Option<Action> {
        self.stack
            .last_mut()
            .and_then(|view| view.handle_input(key, state, ctx))
    }

    pub fn handle_paste(&mut self, text: &str, ctx: &AppContext) -> bool {
        self.stack
            .last_mut()
            .is_some_and(|view| view.handle_paste(text, ctx))
    }

    pub fn on_event(&mut self, event: &Event, ctx: &AppContext) {
        for view in &mut self.stack {
            view.on_event(event, ctx);
        }
    }
}
