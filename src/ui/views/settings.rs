use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Style, Stylize},
    text::Line,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::{
    event::events::Event,
    ui::{
        components::text_input::TextInput,
        context::AppContext,
        state::AppState,
        traits::{Action, View},
    },
    util::colors,
};

pub struct Settings {
    api_key: TextInput,
}

impl Settings {
    pub const TITLE: &'static str = "Settings";

    pub fn new(api_key: Option<&str>) -> Self {
        Self {
            api_key: TextInput::new(api_key.unwrap_or_default()).masked(),
        }
    }
}

impl View for Settings {
    fn render(&mut self, f: &mut Frame, area: Rect, _state: &AppState, ctx: &AppContext) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(1),
            ])
            .split(area);

        f.render_widget(
            Paragraph::new(Line::from("Settings").bold().fg(colors::TEXT)).centered(),
            chunks[0],
        );

        let block = Block::default()
            .borders(Borders::ALL)
            .title("Gemini API Key")
            .title_bottom(Line::from(" Enter save · Esc cancel ").right_aligned())
            .border_style(Style::default().fg(colors::PRIMARY));
        self.api_key
            .render(f, chunks[1], block, Style::default().fg(colors::TEXT), true);

        let note = format!(
            "Your API key is stored only on this machine, in {}.",
            ctx.config.data_dir.display()
        );
        f.render_widget(
            Paragraph::new(note)
                .wrap(Wrap { trim: true })
                .fg(colors::NEUTRAL),
            chunks[2],
        );
    }

    fn handle_input(
        &mut self,
        key: KeyEvent,
        _state: &AppState,
        ctx: &AppContext,
    ) -> Option<Action> {
        match key.code {
            KeyCode::Enter => {
                let _ = ctx
                    .event_tx
                    .send(Event::SaveApiKey(self.api_key.value().to_string()));
                Some(Action::None)
            }
            KeyCode::Esc => Some(Action::Back),
            _ if self.api_key.handle_key(key) => Some(Action::None),
            _ => None,
        }
    }

    fn handle_paste(&mut self, text: &str, _ctx: &AppContext) -> bool {
        self.api_key.paste(text.trim())
    }

    fn title(&self) -> &str {
        Self::TITLE
    }
}
