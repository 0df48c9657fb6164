use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::{
    event::events::Event,
    library::Track,
    ui::{
        components::text_input::TextInput,
        context::AppContext,
        state::AppState,
        traits::{Action, View},
    },
    util::colors,
};

/// Lyrics editor for one generated track.
pub struct TrackDetail {
    track: Track,
    lyrics: TextInput,
}

impl TrackDetail {
    pub fn new(track: Track) -> Self {
        let lyrics = TextInput::new(track.lyrics().unwrap_or_default()).multiline();
        Self { track, lyrics }
    }
}

impl View for TrackDetail {
    fn render(&mut self, f: &mut Frame, area: Rect, _state: &AppState, ctx: &AppContext) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(3),
                Constraint::Min(3),
            ])
            .split(area);

        let playing = ctx.studio.player().is_currently_playing(self.track.id());
        let mut title = vec![Span::styled(
            self.track.prompt(),
            Style::default()
                .add_modifier(Modifier::BOLD)
                .fg(colors::PRIMARY),
        )];
        if playing {
            title.push("  ▶ playing".fg(colors::SECONDARY));
        }

        f.render_widget(
            Paragraph::new(Line::from(title))
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL).title("Prompt")),
            chunks[0],
        );
        f.render_widget(
            Paragraph::new(self.track.cover_art_url())
                .fg(colors::NEUTRAL)
                .block(Block::default().borders(Borders::ALL).title("Cover art")),
            chunks[1],
        );

        let lyrics_block = Block::default()
            .borders(Borders::ALL)
            .title("Edit Lyrics")
            .title_bottom(Line::from(" Ctrl-S save · Esc cancel ").right_aligned())
            .border_style(Style::default().fg(colors::PRIMARY));

        if self.lyrics.value().is_empty() {
            f.render_widget(
                Paragraph::new("No lyrics available for this track.")
                    .fg(colors::NEUTRAL)
                    .block(lyrics_block.clone()),
                chunks[2],
            );
        }
        self.lyrics
            .render(f, chunks[2], lyrics_block, Style::default().fg(colors::TEXT), true);
    }

    fn handle_input(
        &mut self,
        key: KeyEvent,
        _state: &AppState,
        ctx: &AppContext,
    ) -> Option<Action> {
        match key.code {
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                let _ = ctx.event_tx.send(Event::SaveLyrics {
                    id: self.track.id().to_string(),
                    lyrics: self.lyrics.value().to_string(),
                });
                Some(Action::None)
            }
            KeyCode::Esc => Some(Action::Back),
            _ if self.lyrics.handle_key(key) => Some(Action::None),
            _ => None,
        }
    }

    fn handle_paste(&mut self, text: &str, _ctx: &AppContext) -> bool {
        self.lyrics.paste(text)
    }

    fn title(&self) -> &str {
        "Lyrics"
    }
}
