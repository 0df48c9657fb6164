use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Style, Stylize},
    symbols::border,
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::{
    player::{PlaybackSurface, PlayerState},
    util::colors,
};

use super::{controls::PlayerControlsWidget, progress::ProgressWidget};

/// Bottom bar: current track, progress, volume and download state.
pub struct PlayerWidget<'a> {
    player: &'a PlayerState,
    surface: &'a PlaybackSurface,
}

impl<'a> PlayerWidget<'a> {
    pub fn new(player: &'a PlayerState, surface: &'a PlaybackSurface) -> Self {
        Self { player, surface }
    }
}

impl Widget for PlayerWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(track) = self.player.current() else {
            Paragraph::new("Nothing playing. Pick a track from the gallery.")
                .centered()
                .fg(colors::NEUTRAL)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_set(border::ROUNDED)
                        .border_style(Style::new().fg(colors::NEUTRAL)),
                )
                .render(area, buf);
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(10), Constraint::Length(26)])
            .split(area);

        ProgressWidget::new(
            track.prompt(),
            self.surface.position(),
            self.surface.duration(),
            self.surface.progress(),
            self.surface.status(),
            self.player.is_playing(),
        )
        .render(chunks[0], buf);

        PlayerControlsWidget::new(
            self.surface.volume(),
            self.surface.is_muted(),
            self.surface.is_downloading(),
        )
        .render(chunks[1], buf);
    }
}
