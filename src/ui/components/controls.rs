use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Style, Stylize},
    symbols::{self, border},
    text::{Line, Span, ToSpan},
    widgets::{Block, Borders, Gauge, Paragraph, Widget},
};

use crate::util::colors;

pub struct PlayerControlsWidget {
    volume: f32,
    muted: bool,
    downloading: bool,
}

impl PlayerControlsWidget {
    pub fn new(volume: f32, muted: bool, downloading: bool) -> Self {
        Self {
            volume,
            muted,
            downloading,
        }
    }
}

impl Widget for PlayerControlsWidget {
    fn render(self, area: ratatui::prelude::Rect, buf: &mut ratatui::prelude::Buffer)
    where
        Self: Sized,
    {
        let download_icon = if self.downloading {
            "⇣ saving".fg(colors::PRIMARY)
        } else {
            "⇣".fg(colors::NEUTRAL)
        };
        let mute_icon = if self.muted {
            "🔇".fg(colors::ERROR)
        } else {
            "🔊".fg(colors::PRIMARY)
        };

        let mut controls_text = Line::default();
        controls_text.push_span(mute_icon);
        controls_text.push_span("  ");
        controls_text.push_span(download_icon);

        let layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(14), Constraint::Length(12)])
            .split(area);

        let controls_block = Block::default()
            .borders(Borders::TOP | Borders::BOTTOM)
            .border_set(border::Set {
                top_left: symbols::line::ROUNDED.horizontal_down,
                top_right: symbols::line::ROUNDED.horizontal_down,
                bottom_left: symbols::line::ROUNDED.horizontal_up,
                bottom_right: symbols::line::ROUNDED.horizontal_up,
                ..symbols::border::ROUNDED
            });
        Paragraph::new(controls_text)
            .block(controls_block)
            .centered()
            .render(layout[0], buf);

        let (ratio, label) = if self.muted {
            (0.0, "muted".to_span().fg(colors::NEUTRAL))
        } else {
            let percent = (self.volume * 100.0).round() as u32;
            (f64::from(self.volume), Span::from(format!("{percent}%")))
        };

        let volume_block = Block::default()
            .borders(Borders::ALL)
            .border_set(border::Set {
                top_right: symbols::line::ROUNDED.vertical_left,
                top_left: symbols::line::ROUNDED.horizontal_down,
                bottom_left: symbols::line::ROUNDED.horizontal_up,
                ..symbols::border::ROUNDED
            });

        Gauge::default()
            .block(volume_block)
            .gauge_style(Style::new().fg(colors::PRIMARY).bg(colors::NEUTRAL))
            .ratio(ratio.clamp(0.0, 1.0))
            .label(label)
            .render(layout[1], buf);
    }
}
