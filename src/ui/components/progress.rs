use std::time::Duration;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Style, Stylize},
    symbols::{self, border},
    text::{Line, Span, ToSpan},
    widgets::{Block, Borders, LineGauge, Widget},
};

use crate::{player::SourceStatus, util::colors};

pub struct ProgressWidget<'a> {
    title: &'a str,
    position: Duration,
    duration: Option<Duration>,
    ratio: f64,
    status: SourceStatus,
    is_playing: bool,
}

impl<'a> ProgressWidget<'a> {
    pub fn new(
        title: &'a str,
        position: Duration,
        duration: Option<Duration>,
        ratio: f64,
        status: SourceStatus,
        is_playing: bool,
    ) -> Self {
        Self {
            title,
            position,
            duration,
            ratio,
            status,
            is_playing,
        }
    }
}

impl Widget for ProgressWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let icon = match (self.status, self.is_playing) {
            (SourceStatus::Loading, _) => "…",
            (SourceStatus::Unavailable, _) => "✗",
            (_, true) => "▶",
            (_, false) => "⏸",
        };
        let track_info = format!("{icon}  {}", self.title);

        let label = match self.status {
            SourceStatus::Loading => "loading".to_span(),
            SourceStatus::Unavailable => "unavailable".to_span().fg(colors::ERROR),
            _ => Span::from(format!(
                "{} / {}",
                format_duration(self.position),
                self.duration.map_or_else(|| "--:--".to_string(), format_duration)
            ))
            .fg(colors::TEXT),
        };

        LineGauge::default()
            .block(
                Block::default()
                    .title_top(Line::from(track_info))
                    .title_alignment(Alignment::Center)
                    .borders(Borders::ALL)
                    .border_set(border::Set {
                        top_right: symbols::line::ROUNDED.horizontal_down,
                        bottom_right: symbols::line::ROUNDED.horizontal_up,
                        ..symbols::border::ROUNDED
                    }),
            )
            .ratio(self.ratio.clamp(0.0, 1.0))
            .label(label)
            .filled_style(Style::default().fg(colors::PRIMARY))
            .unfilled_style(Style::default().fg(colors::NEUTRAL))
            .render(area, buf);
    }
}

pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}
