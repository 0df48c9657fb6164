use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Style, Stylize},
    symbols::border,
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::util::colors;

const MAX_WIDTH: u16 = 60;

/// Error notification pinned to the top-right corner of `area`.
pub struct ToastWidget<'a> {
    message: &'a str,
}

impl<'a> ToastWidget<'a> {
    pub fn new(message: &'a str) -> Self {
        Self { message }
    }

    fn placement(&self, area: Rect) -> Rect {
        let width = (self.message.width() as u16 + 4).min(MAX_WIDTH).min(area.width);
        let inner = width.saturating_sub(4).max(1);
        let lines = (self.message.width() as u16).div_ceil(inner).max(1);
        let height = (lines + 2).min(area.height);

        Rect {
            x: area.x + area.width.saturating_sub(width + 1),
            y: area.y + 1,
            width,
            height,
        }
    }
}

impl Widget for ToastWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rect = self.placement(area);
        Clear.render(rect, buf);

        Paragraph::new(self.message)
            .wrap(Wrap { trim: true })
            .style(Style::new().fg(colors::TEXT))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_set(border::ROUNDED)
                    .border_style(Style::new().fg(colors::ERROR))
                    .bg(colors::BACKGROUND),
            )
            .render(rect, buf);
    }
}
