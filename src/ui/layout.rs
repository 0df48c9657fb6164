use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Style, Stylize},
    symbols::border,
    text::Line,
    widgets::{Block, Borders},
};

use crate::{
    ui::{
        app::App,
        components::{player::PlayerWidget, toast::ToastWidget},
    },
    util::colors,
};

pub struct AppLayout<'a> {
    pub app: &'a mut App,
}

impl<'a> AppLayout<'a> {
    pub fn new(app: &'a mut App) -> Self {
        Self { app }
    }

    pub fn render(self, f: &mut Frame, area: Rect) {
        let buf = f.buffer_mut();
        buf.set_style(area, Style::new().bg(colors::BACKGROUND));

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(3)])
            .split(area);

        let main_area = chunks[0];
        let player_area = chunks[1];

        let title = match self.app.router.depth() {
            1 => " Melody AI ".to_string(),
            _ => format!(" Melody AI · {} ", self.app.router.active_title()),
        };
        let content_block = Block::default()
            .borders(Borders::ALL)
            .border_set(border::ROUNDED)
            .border_style(Style::new().fg(colors::SECONDARY))
            .title(Line::from(title).bold().fg(colors::PRIMARY))
            .title_alignment(Alignment::Center);

        let content_inner = content_block.inner(main_area);
        f.render_widget(content_block, main_area);

        self.app
            .router
            .render(f, content_inner, &self.app.state, &self.app.ctx);

        f.render_widget(
            PlayerWidget::new(self.app.ctx.studio.player(), &self.app.ctx.surface),
            player_area,
        );

        if let Some(toast) = &self.app.state.ui.toast {
            f.render_widget(ToastWidget::new(&toast.message), main_area);
        }
    }
}
