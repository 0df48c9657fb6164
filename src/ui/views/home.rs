use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::{
    event::events::Event,
    library::{MAX_PROMPT_CHARS, Track},
    ui::{
        components::{spinner::Spinner, text_input::TextInput},
        context::AppContext,
        state::AppState,
        traits::{Action, View},
        util::get_active_track_icon,
    },
    util::colors,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Prompt,
    Gallery,
}

/// Prompt box on top, the gallery of tracks below it.
pub struct Home {
    prompt: TextInput,
    focus: Focus,
    list_state: ListState,
}

impl Default for Home {
    fn default() -> Self {
        Self {
            prompt: TextInput::default().max_chars(MAX_PROMPT_CHARS),
            focus: Focus::Prompt,
            list_state: ListState::default(),
        }
    }
}

impl Home {
    pub const TITLE: &'static str = "Create";

    fn selected<'a>(&self, ctx: &'a AppContext) -> Option<&'a Track> {
        ctx.studio
            .store()
            .tracks()
            .get(self.list_state.selected()?)
    }

    fn gallery_item(track: &Track, ctx: &AppContext) -> ListItem<'static> {
        let player = ctx.studio.player();
        let is_current = player.current().is_some_and(|t| t.id() == track.id());

        let mut spans = vec![if is_current {
            Span::from(format!("{} ", get_active_track_icon(player.is_playing())))
                .fg(colors::PRIMARY)
        } else {
            Span::raw("  ")
        }];
        spans.push(Span::raw(track.prompt().to_string()));
        if track.is_example() {
            spans.push(Span::raw("  "));
            spans.push(" EXAMPLE ".fg(colors::BACKGROUND).bg(colors::NEUTRAL));
        }

        let first_line = track
            .lyrics()
            .and_then(|l| l.lines().find(|line| !line.trim().is_empty()))
            .unwrap_or("No lyrics")
            .to_string();

        let mut item = ListItem::new(vec![
            Line::from(spans),
            Line::from(format!("    {first_line}")).fg(colors::NEUTRAL),
        ]);
        if is_current {
            item = item.style(Style::default().add_modifier(Modifier::BOLD));
        }
        item
    }

    fn handle_prompt_key(&mut self, key: KeyEvent, ctx: &AppContext) -> Option<Action> {
        match key.code {
            KeyCode::Tab | KeyCode::Esc => self.focus = Focus::Gallery,
            KeyCode::Enter => {
                if !ctx.studio.is_generating() && !self.prompt.value().trim().is_empty() {
                    let _ = ctx
                        .event_tx
                        .send(Event::Generate(self.prompt.value().to_string()));
                }
            }
            _ if ctx.studio.is_generating() => return None,
            _ => {
                if !self.prompt.handle_key(key) {
                    return None;
                }
            }
        }
        Some(Action::None)
    }

    fn handle_gallery_key(&mut self, key: KeyEvent, ctx: &AppContext) -> Option<Action> {
        let count = ctx.studio.store().len();

        match key.code {
            KeyCode::Tab | KeyCode::Char('/') | KeyCode::Char('i') => self.focus = Focus::Prompt,
            KeyCode::Down | KeyCode::Char('j') => {
                let i = self.list_state.selected().map_or(0, |i| i + 1);
                self.list_state.select(Some(i.min(count.saturating_sub(1))));
            }
            KeyCode::Up | KeyCode::Char('k') => {
                let i = self.list_state.selected().unwrap_or(0);
                self.list_state.select(Some(i.saturating_sub(1)));
            }
            KeyCode::Enter => {
                if let Some(track) = self.selected(ctx) {
                    let _ = ctx.event_tx.send(Event::Play(track.id().to_string()));
                }
            }
            KeyCode::Char('e') => {
                if let Some(track) = self.selected(ctx) {
                    let _ = ctx.event_tx.send(Event::OpenDetail(track.id().to_string()));
                }
            }
            _ => return None,
        }
        Some(Action::None)
    }
}

impl View for Home {
    fn render(&mut self, f: &mut Frame, area: Rect, state: &AppState, ctx: &AppContext) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(1),
            ])
            .split(area);

        f.render_widget(
            Paragraph::new(vec![
                Line::from("Create Music From Words").bold().fg(colors::TEXT),
                Line::from("Describe your song, and let AI bring it to life.").fg(colors::NEUTRAL),
            ])
            .centered(),
            chunks[0],
        );

        let generating = ctx.studio.is_generating();
        let editing = self.focus == Focus::Prompt;
        let border_style = match (generating, editing) {
            (true, _) => Style::default().fg(colors::NEUTRAL),
            (false, true) => Style::default().fg(colors::PRIMARY),
            (false, false) => Style::default().fg(colors::SECONDARY),
        };
        let prompt_block = Block::default()
            .borders(Borders::ALL)
            .title(" Prompt ")
            .title_bottom(
                Line::from(format!(" {}/{MAX_PROMPT_CHARS} ", self.prompt.char_count()))
                    .right_aligned(),
            )
            .border_style(border_style);
        self.prompt.render(
            f,
            chunks[1],
            prompt_block,
            Style::default().fg(colors::TEXT),
            editing && !generating,
        );

        if let Some(message) = state.loading_message() {
            f.render_widget(
                Spinner::default()
                    .with_style(Style::default().fg(colors::PRIMARY))
                    .with_label(message),
                chunks[2],
            );
        } else {
            let hint = match self.focus {
                Focus::Prompt => "Enter generate · Tab gallery",
                Focus::Gallery => "Enter play · e lyrics · / prompt · s settings",
            };
            f.render_widget(
                Paragraph::new(hint).centered().fg(colors::NEUTRAL),
                chunks[2],
            );
        }

        let tracks = ctx.studio.store().tracks();
        let gallery_block = Block::default()
            .borders(Borders::TOP)
            .title(" Your Creations ")
            .border_style(Style::default().fg(colors::NEUTRAL));

        if tracks.is_empty() {
            f.render_widget(
                Paragraph::new("Your gallery is empty. Create your first track to see it here.")
                    .centered()
                    .fg(colors::NEUTRAL)
                    .block(gallery_block),
                chunks[3],
            );
            return;
        }

        let items: Vec<ListItem> = tracks.iter().map(|t| Self::gallery_item(t, ctx)).collect();
        let mut list = List::new(items).block(gallery_block);
        if self.focus == Focus::Gallery {
            list = list
                .highlight_style(Style::default().fg(colors::PRIMARY))
                .highlight_symbol("> ");
        }

        if self.list_state.selected().is_none_or(|i| i >= tracks.len()) {
            self.list_state.select(Some(0));
        }

        f.render_stateful_widget(list, chunks[3], &mut self.list_state);
    }

    fn handle_input(
        &mut self,
        key: KeyEvent,
        _state: &AppState,
        ctx: &AppContext,
    ) -> Option<Action> {
        match self.focus {
            Focus::Prompt => self.handle_prompt_key(key, ctx),
            Focus::Gallery => self.handle_gallery_key(key, ctx),
        }
    }

    fn handle_paste(&mut self, text: &str, ctx: &AppContext) -> bool {
        if ctx.studio.is_generating() {
            return false;
        }
        self.focus = Focus::Prompt;
        self.prompt.paste(text)
    }

    fn on_event(&mut self, event: &Event, _ctx: &AppContext) {
        if let Event::GenerationFinished { result: Ok(_), .. } = event {
            self.prompt.clear();
            self.list_state.select(Some(0));
        }
    }

    fn title(&self) -> &str {
        Self::TITLE
    }
}
