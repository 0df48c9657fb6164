use std::sync::Arc;

use color_eyre::eyre::Result;
use flume::{Receiver, Sender};
use ratatui::Frame;
use tracing::info;

use crate::{
    config::AppConfig,
    event::events::Event,
    generation::Generator,
    http::GeminiClient,
    library::FileStore,
    player::{
        MediaResolver, PlaybackSurface, ProcessSink,
        surface::{SEEK_STEP, VOLUME_STEP},
    },
    studio::Studio,
    util::task::TaskManager,
};

use super::{
    context::AppContext,
    layout::AppLayout,
    message::{AppMessage, ViewRoute},
    router::Router,
    state::AppState,
    tui::{self, TerminalEvent},
    util::handler::EventHandler,
    views::{Home, Settings},
};

pub struct App {
    pub event_rx: Receiver<Event>,
    pub event_tx: Sender<Event>,
    pub ctx: AppContext,
    pub state: AppState,
    pub router: Router,
    pub task_manager: TaskManager,
    pub has_focus: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let (event_tx, event_rx) = flume::unbounded();

        let storage = Arc::new(FileStore::open(&config.data_dir)?);
        let studio = Studio::open(storage, config.fallback_api_key.clone());

        let backend = Arc::new(GeminiClient::new(&config.api)?);
        let generator = Arc::new(Generator::new(backend, config.strategy, config.poll.clone()));
        let resolver = MediaResolver::new(&config.cache_dir)?;
        let surface = PlaybackSurface::new(Box::new(ProcessSink::new(&config.player_program)));

        info!(
            strategy = %config.strategy,
            data_dir = %config.data_dir.display(),
            tracks = studio.store().len(),
            "app_started"
        );

        let ctx = AppContext {
            config,
            studio,
            surface,
            generator,
            resolver,
            event_tx: event_tx.clone(),
        };

        Ok(Self {
            event_rx,
            event_tx,
            ctx,
            state: AppState::default(),
            router: Router::new(Box::new(Home::default())),
            task_manager: TaskManager::new(),
            has_focus: true,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = tui::Tui::new(self.ctx.config.tick_rate)?;
        tui.enter()?;

        EventHandler::handle_event(self, TerminalEvent::Init, &mut tui)?;
        while !self.should_quit {
            tui.draw(|f| {
                self.ui(f);
            })?;

            EventHandler::handle_events(self, &mut tui).await?;
        }

        self.task_manager.abort_all();
        tui.exit()?;
        info!("app_stopped");
        Ok(())
    }

    fn ui(&mut self, frame: &mut Frame) {
        if self.has_focus {
            let area = frame.area();
            AppLayout::new(self).render(frame, area);
        }
    }

    pub fn update(&mut self, msg: AppMessage) {
        match msg {
            AppMessage::Quit => self.should_quit = true,
            AppMessage::TogglePlayPause => {
                self.ctx.studio.toggle_play_pause();
                if self.ctx.studio.player().is_playing() {
                    self.ctx.surface.clear_failure();
                }
                EventHandler::sync_playback(self);
            }
            AppMessage::VolumeUp => self.ctx.surface.nudge_volume(VOLUME_STEP),
            AppMessage::VolumeDown => self.ctx.surface.nudge_volume(-VOLUME_STEP),
            AppMessage::SeekForward => self.ctx.surface.nudge(SEEK_STEP),
            AppMessage::SeekBackward => self.ctx.surface.nudge(-SEEK_STEP),
            AppMessage::ToggleMute => self.ctx.surface.toggle_mute(),
            AppMessage::Download => EventHandler::start_download(self),
            AppMessage::NavigateTo(ViewRoute::Settings) => self.open_settings(),
            AppMessage::GoBack => self.router.pop(),
        }
    }

    pub fn open_settings(&mut self) {
        if self.router.active_title() != Settings::TITLE {
            let view = Settings::new(self.ctx.studio.settings().api_key());
            self.router.push(Box::new(view));
        }
    }
}
