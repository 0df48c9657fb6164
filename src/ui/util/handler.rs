use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::{debug, error, info, warn};

use crate::{
    event::events::Event,
    generation::error::GenerationError,
    studio::SubmitError,
    ui::{
        app::App,
        input::InputHandler,
        message::AppMessage,
        traits::Action,
        tui::{TerminalEvent, Tui},
        views::TrackDetail,
    },
};

pub struct EventHandler;

impl EventHandler {
    pub async fn handle_events(app: &mut App, tui: &mut Tui) -> color_eyre::Result<bool> {
        let mut should_render = false;
        if let Some(evt) = tui.next().await
            && Self::handle_event(app, evt, tui)?
        {
            should_render = true;
        }

        while let Ok(evt) = app.event_rx.try_recv() {
            Self::handle_action(app, evt);
            should_render = true;
        }

        Ok(should_render)
    }

    pub fn handle_event(
        app: &mut App,
        evt: TerminalEvent,
        tui: &mut Tui,
    ) -> color_eyre::Result<bool> {
        match evt {
            TerminalEvent::Init => Self::sync_playback(app),
            TerminalEvent::FocusGained => {
                app.has_focus = true;
                tui.clear()?;
            }
            TerminalEvent::FocusLost => app.has_focus = false,
            TerminalEvent::Key(key) => Self::handle_key_event(app, key),
            TerminalEvent::Paste(text) => {
                if !app.router.handle_paste(&text, &app.ctx) {
                    debug!(chars = text.chars().count(), "paste_ignored");
                }
            }
            TerminalEvent::Tick => {
                Self::on_tick(app);
                return Ok(app.has_focus);
            }
            TerminalEvent::Resize(..) => {}
        }

        Ok(true)
    }

    fn on_tick(app: &mut App) {
        app.state.expire_toast(app.ctx.config.toast_duration);

        if app.ctx.surface.tick() {
            info!("playback_finished");
            app.ctx.studio.stop_playback();
            Self::sync_playback(app);
        }
    }

    pub fn handle_action(app: &mut App, evt: Event) {
        app.router.on_event(&evt, &app.ctx);

        match evt {
            Event::Generate(prompt) => Self::start_generation(app, &prompt),
            Event::GenerationFinished { prompt, result } => {
                app.state.ui.generation_started = None;
                match app.ctx.studio.finish_generation(&prompt, result) {
                    Ok(_) => Self::sync_playback(app),
                    Err(message) => app.state.show_toast(message),
                }
            }
            Event::Play(id) => {
                app.ctx.surface.clear_failure();
                if app.ctx.studio.play(&id) {
                    Self::sync_playback(app);
                }
            }
            Event::MediaResolved { track_id, result } => match result {
                Ok(handle) => app.ctx.surface.attach(handle, app.ctx.studio.player()),
                Err(reason) => app.ctx.surface.fetch_failed(&track_id, reason),
            },
            Event::DownloadFinished(result) => {
                app.ctx.surface.finish_download();
                match result {
                    Ok(path) => app.state.show_toast(format!("Saved to {}", path.display())),
                    Err(e) => app.state.show_toast(format!("Download failed: {e}")),
                }
            }
            Event::OpenDetail(id) => {
                if let Some(track) = app.ctx.studio.store().get(&id)
                    && !track.is_example()
                {
                    app.router.push(Box::new(TrackDetail::new(track.clone())));
                }
            }
            Event::SaveLyrics { id, lyrics } => {
                if app.ctx.studio.update_lyrics(&id, &lyrics).is_some() {
                    app.router.pop();
                }
            }
            Event::SaveApiKey(key) => {
                app.ctx.studio.set_api_key(Some(key));
                app.router.pop();
            }
        }
    }

    /// Applies the player state to the playback surface and starts fetching
    /// media for a newly current track.
    pub fn sync_playback(app: &mut App) {
        let Some(track) = app.ctx.surface.reconcile(app.ctx.studio.player()) else {
            return;
        };

        let resolver = app.ctx.resolver.clone();
        let tx = app.ctx.event_tx.clone();
        app.task_manager.spawn(
            "media_fetch",
            tokio::spawn(async move {
                let result = resolver.fetch(&track).await.map_err(|e| {
                    error!(track_id = track.id(), error = %e, "Error loading media for playback");
                    e.to_string()
                });
                let _ = tx.send(Event::MediaResolved {
                    track_id: track.id().to_string(),
                    result,
                });
            }),
        );
    }

    fn start_generation(app: &mut App, prompt: &str) {
        let request = match app.ctx.studio.begin_generation(prompt) {
            Ok(request) => request,
            Err(SubmitError::MissingApiKey) => {
                app.state.show_toast(SubmitError::MissingApiKey.to_string());
                app.open_settings();
                return;
            }
            Err(e) => {
                warn!(error = %e, "generation_rejected");
                app.state.show_toast(e.to_string());
                return;
            }
        };

        app.state.ui.generation_started = Some(tokio::time::Instant::now());

        let generator = app.ctx.generator.clone();
        let tx = app.ctx.event_tx.clone();
        app.task_manager.spawn(
            "generation",
            tokio::spawn(async move {
                let prompt = request.prompt.clone();
                let run = tokio::spawn(async move {
                    generator.generate(&request.prompt, &request.api_key).await
                });
                let result = match run.await {
                    Ok(result) => result,
                    Err(e) => {
                        error!(error = %e, "generation_task_failed");
                        Err(GenerationError::Unknown)
                    }
                };
                let _ = tx.send(Event::GenerationFinished { prompt, result });
            }),
        );
    }

    pub fn start_download(app: &mut App) {
        let Some(track) = app.ctx.studio.player().current().cloned() else {
            return;
        };
        if !track.is_playable() || !app.ctx.surface.begin_download(track.id()) {
            return;
        }

        let resolver = app.ctx.resolver.clone();
        let dest = app.ctx.config.download_dir.clone();
        let tx = app.ctx.event_tx.clone();
        app.task_manager.spawn(
            "download",
            tokio::spawn(async move {
                let result = resolver.download(&track, &dest).await.map_err(|e| {
                    error!(track_id = track.id(), error = %e, "Download failed");
                    e.to_string()
                });
                let _ = tx.send(Event::DownloadFinished(result));
            }),
        );
    }

    fn handle_key_event(app: &mut App, evt: KeyEvent) {
        if evt.kind != KeyEventKind::Press {
            return;
        }
        if evt.code == KeyCode::Char('c') && evt.modifiers == KeyModifiers::CONTROL {
            app.update(AppMessage::Quit);
            return;
        }

        if let Some(action) = app.router.handle_input(evt, &app.state, &app.ctx) {
            Self::dispatch_action(app, action);
            return;
        }

        if let Some(msg) = InputHandler::handle_key(evt) {
            app.update(msg);
        }
    }

    fn dispatch_action(app: &mut App, action: Action) {
        match action {
            Action::Back => app.update(AppMessage::GoBack),
            Action::None => {}
        }
    }
}
