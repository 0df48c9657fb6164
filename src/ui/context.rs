use std::sync::Arc;

use flume::Sender;

use crate::{
    config::AppConfig,
    event::events::Event,
    generation::Generator,
    player::{MediaResolver, PlaybackSurface},
    studio::Studio,
};

/// Long-lived objects the views read from and the event handler mutates.
pub struct AppContext {
    pub config: AppConfig,
    pub studio: Studio,
    pub surface: PlaybackSurface,
    pub generator: Arc<Generator>,
    pub resolver: MediaResolver,
    pub event_tx: Sender<Event>,
}
