//! Session state shared by every view: the track library, what is playing,
//! and the user's settings. Created once at start-up and dropped at exit.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::{
    generation::{GeneratedTrack, error::GenerationError},
    library::{KeyValueStore, MAX_PROMPT_CHARS, Track, TrackStore},
    player::PlayerState,
    settings::Settings,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Please describe the song you want.")]
    EmptyPrompt,

    #[error("Prompts are limited to {max} characters.")]
    PromptTooLong { max: usize },

    #[error("Please set your Gemini API key in settings.")]
    MissingApiKey,

    #[error("A song is already being generated.")]
    Busy,
}

/// Everything a background generation run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub api_key: String,
}

pub struct Studio {
    store: TrackStore,
    player: PlayerState,
    settings: Settings,
    in_flight: bool,
}

impl Studio {
    pub fn new(store: TrackStore, settings: Settings) -> Self {
        Self {
            store,
            player: PlayerState::new(),
            settings,
            in_flight: false,
        }
    }

    pub fn open(storage: Arc<dyn KeyValueStore>, fallback_api_key: Option<String>) -> Self {
        Self::new(
            TrackStore::load(storage.clone()),
            Settings::load(storage, fallback_api_key),
        )
    }

    pub fn store(&self) -> &TrackStore {
        &self.store
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_generating(&self) -> bool {
        self.in_flight
    }

    /// Validates a prompt and marks a generation as running.
    pub fn begin_generation(&mut self, prompt: &str) -> Result<GenerationRequest, SubmitError> {
        if self.in_flight {
            return Err(SubmitError::Busy);
        }
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(SubmitError::EmptyPrompt);
        }
        if prompt.chars().count() > MAX_PROMPT_CHARS {
            return Err(SubmitError::PromptTooLong {
                max: MAX_PROMPT_CHARS,
            });
        }
        let api_key = self
            .settings
            .api_key()
            .ok_or(SubmitError::MissingApiKey)?
            .to_string();

        self.in_flight = true;
        Ok(GenerationRequest {
            prompt: prompt.to_string(),
            api_key,
        })
    }

    /// On success the new track is stored and starts playing. On failure the
    /// library and player are left alone and the user-facing message is
    /// returned.
    pub fn finish_generation(
        &mut self,
        prompt: &str,
        result: Result<GeneratedTrack, GenerationError>,
    ) -> Result<Track, String> {
        self.in_flight = false;

        let generated = result.map_err(|e| {
            warn!(error = ?e, "generation_failed");
            e.to_string()
        })?;

        let track = Track::generated(prompt, generated.media_ref, generated.lyrics);
        info!(id = track.id(), "track_created");

        self.store.append(track.clone());
        self.player.set_current(Some(track.clone()));
        self.player.set_playing(true);
        Ok(track)
    }

    /// Saves new lyrics and keeps the player's copy of the track in step.
    pub fn update_lyrics(&mut self, id: &str, lyrics: &str) -> Option<Track> {
        let track = self.store.get(id)?;
        if track.is_example() {
            return None;
        }

        let updated = track.with_lyrics(lyrics);
        self.store.update(updated.clone());
        self.player.refresh(&updated);
        Some(updated)
    }

    /// Makes `id` current and starts it. Examples have no audio and are
    /// ignored.
    pub fn play(&mut self, id: &str) -> bool {
        let Some(track) = self.store.get(id).filter(|t| t.is_playable()) else {
            return false;
        };

        self.player.set_current(Some(track.clone()));
        self.player.set_playing(true);
        true
    }

    pub fn toggle_play_pause(&mut self) {
        if self.player.current().is_some() {
            self.player.set_playing(!self.player.is_playing());
        }
    }

    pub fn stop_playback(&mut self) {
        self.player.set_playing(false);
    }

    pub fn set_api_key(&mut self, key: Option<String>) {
        self.settings.set_api_key(key);
    }
}
