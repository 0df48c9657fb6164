//! Turns a prompt into lyrics plus a playable media URL.
//!
//! Two remote calls are involved: a text model writes the lyrics and a video
//! model renders the clip as a long-running operation that has to be polled.
//! How the two calls relate is a [`GenerationStrategy`].

pub mod error;
pub mod locator;
pub mod poll;
pub mod prompt;

use std::{fmt, str::FromStr, sync::Arc};

use thiserror::Error;
use tracing::{error, info, instrument, warn};

use crate::http::backend::GenerationBackend;

use self::{
    error::GenerationError, locator::MediaLocator, poll::PollPolicy, prompt::LYRICS_UNAVAILABLE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerationStrategy {
    /// Lyrics and media are requested at the same time; the media prompt only
    /// describes the style, so the vocals may not match the lyrics.
    #[default]
    Parallel,
    /// Lyrics first, then media sung from those exact lyrics.
    Sequential,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown generation strategy `{0}` (expected `parallel` or `sequential`)")]
pub struct UnknownStrategy(pub String);

impl FromStr for GenerationStrategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "parallel" => Ok(Self::Parallel),
            "sequential" => Ok(Self::Sequential),
            _ => Err(UnknownStrategy(s.to_string())),
        }
    }
}

impl fmt::Display for GenerationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parallel => f.write_str("parallel"),
            Self::Sequential => f.write_str("sequential"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedTrack {
    /// Media URL already carrying the credential needed to fetch it.
    pub media_ref: String,
    pub lyrics: String,
}

pub struct Generator {
    backend: Arc<dyn GenerationBackend>,
    strategy: GenerationStrategy,
    poll: PollPolicy,
}

impl Generator {
    pub fn new(
        backend: Arc<dyn GenerationBackend>,
        strategy: GenerationStrategy,
        poll: PollPolicy,
    ) -> Self {
        Self {
            backend,
            strategy,
            poll,
        }
    }

    #[instrument(skip_all, fields(strategy = %self.strategy))]
    pub async fn generate(
        &self,
        prompt: &str,
        api_key: &str,
    ) -> Result<GeneratedTrack, GenerationError> {
        info!(prompt_chars = prompt.chars().count(), "generation_started");

        let (lyrics, operation) = match self.strategy {
            GenerationStrategy::Parallel => {
                let style = prompt::style_prompt(prompt);
                let (lyrics, operation) = futures::join!(
                    self.lyrics(prompt, api_key),
                    self.backend.submit_video(&style, api_key)
                );
                (lyrics?, operation?)
            }
            GenerationStrategy::Sequential => {
                let lyrics = self.lyrics(prompt, api_key).await?;
                if lyrics == LYRICS_UNAVAILABLE {
                    return Err(GenerationError::LyricsUnavailable);
                }
                let vocals = prompt::vocal_prompt(prompt, &lyrics);
                let operation = self.backend.submit_video(&vocals, api_key).await?;
                (lyrics, operation)
            }
        };

        let operation = self
            .poll
            .wait_for(self.backend.as_ref(), operation, api_key)
            .await?;

        let locator = operation
            .first_locator()
            .map(MediaLocator::new)
            .ok_or(GenerationError::NoMediaProduced)?;

        info!("generation_finished");
        Ok(GeneratedTrack {
            media_ref: locator.authorize(api_key),
            lyrics,
        })
    }

    /// Only a rejected key is fatal here; any other failure becomes the
    /// placeholder lyrics and the strategy decides what to do with it.
    async fn lyrics(&self, prompt: &str, api_key: &str) -> Result<String, GenerationError> {
        match self
            .backend
            .generate_text(&prompt::lyrics_prompt(prompt), api_key)
            .await
        {
            Ok(text) if !text.trim().is_empty() => Ok(text),
            Ok(_) => {
                warn!("lyrics_empty");
                Ok(LYRICS_UNAVAILABLE.to_string())
            }
            Err(e) if e.is_invalid_credential() => Err(GenerationError::InvalidCredential),
            Err(e) => {
                error!(error = %e, "lyrics_generation_failed");
                Ok(LYRICS_UNAVAILABLE.to_string())
            }
        }
    }
}
