use std::path::PathBuf;

use crate::{
    generation::{GeneratedTrack, error::GenerationError},
    player::MediaHandle,
};

/// Messages delivered to the UI loop, either finished background work or
/// requests raised by views.
#[derive(Debug)]
pub enum Event {
    // Background results
    GenerationFinished {
        prompt: String,
        result: Result<GeneratedTrack, GenerationError>,
    },
    MediaResolved {
        track_id: String,
        result: Result<MediaHandle, String>,
    },
    DownloadFinished(Result<PathBuf, String>),

    // Commands
    Generate(String),
    Play(String),
    OpenDetail(String),
    SaveLyrics { id: String, lyrics: String },
    SaveApiKey(String),
}
