use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("Could not fetch audio: {0}")]
    Fetch(reqwest::Error),

    #[error("Audio request failed with HTTP {0}")]
    Status(u16),

    #[error("Audio file error: {0}")]
    Io(#[from] io::Error),

    #[error("Could not start player `{program}`: {source}")]
    Player {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("This track has no audio to play")]
    NoSource,
}

/// Media URLs carry the credential in their query, so the URL is dropped
/// before the error is shown or logged.
impl From<reqwest::Error> for MediaError {
    fn from(err: reqwest::Error) -> Self {
        MediaError::Fetch(err.without_url())
    }
}
