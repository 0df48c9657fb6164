use thiserror::Error;

use crate::http::error::ApiError;

/// Failures of a generation run. The display string is the message shown
/// to the user.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    #[error("Your Gemini API key is not valid. Please check it in settings.")]
    InvalidCredential,

    #[error("Failed to generate music: lyrics could not be generated for this prompt.")]
    LyricsUnavailable,

    #[error(
        "Failed to generate music: Video generation succeeded but no download link was found."
    )]
    NoMediaProduced,

    #[error("Failed to generate music: {0}")]
    RemoteFailure(String),

    #[error("Failed to generate music: the track was still rendering after {attempts} status checks.")]
    PollLimitReached { attempts: u32 },

    #[error("An unknown error occurred while generating music.")]
    Unknown,
}

impl From<ApiError> for GenerationError {
    fn from(err: ApiError) -> Self {
        if err.is_invalid_credential() {
            return GenerationError::InvalidCredential;
        }
        match err {
            ApiError::Opaque => GenerationError::Unknown,
            other => GenerationError::RemoteFailure(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_key_message_points_to_settings() {
        let err: GenerationError = ApiError::Status {
            code: 400,
            status: Some("INVALID_ARGUMENT".into()),
            message: "API key not valid. Please pass a valid API key.".into(),
        }
        .into();

        assert_eq!(err, GenerationError::InvalidCredential);
        assert!(err.to_string().contains("check it in settings"));
    }

    #[test]
    fn other_remote_errors_wrap_detail() {
        let err: GenerationError = ApiError::Transport("connection reset".into()).into();
        assert_eq!(
            err.to_string(),
            "Failed to generate music: Network error: connection reset"
        );
    }

    #[test]
    fn opaque_failures_are_unknown() {
        let err: GenerationError = ApiError::Opaque.into();
        assert_eq!(err, GenerationError::Unknown);
    }
}
