use thiserror::Error;

use super::models::ErrorEnvelope;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("{message}")]
    Status {
        code: u16,
        status: Option<String>,
        message: String,
    },

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("The generation service failed without an error message")]
    Opaque,
}

impl ApiError {
    /// Builds a status error from a non-2xx response body, falling back to the
    /// raw body when it is not the usual `{"error": {...}}` envelope.
    pub fn from_response(code: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => Self::Status {
                code: envelope.error.code.unwrap_or(code),
                status: envelope.error.status,
                message: envelope.error.message,
            },
            Err(_) if body.trim().is_empty() => Self::Status {
                code,
                status: None,
                message: format!("HTTP {code}"),
            },
            Err(_) => Self::Status {
                code,
                status: None,
                message: body.trim().to_string(),
            },
        }
    }

    pub fn is_invalid_credential(&self) -> bool {
        match self {
            ApiError::Status { message, .. } => message.contains("API key not valid"),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}
