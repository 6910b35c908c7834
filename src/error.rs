use reqwest::StatusCode;
use thiserror::Error;

use crate::response::error_message;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Not Found")]
    NotFound,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Already in progress: {0}")]
    Busy(String),

    #[error("Error {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("Network or server error")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response: {0}")]
    InvalidResponse(String),

    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

/// Where a failure was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected before any network call; local state is unchanged.
    Validation,
    /// The remote store failed or answered unexpectedly.
    Remote,
    Internal,
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    /// Maps a non-success response to an error, pulling the server's
    /// `message` out of the body when there is one.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AppError::Unauthorized,
            StatusCode::NOT_FOUND => AppError::NotFound,
            _ => AppError::Remote {
                status: status.as_u16(),
                message: error_message(body).unwrap_or_else(|| "Check backend logs".into()),
            },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Validation(_) | AppError::Busy(_) => ErrorKind::Validation,
            AppError::NotFound
            | AppError::Unauthorized
            | AppError::Remote { .. }
            | AppError::Transport(_)
            | AppError::InvalidResponse(_) => ErrorKind::Remote,
            AppError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Text for the non-fatal notification shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Unauthorized => "Session expired or not logged in".to_string(),
            AppError::Transport(_) => "Network or server error".to_string(),
            other => other.to_string(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
