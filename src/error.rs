// src/error.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DrawError {
    #[error("credential file error: {0}")]
    Credentials(#[from] std::io::Error),

    #[error("credential key format error: {0}")]
    KeyFormat(#[from] serde_json::Error),

    #[error("Google Sheets request failed: {0}")]
    Sheets(#[from] google_sheets4::Error),

    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("configuration error: {message}")]
    Config { message: String },

    #[error("data processing error: {message}")]
    Processing { message: String },
}

pub type Result<T> = std::result::Result<T, DrawError>;

/// Coarse classification used by the presentation layer to pick a headline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Credentials,
    Connection,
    Data,
    Config,
}

impl DrawError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DrawError::Credentials(_) | DrawError::KeyFormat(_) => ErrorKind::Credentials,
            DrawError::Sheets(_) => ErrorKind::Connection,
            DrawError::Csv(_) | DrawError::Task(_) | DrawError::Processing { .. } => {
                ErrorKind::Data
            }
            DrawError::Config { .. } => ErrorKind::Config,
        }
    }
}

/// Clonable form of a pipeline failure, carried in GUI messages.
#[derive(Debug, Clone)]
pub struct DrawFailure {
    pub kind: ErrorKind,
    pub detail: String,
}

impl From<DrawError> for DrawFailure {
    fn from(error: DrawError) -> Self {
        DrawFailure {
            kind: error.kind(),
            detail: error.to_string(),
        }
    }
}
