use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// Outcome of a single failed upload.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to send request: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Upload failed with status: {0}")]
    Rejected(StatusCode),

    #[error("Failed to parse upload response: {0}")]
    InvalidResponse(String),
}

impl UploadError {
    /// The endpoint answered, but not with a usable success.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected(_) | Self::InvalidResponse(_))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum PickError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Not a supported image: {0}")]
    NotAnImage(String),
}
