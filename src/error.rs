use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RfseekError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Search path does not exist: {}", .0.display())]
    PathNotFound(PathBuf),

    #[error("Configuration error: {0}")]
    Config(String),

    /// The search deadline expired while an operation was in flight.
    #[error("Search cancelled: deadline exceeded")]
    Cancelled,

    #[error("An unexpected error occurred: {0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl RfseekError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RfseekError::Cancelled)
    }
}

pub type Result<T> = std::result::Result<T, RfseekError>;
