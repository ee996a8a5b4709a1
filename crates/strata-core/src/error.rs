//! Error types for strata.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using strata's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for strata operations.
#[derive(Error, Debug)]
pub enum Error {
    /// None of the candidate dataset locations exist
    #[error("Timeline dataset not found (probed: {})", display_paths(.candidates))]
    DatasetNotFound { candidates: Vec<PathBuf> },

    /// Dataset file exists but its content is not a usable timeline
    #[error("Timeline dataset could not be parsed: {0}")]
    DatasetParse(String),

    /// No entry carries the requested layer
    #[error("Layer '{0}' not found")]
    LayerNotFound(String),

    /// A query parameter failed validation
    #[error("Invalid query parameter '{param}': {message}")]
    InvalidQuery {
        param: &'static str,
        message: String,
    },

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for an [`Error::InvalidQuery`] on `param`.
    pub fn invalid_query(param: &'static str, message: impl Into<String>) -> Self {
        Error::InvalidQuery {
            param,
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::DatasetParse(e.to_string())
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
