//! Error types for raster encoding and the raster sink.

use thiserror::Error;

/// Result type alias using RenderError.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors raised while encoding or writing raster files.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid image layout: {0}")]
    InvalidLayout(String),

    #[error("Encoding failed: {0}")]
    EncodeError(String),

    #[error("Failed to write {path}: {source}")]
    WriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Write attempted outside a batch")]
    BatchNotStarted,

    #[error("Batch already in progress")]
    BatchInProgress,

    #[error("Unknown raster format: {0}")]
    UnknownFormat(String),
}

impl From<std::io::Error> for RenderError {
    fn from(err: std::io::Error) -> Self {
        RenderError::EncodeError(err.to_string())
    }
}
