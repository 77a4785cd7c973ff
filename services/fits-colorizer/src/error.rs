//! Error types for the colorizer pipeline.

use colorizer::ColorizeError;
use thiserror::Error;

/// Opaque collaborator error.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Image source error: {0}")]
    Source(#[source] BoxError),

    #[error("Image sink error: {0}")]
    Sink(#[source] BoxError),

    #[error("Colorize error: {0}")]
    Colorize(#[from] ColorizeError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

impl PipelineError {
    pub fn from_source<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        PipelineError::Source(Box::new(err))
    }

    pub fn from_sink<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        PipelineError::Sink(Box::new(err))
    }
}
