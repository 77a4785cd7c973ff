//! Error types for the colorization engine.

use thiserror::Error;

/// Result type alias using ColorizeError.
pub type ColorizeResult<T> = Result<T, ColorizeError>;

/// Errors raised by the colorization engine.
///
/// Numeric edge cases (flat windows, samples outside the window) are not
/// errors; they resolve to documented colors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ColorizeError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown colorize mode: {0}")]
    UnknownMode(String),
}
