//! Error types for FITS parsing operations.

use thiserror::Error;

/// Result type for FITS parser operations.
pub type FitsResult<T> = Result<T, FitsError>;

/// Error types for FITS parsing.
#[derive(Error, Debug)]
pub enum FitsError {
    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Header ended (or the file ended) before a mandatory keyword
    #[error("HDU {hdu}: missing required keyword {keyword}")]
    MissingKeyword { hdu: usize, keyword: String },

    /// A keyword value could not be parsed as the expected type
    #[error("HDU {hdu}: invalid value for {keyword}: {value}")]
    InvalidValue {
        hdu: usize,
        keyword: String,
        value: String,
    },

    /// BITPIX outside the six values FITS defines
    #[error("HDU {hdu}: unsupported BITPIX {bitpix}")]
    UnsupportedBitpix { hdu: usize, bitpix: i64 },

    /// Structural problem in the container
    #[error("Invalid FITS format: {0}")]
    InvalidFormat(String),

    /// Data unit or header block cut short
    #[error("HDU {hdu}: unexpected end of file")]
    UnexpectedEof { hdu: usize },
}
