//! Raster encoding for colorized pixel buffers.
//!
//! Implements the image sink side of the colorizer:
//! - BMP (32-bit BGRA, bottom-up)
//! - PNG (RGBA, or indexed when the image has ≤256 colors)
//! - `RasterSink`, an `ImageSink` with batch bracketing

pub mod bmp;
pub mod error;
pub mod layout;
pub mod png;
pub mod sink;

pub use error::{RenderError, RenderResult};
pub use sink::{RasterFormat, RasterSink};
