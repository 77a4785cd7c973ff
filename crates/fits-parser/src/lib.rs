//! FITS reader for telescope images.
//!
//! Walks the HDUs of a FITS container (primary HDU plus extensions) and
//! yields every image HDU that carries pixels as a calibrated `f32`
//! [`ImagePlane`](colorizer::ImagePlane).
//!
//! # Implementation Notes
//!
//! Only the first 2-D plane of higher-dimensional cubes is read. Table
//! extensions are skipped but still count towards the HDU index, so plane
//! indices always match the HDU numbering of the file.

pub mod error;
pub mod header;
pub mod reader;

pub use error::{FitsError, FitsResult};
pub use header::{Card, Header};
pub use reader::{FitsReader, Hdu, HduKind};
