//! Boundary with the image source and image sink collaborators.
//!
//! The engine performs no I/O. A source yields image planes until it signals
//! that none remain; a sink encodes finished pixel buffers. Collaborator
//! errors are opaque to the engine and are propagated unchanged.

use std::error::Error;
use std::path::Path;

use crate::pixel::PackedPixel;

/// One image plane read from a source container.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePlane {
    /// Position of the plane's unit in the container (primary = 0).
    pub index: usize,
    pub width: usize,
    pub height: usize,
    /// Row-major samples, `width * height` long.
    pub samples: Vec<f32>,
}

impl ImagePlane {
    pub fn new(index: usize, width: usize, height: usize, samples: Vec<f32>) -> Self {
        Self {
            index,
            width,
            height,
            samples,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Byte pitch of one row of packed pixels for this plane.
    pub fn pitch(&self) -> usize {
        self.width * std::mem::size_of::<PackedPixel>()
    }
}

/// Supplies image planes in container order.
pub trait ImageSource {
    type Error: Error + Send + Sync + 'static;

    /// Next plane, or `Ok(None)` once the container is exhausted.
    fn next_plane(&mut self) -> Result<Option<ImagePlane>, Self::Error>;
}

/// Encodes packed pixel buffers to files.
///
/// `begin_batch` and `end_batch` bracket a batch of writes and are called
/// exactly once per batch. `write` may be called concurrently from several
/// threads inside a batch.
pub trait ImageSink: Sync {
    type Error: Error + Send + Sync + 'static;

    fn begin_batch(&self) -> Result<(), Self::Error>;

    fn write(
        &self,
        pixels: &[PackedPixel],
        width: usize,
        height: usize,
        pitch: usize,
        path: &Path,
    ) -> Result<(), Self::Error>;

    fn end_batch(&self) -> Result<(), Self::Error>;
}
