//! File sink for colorized pixel buffers.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use colorizer::{ImageSink, PackedPixel};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{RenderError, RenderResult};
use crate::layout::packed_rows;
use crate::{bmp, png};

/// On-disk raster format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RasterFormat {
    #[default]
    Bmp,
    Png,
}

impl RasterFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            RasterFormat::Bmp => "bmp",
            RasterFormat::Png => "png",
        }
    }

    /// Encode tightly packed pixels in this format.
    pub fn encode(self, pixels: &[PackedPixel], width: usize, height: usize) -> RenderResult<Vec<u8>> {
        match self {
            RasterFormat::Bmp => bmp::encode_bmp(pixels, width, height),
            RasterFormat::Png => png::create_png_auto(pixels, width, height),
        }
    }
}

impl fmt::Display for RasterFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for RasterFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bmp" => Ok(RasterFormat::Bmp),
            "png" => Ok(RasterFormat::Png),
            other => Err(RenderError::UnknownFormat(other.to_string())),
        }
    }
}

/// Writes each pixel buffer to its own file.
///
/// Writes are only accepted between `begin_batch` and `end_batch`; batches
/// do not nest. `write` is safe to call from several threads at once.
#[derive(Debug, Default)]
pub struct RasterSink {
    format: RasterFormat,
    in_batch: AtomicBool,
    written: AtomicUsize,
}

impl RasterSink {
    pub fn new(format: RasterFormat) -> Self {
        Self {
            format,
            in_batch: AtomicBool::new(false),
            written: AtomicUsize::new(0),
        }
    }

    pub fn format(&self) -> RasterFormat {
        self.format
    }

    /// Files written in the current (or last finished) batch.
    pub fn files_written(&self) -> usize {
        self.written.load(Ordering::Acquire)
    }

    pub fn in_batch(&self) -> bool {
        self.in_batch.load(Ordering::Acquire)
    }
}

impl ImageSink for RasterSink {
    type Error = RenderError;

    fn begin_batch(&self) -> RenderResult<()> {
        if self.in_batch.swap(true, Ordering::AcqRel) {
            return Err(RenderError::BatchInProgress);
        }
        self.written.store(0, Ordering::Release);
        debug!(format = %self.format, "Raster batch started");
        Ok(())
    }

    fn write(
        &self,
        pixels: &[PackedPixel],
        width: usize,
        height: usize,
        pitch: usize,
        path: &Path,
    ) -> RenderResult<()> {
        if !self.in_batch() {
            return Err(RenderError::BatchNotStarted);
        }

        let rows = packed_rows(pixels, width, height, pitch)?;
        let encoded = self.format.encode(&rows, width, height)?;

        std::fs::write(path, &encoded).map_err(|source| RenderError::WriteError {
            path: path.display().to_string(),
            source,
        })?;

        self.written.fetch_add(1, Ordering::AcqRel);
        debug!(
            path = %path.display(),
            width,
            height,
            bytes = encoded.len(),
            "Wrote raster"
        );
        Ok(())
    }

    fn end_batch(&self) -> RenderResult<()> {
        if !self.in_batch.swap(false, Ordering::AcqRel) {
            return Err(RenderError::BatchNotStarted);
        }
        info!(
            format = %self.format,
            files = self.files_written(),
            "Raster batch finished"
        );
        Ok(())
    }
}
