//! HDU walking and image extraction.

use std::path::Path;

use bytes::{Buf, Bytes};
use colorizer::{ImagePlane, ImageSource};
use tracing::{debug, warn};

use crate::error::{FitsError, FitsResult};
use crate::header::{Header, BLOCK_SIZE};

/// Largest `NAXIS` the FITS standard allows.
const MAX_AXES: i64 = 999;

/// What an HDU holds, from `SIMPLE`/`XTENSION`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HduKind {
    Primary,
    Image,
    /// `BINTABLE`, `TABLE` or any other extension type.
    Extension(String),
}

/// Structural description of one HDU.
#[derive(Debug, Clone)]
pub struct Hdu {
    /// Position in the container, primary = 0.
    pub index: usize,
    pub kind: HduKind,
    pub bitpix: i64,
    /// `NAXIS1..NAXISn`; empty when `NAXIS = 0`.
    pub axes: Vec<usize>,
    pub bscale: f64,
    pub bzero: f64,
    pub header: Header,
    /// Unpadded data unit bytes.
    pub data: Bytes,
}

impl Hdu {
    pub fn is_image(&self) -> bool {
        matches!(self.kind, HduKind::Primary | HduKind::Image)
    }

    /// Image HDU that actually carries pixels.
    pub fn has_pixels(&self) -> bool {
        self.is_image() && !self.axes.is_empty() && self.axes.iter().all(|n| *n > 0)
    }

    pub fn width(&self) -> usize {
        self.axes.first().copied().unwrap_or(0)
    }

    /// `NAXIS2`, or 1 for one-dimensional data.
    pub fn height(&self) -> usize {
        match self.axes.len() {
            0 => 0,
            1 => 1,
            _ => self.axes[1],
        }
    }

    /// Read the first `width * height` plane as calibrated `f32` samples.
    ///
    /// Samples are `BZERO + BSCALE * raw`, matching what FITS readers return
    /// for a float read of integer data.
    pub fn read_plane(&self) -> FitsResult<ImagePlane> {
        let width = self.width();
        let height = self.height();
        let bytes_per_sample = bytes_per_sample(self.bitpix, self.index)?;
        let (count, plane_len) = width
            .checked_mul(height)
            .and_then(|count| Some((count, count.checked_mul(bytes_per_sample)?)))
            .ok_or_else(|| {
                FitsError::InvalidFormat(format!(
                    "HDU {}: {}x{} plane size overflows",
                    self.index, width, height
                ))
            })?;

        if self.data.len() < plane_len {
            return Err(FitsError::UnexpectedEof { hdu: self.index });
        }

        let mut buf = self.data.slice(..plane_len);
        let mut samples = Vec::with_capacity(count);

        let scaled = self.bscale != 1.0 || self.bzero != 0.0;
        let calibrate = |raw: f64| -> f32 {
            if scaled {
                (self.bzero + self.bscale * raw) as f32
            } else {
                raw as f32
            }
        };

        match self.bitpix {
            8 => (0..count).for_each(|_| samples.push(calibrate(buf.get_u8() as f64))),
            16 => (0..count).for_each(|_| samples.push(calibrate(buf.get_i16() as f64))),
            32 => (0..count).for_each(|_| samples.push(calibrate(buf.get_i32() as f64))),
            64 => (0..count).for_each(|_| samples.push(calibrate(buf.get_i64() as f64))),
            -32 => (0..count).for_each(|_| {
                let raw = buf.get_f32();
                samples.push(if scaled { calibrate(raw as f64) } else { raw });
            }),
            -64 => (0..count).for_each(|_| samples.push(calibrate(buf.get_f64()))),
            other => {
                return Err(FitsError::UnsupportedBitpix {
                    hdu: self.index,
                    bitpix: other,
                })
            }
        }

        Ok(ImagePlane::new(self.index, width, height, samples))
    }
}

fn bytes_per_sample(bitpix: i64, hdu: usize) -> FitsResult<usize> {
    match bitpix {
        8 | 16 | 32 | 64 | -32 | -64 => Ok((bitpix.unsigned_abs() / 8) as usize),
        other => Err(FitsError::UnsupportedBitpix { hdu, bitpix: other }),
    }
}

/// Data unit length in bytes, `|BITPIX| / 8 * GCOUNT * (PCOUNT + NAXIS1 * .. * NAXISn)`.
///
/// `None` when the size does not fit in `usize`.
fn data_unit_len(bitpix: i64, gcount: usize, pcount: usize, axes: &[usize]) -> Option<usize> {
    if axes.is_empty() {
        return Some(0);
    }

    let samples = axes
        .iter()
        .try_fold(1usize, |acc, &n| acc.checked_mul(n))?
        .checked_add(pcount)?;

    (bitpix.unsigned_abs() as usize / 8)
        .checked_mul(gcount)?
        .checked_mul(samples)
}

/// Sequential reader over the HDUs of a FITS container.
#[derive(Debug, Clone)]
pub struct FitsReader {
    data: Bytes,
    offset: usize,
    index: usize,
}

impl FitsReader {
    /// Read a whole file into memory.
    pub fn open(path: impl AsRef<Path>) -> FitsResult<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        debug!(path = %path.display(), bytes = data.len(), "Opened FITS file");
        Self::from_bytes(data)
    }

    /// Wrap an in-memory container.
    ///
    /// # Errors
    /// `InvalidFormat` when the data does not start with a `SIMPLE` card.
    pub fn from_bytes(data: impl Into<Bytes>) -> FitsResult<Self> {
        let data = data.into();
        if !data.starts_with(b"SIMPLE  =") {
            return Err(FitsError::InvalidFormat(
                "missing SIMPLE card at start of file".to_string(),
            ));
        }

        Ok(Self {
            data,
            offset: 0,
            index: 0,
        })
    }

    /// Next HDU, or `None` once the container is exhausted.
    pub fn next_hdu(&mut self) -> FitsResult<Option<Hdu>> {
        let remaining = self.data.len().saturating_sub(self.offset);
        if remaining == 0 {
            return Ok(None);
        }
        if remaining < BLOCK_SIZE {
            warn!(bytes = remaining, "Ignoring trailing bytes after last HDU");
            self.offset = self.data.len();
            return Ok(None);
        }

        let index = self.index;
        let header = Header::parse(&self.data[self.offset..], index)?;

        let kind = if index == 0 {
            if header.logical("SIMPLE", index)? != Some(true) {
                return Err(FitsError::InvalidFormat(
                    "primary header is not SIMPLE = T".to_string(),
                ));
            }
            HduKind::Primary
        } else {
            match header.string("XTENSION") {
                Some(ext) if ext == "IMAGE" => HduKind::Image,
                Some(ext) => HduKind::Extension(ext),
                None => {
                    return Err(FitsError::MissingKeyword {
                        hdu: index,
                        keyword: "XTENSION".to_string(),
                    })
                }
            }
        };

        let bitpix = header.require_int("BITPIX", index)?;
        let naxis = header.require_int("NAXIS", index)?;
        if !(0..=MAX_AXES).contains(&naxis) {
            return Err(FitsError::InvalidValue {
                hdu: index,
                keyword: "NAXIS".to_string(),
                value: naxis.to_string(),
            });
        }
        let mut axes = Vec::with_capacity(naxis as usize);
        for n in 1..=naxis {
            let len = header.require_int(&format!("NAXIS{}", n), index)?;
            axes.push(usize::try_from(len).map_err(|_| FitsError::InvalidValue {
                hdu: index,
                keyword: format!("NAXIS{}", n),
                value: len.to_string(),
            })?);
        }

        let pcount = header.int("PCOUNT", index)?.unwrap_or(0).max(0) as usize;
        let gcount = header.int("GCOUNT", index)?.unwrap_or(1).max(0) as usize;
        let bscale = header.float("BSCALE", index)?.unwrap_or(1.0);
        let bzero = header.float("BZERO", index)?.unwrap_or(0.0);

        let data_len = data_unit_len(bitpix, gcount, pcount, &axes).ok_or_else(|| {
            FitsError::InvalidFormat(format!(
                "HDU {}: data unit size overflows (BITPIX {}, axes {:?})",
                index, bitpix, axes
            ))
        })?;

        let data_start = self.offset + header.byte_len();
        let data_end = data_start
            .checked_add(data_len)
            .filter(|end| *end <= self.data.len())
            .ok_or(FitsError::UnexpectedEof { hdu: index })?;

        let padded = data_len.div_ceil(BLOCK_SIZE) * BLOCK_SIZE;
        self.offset = (data_start + padded).min(self.data.len());
        self.index += 1;

        debug!(
            hdu = index,
            kind = ?kind,
            bitpix,
            axes = ?axes,
            data_len,
            "Parsed HDU"
        );

        Ok(Some(Hdu {
            index,
            kind,
            bitpix,
            axes,
            bscale,
            bzero,
            header,
            data: self.data.slice(data_start..data_end),
        }))
    }

    /// Next image plane, skipping HDUs without pixels.
    pub fn next_image(&mut self) -> FitsResult<Option<ImagePlane>> {
        while let Some(hdu) = self.next_hdu()? {
            if hdu.has_pixels() {
                return hdu.read_plane().map(Some);
            }

            if hdu.is_image() {
                debug!(hdu = hdu.index, "Skipping HDU without pixels");
            } else {
                warn!(hdu = hdu.index, kind = ?hdu.kind, "Skipping non-image extension");
            }
        }

        Ok(None)
    }

    /// Every HDU header in the container.
    pub fn hdus(mut self) -> FitsResult<Vec<Hdu>> {
        let mut hdus = Vec::new();
        while let Some(hdu) = self.next_hdu()? {
            hdus.push(hdu);
        }
        Ok(hdus)
    }
}

impl ImageSource for FitsReader {
    type Error = FitsError;

    fn next_plane(&mut self) -> Result<Option<ImagePlane>, Self::Error> {
        self.next_image()
    }
}
