//! Pixel buffer layout checks.
//!
//! Sinks receive a pixel slice plus a row pitch in bytes. Encoders want
//! tightly packed rows, so padded buffers are compacted first.

use std::borrow::Cow;
use std::mem::size_of;

use colorizer::PackedPixel;

use crate::error::{RenderError, RenderResult};

const PIXEL_BYTES: usize = size_of::<PackedPixel>();

/// Check `pixels` against `width`, `height` and `pitch` and return the
/// image as tightly packed rows.
///
/// `pitch` must be a whole number of pixels and at least one row wide; the
/// slice must hold `height` rows at that pitch (the final row need not be
/// padded).
pub fn packed_rows(
    pixels: &[PackedPixel],
    width: usize,
    height: usize,
    pitch: usize,
) -> RenderResult<Cow<'_, [PackedPixel]>> {
    if width == 0 || height == 0 {
        return Err(RenderError::InvalidLayout(format!(
            "image must be at least 1x1, got {}x{}",
            width, height
        )));
    }

    if pitch % PIXEL_BYTES != 0 || pitch < width * PIXEL_BYTES {
        return Err(RenderError::InvalidLayout(format!(
            "pitch {} is not a multiple of {} covering {} pixels",
            pitch, PIXEL_BYTES, width
        )));
    }

    let stride = pitch / PIXEL_BYTES;
    let needed = stride * (height - 1) + width;
    if pixels.len() < needed {
        return Err(RenderError::InvalidLayout(format!(
            "buffer holds {} pixels, {}x{} at pitch {} needs {}",
            pixels.len(),
            width,
            height,
            pitch,
            needed
        )));
    }

    if stride == width {
        return Ok(Cow::Borrowed(&pixels[..width * height]));
    }

    let mut packed = Vec::with_capacity(width * height);
    for row in 0..height {
        let start = row * stride;
        packed.extend_from_slice(&pixels[start..start + width]);
    }
    Ok(Cow::Owned(packed))
}
