//! Buffer-level colorization.

use rayon::prelude::*;
use tracing::debug;

use crate::error::{ColorizeError, ColorizeResult};
use crate::pixel::PackedPixel;
use crate::ramp::ColorizeMode;
use crate::stripe::StripeMap;
use crate::window::{compute_window, ViewWindow};

/// Minimum samples before the per-sample map runs on the rayon pool.
const PARALLEL_THRESHOLD: usize = 16_384; // 128x128 or larger

/// Samples handed to one rayon task.
const PARALLEL_CHUNK: usize = 4096;

/// Parameters for one colorization call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorizeParams {
    pub mode: ColorizeMode,
    /// Lower cut into the data range, `0.0` = data minimum.
    pub start_fraction: f64,
    /// Upper cut into the data range, `1.0` = data maximum.
    pub end_fraction: f64,
    /// Number of bands the view window is divided into.
    pub stripe_num: f64,
}

impl Default for ColorizeParams {
    fn default() -> Self {
        Self {
            mode: ColorizeMode::default(),
            start_fraction: 0.0,
            end_fraction: 1.0,
            stripe_num: 1.0,
        }
    }
}

impl ColorizeParams {
    pub fn new(mode: ColorizeMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn with_window(mut self, start_fraction: f64, end_fraction: f64) -> Self {
        self.start_fraction = start_fraction;
        self.end_fraction = end_fraction;
        self
    }

    pub fn with_stripes(mut self, stripe_num: f64) -> Self {
        self.stripe_num = stripe_num;
        self
    }
}

/// Color one sample: remap, ramp, then force alpha.
#[inline(always)]
fn colorize_sample(map: &StripeMap, mode: ColorizeMode, sample: f32) -> PackedPixel {
    mode.ramp(map.percent(sample)).opaque()
}

/// Colorize `samples` into a freshly allocated pixel buffer.
///
/// Output pixel `i` corresponds to sample `i`.
///
/// # Errors
/// `InvalidInput` for an empty buffer, a buffer with no finite samples, a
/// non-finite window fraction, or a stripe count that is not above zero.
pub fn colorize(samples: &[f32], params: &ColorizeParams) -> ColorizeResult<Vec<PackedPixel>> {
    let mut pixels = vec![PackedPixel::default(); samples.len()];
    colorize_into(samples, &mut pixels, params)?;
    Ok(pixels)
}

/// Colorize `samples` into `out`, overwriting every slot.
///
/// # Errors
/// As [`colorize`], plus `InvalidInput` when `out` and `samples` differ in
/// length.
pub fn colorize_into(
    samples: &[f32],
    out: &mut [PackedPixel],
    params: &ColorizeParams,
) -> ColorizeResult<()> {
    let window = compute_window(samples, params.start_fraction, params.end_fraction)?;
    colorize_with_window(samples, out, &window, params.mode, params.stripe_num)
}

/// Colorize with a window computed earlier.
///
/// Lets one window serve every (stripe, mode) combination over the same
/// samples. The window fractions in any `ColorizeParams` are not consulted.
pub fn colorize_with_window(
    samples: &[f32],
    out: &mut [PackedPixel],
    window: &ViewWindow,
    mode: ColorizeMode,
    stripe_num: f64,
) -> ColorizeResult<()> {
    if samples.is_empty() {
        return Err(ColorizeError::InvalidInput(
            "sample buffer is empty".to_string(),
        ));
    }

    if out.len() != samples.len() {
        return Err(ColorizeError::InvalidInput(format!(
            "pixel buffer holds {} pixels but there are {} samples",
            out.len(),
            samples.len()
        )));
    }

    let map = StripeMap::new(*window, stripe_num)?;

    debug!(
        mode = %mode,
        samples = samples.len(),
        view_min = window.view_min,
        view_max = window.view_max,
        view_distance = window.view_distance,
        stripe_num,
        stripe_distance = map.stripe_distance(),
        "Colorizing sample buffer"
    );

    if samples.len() >= PARALLEL_THRESHOLD {
        out.par_chunks_mut(PARALLEL_CHUNK)
            .zip(samples.par_chunks(PARALLEL_CHUNK))
            .for_each(|(pixels, chunk)| {
                for (pixel, &sample) in pixels.iter_mut().zip(chunk) {
                    *pixel = colorize_sample(&map, mode, sample);
                }
            });
    } else {
        for (pixel, &sample) in out.iter_mut().zip(samples) {
            *pixel = colorize_sample(&map, mode, sample);
        }
    }

    Ok(())
}
