//! Periodic "stripe" remapping of samples into percents.
//!
//! The view window is split into `stripe_num` equal bands. A sample's percent
//! is its position inside its own band, so the result is a sawtooth of the
//! sample value with period `view_distance / stripe_num`. Samples at or above
//! the top of the window saturate to `1.0` instead of wrapping.

use crate::error::{ColorizeError, ColorizeResult};
use crate::window::ViewWindow;

/// A view window divided into stripes, ready to remap samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StripeMap {
    view_min: f64,
    view_distance: f64,
    stripe_distance: f64,
}

impl StripeMap {
    /// Divide `window` into `stripe_num` bands.
    ///
    /// Fractional stripe counts are accepted.
    ///
    /// # Errors
    /// `InvalidInput` when `stripe_num` is not a finite number above zero, or
    /// when the resulting band width is zero or not finite.
    pub fn new(window: ViewWindow, stripe_num: f64) -> ColorizeResult<Self> {
        if !stripe_num.is_finite() || stripe_num <= 0.0 {
            return Err(ColorizeError::InvalidInput(format!(
                "stripe count must be a finite number above zero, got {}",
                stripe_num
            )));
        }

        let stripe_distance = window.view_distance / stripe_num;
        if !stripe_distance.is_finite() || stripe_distance == 0.0 {
            return Err(ColorizeError::InvalidInput(format!(
                "{} stripes over a window of {} leave no usable band width",
                stripe_num, window.view_distance
            )));
        }

        Ok(Self {
            view_min: window.view_min,
            view_distance: window.view_distance,
            stripe_distance,
        })
    }

    pub fn stripe_distance(&self) -> f64 {
        self.stripe_distance
    }

    /// Position of `sample` inside its stripe, in `[0, 1]`.
    ///
    /// Samples below the window are not clamped; they continue the sawtooth
    /// downwards. NaN maps to `0.0`, `+inf` saturates to `1.0` and `-inf`
    /// maps to `0.0`.
    #[inline]
    pub fn percent(&self, sample: f32) -> f64 {
        let sample = sample as f64;
        if sample.is_nan() || sample == f64::NEG_INFINITY {
            return 0.0;
        }

        let f = sample - self.view_min;
        if f >= self.view_distance {
            return 1.0;
        }

        let f = f - self.stripe_distance * (f / self.stripe_distance).floor();

        let percent = f / self.stripe_distance;
        if percent.is_nan() {
            return 0.0;
        }

        // Rounding in the division can push the band offset a hair outside
        // the band.
        percent.clamp(0.0, 1.0)
    }
}

/// Free-function form of [`StripeMap::percent`] with every parameter explicit.
#[inline]
pub fn remap(sample: f32, view_min: f64, view_distance: f64, stripe_distance: f64) -> f64 {
    StripeMap {
        view_min,
        view_distance,
        stripe_distance,
    }
    .percent(sample)
}
