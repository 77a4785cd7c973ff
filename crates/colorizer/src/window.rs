//! View window computation.
//!
//! The view window is the intensity sub-range of a sample buffer that gets
//! mapped to colors. It is cut out of the buffer's true min/max range by two
//! fractions, so `(0, 1)` is the full data range.

use crate::error::{ColorizeError, ColorizeResult};

/// Intensity range used for remapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewWindow {
    pub view_min: f64,
    pub view_max: f64,
    /// `view_max - view_min`, or `1.0` when that would be zero.
    pub view_distance: f64,
}

impl ViewWindow {
    /// Build a window directly from its bounds.
    pub fn from_bounds(view_min: f64, view_max: f64) -> Self {
        let mut view_distance = view_max - view_min;
        if view_distance == 0.0 {
            view_distance = 1.0;
        }

        Self {
            view_min,
            view_max,
            view_distance,
        }
    }

    /// True when the underlying range was flat and the distance was forced.
    pub fn is_degenerate(&self) -> bool {
        self.view_max == self.view_min
    }
}

/// Minimum and maximum of the finite samples, in one pass.
///
/// Returns `None` when the buffer has no finite sample.
pub fn sample_range(samples: &[f32]) -> Option<(f32, f32)> {
    samples
        .iter()
        .copied()
        .filter(|s| s.is_finite())
        .fold(None, |acc, s| match acc {
            None => Some((s, s)),
            Some((lo, hi)) => Some((lo.min(s), hi.max(s))),
        })
}

/// Compute the view window for `samples`.
///
/// `start_fraction` and `end_fraction` cut into the data range; an inverted
/// pair yields a negative `view_distance`, which downstream math handles
/// consistently. Non-finite samples do not contribute to the range.
///
/// # Errors
/// `InvalidInput` for an empty buffer, a buffer with no finite samples, or a
/// non-finite fraction.
pub fn compute_window(
    samples: &[f32],
    start_fraction: f64,
    end_fraction: f64,
) -> ColorizeResult<ViewWindow> {
    if samples.is_empty() {
        return Err(ColorizeError::InvalidInput(
            "sample buffer is empty".to_string(),
        ));
    }

    if !start_fraction.is_finite() || !end_fraction.is_finite() {
        return Err(ColorizeError::InvalidInput(format!(
            "window fractions must be finite, got ({}, {})",
            start_fraction, end_fraction
        )));
    }

    let (min, max) = sample_range(samples).ok_or_else(|| {
        ColorizeError::InvalidInput("sample buffer has no finite samples".to_string())
    })?;

    let min = min as f64;
    let distance = max as f64 - min;

    let view_min = min + distance * start_fraction;
    let view_max = min + distance * end_fraction;

    Ok(ViewWindow::from_bounds(view_min, view_max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_window_matches_range() {
        let w = compute_window(&[3.0, -2.0, 7.5, 1.0], 0.0, 1.0).unwrap();
        assert_eq!(w.view_min, -2.0);
        assert_eq!(w.view_max, 7.5);
        assert_eq!(w.view_distance, 9.5);
        assert!(!w.is_degenerate());
    }

    #[test]
    fn test_partial_window() {
        let w = compute_window(&[0.0, 100.0], 0.25, 0.75).unwrap();
        assert_eq!(w.view_min, 25.0);
        assert_eq!(w.view_max, 75.0);
        assert_eq!(w.view_distance, 50.0);
    }

    #[test]
    fn test_inverted_fractions_give_negative_distance() {
        let w = compute_window(&[0.0, 10.0], 0.8, 0.2).unwrap();
        assert_eq!(w.view_min, 8.0);
        assert_eq!(w.view_max, 2.0);
        assert_eq!(w.view_distance, -6.0);
    }

    #[test]
    fn test_flat_buffer_forces_unit_distance() {
        let w = compute_window(&[4.0; 16], 0.0, 1.0).unwrap();
        assert_eq!(w.view_min, 4.0);
        assert_eq!(w.view_distance, 1.0);
        assert!(w.is_degenerate());
    }

    #[test]
    fn test_equal_fractions_are_degenerate() {
        let w = compute_window(&[0.0, 10.0], 0.5, 0.5).unwrap();
        assert_eq!(w.view_min, 5.0);
        assert_eq!(w.view_distance, 1.0);
    }

    #[test]
    fn test_non_finite_samples_ignored() {
        let w = compute_window(&[f32::NAN, 1.0, f32::INFINITY, 3.0, f32::NEG_INFINITY], 0.0, 1.0)
            .unwrap();
        assert_eq!(w.view_min, 1.0);
        assert_eq!(w.view_max, 3.0);
    }

    #[test]
    fn test_empty_buffer_rejected() {
        assert!(matches!(
            compute_window(&[], 0.0, 1.0),
            Err(ColorizeError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_all_nan_rejected() {
        assert!(matches!(
            compute_window(&[f32::NAN, f32::NAN], 0.0, 1.0),
            Err(ColorizeError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_nan_fraction_rejected() {
        assert!(compute_window(&[0.0, 1.0], f64::NAN, 1.0).is_err());
    }
}
