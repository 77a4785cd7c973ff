//! Sample buffer generators.
//!
//! Buffers are row-major `Vec<f32>` of `width * height` samples, shaped like
//! the intensity planes found in telescope images.

/// Creates a grid with predictable values: `col * 1000 + row`.
///
/// ```
/// use test_utils::create_test_grid;
///
/// let grid = create_test_grid(10, 5);
/// assert_eq!(grid.len(), 50);
/// assert_eq!(grid[1], 1000.0);
/// assert_eq!(grid[10], 1.0);
/// ```
pub fn create_test_grid(width: usize, height: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push((col * 1000 + row) as f32);
        }
    }
    data
}

/// Evenly spaced samples from `min` to `max` (inclusive) in row-major order.
pub fn linear_ramp(width: usize, height: usize, min: f32, max: f32) -> Vec<f32> {
    let n = width * height;
    if n == 1 {
        return vec![min];
    }
    let step = (max - min) / (n - 1) as f32;
    (0..n).map(|i| min + step * i as f32).collect()
}

/// A buffer holding the same value everywhere.
pub fn constant_samples(width: usize, height: usize, value: f32) -> Vec<f32> {
    vec![value; width * height]
}

/// A synthetic star field: flat sky background plus Gaussian point sources.
///
/// Deterministic, so tests can compare outputs across runs.
pub fn star_field(width: usize, height: usize) -> Vec<f32> {
    const SKY: f32 = 120.0;
    // (x, y, peak, sigma) as fractions of the frame
    const STARS: [(f32, f32, f32, f32); 4] = [
        (0.25, 0.30, 4000.0, 0.02),
        (0.70, 0.60, 9000.0, 0.035),
        (0.50, 0.85, 1500.0, 0.015),
        (0.85, 0.15, 600.0, 0.01),
    ];

    let scale = width.max(height).max(1) as f32;
    let mut data = Vec::with_capacity(width * height);

    for row in 0..height {
        for col in 0..width {
            let mut value = SKY;
            for (sx, sy, peak, sigma) in STARS {
                let dx = col as f32 - sx * width as f32;
                let dy = row as f32 - sy * height as f32;
                let s = sigma * scale;
                value += peak * (-(dx * dx + dy * dy) / (2.0 * s * s)).exp();
            }
            data.push(value);
        }
    }
    data
}

/// Replace every `every`-th sample with NaN, as blank pixels in real data.
pub fn with_blanks(mut samples: Vec<f32>, every: usize) -> Vec<f32> {
    if every == 0 {
        return samples;
    }
    for (i, s) in samples.iter_mut().enumerate() {
        if i % every == 0 {
            *s = f32::NAN;
        }
    }
    samples
}
