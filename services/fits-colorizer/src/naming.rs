//! Output file names.

use std::path::Path;

use colorizer::ColorizeMode;
use renderer::RasterFormat;

/// `{input file name}_{plane index}_{mode}_{stripes}.{ext}`
///
/// Only the file name of `input` is kept, so outputs land wherever the
/// caller joins them. Whole stripe counts print without a decimal point.
///
/// ```
/// use colorizer::ColorizeMode;
/// use fits_colorizer::output_file_name;
/// use renderer::RasterFormat;
///
/// let name = output_file_name("data/m31.fits", 0, ColorizeMode::Greyscale, 10.0, RasterFormat::Bmp);
/// assert_eq!(name, "m31.fits_0_greyscale_10.bmp");
/// ```
pub fn output_file_name(
    input: &str,
    plane_index: usize,
    mode: ColorizeMode,
    stripe_num: f64,
    format: RasterFormat,
) -> String {
    let base = Path::new(input)
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_else(|| input.into());

    format!(
        "{}_{}_{}_{}.{}",
        base,
        plane_index,
        mode.name(),
        stripe_num,
        format.extension()
    )
}
