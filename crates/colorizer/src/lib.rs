//! Float-space pixel colorization.
//!
//! Maps buffers of floating-point intensity samples to packed RGBA pixels:
//! - View window: cut a sub-range out of the data's min/max
//! - Stripes: split the window into periodic bands (sawtooth remap)
//! - Ramps: five closed percent-to-color policies
//!
//! ```
//! use colorizer::{colorize, ColorizeMode, ColorizeParams};
//!
//! let samples = [0.0, 0.5, 1.0];
//! let pixels = colorize(&samples, &ColorizeParams::new(ColorizeMode::Greyscale)).unwrap();
//! assert_eq!(pixels[1].to_bytes(), [127, 127, 127, 255]);
//! ```

pub mod colorize;
pub mod error;
pub mod io;
pub mod pixel;
pub mod ramp;
pub mod stripe;
pub mod window;

pub use colorize::{colorize, colorize_into, colorize_with_window, ColorizeParams};
pub use error::{ColorizeError, ColorizeResult};
pub use io::{ImagePlane, ImageSink, ImageSource};
pub use pixel::{pixels_to_bytes, PackedPixel};
pub use ramp::ColorizeMode;
pub use stripe::{remap, StripeMap};
pub use window::{compute_window, ViewWindow};
