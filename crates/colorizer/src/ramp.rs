//! Color ramps: the five percent-to-color policies.
//!
//! Every ramp is a pure function of `percent ∈ [0, 1]` producing an RGB
//! triple. Ramps never set alpha; [`crate::colorize`] forces it to 255 after
//! the ramp runs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ColorizeError;
use crate::pixel::{PackedPixel, CHANNEL_MAX};

/// Largest value representable in three color bytes.
const RGB24_MAX: f64 = (u32::MAX >> 8) as f64;

/// Largest value representable in two color bytes.
const RGB16_MAX: f64 = (u32::MAX >> 16) as f64;

/// Width of one ROYGBIV segment in percent space.
const RAINBOW_SEGMENT: f64 = 0.20;

/// Selectable color ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ColorizeMode {
    /// Linear projection of percent onto the 24-bit RGB space.
    #[default]
    #[serde(rename = "nickrgb")]
    NickRgb,
    /// Linear projection onto 16 bits (red and green bytes only).
    #[serde(rename = "snrgb", alias = "shortnrgb")]
    ShortNRgb,
    /// Inverted six-segment rainbow, red (high) to magenta (low).
    #[serde(rename = "roygbiv")]
    Roygbiv,
    #[serde(rename = "greyscale", alias = "grayscale")]
    Greyscale,
    /// Black below the 0.5 midpoint, white above.
    #[serde(rename = "binary")]
    Binary,
}

impl ColorizeMode {
    /// Every mode, in declaration order.
    pub const ALL: [ColorizeMode; 5] = [
        ColorizeMode::NickRgb,
        ColorizeMode::ShortNRgb,
        ColorizeMode::Roygbiv,
        ColorizeMode::Greyscale,
        ColorizeMode::Binary,
    ];

    /// Short lowercase name used in output file names.
    pub fn name(self) -> &'static str {
        match self {
            ColorizeMode::NickRgb => "nickrgb",
            ColorizeMode::ShortNRgb => "snrgb",
            ColorizeMode::Roygbiv => "roygbiv",
            ColorizeMode::Greyscale => "greyscale",
            ColorizeMode::Binary => "binary",
        }
    }

    /// Apply this mode's ramp. Alpha of the result is zero.
    #[inline]
    pub fn ramp(self, percent: f64) -> PackedPixel {
        match self {
            ColorizeMode::NickRgb => nick_rgb(percent),
            ColorizeMode::ShortNRgb => short_nrgb(percent),
            ColorizeMode::Roygbiv => roygbiv(percent),
            ColorizeMode::Greyscale => greyscale(percent),
            ColorizeMode::Binary => binary(percent),
        }
    }
}

impl fmt::Display for ColorizeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorizeMode {
    type Err = ColorizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nickrgb" => Ok(ColorizeMode::NickRgb),
            "snrgb" | "shortnrgb" => Ok(ColorizeMode::ShortNRgb),
            "roygbiv" => Ok(ColorizeMode::Roygbiv),
            "greyscale" | "grayscale" => Ok(ColorizeMode::Greyscale),
            "binary" => Ok(ColorizeMode::Binary),
            other => Err(ColorizeError::UnknownMode(other.to_string())),
        }
    }
}

/// Split a linear value into little-significance-first color bytes:
/// byte 0 (red) is the least significant, byte 2 (blue) the most.
#[inline(always)]
fn linear_bytes(value: u32) -> PackedPixel {
    let [lo, mid, hi, _] = value.to_le_bytes();
    PackedPixel::from_rgb(lo, mid, hi)
}

/// 24-bit linear projection.
pub fn nick_rgb(percent: f64) -> PackedPixel {
    linear_bytes((RGB24_MAX * percent) as u32)
}

/// 16-bit linear projection; blue stays zero.
pub fn short_nrgb(percent: f64) -> PackedPixel {
    linear_bytes((RGB16_MAX * percent) as u32)
}

/// Short rainbow, inverted so that high percents are red.
pub fn roygbiv(percent: f64) -> PackedPixel {
    let a = (1.0 - percent) / RAINBOW_SEGMENT;
    let segment = a.floor();
    let y = (255.0 * (a - segment)).floor() as u8;

    let (r, g, b) = match segment as i64 {
        i64::MIN..=0 => (CHANNEL_MAX, y, 0),     // red -> yellow
        1 => (CHANNEL_MAX - y, CHANNEL_MAX, 0),  // yellow -> green
        2 => (0, CHANNEL_MAX, y),                // green -> cyan
        3 => (0, CHANNEL_MAX - y, CHANNEL_MAX),  // cyan -> blue
        4 => (y, 0, CHANNEL_MAX),                // blue -> magenta
        _ => (CHANNEL_MAX, 0, CHANNEL_MAX),      // magenta
    };

    PackedPixel::from_rgb(r, g, b)
}

pub fn greyscale(percent: f64) -> PackedPixel {
    let gray = (CHANNEL_MAX as f64 * percent) as u8;
    PackedPixel::from_rgb(gray, gray, gray)
}

/// Threshold at the midpoint into pure black or white.
pub fn binary(percent: f64) -> PackedPixel {
    let bit = percent.round() as u8;
    let gray = CHANNEL_MAX * bit.min(1);
    PackedPixel::from_rgb(gray, gray, gray)
}
