//! Packed 32-bit pixels.
//!
//! A [`PackedPixel`] holds four channel bytes in the fixed order
//! `[R, G, B, A]`. The order is a byte-position contract: byte 0 is always
//! red regardless of how the host lays out a `u32`.

/// Maximum channel value, used for opaque alpha and full-intensity channels.
pub const CHANNEL_MAX: u8 = u8::MAX;

/// Byte offsets of each channel inside a packed pixel.
pub const RED: usize = 0;
pub const GREEN: usize = 1;
pub const BLUE: usize = 2;
pub const ALPHA: usize = 3;

/// One RGBA pixel stored as four bytes in `[R, G, B, A]` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct PackedPixel([u8; 4]);

impl PackedPixel {
    /// Pack an RGB triple. Alpha is left at zero; the engine sets it
    /// after the ramp runs.
    #[inline(always)]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 0])
    }

    #[inline(always)]
    pub const fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    #[inline(always)]
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Same color with the alpha byte forced to 255.
    #[inline(always)]
    pub const fn opaque(self) -> Self {
        let [r, g, b, _] = self.0;
        Self([r, g, b, CHANNEL_MAX])
    }

    #[inline(always)]
    pub const fn r(self) -> u8 {
        self.0[RED]
    }

    #[inline(always)]
    pub const fn g(self) -> u8 {
        self.0[GREEN]
    }

    #[inline(always)]
    pub const fn b(self) -> u8 {
        self.0[BLUE]
    }

    #[inline(always)]
    pub const fn a(self) -> u8 {
        self.0[ALPHA]
    }

    /// RGB channels without alpha.
    #[inline(always)]
    pub const fn rgb(self) -> (u8, u8, u8) {
        (self.0[RED], self.0[GREEN], self.0[BLUE])
    }

    /// Channel bytes in `[R, G, B, A]` order.
    #[inline(always)]
    pub const fn to_bytes(self) -> [u8; 4] {
        self.0
    }

    /// The pixel as a native-endian `u32` whose in-memory bytes are
    /// `[R, G, B, A]`. The integer value differs between hosts; the byte
    /// layout does not.
    #[inline(always)]
    pub const fn to_u32_ne(self) -> u32 {
        u32::from_ne_bytes(self.0)
    }
}

impl From<[u8; 4]> for PackedPixel {
    fn from(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }
}

impl From<PackedPixel> for [u8; 4] {
    fn from(pixel: PackedPixel) -> Self {
        pixel.0
    }
}

/// Flatten a pixel slice into its `[R, G, B, A, R, G, B, A, ...]` bytes.
pub fn pixels_to_bytes(pixels: &[PackedPixel]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(pixels.len() * 4);
    for pixel in pixels {
        bytes.extend_from_slice(&pixel.0);
    }
    bytes
}
