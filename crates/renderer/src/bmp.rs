//! BMP encoding.
//!
//! Writes 32-bit uncompressed (`BI_RGB`) bitmaps. BMP stores channels as
//! `[B, G, R, A]` and rows bottom-up, so the first pixel row of the buffer
//! becomes the bottom row of the picture. That matches FITS, whose first
//! row is the lower edge of the image.

use colorizer::PackedPixel;

use crate::error::{RenderError, RenderResult};

const FILE_HEADER_LEN: u32 = 14;
const INFO_HEADER_LEN: u32 = 40;

/// 72 DPI in pixels per metre.
const PIXELS_PER_METRE: i32 = 2835;

/// Reorder a pixel's bytes from `[R, G, B, A]` to `[B, G, R, A]`.
#[inline(always)]
pub fn swap_red_blue(pixel: PackedPixel) -> [u8; 4] {
    let [r, g, b, a] = pixel.to_bytes();
    [b, g, r, a]
}

/// Encode tightly packed pixels as a BMP file.
pub fn encode_bmp(pixels: &[PackedPixel], width: usize, height: usize) -> RenderResult<Vec<u8>> {
    if pixels.len() != width * height {
        return Err(RenderError::InvalidLayout(format!(
            "{} pixels do not form a {}x{} image",
            pixels.len(),
            width,
            height
        )));
    }

    let w = i32::try_from(width)
        .map_err(|_| RenderError::InvalidLayout(format!("width {} too large for BMP", width)))?;
    let h = i32::try_from(height)
        .map_err(|_| RenderError::InvalidLayout(format!("height {} too large for BMP", height)))?;

    let image_len = u32::try_from(pixels.len() * 4)
        .map_err(|_| RenderError::InvalidLayout("image too large for BMP".to_string()))?;
    let data_offset = FILE_HEADER_LEN + INFO_HEADER_LEN;
    let file_len = data_offset
        .checked_add(image_len)
        .ok_or_else(|| RenderError::InvalidLayout("image too large for BMP".to_string()))?;

    let mut bmp = Vec::with_capacity(file_len as usize);

    // BITMAPFILEHEADER
    bmp.extend_from_slice(b"BM");
    bmp.extend_from_slice(&file_len.to_le_bytes());
    bmp.extend_from_slice(&0u32.to_le_bytes()); // reserved
    bmp.extend_from_slice(&data_offset.to_le_bytes());

    // BITMAPINFOHEADER
    bmp.extend_from_slice(&INFO_HEADER_LEN.to_le_bytes());
    bmp.extend_from_slice(&w.to_le_bytes());
    bmp.extend_from_slice(&h.to_le_bytes()); // positive = bottom-up
    bmp.extend_from_slice(&1u16.to_le_bytes()); // planes
    bmp.extend_from_slice(&32u16.to_le_bytes()); // bits per pixel
    bmp.extend_from_slice(&0u32.to_le_bytes()); // BI_RGB
    bmp.extend_from_slice(&image_len.to_le_bytes());
    bmp.extend_from_slice(&PIXELS_PER_METRE.to_le_bytes());
    bmp.extend_from_slice(&PIXELS_PER_METRE.to_le_bytes());
    bmp.extend_from_slice(&0u32.to_le_bytes()); // palette colors
    bmp.extend_from_slice(&0u32.to_le_bytes()); // important colors

    // 32-bit rows are always 4-byte aligned, no row padding
    for pixel in pixels {
        bmp.extend_from_slice(&swap_red_blue(*pixel));
    }

    Ok(bmp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swap_red_blue() {
        let p = PackedPixel::from_rgba(1, 2, 3, 4);
        assert_eq!(swap_red_blue(p), [3, 2, 1, 4]);
    }

    #[test]
    fn test_header_fields() {
        let pixels = vec![PackedPixel::from_rgba(10, 20, 30, 255); 6];
        let bmp = encode_bmp(&pixels, 3, 2).unwrap();

        assert_eq!(&bmp[0..2], b"BM");
        assert_eq!(u32::from_le_bytes(bmp[2..6].try_into().unwrap()), 54 + 24);
        assert_eq!(u32::from_le_bytes(bmp[10..14].try_into().unwrap()), 54);
        assert_eq!(i32::from_le_bytes(bmp[18..22].try_into().unwrap()), 3);
        assert_eq!(i32::from_le_bytes(bmp[22..26].try_into().unwrap()), 2);
        assert_eq!(u16::from_le_bytes(bmp[28..30].try_into().unwrap()), 32);
        assert_eq!(bmp.len(), 78);
        assert_eq!(&bmp[54..58], &[30, 20, 10, 255]);
    }

    #[test]
    fn test_rejects_mismatched_length() {
        let pixels = vec![PackedPixel::default(); 5];
        assert!(encode_bmp(&pixels, 3, 2).is_err());
    }
}
