//! PNG encoding for colorized pixel buffers.
//!
//! Supports two encoding modes:
//! - **Indexed PNG (color type 3)**: Used when image has ≤256 unique colors,
//!   which covers every greyscale and binary rendering.
//! - **RGBA PNG (color type 6)**: Fallback for images with >256 colors.
//!
//! PNG rows run top-down, so scanlines are emitted last buffer row first to
//! keep the buffer's first row at the bottom of the picture, as in BMP.

use rayon::prelude::*;
use std::collections::HashMap;
use std::io::Write;

use colorizer::PackedPixel;

use crate::error::{RenderError, RenderResult};

/// Maximum colors for indexed PNG (PNG8)
const MAX_PALETTE_SIZE: usize = 256;

/// Minimum pixels to benefit from parallel palette extraction
const PARALLEL_THRESHOLD: usize = 4096; // 64x64 or larger

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Create a PNG image with automatic format selection.
///
/// - If ≤256 unique colors: uses indexed PNG (smaller, faster)
/// - Otherwise: uses RGBA PNG (full color)
pub fn create_png_auto(pixels: &[PackedPixel], width: usize, height: usize) -> RenderResult<Vec<u8>> {
    check_len(pixels, width, height)?;

    let palette_result = if pixels.len() >= PARALLEL_THRESHOLD {
        extract_palette_parallel(pixels)
    } else {
        extract_palette_sequential(pixels)
    };

    match palette_result {
        Some((palette, indices)) => create_png_indexed(width, height, &palette, &indices),
        None => create_png(pixels, width, height),
    }
}

fn check_len(pixels: &[PackedPixel], width: usize, height: usize) -> RenderResult<()> {
    check_dimensions(width, height)?;
    if pixels.len() != width * height {
        return Err(RenderError::InvalidLayout(format!(
            "{} pixels do not form a {}x{} image",
            pixels.len(),
            width,
            height
        )));
    }
    Ok(())
}

fn check_dimensions(width: usize, height: usize) -> RenderResult<()> {
    if width == 0 || height == 0 {
        return Err(RenderError::InvalidLayout(format!(
            "image must be at least 1x1, got {}x{}",
            width, height
        )));
    }
    if u32::try_from(width).is_err() || u32::try_from(height).is_err() {
        return Err(RenderError::InvalidLayout(format!(
            "{}x{} exceeds PNG dimension limits",
            width, height
        )));
    }
    Ok(())
}

/// Sequential palette extraction for small images.
fn extract_palette_sequential(pixels: &[PackedPixel]) -> Option<(Vec<PackedPixel>, Vec<u8>)> {
    let mut color_to_index: HashMap<PackedPixel, u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut palette: Vec<PackedPixel> = Vec::with_capacity(MAX_PALETTE_SIZE);
    let mut indices: Vec<u8> = Vec::with_capacity(pixels.len());

    for &pixel in pixels {
        let index = match color_to_index.get(&pixel) {
            Some(&idx) => idx,
            None => {
                if palette.len() >= MAX_PALETTE_SIZE {
                    return None;
                }
                let idx = palette.len() as u8;
                palette.push(pixel);
                color_to_index.insert(pixel, idx);
                idx
            }
        };
        indices.push(index);
    }

    Some((palette, indices))
}

/// Parallel palette extraction for larger images.
///
/// 1. Parallel pass: collect unique colors per chunk
/// 2. Merge and check the count is ≤256
/// 3. Parallel pass: map each pixel to its palette index
fn extract_palette_parallel(pixels: &[PackedPixel]) -> Option<(Vec<PackedPixel>, Vec<u8>)> {
    let chunk_size = (pixels.len() / rayon::current_num_threads()).max(256);

    let unique_colors: Vec<PackedPixel> = pixels
        .par_chunks(chunk_size)
        .flat_map(|chunk| {
            let mut local_colors: HashMap<PackedPixel, ()> = HashMap::with_capacity(MAX_PALETTE_SIZE);
            for &pixel in chunk {
                local_colors.insert(pixel, ());
                // Early exit if we definitely have too many colors
                if local_colors.len() > MAX_PALETTE_SIZE {
                    break;
                }
            }
            local_colors.into_keys().collect::<Vec<_>>()
        })
        .collect();

    let mut global_colors: HashMap<PackedPixel, u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut palette: Vec<PackedPixel> = Vec::with_capacity(MAX_PALETTE_SIZE);

    for pixel in unique_colors {
        if !global_colors.contains_key(&pixel) {
            if palette.len() >= MAX_PALETTE_SIZE {
                return None;
            }
            global_colors.insert(pixel, palette.len() as u8);
            palette.push(pixel);
        }
    }

    let mut indices = vec![0u8; pixels.len()];
    indices
        .par_chunks_mut(chunk_size)
        .zip(pixels.par_chunks(chunk_size))
        .for_each(|(idx_chunk, px_chunk)| {
            for (idx, pixel) in idx_chunk.iter_mut().zip(px_chunk) {
                *idx = global_colors.get(pixel).copied().unwrap_or(0);
            }
        });

    Some((palette, indices))
}

/// Create an indexed PNG (color type 3) from palette and indices.
pub fn create_png_indexed(
    width: usize,
    height: usize,
    palette: &[PackedPixel],
    indices: &[u8],
) -> RenderResult<Vec<u8>> {
    check_dimensions(width, height)?;
    if indices.len() != width * height {
        return Err(RenderError::InvalidLayout(format!(
            "{} indices do not form a {}x{} image",
            indices.len(),
            width,
            height
        )));
    }

    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);

    write_chunk(&mut png, b"IHDR", &ihdr(width, height, 3));

    // PLTE chunk (palette)
    let mut plte_data = Vec::with_capacity(palette.len() * 3);
    for pixel in palette {
        let (r, g, b) = pixel.rgb();
        plte_data.extend_from_slice(&[r, g, b]);
    }
    write_chunk(&mut png, b"PLTE", &plte_data);

    // tRNS chunk only if any color has alpha < 255
    if palette.iter().any(|p| p.a() < 255) {
        let trns_data: Vec<u8> = palette.iter().map(|p| p.a()).collect();
        write_chunk(&mut png, b"tRNS", &trns_data);
    }

    let idat_data = deflate_scanlines(indices, width, height)
        .map_err(|e| RenderError::EncodeError(format!("IDAT compression failed: {}", e)))?;
    write_chunk(&mut png, b"IDAT", &idat_data);

    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

/// Create a PNG image from pixels (color type 6).
pub fn create_png(pixels: &[PackedPixel], width: usize, height: usize) -> RenderResult<Vec<u8>> {
    check_len(pixels, width, height)?;

    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);

    write_chunk(&mut png, b"IHDR", &ihdr(width, height, 6));

    let bytes = colorizer::pixels_to_bytes(pixels);
    let idat_data = deflate_scanlines(&bytes, width * 4, height)
        .map_err(|e| RenderError::EncodeError(format!("IDAT compression failed: {}", e)))?;
    write_chunk(&mut png, b"IDAT", &idat_data);

    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

fn ihdr(width: usize, height: usize, color_type: u8) -> Vec<u8> {
    let mut ihdr_data = Vec::with_capacity(13);
    ihdr_data.extend_from_slice(&(width as u32).to_be_bytes());
    ihdr_data.extend_from_slice(&(height as u32).to_be_bytes());
    ihdr_data.push(8); // bit depth
    ihdr_data.push(color_type);
    ihdr_data.push(0); // compression method
    ihdr_data.push(0); // filter method
    ihdr_data.push(0); // interlace method
    ihdr_data
}

/// Write a PNG chunk
fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

/// Deflate `height` rows of `row_len` bytes, last row first, each prefixed
/// with filter type 0.
fn deflate_scanlines(data: &[u8], row_len: usize, height: usize) -> std::io::Result<Vec<u8>> {
    let mut uncompressed = Vec::with_capacity(height * (1 + row_len));
    for row in data.chunks_exact(row_len).rev() {
        uncompressed.push(0); // filter type: none
        uncompressed.extend_from_slice(row);
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder.write_all(&uncompressed)?;
    encoder.finish()
}
