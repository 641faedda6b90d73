//! Luma-threshold quantization of RGBA rasters into monochrome buffers
//!
//! Luma uses the ITU-R BT.709 weights: `0.2126 R + 0.7152 G + 0.0722 B`.
//! A pixel whose luma is greater than or equal to the cutoff becomes paper.

use crate::buffer::PixelBuffer;
use crate::constants::{DEFAULT_THRESHOLD, LUMA_WEIGHTS};
use crate::types::Cell;
use crate::validation::{ValidationError, validate_rgba_len};

/// BT.709 luma of an 8-bit RGB triple
///
/// Evaluated in `f64`, left to right. Most gray levels map exactly to their
/// own value (`luma(128, 128, 128) == 128.0`), but rounding leaves some just
/// below it (`luma(255, 255, 255)` is `254.99999999999997`), so such a gray
/// at a cutoff equal to its level reads as ink.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> f64 {
    LUMA_WEIGHTS[0] * f64::from(r) + LUMA_WEIGHTS[1] * f64::from(g) + LUMA_WEIGHTS[2] * f64::from(b)
}

/// Clamp a cutoff into `[0, 255]`, mapping NaN to the default
pub fn sanitize_cutoff(cutoff: f64) -> f64 {
    if cutoff.is_nan() {
        DEFAULT_THRESHOLD
    } else {
        cutoff.clamp(0.0, 255.0)
    }
}

/// Binarize a single pixel
#[inline]
pub fn threshold_pixel(r: u8, g: u8, b: u8, cutoff: f64) -> Cell {
    if luma(r, g, b) >= cutoff {
        Cell::Paper
    } else {
        Cell::Ink
    }
}

/// Convert an RGBA raster into a monochrome buffer of the same size
///
/// Alpha is ignored; flatten first with [`flatten_alpha`] if transparency
/// should read as white. Pure: identical inputs always give identical output,
/// so it can be called repeatedly for a live preview.
pub fn quantize(
    width: u32,
    height: u32,
    rgba: &[u8],
    cutoff: f64,
) -> Result<PixelBuffer, ValidationError> {
    validate_rgba_len(width, height, rgba)?;
    let cutoff = sanitize_cutoff(cutoff);
    let pixels: &[[u8; 4]] = bytemuck::cast_slice(rgba);
    let cells = pixels
        .iter()
        .map(|&[r, g, b, _]| threshold_pixel(r, g, b, cutoff))
        .collect();
    PixelBuffer::from_cells(width, height, cells)
}

/// Composite every pixel over opaque white, returning a fully opaque raster
pub fn flatten_alpha(rgba: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(rgba.len());
    for px in rgba.chunks_exact(4) {
        let a = u32::from(px[3]);
        for &c in &px[..3] {
            let blended = (u32::from(c) * a + 255 * (255 - a) + 127) / 255;
            out.push(blended as u8);
        }
        out.push(255);
    }
    out
}
