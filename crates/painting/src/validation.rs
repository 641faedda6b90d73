use thiserror::Error;

use crate::constants::MAX_CELLS;

/// Errors raised when constructing or addressing a pixel buffer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid dimensions: {width}x{height} (both must be positive and within the cell limit)")]
    InvalidDimension { width: i64, height: i64 },
    #[error("Coordinate ({x}, {y}) outside {width}x{height} buffer")]
    OutOfBounds {
        x: i64,
        y: i64,
        width: u32,
        height: u32,
    },
    #[error("Raster size mismatch: expected {expected} bytes, got {actual}")]
    RasterSize { expected: usize, actual: usize },
}

/// Check user-supplied sprite dimensions and narrow them to `u32`.
///
/// Rejects zero, negative, values that do not fit in `u32` and sizes
/// above [`MAX_CELLS`].
pub fn validate_dimensions(width: i64, height: i64) -> Result<(u32, u32), ValidationError> {
    let err = ValidationError::InvalidDimension { width, height };
    if width <= 0 || height <= 0 {
        return Err(err);
    }
    let w = u32::try_from(width).map_err(|_| err.clone())?;
    let h = u32::try_from(height).map_err(|_| err)?;
    check_dimensions(w, h)?;
    Ok((w, h))
}

/// Check that a buffer of `width` x `height` may be allocated
pub fn check_dimensions(width: u32, height: u32) -> Result<(), ValidationError> {
    let cells = u64::from(width).checked_mul(u64::from(height));
    match cells {
        Some(n) if n > 0 && n <= MAX_CELLS => Ok(()),
        _ => Err(ValidationError::InvalidDimension {
            width: width.into(),
            height: height.into(),
        }),
    }
}

/// Number of cells for the given dimensions
pub fn cell_count(width: u32, height: u32) -> usize {
    (width as usize) * (height as usize)
}

/// Check that an RGBA byte slice matches the given dimensions
pub fn validate_rgba_len(width: u32, height: u32, rgba: &[u8]) -> Result<(), ValidationError> {
    let expected = cell_count(width, height) * 4;
    if rgba.len() != expected {
        return Err(ValidationError::RasterSize {
            expected,
            actual: rgba.len(),
        });
    }
    Ok(())
}
