use serde::{Deserialize, Serialize};

/// Value of a single cell in the monochrome raster.
///
/// The discriminants double as 8-bit luma so a cell slice can be viewed as
/// grayscale bytes without conversion.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, bytemuck::NoUninit,
)]
#[repr(u8)]
pub enum Cell {
    /// Black
    Ink = 0,
    /// White
    #[default]
    Paper = 255,
}

impl Cell {
    /// The other cell value
    #[inline]
    pub fn inverse(self) -> Self {
        match self {
            Cell::Ink => Cell::Paper,
            Cell::Paper => Cell::Ink,
        }
    }

    /// 8-bit luma of this cell (0 or 255)
    #[inline]
    pub fn luma(self) -> u8 {
        self as u8
    }

    /// Map an 8-bit channel value to a cell, splitting at the midpoint
    #[inline]
    pub fn from_luma(value: u8) -> Self {
        if value >= 128 { Cell::Paper } else { Cell::Ink }
    }

    pub fn is_ink(self) -> bool {
        self == Cell::Ink
    }
}

/// Pointer button driving a stroke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum StrokeButton {
    /// Paints with the current pen color
    Primary = 0,
    /// Paints with the inverse of the pen color
    Secondary = 1,
}

impl StrokeButton {
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}
