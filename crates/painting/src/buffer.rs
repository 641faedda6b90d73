//! Monochrome pixel buffer - one [`Cell`] per pixel, row-major

use crate::types::Cell;
use crate::validation::{ValidationError, cell_count, check_dimensions, validate_rgba_len};

/// A 1-bit raster owned by the edit session
///
/// Cells are stored row-major; `cells.len() == width * height` always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

/// Immutable copy of a buffer captured for undo/redo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistorySnapshot {
    width: u32,
    height: u32,
    cells: Box<[Cell]>,
}

impl HistorySnapshot {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

impl PixelBuffer {
    /// Create a new buffer with every cell set to paper
    pub fn new(width: u32, height: u32) -> Result<Self, ValidationError> {
        check_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            cells: vec![Cell::Paper; cell_count(width, height)],
        })
    }

    /// Build a buffer from existing cells
    pub fn from_cells(width: u32, height: u32, cells: Vec<Cell>) -> Result<Self, ValidationError> {
        check_dimensions(width, height)?;
        let expected = cell_count(width, height);
        if cells.len() != expected {
            return Err(ValidationError::RasterSize {
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Build a buffer from an RGBA raster whose pixels are already binarized,
    /// taking the red channel of each pixel as the cell value
    pub fn from_red_channel(width: u32, height: u32, rgba: &[u8]) -> Result<Self, ValidationError> {
        validate_rgba_len(width, height, rgba)?;
        let cells = rgba
            .chunks_exact(4)
            .map(|px| Cell::from_luma(px[0]))
            .collect();
        Self::from_cells(width, height, cells)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index_of(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    /// Get the cell at the given coordinates
    pub fn get(&self, x: i64, y: i64) -> Result<Cell, ValidationError> {
        self.index_of(x, y)
            .map(|index| self.cells[index])
            .ok_or(ValidationError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })
    }

    /// Set the cell at the given coordinates
    ///
    /// Out-of-bounds writes are dropped; a drag past the canvas edge is not an error.
    /// Returns whether a cell was written.
    #[inline]
    pub fn set(&mut self, x: i64, y: i64, value: Cell) -> bool {
        match self.index_of(x, y) {
            Some(index) => {
                self.cells[index] = value;
                true
            }
            None => false,
        }
    }

    /// Set every cell to the same value
    pub fn fill(&mut self, value: Cell) {
        self.cells.fill(value);
    }

    /// Count cells holding `value`
    pub fn count(&self, value: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == value).count()
    }

    /// Capture an independent copy for the history stack
    pub fn snapshot(&self) -> HistorySnapshot {
        HistorySnapshot {
            width: self.width,
            height: self.height,
            cells: self.cells.clone().into_boxed_slice(),
        }
    }

    /// Replace dimensions and content with those of a snapshot
    pub fn restore(&mut self, snapshot: &HistorySnapshot) {
        self.width = snapshot.width;
        self.height = snapshot.height;
        self.cells.clear();
        self.cells.extend_from_slice(&snapshot.cells);
    }

    /// Consume a snapshot into a live buffer
    pub fn from_snapshot(snapshot: HistorySnapshot) -> Self {
        Self {
            width: snapshot.width,
            height: snapshot.height,
            cells: snapshot.cells.into_vec(),
        }
    }

    /// Cells in row-major order
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// View the cells as 8-bit grayscale (0 = ink, 255 = paper)
    pub fn as_luma_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.cells)
    }

    /// Expand to an opaque RGBA raster at 1x scale
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut rgba = Vec::with_capacity(self.cells.len() * 4);
        for cell in &self.cells {
            let v = cell.luma();
            rgba.extend_from_slice(&[v, v, v, 255]);
        }
        rgba
    }

    /// Iterate rows of cells
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks_exact(self.width as usize)
    }
}
