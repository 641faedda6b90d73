//! View state owned by the session: zoom, grid overlay and pen color

use crate::constants::{GRID_MIN_ZOOM, MAX_ZOOM, MIN_ZOOM};
use crate::types::Cell;

use super::EditSession;

/// Clamp a zoom factor to the supported range
pub fn clamp_zoom(zoom: i64) -> u32 {
    zoom.clamp(i64::from(MIN_ZOOM), i64::from(MAX_ZOOM)) as u32
}

impl EditSession {
    pub fn zoom(&self) -> u32 {
        self.zoom
    }

    /// Set the zoom factor, clamped to `[MIN_ZOOM, MAX_ZOOM]`
    pub fn set_zoom(&mut self, zoom: i64) -> u32 {
        self.zoom = clamp_zoom(zoom);
        self.zoom
    }

    pub fn zoom_in(&mut self) -> u32 {
        self.set_zoom(i64::from(self.zoom) + 1)
    }

    pub fn zoom_out(&mut self) -> u32 {
        self.set_zoom(i64::from(self.zoom) - 1)
    }

    pub fn show_grid(&self) -> bool {
        self.show_grid
    }

    pub fn set_grid(&mut self, show: bool) {
        self.show_grid = show;
    }

    /// Flip the grid overlay, returning the new setting
    pub fn toggle_grid(&mut self) -> bool {
        self.show_grid = !self.show_grid;
        self.show_grid
    }

    /// Grid lines are drawn only when enabled and cells are large enough
    pub fn grid_visible(&self) -> bool {
        self.show_grid && self.zoom >= GRID_MIN_ZOOM
    }

    /// Color painted by the primary button
    pub fn pen(&self) -> Cell {
        self.pen
    }

    pub fn set_pen(&mut self, pen: Cell) {
        self.pen = pen;
    }

    /// Swap pen between ink and paper, returning the new pen
    pub fn toggle_pen(&mut self) -> Cell {
        self.pen = self.pen.inverse();
        self.pen
    }
}
