//! Shared configuration for monosprite
//!
//! This crate is the single source of truth for the editor defaults used by
//! the painting core and the session host: starting canvas size, zoom, grid,
//! pen, import threshold and history depth.

use serde::{Deserialize, Serialize};

/// Default sprite width in cells
pub const DEFAULT_WIDTH: u32 = 16;

/// Default sprite height in cells
pub const DEFAULT_HEIGHT: u32 = 16;

/// Default zoom (screen pixels per cell)
pub const DEFAULT_ZOOM: u32 = 20;

/// Zoom range accepted by the editor
pub const MIN_ZOOM: u32 = 1;
pub const MAX_ZOOM: u32 = 64;

/// Default luma cutoff for PNG import
pub const DEFAULT_THRESHOLD: f64 = 128.0;

/// Default number of undo levels
pub const DEFAULT_MAX_HISTORY: usize = 100;

/// Editor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Starting sprite width in cells
    pub width: u32,
    /// Starting sprite height in cells
    pub height: u32,
    /// Starting zoom
    pub zoom: u32,
    /// Whether the grid overlay starts enabled
    pub show_grid: bool,
    /// Primary button paints black when true, white when false
    pub pen_black: bool,
    /// Luma cutoff applied to PNG imports (0-255, white side inclusive)
    pub threshold: f64,
    /// Undo levels kept before the oldest is dropped
    pub max_history: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            zoom: DEFAULT_ZOOM,
            show_grid: true,
            pen_black: true,
            threshold: DEFAULT_THRESHOLD,
            max_history: DEFAULT_MAX_HISTORY,
        }
    }
}

impl EditorConfig {
    /// Create a config with the given starting size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Bring every field into its valid range
    ///
    /// Zero sizes fall back to the defaults, zoom and threshold are clamped,
    /// a NaN threshold becomes the default and history keeps at least one level.
    pub fn sanitized(mut self) -> Self {
        if self.width == 0 {
            self.width = DEFAULT_WIDTH;
        }
        if self.height == 0 {
            self.height = DEFAULT_HEIGHT;
        }
        self.zoom = self.zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        self.threshold = if self.threshold.is_nan() {
            DEFAULT_THRESHOLD
        } else {
            self.threshold.clamp(0.0, 255.0)
        };
        self.max_history = self.max_history.max(1);
        self
    }
}
