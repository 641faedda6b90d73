//! Editor constants
//!
//! Defaults shared with the host configuration come from `monosprite-config`
//! so both crates read one set of values.

pub use monosprite_config::{DEFAULT_THRESHOLD, DEFAULT_ZOOM, MAX_ZOOM, MIN_ZOOM};

/// Number of undo levels kept before the oldest snapshot is evicted.
pub const MAX_HISTORY: usize = monosprite_config::DEFAULT_MAX_HISTORY;

/// Grid lines are only drawn from this zoom upward.
pub const GRID_MIN_ZOOM: u32 = 4;

/// Largest buffer accepted, in cells (4096 x 4096).
pub const MAX_CELLS: u64 = 1 << 24;

/// BT.709 luma weights for R, G and B.
pub const LUMA_WEIGHTS: [f64; 3] = [0.2126, 0.7152, 0.0722];
