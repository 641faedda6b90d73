//! monosprite painting core - monochrome buffer, history and quantizer
//!
//! This crate provides the bitmap state engine of the sprite editor:
//! - [`buffer::PixelBuffer`] - The canonical 1-bit raster and its snapshots
//! - [`history::HistoryStack`] - Bounded undo/redo of snapshots
//! - [`quantize`] - BT.709 luma thresholding of RGBA imagery
//! - [`session::EditSession`] - Strokes, undo/redo and buffer replacement
//! - [`validation`] - Dimension and raster checks

pub mod buffer;
pub mod constants;
pub mod history;
pub mod quantize;
pub mod session;
pub mod types;
pub mod validation;

pub use buffer::*;
pub use constants::*;
pub use history::*;
pub use quantize::*;
pub use session::*;
pub use types::*;
pub use validation::*;
