//! Request and response shapes of the format bridge.

use serde::{Deserialize, Serialize};

use crate::commands::ExportFormat;

/// Request to serialize the current sprite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRequest {
    pub width: u32,
    pub height: u32,
    /// RGBA pixels at 1x scale, row-major
    pub raster: Vec<u8>,
    pub format: ExportFormat,
    /// Integer upscale for the PNG preview (1 when absent)
    pub scale_factor: Option<u32>,
}

/// Serialized sprite returned by the bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportResponse {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub file_name: String,
}

/// Request to decode an image file into a monochrome sprite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportRequest {
    pub file_bytes: Vec<u8>,
    pub file_name: String,
    /// Luma cutoff for color/grayscale sources (128 when absent)
    pub threshold: Option<f64>,
}

/// Decoded sprite returned by the bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportResponse {
    pub width: u32,
    pub height: u32,
    /// Grayscale PNG whose pixels are exactly 0 or 255
    pub png: Vec<u8>,
}
