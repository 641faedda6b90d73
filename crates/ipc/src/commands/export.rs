//! Export format selection.

use serde::{Deserialize, Serialize};

/// Output format for an export request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    /// Portable bitmap, ASCII variant (P1)
    PbmAscii,
    /// Portable bitmap, packed binary variant (P4)
    PbmBinary,
    /// PNG preview scaled by the current zoom
    Png,
}

impl ExportFormat {
    /// Default download name for this format
    pub fn file_name(self) -> &'static str {
        match self {
            ExportFormat::PbmAscii => "sprite_p1.pbm",
            ExportFormat::PbmBinary => "sprite.pbm",
            ExportFormat::Png => "sprite_preview.png",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::PbmAscii | ExportFormat::PbmBinary => "image/x-portable-bitmap",
            ExportFormat::Png => "image/png",
        }
    }

    /// Whether the exported image is scaled by the zoom factor
    pub fn is_scaled(self) -> bool {
        matches!(self, ExportFormat::Png)
    }
}
