//! Format bridge for monosprite
//!
//! Converts between the in-memory sprite and file bytes: portable bitmap
//! (P1/P4) in both directions, PNG import with threshold binarization, and
//! scaled PNG preview export.

mod local;
pub mod pbm;
pub mod png;

pub use local::LocalBridge;

use monosprite_ipc::{ExportFormat, ExportRequest, ExportResponse, ImportRequest, ImportResponse};
use painting::{PixelBuffer, ValidationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("Import failed: {0}")]
    ImportFailed(String),

    #[error("Export failed: {0}")]
    ExportFailed(String),

    #[error("Cancelled")]
    Cancelled,
}

impl FormatError {
    /// Stable short code for front-end error reporting
    pub fn code(&self) -> &'static str {
        match self {
            FormatError::ImportFailed(_) => "import_failed",
            FormatError::ExportFailed(_) => "export_failed",
            FormatError::Cancelled => "cancelled",
        }
    }
}

/// Trait for format bridges
///
/// A failed or cancelled round trip returns an error and must not be applied;
/// the caller's session stays exactly as it was.
#[allow(async_fn_in_trait)]
pub trait FormatBridge {
    /// Serialize a 1x RGBA raster into the requested format
    async fn export(&self, request: ExportRequest) -> Result<ExportResponse, FormatError>;

    /// Decode a file into a binarized image
    async fn import(&self, request: ImportRequest) -> Result<ImportResponse, FormatError>;
}

/// Build an export request from the live buffer
///
/// `zoom` becomes the scale factor for the PNG preview; bitmap formats are
/// always written at 1x.
pub fn export_request(buffer: &PixelBuffer, format: ExportFormat, zoom: u32) -> ExportRequest {
    ExportRequest {
        width: buffer.width(),
        height: buffer.height(),
        raster: buffer.to_rgba(),
        format,
        scale_factor: format.is_scaled().then_some(zoom),
    }
}

/// Turn an import response into a buffer, taking the red channel of each pixel
pub fn decode_import(response: &ImportResponse) -> Result<PixelBuffer, FormatError> {
    let buffer = png::decode_binarized(&response.png)
        .map_err(|e| FormatError::ImportFailed(e.to_string()))?;
    if buffer.width() != response.width || buffer.height() != response.height {
        return Err(FormatError::ImportFailed(format!(
            "image is {}x{} but response claims {}x{}",
            buffer.width(),
            buffer.height(),
            response.width,
            response.height
        )));
    }
    Ok(buffer)
}

impl From<ValidationError> for FormatError {
    fn from(err: ValidationError) -> Self {
        FormatError::ImportFailed(err.to_string())
    }
}
