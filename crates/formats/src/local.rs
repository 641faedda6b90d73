//! In-process format bridge

use monosprite_ipc::{ExportFormat, ExportRequest, ExportResponse, ImportRequest, ImportResponse};
use painting::{DEFAULT_THRESHOLD, PixelBuffer, quantize};
use tokio::task::JoinError;
use tracing::{debug, info};

use crate::png::ThresholdSource;
use crate::{FormatBridge, FormatError, pbm};

/// Exported rasters are already 0/255, so any midpoint cutoff binarizes them
const EXPORT_CUTOFF: f64 = 128.0;

/// Bridge that runs every codec in-process on the blocking thread pool
#[derive(Debug, Clone)]
pub struct LocalBridge {
    default_threshold: f64,
}

impl Default for LocalBridge {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl LocalBridge {
    /// Create a bridge that thresholds color imports at `default_threshold`
    /// unless a request carries its own cutoff
    pub fn new(default_threshold: f64) -> Self {
        Self { default_threshold }
    }

    pub fn default_threshold(&self) -> f64 {
        self.default_threshold
    }
}

impl FormatBridge for LocalBridge {
    async fn export(&self, request: ExportRequest) -> Result<ExportResponse, FormatError> {
        tokio::task::spawn_blocking(move || encode_export(&request))
            .await
            .map_err(|e| join_error(e, FormatError::ExportFailed))?
    }

    async fn import(&self, request: ImportRequest) -> Result<ImportResponse, FormatError> {
        let default_threshold = self.default_threshold;
        tokio::task::spawn_blocking(move || decode_import_file(&request, default_threshold))
            .await
            .map_err(|e| join_error(e, FormatError::ImportFailed))?
    }
}

fn join_error(err: JoinError, wrap: fn(String) -> FormatError) -> FormatError {
    if err.is_cancelled() {
        FormatError::Cancelled
    } else {
        wrap(err.to_string())
    }
}

/// Serialize an export request synchronously
pub fn encode_export(request: &ExportRequest) -> Result<ExportResponse, FormatError> {
    let buffer = quantize(request.width, request.height, &request.raster, EXPORT_CUTOFF)
        .map_err(|e| FormatError::ExportFailed(e.to_string()))?;

    let bytes = match request.format {
        ExportFormat::PbmAscii => pbm::encode_ascii(&buffer),
        ExportFormat::PbmBinary => {
            pbm::encode_binary(&buffer).map_err(|e| FormatError::ExportFailed(e.to_string()))?
        }
        ExportFormat::Png => {
            let scale = request.scale_factor.unwrap_or(1).max(1);
            crate::png::encode(&buffer, scale)
                .map_err(|e| FormatError::ExportFailed(e.to_string()))?
        }
    };
    info!(
        "Exported {}x{} sprite as {:?} ({} bytes)",
        buffer.width(),
        buffer.height(),
        request.format,
        bytes.len()
    );

    Ok(ExportResponse {
        bytes,
        mime_type: request.format.mime_type().to_string(),
        file_name: request.format.file_name().to_string(),
    })
}

fn is_png_name(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case("png"))
}

/// Decode an import request synchronously
///
/// `.png` files are flattened onto white and thresholded. Portable bitmaps
/// are read bit-exact. Any other image the decoder understands is flattened
/// and dithered; the cutoff does not apply to it.
pub fn decode_import_file(
    request: &ImportRequest,
    default_threshold: f64,
) -> Result<ImportResponse, FormatError> {
    let cutoff = request.threshold.unwrap_or(default_threshold);
    let bytes = &request.file_bytes;

    let buffer: PixelBuffer = if is_png_name(&request.file_name) {
        debug!("Import {:?}: PNG, cutoff {}", request.file_name, cutoff);
        ThresholdSource::decode(bytes)
            .map_err(|e| FormatError::ImportFailed(e.to_string()))?
            .quantize(cutoff)?
    } else if pbm::detect(bytes).is_some() {
        debug!("Import {:?}: portable bitmap", request.file_name);
        pbm::decode(bytes).map_err(|e| FormatError::ImportFailed(e.to_string()))?
    } else {
        debug!("Import {:?}: generic image, dithered", request.file_name);
        let image = image::load_from_memory(bytes)
            .map_err(|e| FormatError::ImportFailed(e.to_string()))?
            .to_rgba8();
        ThresholdSource::from_rgba(image.width(), image.height(), image.as_raw()).dither()?
    };

    let png = crate::png::encode(&buffer, 1).map_err(|e| FormatError::ImportFailed(e.to_string()))?;
    info!(
        "Decoded {:?} into {}x{} sprite",
        request.file_name,
        buffer.width(),
        buffer.height()
    );
    Ok(ImportResponse {
        width: buffer.width(),
        height: buffer.height(),
        png,
    })
}
