//! One-shot conversions outside of an interactive session

use std::path::Path;

use clap::ValueEnum;
use monosprite_formats::{FormatBridge, FormatError, LocalBridge, export_request};
use monosprite_ipc::ExportFormat;
use painting::{Cell, PixelBuffer};
use tracing::info;

use crate::host::import_file;

/// Output format selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// ASCII portable bitmap
    P1,
    /// Binary portable bitmap
    P4,
    /// Grayscale PNG scaled by `--scale`
    Png,
}

impl From<OutputFormat> for ExportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::P1 => ExportFormat::PbmAscii,
            OutputFormat::P4 => ExportFormat::PbmBinary,
            OutputFormat::Png => ExportFormat::Png,
        }
    }
}

/// Pick the format from the output extension: `.png` gives PNG, anything else P4
pub fn infer_format(output: &Path) -> OutputFormat {
    match output.extension() {
        Some(ext) if ext.eq_ignore_ascii_case("png") => OutputFormat::Png,
        _ => OutputFormat::P4,
    }
}

/// Import `input`, then export it to `output`
pub async fn convert(
    bridge: &LocalBridge,
    input: &Path,
    output: &Path,
    format: Option<OutputFormat>,
    threshold: Option<f64>,
    scale: u32,
) -> Result<usize, FormatError> {
    let buffer = import_file(bridge, &input.to_string_lossy(), threshold).await?;
    let format = format.unwrap_or_else(|| infer_format(output));

    let response = bridge
        .export(export_request(&buffer, format.into(), scale.max(1)))
        .await?;
    tokio::fs::write(output, &response.bytes)
        .await
        .map_err(|e| FormatError::ExportFailed(format!("{}: {e}", output.display())))?;

    info!(
        "Converted {} ({}x{}) to {}",
        input.display(),
        buffer.width(),
        buffer.height(),
        output.display()
    );
    Ok(response.bytes.len())
}

/// Text rendering of a buffer, `#` for ink and `.` for paper
pub fn render_text(buffer: &PixelBuffer) -> String {
    let mut out = String::with_capacity((buffer.width() as usize + 1) * buffer.height() as usize);
    for row in buffer.rows() {
        out.extend(row.iter().map(|cell| match cell {
            Cell::Ink => '#',
            Cell::Paper => '.',
        }));
        out.push('\n');
    }
    out
}
