//! PNG import and preview export

use std::io::Cursor;

use image::error::{LimitError, LimitErrorKind};
use image::imageops::{self, BiLevel};
use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use painting::{Cell, PixelBuffer, ValidationError, check_dimensions, flatten_alpha, luma, quantize};

/// A decoded source image kept around for repeated thresholding
///
/// Decoding happens once; [`ThresholdSource::quantize`] can then be called
/// for every slider position of a live preview.
#[derive(Debug, Clone)]
pub struct ThresholdSource {
    width: u32,
    height: u32,
    /// Opaque RGBA, transparency already composited over white
    rgba: Vec<u8>,
}

impl ThresholdSource {
    /// Decode PNG bytes and flatten transparency onto white
    pub fn decode(bytes: &[u8]) -> Result<Self, image::ImageError> {
        let image = image::load_from_memory_with_format(bytes, ImageFormat::Png)?.to_rgba8();
        Ok(Self::from_rgba(image.width(), image.height(), image.as_raw()))
    }

    /// Wrap an RGBA raster, flattening transparency onto white
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Self {
        Self {
            width,
            height,
            rgba: flatten_alpha(rgba),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Binarize at the given luma cutoff
    pub fn quantize(&self, cutoff: f64) -> Result<PixelBuffer, ValidationError> {
        quantize(self.width, self.height, &self.rgba, cutoff)
    }

    /// Binarize with Floyd-Steinberg error diffusion instead of a hard cutoff
    pub fn dither(&self) -> Result<PixelBuffer, ValidationError> {
        check_dimensions(self.width, self.height)?;
        let stride = self.width as usize;
        let mut gray = GrayImage::from_fn(self.width, self.height, |x, y| {
            let i = (y as usize * stride + x as usize) * 4;
            let px = &self.rgba[i..i + 4];
            Luma([luma(px[0], px[1], px[2]).round() as u8])
        });
        imageops::dither(&mut gray, &BiLevel);
        let cells = gray.into_raw().into_iter().map(Cell::from_luma).collect();
        PixelBuffer::from_cells(self.width, self.height, cells)
    }
}

/// Render a buffer as a grayscale image, each cell expanded to `scale`x`scale`
pub fn to_gray_image(buffer: &PixelBuffer, scale: u32) -> GrayImage {
    let scale = scale.max(1);
    let luma = buffer.as_luma_bytes();
    let stride = buffer.width() as usize;
    GrayImage::from_fn(buffer.width() * scale, buffer.height() * scale, |x, y| {
        let (cx, cy) = ((x / scale) as usize, (y / scale) as usize);
        Luma([luma[cy * stride + cx]])
    })
}

/// Largest scaled preview written, in pixels
pub const MAX_PREVIEW_PIXELS: u64 = 1 << 28;

/// Encode a buffer as an 8-bit grayscale PNG scaled by `scale` (nearest neighbour)
pub fn encode(buffer: &PixelBuffer, scale: u32) -> Result<Vec<u8>, image::ImageError> {
    let factor = u64::from(scale.max(1));
    let pixels = u64::from(buffer.width()) * u64::from(buffer.height()) * factor * factor;
    if pixels > MAX_PREVIEW_PIXELS {
        return Err(image::ImageError::Limits(LimitError::from_kind(
            LimitErrorKind::DimensionError,
        )));
    }
    let image = DynamicImage::ImageLuma8(to_gray_image(buffer, scale));
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Decode a binarized PNG back into a buffer via its red channel
pub fn decode_binarized(bytes: &[u8]) -> Result<PixelBuffer, DecodeError> {
    let image = image::load_from_memory_with_format(bytes, ImageFormat::Png)?.to_rgba8();
    Ok(PixelBuffer::from_red_channel(
        image.width(),
        image.height(),
        image.as_raw(),
    )?)
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}
