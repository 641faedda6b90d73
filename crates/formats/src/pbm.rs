//! Portable bitmap codec (P1 ASCII and P4 binary)
//!
//! Decoding and P4 encoding go through the `image` crate's netpbm codec. In
//! both variants a set bit / `1` token is black (ink); P4 packs 8 pixels per
//! byte, most significant bit first, with every row padded to a whole byte.

use std::io::Cursor;

use image::codecs::pnm::{PnmDecoder, PnmEncoder, PnmSubtype, SampleEncoding};
use image::{ExtendedColorType, ImageDecoder, ImageEncoder, ImageError};
use painting::{Cell, PixelBuffer, ValidationError, check_dimensions};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PbmError {
    #[error("Not a PBM file (magic {0:?})")]
    BadMagic(String),
    #[error(transparent)]
    Codec(#[from] ImageError),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Which PBM variant a file uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PbmVariant {
    Ascii,
    Binary,
}

/// Bytes per packed P4 row
pub fn row_stride(width: u32) -> usize {
    (width as usize).div_ceil(8)
}

/// Encode as P1: header, then one row per line, tokens separated by spaces
///
/// The netpbm encoder wraps ASCII samples at a fixed column instead of at row
/// ends, so rows are laid out here.
pub fn encode_ascii(buffer: &PixelBuffer) -> Vec<u8> {
    let mut out = format!("P1\n{} {}\n", buffer.width(), buffer.height()).into_bytes();
    for row in buffer.rows() {
        for (i, cell) in row.iter().enumerate() {
            if i > 0 {
                out.push(b' ');
            }
            out.push(if cell.is_ink() { b'1' } else { b'0' });
        }
        out.push(b'\n');
    }
    out
}

/// Encode as P4 with rows padded to whole bytes
pub fn encode_binary(buffer: &PixelBuffer) -> Result<Vec<u8>, ImageError> {
    // The encoder takes bitmap samples as 0 = black, 1 = white
    let samples: Vec<u8> = buffer.cells().iter().map(|&cell| u8::from(!cell.is_ink())).collect();
    let mut out = Vec::with_capacity(16 + row_stride(buffer.width()) * buffer.height() as usize);
    PnmEncoder::new(&mut out)
        .with_subtype(PnmSubtype::Bitmap(SampleEncoding::Binary))
        .write_image(&samples, buffer.width(), buffer.height(), ExtendedColorType::L8)?;
    Ok(out)
}

/// Detect the variant from the magic number without decoding
pub fn detect(data: &[u8]) -> Option<PbmVariant> {
    match data.get(..2)? {
        b"P1" => Some(PbmVariant::Ascii),
        b"P4" => Some(PbmVariant::Binary),
        _ => None,
    }
}

/// Decode a P1 or P4 file
///
/// The header size is checked against the buffer limit before any raster
/// memory is allocated.
pub fn decode(data: &[u8]) -> Result<PixelBuffer, PbmError> {
    if detect(data).is_none() {
        let magic = data.get(..2).unwrap_or(data);
        return Err(PbmError::BadMagic(String::from_utf8_lossy(magic).into_owned()));
    }

    let decoder = PnmDecoder::new(Cursor::new(data))?;
    let (width, height) = decoder.dimensions();
    check_dimensions(width, height)?;

    // Bitmaps decode to 8-bit luma: 0 for black, 255 for white
    let mut luma = vec![0u8; decoder.total_bytes() as usize];
    decoder.read_image(&mut luma)?;
    let cells = luma.into_iter().map(Cell::from_luma).collect();
    Ok(PixelBuffer::from_cells(width, height, cells)?)
}
