//! BMP interchange encoding.
//!
//! The remote viewer renders plain uncompressed BMP files, so BMP is the one
//! format every frame passes through on its way to the device. Encoding
//! happens in memory; the caller decides where the bytes land (for the
//! uploader, a named temporary file).
//!
//! Only the `bmp` codec of the `image` crate is compiled into this crate;
//! there is deliberately no support for reading or writing anything else.

use std::io::Cursor;

use image::codecs::bmp::BmpEncoder;
use image::ExtendedColorType;
use thiserror::Error;

use crate::domain::frame::{Frame, PixelFormat};

/// Error type for bitmap encoding.
#[derive(Debug, Error)]
pub enum BitmapError {
    /// One of the frame dimensions is zero; no BMP can represent it.
    #[error("cannot encode an empty frame ({width}x{height})")]
    EmptyFrame { width: u32, height: u32 },

    /// The underlying BMP writer failed.
    #[error("BMP encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Encodes a frame as an uncompressed BMP byte stream.
///
/// Grayscale frames become 8-bit palettized BMPs, RGB frames 24-bit ones;
/// both are what the remote viewer expects.
///
/// # Errors
///
/// Returns [`BitmapError::EmptyFrame`] for a zero-sized frame and
/// [`BitmapError::Encode`] if the writer fails.
pub fn encode_frame(frame: &Frame) -> Result<Vec<u8>, BitmapError> {
    if frame.width() == 0 || frame.height() == 0 {
        return Err(BitmapError::EmptyFrame {
            width: frame.width(),
            height: frame.height(),
        });
    }

    let color_type = match frame.format() {
        PixelFormat::Gray => ExtendedColorType::L8,
        PixelFormat::Rgb => ExtendedColorType::Rgb8,
    };

    let mut cursor = Cursor::new(Vec::new());
    BmpEncoder::new(&mut cursor).encode(
        frame.as_bytes(),
        frame.width(),
        frame.height(),
        color_type,
    )?;
    Ok(cursor.into_inner())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
