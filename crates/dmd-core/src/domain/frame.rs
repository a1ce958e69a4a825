//! The pixel buffer shipped to the device.
//!
//! A [`Frame`] is a width x height raster of 8-bit samples, either one
//! channel (grayscale) or three (RGB), stored row-major with no padding.
//! The element type is fixed at `u8` by construction, so the dynamic
//! "wrong dtype" failures a loosely-typed client has to guard against are
//! compile-time facts here. What remains dynamic, and what the validating
//! constructor checks, is that the buffer length agrees with the claimed
//! dimensions and channel count.
//!
//! Frames are ephemeral: they exist to be painted, encoded, and uploaded
//! within a single call. Nothing holds a frame across operations.

use thiserror::Error;

/// Error type for frame construction.
#[derive(Debug, Error, PartialEq)]
pub enum FrameError {
    /// The supplied buffer does not hold `width * height * channels` bytes.
    #[error("pixel buffer length mismatch: expected {expected} bytes for {width}x{height}x{channels}, got {actual}")]
    LengthMismatch {
        width: u32,
        height: u32,
        channels: usize,
        expected: usize,
        actual: usize,
    },
}

/// Sample layout of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// One 8-bit sample per pixel.
    Gray,
    /// Three 8-bit samples per pixel, R then G then B.
    Rgb,
}

impl PixelFormat {
    /// Number of samples per pixel.
    pub fn channels(&self) -> usize {
        match self {
            PixelFormat::Gray => 1,
            PixelFormat::Rgb => 3,
        }
    }
}

/// An owned 8-bit pixel buffer with known dimensions and sample layout.
///
/// The fields are private so that every `Frame` in existence satisfies
/// `data.len() == width * height * channels`; downstream code (the BMP
/// encoder, the uploader) relies on that and never re-validates.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Vec<u8>,
}

impl Frame {
    /// Creates a grayscale frame with every sample set to `value`.
    ///
    /// This is the workhorse constructor for the mask painter: solid masks
    /// are exactly this, and patterned masks start from a filled frame and
    /// overwrite pixels.
    pub fn filled(width: u32, height: u32, value: u8) -> Self {
        Self {
            width,
            height,
            format: PixelFormat::Gray,
            data: vec![value; width as usize * height as usize],
        }
    }

    /// Wraps an existing row-major buffer as a frame.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::LengthMismatch`] when `data.len()` disagrees
    /// with `width * height * format.channels()`.
    pub fn from_raw(
        width: u32,
        height: u32,
        format: PixelFormat,
        data: Vec<u8>,
    ) -> Result<Self, FrameError> {
        let expected = width as usize * height as usize * format.channels();
        if data.len() != expected {
            return Err(FrameError::LengthMismatch {
                width,
                height,
                channels: format.channels(),
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            format,
            data,
        })
    }

    /// Frame width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Sample layout.
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// The raw row-major sample data.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Mutable access to the raw sample data.
    ///
    /// Length and layout are fixed at construction; only sample values can
    /// change through this slice.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// The grayscale sample at (x, y).
    ///
    /// Returns `None` outside the frame bounds or for RGB frames. Intended
    /// for tests and spot checks, not bulk pixel access.
    pub fn gray_at(&self, x: u32, y: u32) -> Option<u8> {
        if self.format != PixelFormat::Gray || x >= self.width || y >= self.height {
            return None;
        }
        Some(self.data[y as usize * self.width as usize + x as usize])
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
