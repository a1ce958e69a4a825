//! Physical description of the micromirror panel.
//!
//! Two facts about the panel matter to the rest of the system: how many
//! mirrors it has (the pixel resolution) and how far apart they sit (the
//! pitch). The pitch is what lets callers size a pattern in physical units
//! and have it come out the right number of pixels wide on the device.

use serde::{Deserialize, Serialize};

/// Resolution and mirror pitch of the target panel.
///
/// The reference device is the DLP2000 evaluation module: 640x360 mirrors at
/// a 7.56 micron pitch. Other panels are described by constructing this type
/// with their own numbers. `pitch_um` must be positive; a zero or negative
/// pitch makes physical-to-pixel conversion meaningless.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelGeometry {
    /// Panel width in pixels (mirror columns).
    pub width: u32,
    /// Panel height in pixels (mirror rows).
    pub height: u32,
    /// Center-to-center mirror spacing in microns.
    pub pitch_um: f64,
}

impl PanelGeometry {
    /// Geometry of the DLP2000 evaluation module.
    pub fn dlp2000() -> Self {
        Self {
            width: 640,
            height: 360,
            pitch_um: 7.56,
        }
    }

    /// Total number of pixels on the panel.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Converts a physical length in microns to whole pixels.
    ///
    /// The division truncates toward zero, so a length shorter than one
    /// pitch maps to zero pixels. Negative lengths also map to zero.
    pub fn px_from_um(&self, length_um: f64) -> u32 {
        (length_um / self.pitch_um) as u32
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
