//! Painter for the named calibration masks.
//!
//! A *mask* is a black/white pattern shown on the micromirror panel as a test
//! or calibration target. Four patterns cover the bench workflows:
//!
//! | Kind     | Pattern                                                      |
//! |----------|--------------------------------------------------------------|
//! | `white`  | Every mirror on (all samples 255)                            |
//! | `black`  | Every mirror off (all samples 0)                             |
//! | `grid`   | 32x32-pixel checkerboard, white tile in the top-left corner  |
//! | `circle` | Filled white disc centered on the panel, sized in microns    |
//!
//! Painting is pure pixel-buffer math: no I/O, no device. The only physical
//! input is the panel geometry, which the circle painter uses to convert its
//! micron radius to pixels.

use thiserror::Error;

use crate::domain::frame::Frame;
use crate::domain::geometry::PanelGeometry;

/// Edge length of one checkerboard tile, in pixels.
///
/// Tiles at the right and bottom edges are clipped when the panel dimensions
/// are not multiples of this.
pub const GRID_TILE_PX: u32 = 32;

/// Error type for mask selection.
///
/// These are input-validation errors: they fire when a textual mask request
/// (from the CLI or any other caller) cannot be turned into a [`MaskKind`],
/// before any painting or I/O happens.
#[derive(Debug, Error, PartialEq)]
pub enum MaskError {
    /// A circle was requested without a radius.
    #[error("circle masks require a radius in microns")]
    MissingRadius,

    /// The requested kind is not one of the named patterns.
    #[error("unknown mask kind '{0}' (expected white, black, grid, or circle)")]
    UnknownKind(String),
}

/// The named mask patterns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaskKind {
    /// Solid white.
    White,
    /// Solid black.
    Black,
    /// 32x32-pixel checkerboard.
    Grid,
    /// Filled disc centered on the panel, radius given in microns.
    Circle { radius_um: f64 },
}

impl MaskKind {
    /// Resolves a textual mask request into a [`MaskKind`].
    ///
    /// A radius supplied alongside a non-circle kind is ignored, matching the
    /// permissive behavior callers expect from the bench tooling.
    ///
    /// # Errors
    ///
    /// Returns [`MaskError::MissingRadius`] for `"circle"` without a radius
    /// and [`MaskError::UnknownKind`] for any unrecognized name.
    pub fn parse(name: &str, radius_um: Option<f64>) -> Result<Self, MaskError> {
        match name {
            "white" => Ok(MaskKind::White),
            "black" => Ok(MaskKind::Black),
            "grid" => Ok(MaskKind::Grid),
            "circle" => radius_um
                .map(|radius_um| MaskKind::Circle { radius_um })
                .ok_or(MaskError::MissingRadius),
            other => Err(MaskError::UnknownKind(other.to_string())),
        }
    }

    /// The canonical name of this kind, as accepted by [`MaskKind::parse`].
    pub fn name(&self) -> &'static str {
        match self {
            MaskKind::White => "white",
            MaskKind::Black => "black",
            MaskKind::Grid => "grid",
            MaskKind::Circle { .. } => "circle",
        }
    }
}

/// Paints the requested mask at the panel's resolution.
///
/// The result is always a grayscale frame shaped exactly
/// `geometry.height x geometry.width`, containing only the samples 0 and 255.
pub fn generate_mask(kind: MaskKind, geometry: &PanelGeometry) -> Frame {
    match kind {
        MaskKind::White => Frame::filled(geometry.width, geometry.height, 255),
        MaskKind::Black => Frame::filled(geometry.width, geometry.height, 0),
        MaskKind::Grid => paint_grid(geometry),
        MaskKind::Circle { radius_um } => paint_disc(geometry, radius_um),
    }
}

/// Checkerboard: the tile containing (x, y) is white when its tile column
/// plus tile row is even, so tile (0, 0) in the top-left corner is white.
fn paint_grid(geometry: &PanelGeometry) -> Frame {
    let mut frame = Frame::filled(geometry.width, geometry.height, 0);
    let width = geometry.width as usize;
    let data = frame.as_bytes_mut();

    for y in 0..geometry.height {
        let tile_row = y / GRID_TILE_PX;
        let row = &mut data[y as usize * width..(y as usize + 1) * width];
        for (x, sample) in row.iter_mut().enumerate() {
            let tile_col = x as u32 / GRID_TILE_PX;
            if (tile_col + tile_row) % 2 == 0 {
                *sample = 255;
            }
        }
    }
    frame
}

/// Filled disc centered at (width / 2, height / 2) using integer division,
/// so on even dimensions the center sits on the lower-right of the four
/// middle pixels. A pixel is white when its squared distance from the center
/// does not exceed the squared pixel radius; radius zero therefore lights
/// exactly the center pixel.
fn paint_disc(geometry: &PanelGeometry, radius_um: f64) -> Frame {
    let mut frame = Frame::filled(geometry.width, geometry.height, 0);
    let width = geometry.width as usize;
    let data = frame.as_bytes_mut();

    let r_px = i64::from(geometry.px_from_um(radius_um));
    let r_sq = r_px * r_px;
    let cx = i64::from(geometry.width / 2);
    let cy = i64::from(geometry.height / 2);

    for y in 0..geometry.height {
        let dy_sq = (i64::from(y) - cy).pow(2);
        let row = &mut data[y as usize * width..(y as usize + 1) * width];
        for (x, sample) in row.iter_mut().enumerate() {
            let dx = x as i64 - cx;
            if dx * dx + dy_sq <= r_sq {
                *sample = 255;
            }
        }
    }
    frame
}

// ── Tests ─────────────────────────────────────────────────────────────────────
