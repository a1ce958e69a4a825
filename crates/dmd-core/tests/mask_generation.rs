//! Integration tests for the mask painter at the real panel resolution.
//!
//! # Purpose
//!
//! The unit tests in `domain/mask.rs` verify the painter on a small panel
//! where exhaustive pixel checks stay cheap. These tests exercise the same
//! painter through the crate's public API at the full DLP2000 resolution
//! (640x360) to catch anything that only shows up at scale:
//!
//! - The grid's tile parity across a panel whose height (360) is not a
//!   multiple of the 32-pixel tile edge, leaving a clipped 8-pixel tile row
//!   at the bottom.
//! - The circle's micron-to-pixel conversion against the real 7.56 um mirror
//!   pitch.
//! - End-to-end mask -> BMP encoding at the size that is actually uploaded.

use dmd_core::{encode_frame, generate_mask, GRID_TILE_PX, MaskKind, PanelGeometry};

fn white_count(frame: &dmd_core::Frame) -> usize {
    frame.as_bytes().iter().filter(|&&b| b == 255).count()
}

// ── Solid masks ───────────────────────────────────────────────────────────────

/// A white mask at full resolution is 640x360 with every sample at 255.
#[test]
fn test_white_mask_fills_the_full_panel() {
    let geometry = PanelGeometry::dlp2000();
    let frame = generate_mask(MaskKind::White, &geometry);

    assert_eq!(frame.width(), 640);
    assert_eq!(frame.height(), 360);
    assert_eq!(white_count(&frame), geometry.pixel_count());
}

/// A black mask at full resolution has no white samples at all.
#[test]
fn test_black_mask_darkens_the_full_panel() {
    let frame = generate_mask(MaskKind::Black, &PanelGeometry::dlp2000());
    assert_eq!(white_count(&frame), 0);
}

// ── Grid mask ─────────────────────────────────────────────────────────────────

/// The checkerboard covers the panel in 32-pixel tiles: 20 columns by 11.25
/// rows, so the bottom tile row is clipped to 8 pixels and still follows the
/// parity rule.
#[test]
fn test_grid_parity_holds_across_the_full_panel() {
    let frame = generate_mask(MaskKind::Grid, &PanelGeometry::dlp2000());

    // 12 tile rows cover the 360-pixel height; the last starts at y = 352.
    for tile_row in 0..=(359 / GRID_TILE_PX) {
        for tile_col in 0..(640 / GRID_TILE_PX) {
            let x = tile_col * GRID_TILE_PX;
            let y = tile_row * GRID_TILE_PX;
            let expected = if (tile_col + tile_row) % 2 == 0 { 255 } else { 0 };
            assert_eq!(
                frame.gray_at(x, y),
                Some(expected),
                "tile ({tile_col}, {tile_row}) parity"
            );
        }
    }
}

/// The clipped bottom tile row (pixels 352..360) carries the parity of tile
/// row 11, whose first tile is odd and therefore black.
#[test]
fn test_grid_clipped_bottom_row_keeps_parity() {
    let frame = generate_mask(MaskKind::Grid, &PanelGeometry::dlp2000());

    // Tile row 11 starts at y = 352; tile (0, 11) is odd parity.
    assert_eq!(frame.gray_at(0, 359), Some(0));
    assert_eq!(frame.gray_at(32, 359), Some(255));
}

// ── Circle mask ───────────────────────────────────────────────────────────────

/// 760 um at the 7.56 um pitch is 100.53 pitches, truncating to a 100-pixel
/// radius: the rim pixel on the center row is lit, the one past it is not.
#[test]
fn test_circle_radius_uses_the_real_mirror_pitch() {
    let geometry = PanelGeometry::dlp2000();
    let frame = generate_mask(MaskKind::Circle { radius_um: 760.0 }, &geometry);

    // Center is (320, 180); the rim on the center row is at x = 420.
    assert_eq!(frame.gray_at(420, 180), Some(255));
    assert_eq!(frame.gray_at(421, 180), Some(0));
}

/// Growing the physical radius never shrinks the lit area.
#[test]
fn test_circle_white_area_is_monotonic_in_radius_at_full_resolution() {
    let geometry = PanelGeometry::dlp2000();
    let mut last = 0;
    for radius_um in [0.0, 100.0, 400.0, 756.0, 1500.0, 4000.0] {
        let count = white_count(&generate_mask(MaskKind::Circle { radius_um }, &geometry));
        assert!(count >= last, "radius {radius_um} um shrank the disc");
        last = count;
    }
}

// ── Encoding ──────────────────────────────────────────────────────────────────

/// Every mask kind encodes to a well-formed BMP at the upload resolution.
#[test]
fn test_every_mask_kind_encodes_to_bmp() {
    let geometry = PanelGeometry::dlp2000();
    let kinds = [
        MaskKind::White,
        MaskKind::Black,
        MaskKind::Grid,
        MaskKind::Circle { radius_um: 500.0 },
    ];

    for kind in kinds {
        let bytes = encode_frame(&generate_mask(kind, &geometry)).expect("encode");
        assert_eq!(&bytes[0..2], b"BM", "mask '{}' must encode", kind.name());
    }
}
