//! # dmd-core
//!
//! Shared library for DMD-Over-SSH containing the panel domain model, the
//! test-pattern mask painter, and the BMP interchange codec.
//!
//! This crate is used by the client application. It has zero dependencies on
//! OS APIs, network sockets, or the filesystem, so everything in it can be
//! unit-tested on any machine without a device attached.
//!
//! # Architecture overview (for beginners)
//!
//! DMD-Over-SSH remotely drives a digital micromirror display (DMD) attached
//! to a single-board computer. Test patterns are painted locally into a pixel
//! buffer, encoded as BMP, and shipped to the board over SFTP, where an
//! external fullscreen viewer renders them onto the display.
//!
//! This crate (`dmd-core`) is the shared foundation. It defines:
//!
//! - **`domain`** - Pure business logic with no I/O. The panel geometry
//!   (resolution plus physical mirror pitch), the [`Frame`] pixel buffer, and
//!   the mask painter that produces the named calibration patterns.
//!
//! - **`bitmap`** - The interchange format. A [`Frame`] becomes an
//!   uncompressed BMP byte stream, which is the only format the remote
//!   viewer is guaranteed to understand.

// Declare the two top-level modules. Rust will look for each in a
// subdirectory with the same name (e.g., src/domain/mod.rs).
pub mod bitmap;
pub mod domain;

// Re-export the most-used types at the crate root so callers can write
// `dmd_core::Frame` instead of `dmd_core::domain::frame::Frame`.
pub use bitmap::{encode_frame, BitmapError};
pub use domain::frame::{Frame, FrameError, PixelFormat};
pub use domain::geometry::PanelGeometry;
pub use domain::mask::{generate_mask, MaskError, MaskKind, GRID_TILE_PX};
