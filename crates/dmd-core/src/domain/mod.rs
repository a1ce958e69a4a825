//! Domain entities for DMD-Over-SSH.
//!
//! This module contains pure business logic with no infrastructure
//! dependencies: the physical description of the micromirror panel, the pixel
//! buffer type that travels to the device, and the painter that produces the
//! named calibration masks.
//!
//! Code in outer layers (the session, the transport adapters, the CLI)
//! depends on this module, but this module never depends on them. That keeps
//! every rule about pattern geometry testable without a board on the bench.

/// Physical panel description: resolution and mirror pitch.
pub mod geometry;

/// The 8-bit pixel buffer shipped to the device.
pub mod frame;

/// Painter for the named test patterns.
///
/// See [`mask::generate_mask`] for the entry point.
pub mod mask;
