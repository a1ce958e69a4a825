//! dmd-client library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/` and
//! the binary entry point in `main.rs` share the same module tree.
//!
//! # What does dmd-client do? (for beginners)
//!
//! The *client* runs on the operator's machine and drives a micromirror
//! display attached to a single-board computer over the network. A typical
//! bench interaction:
//!
//! 1. The client opens an SSH session to the board (password auth) and the
//!    SFTP subsystem on top of it. The pair is kept alive across calls and
//!    transparently reopened when the board reboots.
//! 2. A test pattern (solid white/black, checkerboard, or a disc sized in
//!    microns) is painted into a pixel buffer and encoded as BMP.
//! 3. The BMP is uploaded into the board's image directory over SFTP.
//! 4. The board-side fullscreen viewer (`feh`) is launched on the uploaded
//!    file via a remote shell command.
//!
//! The same remote-command surface also lists and deletes uploaded images
//! and can park the panel on a black frame, which is the safe idle state.

/// Application layer: the device session and display use cases.
pub mod application;

/// Infrastructure layer: SSH link, recording mock, config storage.
pub mod infrastructure;
