//! Infrastructure layer: transport adapters and configuration storage.
//!
//! Everything that touches the outside world lives here: the SSH/SFTP link
//! to the board (plus its recording mock), and the TOML config file on the
//! operator's machine. The application layer reaches all of it through
//! narrow seams so it never depends on `ssh2` or the filesystem directly.

/// The device link port, its SSH implementation, and the recording mock.
pub mod link;

/// Configuration persistence.
pub mod storage;
