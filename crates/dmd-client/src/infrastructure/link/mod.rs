//! The remote device link: one SSH control channel paired with one SFTP
//! transfer channel.
//!
//! # Why a trait here?
//!
//! Everything the client does on the board goes through two narrow channels:
//! shell commands (launch the viewer, delete images, list by mtime) and file
//! transfers (put a staged BMP into the image directory). The
//! [`DeviceLink`] trait captures exactly that surface so the session and
//! display logic can be exercised against an in-memory recording
//! implementation, with no board, network, or SSH daemon on the test bench.
//!
//! The real implementation lives in [`ssh`]; the recording one in [`mock`]
//! is always compiled (not guarded by `#[cfg(test)]`) so integration tests
//! can use it too.
//!
//! # Channel pairing
//!
//! A link represents *both* channels at once. They are opened together by a
//! [`LinkConnector`] and dropped together when the session replaces or
//! closes the link; there is never a half-open state where commands work but
//! transfers do not.

use std::path::Path;

use thiserror::Error;

pub mod mock;
pub mod ssh;

/// Error type for link operations.
///
/// Variants carry human-readable descriptions rather than the underlying
/// library errors so that alternate link implementations (and the mock) can
/// produce them without depending on `ssh2`.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LinkError {
    /// The TCP connection or SSH handshake failed.
    #[error("failed to reach {host}:{port}: {message}")]
    Connect {
        host: String,
        port: u16,
        message: String,
    },

    /// The device refused the supplied credentials.
    #[error("authentication failed for user '{username}': {message}")]
    Auth { username: String, message: String },

    /// A remote command could not be issued or its output not collected.
    #[error("remote command failed: {message}")]
    Command { message: String },

    /// A file could not be transferred or the remote directory managed.
    #[error("transfer failed for '{remote_path}': {message}")]
    Transfer {
        remote_path: String,
        message: String,
    },
}

/// Collected result of a remote command that was awaited to completion.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecOutput {
    /// Remote exit status; 0 means success.
    pub exit_status: i32,
    /// Everything the command wrote to stdout, decoded lossily as UTF-8.
    pub stdout: String,
    /// Everything the command wrote to stderr, decoded lossily as UTF-8.
    pub stderr: String,
}

impl ExecOutput {
    /// Whether the remote command exited with status 0.
    pub fn success(&self) -> bool {
        self.exit_status == 0
    }
}

/// An open control + transfer channel pair to the device.
///
/// All methods take `&mut self`: a link belongs to exactly one session and
/// is never shared, which is how the single-caller model of the client is
/// enforced at compile time.
pub trait DeviceLink {
    /// Whether the underlying transport still responds.
    ///
    /// Called by the session's reconnect guard before every operation; a
    /// `false` here causes the link to be dropped and replaced.
    fn is_active(&self) -> bool;

    /// Runs a command on the device and waits for it to exit.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::Command`] when the command cannot be issued or
    /// its output cannot be collected. A nonzero remote exit status is NOT
    /// an error at this layer; callers decide what a failing status means.
    fn exec(&mut self, command: &str) -> Result<ExecOutput, LinkError>;

    /// Issues a command without waiting for it.
    ///
    /// Used for the fire-and-forget operations (cursor warp, viewer kill)
    /// where neither the exit status nor the output is wanted.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::Command`] when the command cannot be issued.
    fn spawn(&mut self, command: &str) -> Result<(), LinkError>;

    /// Whether `remote_dir` exists on the device.
    ///
    /// A directory that cannot be stat-ed for any reason reports `false`;
    /// the caller's follow-up `create_dir` surfaces the real problem if the
    /// transfer channel itself is broken.
    ///
    /// # Errors
    ///
    /// Implementations may return [`LinkError::Transfer`], but the SSH
    /// implementation never does; see above.
    fn dir_exists(&mut self, remote_dir: &str) -> Result<bool, LinkError>;

    /// Creates `remote_dir` on the device.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::Transfer`] when the directory cannot be created.
    fn create_dir(&mut self, remote_dir: &str) -> Result<(), LinkError>;

    /// Copies the local file at `local` to `remote_path` on the device.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::Transfer`] when the local file cannot be read or
    /// the remote file cannot be written.
    fn upload(&mut self, local: &Path, remote_path: &str) -> Result<(), LinkError>;
}

/// Opens fresh [`DeviceLink`]s.
///
/// The session calls this once at first use and again whenever the current
/// link stops responding; connectors hold whatever the transport needs to
/// build a link (address, credentials) but no per-link state.
pub trait LinkConnector {
    /// Opens a new control + transfer channel pair.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::Connect`] or [`LinkError::Auth`] when the device
    /// cannot be reached or refuses the credentials.
    fn connect(&self) -> Result<Box<dyn DeviceLink>, LinkError>;
}

// ── Tests ─────────────────────────────────────────────────────────────────────
