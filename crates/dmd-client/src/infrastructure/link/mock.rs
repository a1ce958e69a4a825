//! Recording mock of the device link for unit and integration testing.
//!
//! # Why a mock link?
//!
//! The real link speaks SSH to a physical board: it needs a network, a
//! daemon, credentials, and a display to be meaningfully exercised. The
//! mock replaces all of that with in-memory recording. Every command,
//! spawn, directory operation, and upload is appended to a shared
//! [`LinkState`] that the test keeps a handle to, so assertions can inspect
//! exactly what the session put on the wire and in what order.
//!
//! # Scripting responses
//!
//! Tests that need a command to "answer" (a file listing, a failing delete)
//! push `(prefix, output)` pairs into [`LinkState::exec_script`]. The first
//! pair whose prefix matches the issued command supplies the canned
//! [`ExecOutput`]; unmatched commands succeed with empty output.
//!
//! # Simulating disconnects
//!
//! Flipping [`LinkState::active`] to `false` makes the next `is_active`
//! probe fail, which drives the session's reconnect path. Connection
//! attempts themselves can be made to fail via
//! [`LinkState::fail_next_connect`].

use std::path::Path;
use std::sync::{Arc, Mutex};

use super::{DeviceLink, ExecOutput, LinkConnector, LinkError};

/// One recorded upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRecord {
    /// The remote destination path.
    pub remote_path: String,
    /// The full content of the local file at the moment of transfer. The
    /// local file is a short-lived staging file, so capturing the bytes here
    /// is the only way a test can look at what was sent.
    pub bytes: Vec<u8>,
}

/// Shared state behind a [`MockConnector`] and every link it hands out.
#[derive(Debug, Default)]
pub struct LinkState {
    /// Liveness reported by `is_active`. Flip to `false` to force the
    /// session to reconnect on its next operation.
    pub active: bool,
    /// Whether the remote image directory currently "exists".
    pub remote_dir_exists: bool,
    /// `(command prefix, canned output)` pairs consulted by `exec`.
    pub exec_script: Vec<(String, ExecOutput)>,
    /// When set, the next `connect` fails with this auth message.
    pub fail_next_connect: Option<String>,

    /// Every command issued through `exec`, in order.
    pub execs: Vec<String>,
    /// Every command issued through `spawn`, in order.
    pub spawns: Vec<String>,
    /// Every directory created through `create_dir`, in order.
    pub created_dirs: Vec<String>,
    /// Every file transferred through `upload`, in order.
    pub uploads: Vec<UploadRecord>,
    /// Number of successful `connect` calls.
    pub connect_count: usize,
}

/// A connector whose links record into a shared [`LinkState`].
pub struct MockConnector {
    state: Arc<Mutex<LinkState>>,
}

impl Default for MockConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConnector {
    /// Creates a connector with an empty record and an existing remote
    /// directory (the common case on a provisioned board).
    pub fn new() -> Self {
        let state = LinkState {
            active: true,
            remote_dir_exists: true,
            ..LinkState::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// A handle to the shared state, for scripting and assertions.
    pub fn state(&self) -> Arc<Mutex<LinkState>> {
        Arc::clone(&self.state)
    }
}

impl LinkConnector for MockConnector {
    fn connect(&self) -> Result<Box<dyn DeviceLink>, LinkError> {
        let mut state = self.state.lock().unwrap();
        if let Some(message) = state.fail_next_connect.take() {
            return Err(LinkError::Auth {
                username: "mock".to_string(),
                message,
            });
        }
        state.connect_count += 1;
        state.active = true;
        Ok(Box::new(MockLink {
            state: Arc::clone(&self.state),
        }))
    }
}

/// A link that records every call into the connector's [`LinkState`].
pub struct MockLink {
    state: Arc<Mutex<LinkState>>,
}

impl DeviceLink for MockLink {
    fn is_active(&self) -> bool {
        self.state.lock().unwrap().active
    }

    fn exec(&mut self, command: &str) -> Result<ExecOutput, LinkError> {
        let mut state = self.state.lock().unwrap();
        state.execs.push(command.to_string());
        let canned = state
            .exec_script
            .iter()
            .find(|(prefix, _)| command.starts_with(prefix.as_str()))
            .map(|(_, output)| output.clone());
        Ok(canned.unwrap_or(ExecOutput {
            exit_status: 0,
            stdout: String::new(),
            stderr: String::new(),
        }))
    }

    fn spawn(&mut self, command: &str) -> Result<(), LinkError> {
        self.state.lock().unwrap().spawns.push(command.to_string());
        Ok(())
    }

    fn dir_exists(&mut self, _remote_dir: &str) -> Result<bool, LinkError> {
        Ok(self.state.lock().unwrap().remote_dir_exists)
    }

    fn create_dir(&mut self, remote_dir: &str) -> Result<(), LinkError> {
        let mut state = self.state.lock().unwrap();
        state.created_dirs.push(remote_dir.to_string());
        state.remote_dir_exists = true;
        Ok(())
    }

    /// Reads and records the local file's bytes, proving the staging file
    /// still existed at transfer time.
    fn upload(&mut self, local: &Path, remote_path: &str) -> Result<(), LinkError> {
        let bytes = std::fs::read(local).map_err(|e| LinkError::Transfer {
            remote_path: remote_path.to_string(),
            message: e.to_string(),
        })?;
        self.state.lock().unwrap().uploads.push(UploadRecord {
            remote_path: remote_path.to_string(),
            bytes,
        });
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
