//! DeviceSession: connection lifecycle and frame upload.
//!
//! The session owns at most one open [`DeviceLink`] and lazily replaces it
//! whenever it stops responding. Every public operation in the client runs
//! behind [`DeviceSession::ensure_connected`], so callers never see a stale
//! channel; they see either a working link or a connection error.
//!
//! # The reconnect guard (for beginners)
//!
//! The board is routinely power-cycled on the bench, which silently kills
//! the TCP carrier under the SSH session. Instead of asking callers to
//! handle that, every operation starts with the same three-step guard:
//!
//! 1. If a link exists and answers a liveness probe, use it.
//! 2. Otherwise open a fresh one through the [`LinkConnector`].
//! 3. On every fresh connect, fire-and-forget a cursor warp that parks the
//!    board's pointer at the origin, so it never shadows a test pattern.
//!
//! There is no retry: if the connect itself fails, the error propagates to
//! the caller unchanged.

use dmd_core::{BitmapError, Frame};
use std::io::Write;
use thiserror::Error;
use tracing::{debug, info};

use crate::infrastructure::link::{DeviceLink, LinkConnector, LinkError};

/// Error type for frame uploads.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The frame does not match the panel resolution. Raised before any
    /// encoding, staging, or network traffic.
    #[error("frame is {actual_width}x{actual_height} but the panel is {expected_width}x{expected_height}")]
    DimensionMismatch {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    /// BMP encoding failed.
    #[error(transparent)]
    Bitmap(#[from] BitmapError),

    /// The local staging file could not be created or written.
    #[error("failed to stage frame locally: {0}")]
    Stage(#[from] std::io::Error),

    /// Connecting, managing the remote directory, or transferring failed.
    #[error(transparent)]
    Link(#[from] LinkError),
}

/// Construction-time description of one device session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Remote account name; also determines the home directory where the
    /// board's cursor-warp helper is installed.
    pub username: String,
    /// Directory on the device that receives uploaded frames. Always stored
    /// with a trailing slash.
    pub remote_dir: String,
    /// Resolution and mirror pitch of the attached panel.
    pub geometry: dmd_core::PanelGeometry,
}

impl SessionConfig {
    /// Creates a config, normalizing `remote_dir` to end in exactly one
    /// slash so path concatenation stays trivial everywhere else.
    pub fn new(username: &str, remote_dir: &str, geometry: dmd_core::PanelGeometry) -> Self {
        Self {
            username: username.to_string(),
            remote_dir: format!("{}/", remote_dir.trim_end_matches('/')),
            geometry,
        }
    }

    /// The fire-and-forget command that parks the board's X cursor at the
    /// origin. Backgrounded on the device so the issuing call never blocks.
    fn cursor_warp_command(&self) -> String {
        format!("DISPLAY=:0 /home/{}/move_cursor 0 0 &", self.username)
    }
}

/// One lazily-reconnected control + transfer channel pair to one device.
pub struct DeviceSession {
    config: SessionConfig,
    connector: Box<dyn LinkConnector>,
    link: Option<Box<dyn DeviceLink>>,
}

impl DeviceSession {
    /// Creates a disconnected session; the first operation connects.
    pub fn new(config: SessionConfig, connector: Box<dyn LinkConnector>) -> Self {
        Self {
            config,
            connector,
            link: None,
        }
    }

    /// The session's configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Whether a link is currently held (without probing its liveness).
    pub fn is_connected(&self) -> bool {
        self.link.is_some()
    }

    /// Returns a live link, connecting or reconnecting first if needed.
    ///
    /// # Errors
    ///
    /// Propagates [`LinkError::Connect`] / [`LinkError::Auth`] from the
    /// connector. There is no retry.
    pub fn ensure_connected(&mut self) -> Result<&mut dyn DeviceLink, LinkError> {
        let active = matches!(&mut self.link, Some(link) if link.is_active());
        if active {
            return Ok(self.link.as_mut().unwrap().as_mut());
        }
        if self.link.is_some() {
            debug!("device link went inactive; reconnecting");
        }
        let mut link = self.connector.connect()?;
        // Best-effort cursor warp on every fresh connect; a missing
        // helper binary must not fail the session.
        let warp = self.config.cursor_warp_command();
        if let Err(e) = link.spawn(&warp) {
            debug!("cursor warp after connect failed (ignored): {e}");
        }
        info!("device session connected");
        Ok(self.link.insert(link).as_mut())
    }

    /// Drops the control and transfer channels.
    ///
    /// Safe to call when already disconnected; the next operation simply
    /// reconnects.
    pub fn close(&mut self) {
        if self.link.take().is_some() {
            info!("device session closed");
        }
    }

    /// Uploads a frame to the device as a BMP file.
    ///
    /// The frame is validated against the panel resolution, encoded, staged
    /// in a named temporary file (`dmd_frame_*.bmp`), and copied into the
    /// remote image directory, which is created if absent. The staging file
    /// is removed on every path out of this function, including transfer
    /// failures.
    ///
    /// Returns the remote path of the uploaded file.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::DimensionMismatch`] before any I/O when the
    /// frame does not match the panel, and the corresponding variant for
    /// encoding, staging, connection, and transfer failures.
    pub fn send_frame(&mut self, frame: &Frame) -> Result<String, UploadError> {
        let geometry = self.config.geometry;
        if frame.width() != geometry.width || frame.height() != geometry.height {
            return Err(UploadError::DimensionMismatch {
                expected_width: geometry.width,
                expected_height: geometry.height,
                actual_width: frame.width(),
                actual_height: frame.height(),
            });
        }

        let bytes = dmd_core::encode_frame(frame)?;

        // The guard deletes the staging file when it goes out of scope, no
        // matter which error path is taken below.
        let mut staged = tempfile::Builder::new()
            .prefix("dmd_frame_")
            .suffix(".bmp")
            .tempfile()?;
        staged.write_all(&bytes)?;
        staged.flush()?;

        let file_name = staged
            .path()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "dmd_frame.bmp".to_string());
        let remote_path = format!("{}{}", self.config.remote_dir, file_name);

        let remote_dir = self.config.remote_dir.clone();
        let link = self.ensure_connected()?;
        if !link.dir_exists(&remote_dir)? {
            debug!("remote image directory {remote_dir} missing; creating");
            link.create_dir(&remote_dir)?;
        }
        link.upload(staged.path(), &remote_path)?;

        info!("uploaded {} byte frame to {remote_path}", bytes.len());
        Ok(remote_path)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
