//! DisplayController: fullscreen viewer control and remote image housekeeping.
//!
//! Builds the bench-level operations on top of [`DeviceSession`]: paint a
//! named mask and put it on the panel, show an already-uploaded image, list
//! or wipe the remote image directory, and park the panel on black.
//!
//! # Best-effort versus checked commands
//!
//! The remote command surface splits into two contracts:
//!
//! - **Best-effort**: launching the viewer and killing the viewer. A failed
//!   launch is visible on the panel itself, and killing a viewer that is not
//!   running is routine, so nonzero exit statuses are logged and ignored.
//! - **Checked**: flushing the image directory. Silently keeping stale
//!   images would corrupt the next "show newest" call, so a failing delete
//!   surfaces as an error carrying the remote stderr.

use dmd_core::{generate_mask, MaskKind};
use thiserror::Error;
use tracing::{debug, info};

use crate::application::session::{DeviceSession, UploadError};
use crate::infrastructure::link::LinkError;

/// Command that terminates the fullscreen viewer on the device.
const VIEWER_KILL_COMMAND: &str = "pkill feh";

/// Error type for display operations.
#[derive(Debug, Error)]
pub enum DisplayError {
    /// `show` was asked for the newest image but the remote directory has
    /// none. Distinct from transport failures so callers can treat "nothing
    /// to show yet" as a normal condition.
    #[error("no images found in the remote image directory")]
    NoRemoteImages,

    /// The remote flush command exited nonzero; carries its stderr.
    #[error("failed to flush remote images: {stderr}")]
    FlushFailed { stderr: String },

    /// Painting or uploading a mask failed.
    #[error(transparent)]
    Upload(#[from] UploadError),

    /// Connecting or issuing a remote command failed.
    #[error(transparent)]
    Link(#[from] LinkError),
}

/// Drives the fullscreen viewer on one device.
pub struct DisplayController {
    session: DeviceSession,
}

impl DisplayController {
    /// Wraps a session; the controller takes over all remote operations.
    pub fn new(session: DeviceSession) -> Self {
        Self { session }
    }

    /// The underlying session, for connection management (`close`).
    pub fn session_mut(&mut self) -> &mut DeviceSession {
        &mut self.session
    }

    /// Paints the named mask, uploads it, and displays it.
    ///
    /// The freshly uploaded path is passed to the viewer explicitly (not
    /// re-derived from a directory listing) and returned to the caller.
    ///
    /// # Errors
    ///
    /// Propagates upload and display failures.
    pub fn preset_mask(&mut self, kind: MaskKind) -> Result<String, DisplayError> {
        let frame = generate_mask(kind, &self.session.config().geometry);
        let remote_path = self.session.send_frame(&frame)?;
        self.show(Some(&remote_path))?;
        Ok(remote_path)
    }

    /// Displays a remote image fullscreen.
    ///
    /// With `None`, the newest image in the remote directory is shown. The
    /// viewer is launched as a backgrounded remote process; the launching
    /// shell's exit status is awaited but only logged, never treated as a
    /// failure (best-effort contract).
    ///
    /// Returns the path that was displayed.
    ///
    /// # Errors
    ///
    /// Returns [`DisplayError::NoRemoteImages`] when no path is given and
    /// the remote directory is empty; propagates connection errors.
    pub fn show(&mut self, remote_path: Option<&str>) -> Result<String, DisplayError> {
        let target = match remote_path {
            Some(path) => path.to_string(),
            None => self.newest_remote_image()?,
        };

        let command = format!("export DISPLAY=:0; feh -F {target} &");
        let link = self.session.ensure_connected()?;
        let output = link.exec(&command)?;
        if !output.success() {
            debug!(
                "viewer launch for {target} exited with status {} (ignored)",
                output.exit_status
            );
        }
        info!("displaying {target}");
        Ok(target)
    }

    /// Terminates the fullscreen viewer.
    ///
    /// Best-effort: a viewer that is not running makes `pkill` exit nonzero,
    /// and that is fine. Only connection errors propagate.
    ///
    /// # Errors
    ///
    /// Propagates connection errors from the reconnect guard.
    pub fn close_display(&mut self) -> Result<(), DisplayError> {
        let link = self.session.ensure_connected()?;
        if let Err(e) = link.spawn(VIEWER_KILL_COMMAND) {
            debug!("viewer shutdown failed (ignored): {e}");
        }
        Ok(())
    }

    /// Deletes every BMP in the remote image directory.
    ///
    /// # Errors
    ///
    /// Returns [`DisplayError::FlushFailed`] carrying the remote stderr when
    /// the delete exits nonzero; propagates connection errors.
    pub fn flush_remote_images(&mut self) -> Result<(), DisplayError> {
        let command = format!("rm -f {}*.bmp", self.session.config().remote_dir);
        let link = self.session.ensure_connected()?;
        let output = link.exec(&command)?;
        if !output.success() {
            return Err(DisplayError::FlushFailed {
                stderr: output.stderr.trim().to_string(),
            });
        }
        info!("flushed remote image directory");
        Ok(())
    }

    /// Lists remote BMPs sorted by modification time, newest first.
    ///
    /// An empty directory yields an empty vector. The listing command exits
    /// nonzero when the glob matches nothing; that case also produces empty
    /// stdout, so the exit status is deliberately not consulted.
    ///
    /// # Errors
    ///
    /// Propagates connection and command-transport errors.
    pub fn list_remote_images(&mut self) -> Result<Vec<String>, DisplayError> {
        let command = format!("ls -t {}*.bmp", self.session.config().remote_dir);
        let link = self.session.ensure_connected()?;
        let output = link.exec(&command)?;
        Ok(output
            .stdout
            .split_whitespace()
            .map(str::to_owned)
            .collect())
    }

    /// Parks the panel on a freshly uploaded all-black frame.
    ///
    /// Kills any running viewer, then paints/uploads/shows black in one
    /// step, so exactly one display command is issued and it targets the
    /// new black frame rather than whatever happens to be newest. This is
    /// the documented safe/idle state.
    ///
    /// Returns the black frame's remote path.
    ///
    /// # Errors
    ///
    /// Propagates upload and connection failures.
    pub fn stop(&mut self) -> Result<String, DisplayError> {
        self.close_display()?;
        let remote_path = self.preset_mask(MaskKind::Black)?;
        info!("panel parked on black frame {remote_path}");
        Ok(remote_path)
    }

    fn newest_remote_image(&mut self) -> Result<String, DisplayError> {
        self.list_remote_images()?
            .into_iter()
            .next()
            .ok_or(DisplayError::NoRemoteImages)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
