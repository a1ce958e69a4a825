//! SSH implementation of the device link, built on `ssh2` (libssh2).
//!
//! One [`SshLink`] wraps one authenticated SSH session and the SFTP
//! subsystem opened on it. Both come into existence together in
//! [`SshConnector::connect`] and die together when the link is dropped;
//! libssh2 sends the protocol-level disconnect from the session's `Drop`.
//!
//! Everything here is blocking, which is exactly the execution model of the
//! client: one caller, one operation at a time, each waiting out its network
//! round-trips.

use std::io::Read;
use std::net::TcpStream;
use std::path::Path;

use ssh2::Session;
use tracing::debug;

use super::{DeviceLink, ExecOutput, LinkConnector, LinkError};

/// Opens password-authenticated SSH links to one device.
///
/// Holds the address and credentials; every `connect` call produces an
/// independent session.
pub struct SshConnector {
    host: String,
    port: u16,
    username: String,
    password: String,
}

impl SshConnector {
    /// Creates a connector for the given device address and credentials.
    pub fn new(host: &str, port: u16, username: &str, password: &str) -> Self {
        Self {
            host: host.to_string(),
            port,
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    fn connect_error(&self, message: String) -> LinkError {
        LinkError::Connect {
            host: self.host.clone(),
            port: self.port,
            message,
        }
    }
}

impl LinkConnector for SshConnector {
    fn connect(&self) -> Result<Box<dyn DeviceLink>, LinkError> {
        debug!("opening SSH session to {}:{}", self.host, self.port);

        let tcp = TcpStream::connect((self.host.as_str(), self.port))
            .map_err(|e| self.connect_error(e.to_string()))?;

        let mut session = Session::new().map_err(|e| self.connect_error(e.to_string()))?;
        session.set_tcp_stream(tcp);
        session
            .handshake()
            .map_err(|e| self.connect_error(e.to_string()))?;

        session
            .userauth_password(&self.username, &self.password)
            .map_err(|e| LinkError::Auth {
                username: self.username.clone(),
                message: e.to_string(),
            })?;

        // Open the transfer channel right away so the pair either fully
        // exists or not at all.
        let sftp = session.sftp().map_err(|e| self.connect_error(e.to_string()))?;

        debug!("SSH session to {}:{} established", self.host, self.port);
        Ok(Box::new(SshLink { session, sftp }))
    }
}

/// An open SSH session plus its SFTP subsystem.
pub struct SshLink {
    session: Session,
    sftp: ssh2::Sftp,
}

impl SshLink {
    fn command_error(message: impl ToString) -> LinkError {
        LinkError::Command {
            message: message.to_string(),
        }
    }

    fn transfer_error(remote_path: &str, message: impl ToString) -> LinkError {
        LinkError::Transfer {
            remote_path: remote_path.to_string(),
            message: message.to_string(),
        }
    }
}

impl DeviceLink for SshLink {
    /// Probes liveness with an SSH keepalive round-trip.
    ///
    /// A session whose TCP carrier has silently died (board rebooted, cable
    /// pulled) fails the probe, which is what triggers the session layer's
    /// transparent reconnect.
    fn is_active(&self) -> bool {
        self.session.authenticated() && self.session.keepalive_send().is_ok()
    }

    fn exec(&mut self, command: &str) -> Result<ExecOutput, LinkError> {
        let mut channel = self
            .session
            .channel_session()
            .map_err(Self::command_error)?;
        channel.exec(command).map_err(Self::command_error)?;

        let mut stdout = String::new();
        channel
            .read_to_string(&mut stdout)
            .map_err(Self::command_error)?;
        let mut stderr = String::new();
        channel
            .stderr()
            .read_to_string(&mut stderr)
            .map_err(Self::command_error)?;

        channel.wait_close().map_err(Self::command_error)?;
        let exit_status = channel.exit_status().map_err(Self::command_error)?;

        Ok(ExecOutput {
            exit_status,
            stdout,
            stderr,
        })
    }

    fn spawn(&mut self, command: &str) -> Result<(), LinkError> {
        let mut channel = self
            .session
            .channel_session()
            .map_err(Self::command_error)?;
        channel.exec(command).map_err(Self::command_error)?;
        // Dropping the channel closes it without waiting for the remote
        // command; callers background the command on the device side.
        Ok(())
    }

    fn dir_exists(&mut self, remote_dir: &str) -> Result<bool, LinkError> {
        Ok(self.sftp.stat(Path::new(remote_dir)).is_ok())
    }

    fn create_dir(&mut self, remote_dir: &str) -> Result<(), LinkError> {
        self.sftp
            .mkdir(Path::new(remote_dir), 0o755)
            .map_err(|e| Self::transfer_error(remote_dir, e))
    }

    fn upload(&mut self, local: &Path, remote_path: &str) -> Result<(), LinkError> {
        let mut source =
            std::fs::File::open(local).map_err(|e| Self::transfer_error(remote_path, e))?;
        let mut target = self
            .sftp
            .create(Path::new(remote_path))
            .map_err(|e| Self::transfer_error(remote_path, e))?;
        std::io::copy(&mut source, &mut target)
            .map_err(|e| Self::transfer_error(remote_path, e))?;
        Ok(())
    }
}
