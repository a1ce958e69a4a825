//! DMD-Over-SSH client — entry point.
//!
//! This binary drives a micromirror display attached to a single-board
//! computer: it paints test patterns, uploads them over SFTP, and controls
//! the board-side fullscreen viewer over SSH.
//!
//! # Usage
//!
//! ```text
//! dmd-client [OPTIONS] <COMMAND>
//!
//! Commands:
//!   mask   Paint a named test pattern, upload it, and display it
//!   show   Display a remote image (the newest one when PATH is omitted)
//!   list   List remote images, newest first
//!   flush  Delete every image in the remote directory
//!   close  Terminate the fullscreen viewer
//!   stop   Park the panel on a black frame (safe idle state)
//!
//! Options:
//!   --config <PATH>       Config file [default: platform config dir]
//!   --host <HOST>         Board address override
//!   --username <USER>     SSH user override
//!   --password <PASS>     SSH password override
//!   --remote-dir <DIR>    Remote image directory override
//! ```
//!
//! # Environment variable overrides
//!
//! The CLI flags can also be supplied via environment variables; flags take
//! precedence when both are present.
//!
//! | Variable         | Description                    |
//! |------------------|--------------------------------|
//! | `DMD_CONFIG`     | Config file path               |
//! | `DMD_HOST`       | Board hostname or IP           |
//! | `DMD_USER`       | SSH user name                  |
//! | `DMD_PASSWORD`   | SSH password                   |
//! | `DMD_REMOTE_DIR` | Remote image directory         |
//!
//! # Configuration precedence
//!
//! 1. CLI flags / environment variables (highest)
//! 2. The TOML config file
//! 3. Built-in defaults describing the stock BeagleBone + DLP2000 setup

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use dmd_client::application::display::DisplayController;
use dmd_client::application::session::{DeviceSession, SessionConfig};
use dmd_client::infrastructure::link::ssh::SshConnector;
use dmd_client::infrastructure::storage::{load_config, load_config_from, AppConfig};
use dmd_core::MaskKind;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// DMD-Over-SSH client.
///
/// Uploads test patterns to a remote micromirror display and controls the
/// board-side fullscreen viewer.
#[derive(Debug, Parser)]
#[command(
    name = "dmd-client",
    about = "Upload and display test patterns on a remote micromirror panel",
    version
)]
struct Cli {
    /// Path to the TOML config file.
    ///
    /// When omitted, the platform config directory is used (and missing
    /// files fall back to the built-in defaults).
    #[arg(long, env = "DMD_CONFIG")]
    config: Option<PathBuf>,

    /// Board hostname or IP, overriding the config file.
    #[arg(long, env = "DMD_HOST")]
    host: Option<String>,

    /// SSH user name, overriding the config file.
    #[arg(long, env = "DMD_USER")]
    username: Option<String>,

    /// SSH password, overriding the config file.
    #[arg(long, env = "DMD_PASSWORD")]
    password: Option<String>,

    /// Remote image directory, overriding the config file.
    #[arg(long, env = "DMD_REMOTE_DIR")]
    remote_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Paint a named test pattern, upload it, and display it fullscreen.
    Mask {
        /// Pattern name: white, black, grid, or circle.
        kind: String,
        /// Disc radius in microns (required for circle).
        #[arg(long)]
        radius_um: Option<f64>,
    },
    /// Display a remote image (the newest one when PATH is omitted).
    Show {
        /// Remote path of the image to display.
        path: Option<String>,
    },
    /// List remote images, newest first.
    List,
    /// Delete every image in the remote directory.
    Flush,
    /// Terminate the fullscreen viewer.
    Close,
    /// Park the panel on a black frame (safe idle state).
    Stop,
}

impl Cli {
    /// Loads the config file and folds the CLI overrides into it.
    fn resolve_config(&self) -> anyhow::Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => load_config_from(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => load_config().context("failed to load config")?,
        };

        if let Some(host) = &self.host {
            config.device.host = host.clone();
        }
        if let Some(username) = &self.username {
            config.device.username = username.clone();
        }
        if let Some(password) = &self.password {
            config.device.password = password.clone();
        }
        if let Some(remote_dir) = &self.remote_dir {
            config.remote.image_dir = remote_dir.clone();
        }
        Ok(config)
    }
}

/// Wires a display controller for the configured board.
fn make_controller(config: &AppConfig) -> DisplayController {
    let connector = SshConnector::new(
        &config.device.host,
        config.device.port,
        &config.device.username,
        &config.device.password,
    );
    let session_config = SessionConfig::new(
        &config.device.username,
        &config.remote.image_dir,
        config.panel,
    );
    DisplayController::new(DeviceSession::new(session_config, Box::new(connector)))
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    // Parse CLI arguments first so `--help` works without a config file.
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    // `RUST_LOG` wins; otherwise the configured level applies.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.client.log_level.clone())),
        )
        .init();

    info!(
        "DMD-Over-SSH client starting — device={}:{}, panel={}x{}",
        config.device.host, config.device.port, config.panel.width, config.panel.height
    );

    let mut controller = make_controller(&config);

    match &cli.command {
        Command::Mask { kind, radius_um } => {
            let kind = MaskKind::parse(kind, *radius_um)?;
            let remote_path = controller.preset_mask(kind)?;
            println!("{remote_path}");
        }
        Command::Show { path } => {
            let shown = controller.show(path.as_deref())?;
            println!("{shown}");
        }
        Command::List => {
            for path in controller.list_remote_images()? {
                println!("{path}");
            }
        }
        Command::Flush => {
            controller.flush_remote_images()?;
        }
        Command::Close => {
            controller.close_display()?;
        }
        Command::Stop => {
            let remote_path = controller.stop()?;
            println!("{remote_path}");
        }
    }

    controller.session_mut().close();
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
