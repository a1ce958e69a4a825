//! Storage adapters. Currently just the TOML config repository.

pub mod config;

pub use config::{
    config_dir, config_file_path, load_config, load_config_from, save_config, AppConfig,
    ClientConfig, ConfigError, DeviceConfig, RemoteConfig,
};
