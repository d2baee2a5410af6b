//! Layered configuration.
//!
//! Command-line flags (and their environment variables) win over the TOML
//! config file, which wins over built-in defaults.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;
use verbquiz_web::WebConfig;

use crate::cli::{ServerArgs, StorageArgs};

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "config/verbquiz.toml";
/// Database file used when nothing else is configured.
pub const DEFAULT_DATABASE_PATH: &str = "data/verbs.db";
/// Seed dataset used when nothing else is configured.
pub const DEFAULT_SEED_PATH: &str = "data/irregular_verbs.json";

/// Contents of the TOML config file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub server: ServerSection,
    pub storage: StorageSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSection {
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub static_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageSection {
    pub database: Option<PathBuf>,
    pub seed: Option<PathBuf>,
}

/// Fully resolved settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub web: WebConfig,
    pub database: PathBuf,
    pub seed: PathBuf,
}

/// Read the config file.
///
/// A missing file yields the empty config, unless the path was given
/// explicitly.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<FileConfig> {
    let explicit = path.is_some();
    let path = path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), Path::to_path_buf);

    if !path.exists() {
        if explicit {
            anyhow::bail!("config file not found: {}", path.display());
        }
        return Ok(FileConfig::default());
    }

    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    toml::from_str(&contents).with_context(|| format!("invalid config in {}", path.display()))
}

impl Settings {
    /// Merge command-line values over the file config and defaults.
    pub fn resolve(file: FileConfig, storage: &StorageArgs, server: &ServerArgs) -> Self {
        let defaults = WebConfig::default();
        let web = WebConfig {
            bind_addr: server
                .bind
                .clone()
                .or(file.server.bind)
                .unwrap_or(defaults.bind_addr),
            port: server.port.or(file.server.port).unwrap_or(defaults.port),
            static_dir: server.static_dir.clone().or(file.server.static_dir),
        };

        Self {
            web,
            database: storage
                .database
                .clone()
                .or(file.storage.database)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH)),
            seed: storage
                .seed
                .clone()
                .or(file.storage.seed)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SEED_PATH)),
        }
    }
}
