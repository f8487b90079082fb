//! CLI configuration handling.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// Path to the configuration file that was loaded.
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Credential file managed by the tool.
    #[serde(default = "default_auth_file")]
    pub auth_file: PathBuf,

    /// Logging level.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_auth_file() -> PathBuf {
    portauth_core::FileStore::default_path().unwrap_or_else(|_| PathBuf::from("portauth.json"))
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            auth_file: default_auth_file(),
            log_level: default_log_level(),
        }
    }
}

/// Load configuration from `explicit`, or the default location, or use defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<CliConfig> {
    let config_path = match explicit {
        Some(path) => path.to_path_buf(),
        None => project_dirs()
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("portauth.toml")),
    };

    let mut config = if config_path.exists() {
        let contents = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config from {:?}", config_path))?;
        parse_config(&contents)
            .with_context(|| format!("Failed to parse config from {:?}", config_path))?
    } else if explicit.is_some() {
        anyhow::bail!("Config file {:?} does not exist", config_path);
    } else {
        CliConfig::default()
    };

    config.config_path = config_path;
    Ok(config)
}

fn parse_config(contents: &str) -> Result<CliConfig> {
    Ok(toml::from_str(contents)?)
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "raibid-labs", "portauth")
}
