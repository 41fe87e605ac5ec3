// SPDX-License-Identifier: MIT OR Apache-2.0

//! Match configuration stored as TOML

use crate::Team;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Number of columns
    pub width: u8,
    /// Number of rows
    pub height: u8,
    /// Team that moves first
    pub first_team: Team,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            width: 8,
            height: 8,
            first_team: Team::White,
        }
    }
}

/// Platform config location, e.g. `~/.config/chessgrid/config.toml`
pub fn default_config_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("io", "chessgrid", "chessgrid")
        .context("Failed to determine config directory")?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

/// Load a config file, writing the defaults there first if it is missing
pub fn load_config(path: &Path) -> Result<MatchConfig> {
    if !path.exists() {
        tracing::info!("Config file not found, creating default at: {}", path.display());
        let config = MatchConfig::default();
        save_config(path, &config)?;
        return Ok(config);
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    toml::from_str::<MatchConfig>(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

pub fn save_config(path: &Path, config: &MatchConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    let toml_content = toml::to_string_pretty(config).context("Failed to serialize config")?;

    fs::write(path, toml_content)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;

    tracing::info!("Saved config to: {}", path.display());
    Ok(())
}
