/// Application configuration management
/// Stores user preferences in ~/.config/spr-status/config.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::utils::constants::DEFAULT_API_URL;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_url: Option<String>,
}

impl AppConfig {
    /// Get config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("spr-status");

        fs::create_dir_all(&config_dir)
            .context("Failed to create config directory")?;

        Ok(config_dir.join("config.toml"))
    }

    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_path(Self::config_path()?)
    }

    pub fn load_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .context("Failed to read config file")?;

        let config: Self = toml::from_str(&contents)
            .context("Failed to parse config file")?;

        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_path(Self::config_path()?)
    }

    pub fn save_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        fs::write(path, contents)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Resolve the admin API base URL.
    /// Precedence: CLI flag > SPR_API_URL env > config file > default.
    pub fn resolve_api_url(&self, flag: Option<&str>, env: Option<&str>) -> String {
        flag.or(env)
            .map(|url| url.trim_end_matches('/').to_string())
            .or_else(|| self.api_url.as_ref().map(|url| url.trim_end_matches('/').to_string()))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }
}
