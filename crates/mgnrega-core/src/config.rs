//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the portal API key, the default district, the request
//! timeout and an optional cache directory override.
//!
//! Configuration is stored at `~/.config/mgnrega-dashboard/config.json`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::{DEFAULT_API_KEY, REQUEST_TIMEOUT_SECS};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "mgnrega-dashboard";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the configured API key
pub const API_KEY_ENV: &str = "MGNREGA_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub default_district: Option<String>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory holding the snapshot files.
    pub fn cache_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.cache_dir {
            return Ok(dir.clone());
        }
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// API key from the environment, then the config file, then the portal's
    /// public sample key.
    pub fn api_key(&self) -> String {
        Self::resolve_api_key(std::env::var(API_KEY_ENV).ok(), self.api_key.as_deref())
    }

    fn resolve_api_key(from_env: Option<String>, from_file: Option<&str>) -> String {
        from_env
            .filter(|k| !k.trim().is_empty())
            .or_else(|| from_file.filter(|k| !k.trim().is_empty()).map(str::to_string))
            .unwrap_or_else(|| DEFAULT_API_KEY.to_string())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(REQUEST_TIMEOUT_SECS))
    }
}
