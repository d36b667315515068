//! User settings for the command-line front end.
//!
//! Settings are stored at `~/.config/polycache/config.json` and fill in
//! whatever the command line leaves unset. Responses are cached under the
//! platform cache directory unless `cache_dir` says otherwise.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use polycache_core::ClientConfig;
use serde::{Deserialize, Serialize};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "polycache";

/// Config file name
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Settings {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
    pub staging: Option<bool>,
    pub cache_enabled: Option<bool>,
    pub cache_dir: Option<PathBuf>,
}

impl Settings {
    /// Client configuration from these settings. Unset values keep the
    /// library defaults.
    pub fn client_config(&self, api_key: String) -> Result<ClientConfig> {
        let cache_dir = match self.cache_dir {
            Some(ref dir) => dir.clone(),
            None => default_cache_dir()?,
        };

        let mut config = ClientConfig::new(api_key, cache_dir);
        if let Some(ref base_url) = self.base_url {
            config = config.with_base_url(base_url.clone());
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Some(retries) = self.max_retries {
            config = config.with_max_retries(retries);
        }
        if let Some(staging) = self.staging {
            config = config.with_staging(staging);
        }
        if let Some(enabled) = self.cache_enabled {
            config = config.with_cache_enabled(enabled);
        }
        Ok(config)
    }

    /// Settings stored at `path`, or the defaults when there is no file.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings file {}", path.display()))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }
}

/// `<platform cache dir>/polycache`
pub fn default_cache_dir() -> Result<PathBuf> {
    let cache_dir = dirs::cache_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
    Ok(cache_dir.join(APP_NAME))
}
