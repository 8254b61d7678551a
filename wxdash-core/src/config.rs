use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::app::CityStore;

/// Sentinel shipped in place of a real key; treated the same as "no key".
pub const PLACEHOLDER_API_KEY: &str = "YOUR_API_KEY_HERE";

/// City shown on first launch, before anything has been searched.
pub const DEFAULT_CITY: &str = "Colombo";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "0123abcd"
/// last_city = "Colombo"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// OpenWeatherMap API key.
    pub api_key: Option<String>,

    /// Most recently searched city, rewritten after every successful search.
    pub last_city: Option<String>,
}

impl Config {
    /// The credential to use for live requests, or `None` when the key is
    /// absent, empty, or still the placeholder.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && *key != PLACEHOLDER_API_KEY)
    }

    pub fn is_credential_configured(&self) -> bool {
        self.credential().is_some()
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// Load config from the platform config directory, or return an empty
    /// default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Load config from an explicit path; missing file is a fresh start.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform config directory.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Save config to an explicit path, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "wxdash", "wxdash")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// File-backed [`CityStore`] that keeps the last searched city inside the
/// config file, next to the credential.
#[derive(Debug, Clone)]
pub struct FileCityStore {
    path: PathBuf,
}

impl FileCityStore {
    pub fn new() -> Result<Self> {
        Ok(Self { path: Config::config_file_path()? })
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }
}

impl CityStore for FileCityStore {
    fn last_city(&self) -> Option<String> {
        Config::load_from(&self.path).ok().and_then(|cfg| cfg.last_city)
    }

    fn remember(&self, city: &str) -> Result<()> {
        let mut cfg = Config::load_from(&self.path).unwrap_or_default();
        cfg.last_city = Some(city.to_string());
        cfg.save_to(&self.path)
    }
}
