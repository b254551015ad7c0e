use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{source::SourceId, units::TemperatureUnit};

/// Environment variable consulted when no OpenWeather key is stored on disk.
pub const API_KEY_ENV: &str = "WEATHERVIEW_API_KEY";

/// Settings for the live OpenWeather source.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OpenWeatherConfig {
    pub api_key: String,

    /// Overrides the public endpoint, mostly useful for proxies and tests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Settings for the static JSON file source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    pub path: PathBuf,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// source = "openweather"
/// default_unit = "celsius"
///
/// [openweather]
/// api_key = "..."
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Source id, "openweather" or "file". Unset means OpenWeather.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(default)]
    pub default_unit: TemperatureUnit,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openweather: Option<OpenWeatherConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<FileConfig>,
}

impl Config {
    /// The configured source as a strongly-typed SourceId.
    pub fn source_id(&self) -> Result<SourceId> {
        match self.source.as_deref() {
            Some(s) => SourceId::try_from(s),
            None => Ok(SourceId::OpenWeather),
        }
    }

    pub fn set_source(&mut self, id: SourceId) {
        self.source = Some(id.as_str().to_string());
    }

    /// OpenWeather key from the config file, falling back to `WEATHERVIEW_API_KEY`.
    pub fn openweather_api_key(&self) -> Option<String> {
        self.openweather_api_key_with(|name| std::env::var(name).ok())
    }

    /// Same as `openweather_api_key`, reading the environment through `env`.
    pub fn openweather_api_key_with(
        &self,
        env: impl FnOnce(&str) -> Option<String>,
    ) -> Option<String> {
        let non_blank = |key: &str| {
            let key = key.trim();
            (!key.is_empty()).then(|| key.to_owned())
        };

        self.openweather
            .as_ref()
            .and_then(|ow| non_blank(&ow.api_key))
            .or_else(|| env(API_KEY_ENV).as_deref().and_then(non_blank))
    }

    /// Set/replace the OpenWeather key, keeping any endpoint overrides.
    pub fn set_openweather_key(&mut self, api_key: String) {
        self.openweather.get_or_insert_with(OpenWeatherConfig::default).api_key = api_key;
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file.as_ref().map(|f| f.path.as_path())
    }

    pub fn set_file_path(&mut self, path: PathBuf) {
        self.file = Some(FileConfig { path });
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

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
        let dirs = ProjectDirs::from("dev", "weatherview", "weatherview")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
