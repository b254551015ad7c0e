use crate::{
    Config, SourcePayload,
    source::{file::FileSource, openweather::OpenWeatherSource},
};
use async_trait::async_trait;
use std::{fmt::Debug, path::PathBuf, time::Duration};
use thiserror::Error;

pub mod file;
pub mod openweather;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceId {
    OpenWeather,
    File,
}

impl SourceId {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceId::OpenWeather => "openweather",
            SourceId::File => "file",
        }
    }

    pub const fn all() -> &'static [SourceId] {
        &[SourceId::OpenWeather, SourceId::File]
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for SourceId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.trim().to_lowercase();

        match lower.as_str() {
            "openweather" => Ok(SourceId::OpenWeather),
            "file" => Ok(SourceId::File),
            _ => Err(anyhow::anyhow!(
                "Unknown source '{value}'. Supported sources: openweather, file."
            )),
        }
    }
}

/// Ways a single fetch can blow up before a status code is even seen.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request to weather source failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("failed to read weather file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse weather payload: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("weather source responded with status {status}: {body}")]
    Http { status: reqwest::StatusCode, body: String },
}

/// Something that can answer "what's the weather in this city".
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn fetch(&self, city: &str) -> Result<SourcePayload, SourceError>;
}

/// Construct a source from config and explicit SourceId.
pub fn source_from_config(id: SourceId, config: &Config) -> anyhow::Result<Box<dyn WeatherSource>> {
    source_from_config_with(id, config, |name| std::env::var(name).ok())
}

/// Same as `source_from_config`, reading the environment through `env`.
pub fn source_from_config_with(
    id: SourceId,
    config: &Config,
    env: impl FnOnce(&str) -> Option<String>,
) -> anyhow::Result<Box<dyn WeatherSource>> {
    let boxed: Box<dyn WeatherSource> = match id {
        SourceId::OpenWeather => {
            let api_key = config.openweather_api_key_with(env).ok_or_else(|| {
                anyhow::anyhow!(
                    "No API key configured for source '{id}'.\n\
                     Hint: run `weatherview configure {id}` and enter your API key."
                )
            })?;
            let ow = config.openweather.clone().unwrap_or_default();
            let base_url =
                ow.base_url.unwrap_or_else(|| openweather::DEFAULT_BASE_URL.to_string());
            let timeout =
                Duration::from_secs(ow.timeout_secs.unwrap_or(openweather::DEFAULT_TIMEOUT_SECS));

            Box::new(OpenWeatherSource::with_options(api_key, base_url, timeout)?)
        }
        SourceId::File => {
            let path = config.file_path().ok_or_else(|| {
                anyhow::anyhow!(
                    "No file configured for source '{id}'.\n\
                     Hint: run `weatherview configure {id}` and enter the JSON file path."
                )
            })?;
            Box::new(FileSource::new(path))
        }
    };

    Ok(boxed)
}

/// Construct the source named by the config's `source` field.
pub fn default_source_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherSource>> {
    let id = config.source_id()?;
    source_from_config(id, config)
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
