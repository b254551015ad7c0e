use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::{model::SourcePayload, source::truncate_body};

use super::{SourceError, WeatherSource};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Live "current weather" lookups against OpenWeather, keyed by city name.
#[derive(Debug, Clone)]
pub struct OpenWeatherSource {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherSource {
    pub fn new(api_key: String) -> Result<Self, SourceError> {
        Self::with_options(
            api_key,
            DEFAULT_BASE_URL.to_string(),
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    pub fn with_options(
        api_key: String,
        base_url: String,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { api_key, base_url, http })
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherSource {
    async fn fetch(&self, city: &str) -> Result<SourcePayload, SourceError> {
        debug!(city, url = %self.base_url, "requesting current weather");

        // Metric units so `main.temp` is already Celsius.
        let res = self
            .http
            .get(&self.base_url)
            .query(&[("q", city), ("appid", self.api_key.as_str()), ("units", "metric")])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        // The body's `cod` decides success, not the HTTP status; a 404 still
        // carries a parseable `{"cod":"404",...}`.
        match SourcePayload::from_json(&body) {
            Ok(payload) => Ok(payload),
            Err(_) if !status.is_success() => {
                Err(SourceError::Http { status, body: truncate_body(&body) })
            }
            Err(e) => Err(e.into()),
        }
    }
}
