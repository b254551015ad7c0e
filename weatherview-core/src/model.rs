use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Status code the payload carries when the lookup succeeded.
pub const STATUS_OK: i64 = 200;

/// One weather reading for a location, in the OpenWeather "current weather" shape.
///
/// Instances only come out of a successful fetch and are replaced wholesale
/// by the next one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    name: String,
    weather: Vec<Condition>,
    main: Readings,
    #[serde(default)]
    visibility: f64,
    wind: Wind,
    sys: Sun,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Condition {
    main: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Readings {
    temp: f64,
    pressure: f64,
    humidity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Wind {
    speed: f64,
    #[serde(default)]
    deg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Sun {
    #[serde(default)]
    country: String,
    sunrise: i64,
    sunset: i64,
}

impl WeatherSnapshot {
    /// Short condition label, e.g. "Clouds".
    pub fn condition(&self) -> &str {
        self.weather.first().map(|w| w.main.as_str()).unwrap_or("Unknown")
    }

    /// Raw temperature exactly as the source reported it.
    pub fn temperature(&self) -> f64 {
        self.main.temp
    }

    pub fn pressure_hpa(&self) -> f64 {
        self.main.pressure
    }

    pub fn humidity_pct(&self) -> f64 {
        self.main.humidity
    }

    pub fn visibility_m(&self) -> f64 {
        self.visibility
    }

    pub fn wind_speed_mps(&self) -> f64 {
        self.wind.speed
    }

    pub fn wind_deg(&self) -> f64 {
        self.wind.deg
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn country(&self) -> &str {
        &self.sys.country
    }

    /// "Name,CC" as shown in the header.
    pub fn location(&self) -> String {
        format!("{},{}", self.name, self.sys.country)
    }

    pub fn sunrise(&self) -> i64 {
        self.sys.sunrise
    }

    pub fn sunset(&self) -> i64 {
        self.sys.sunset
    }
}

/// What a single fetch produced once the body was parsed.
#[derive(Debug, Clone, PartialEq)]
pub enum SourcePayload {
    /// `cod` was 200 and the body held a full snapshot.
    Success(WeatherSnapshot),
    /// Any other (or missing) `cod`, e.g. `{"cod":"404","message":"city not found"}`.
    Rejected {
        code: Option<i64>,
        message: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default, deserialize_with = "status_code")]
    cod: Option<i64>,
    #[serde(default)]
    message: Option<Value>,
}

impl SourcePayload {
    /// Parse a response body. Snapshot fields are only required when `cod` is 200.
    pub fn from_json(body: &str) -> serde_json::Result<Self> {
        let value: Value = serde_json::from_str(body)?;
        let envelope = Envelope::deserialize(&value)?;

        match envelope.cod {
            Some(STATUS_OK) => Ok(Self::Success(WeatherSnapshot::deserialize(value)?)),
            code => Ok(Self::Rejected {
                code,
                message: envelope.message.and_then(|m| m.as_str().map(str::to_owned)),
            }),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

// OpenWeather sends `cod` as a number on success and as a string on errors.
fn status_code<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Float(f64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(n)) => Ok(Some(n)),
        Some(Raw::Float(f)) if f.fract() == 0.0 && f.abs() <= i64::MAX as f64 => {
            Ok(Some(f as i64))
        }
        Some(Raw::Float(f)) => {
            Err(serde::de::Error::custom(format!("status code {f} is not a whole number")))
        }
        Some(Raw::Text(s)) => s.trim().parse().map(Some).map_err(serde::de::Error::custom),
    }
}
