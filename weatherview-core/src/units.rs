//! Conversions from raw source values to what the user sees.

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Miles per hour in one meter per second, as displayed.
pub const MPS_TO_MPH: f64 = 2.237;

/// Temperature scale the display is set to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "celsius",
            TemperatureUnit::Fahrenheit => "fahrenheit",
        }
    }

    /// Letter shown after the degree sign.
    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "C",
            TemperatureUnit::Fahrenheit => "F",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            TemperatureUnit::Celsius => TemperatureUnit::Fahrenheit,
            TemperatureUnit::Fahrenheit => TemperatureUnit::Celsius,
        }
    }

    pub const fn all() -> &'static [TemperatureUnit] {
        &[TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit]
    }
}

impl Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TemperatureUnit {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "c" | "celsius" => Ok(TemperatureUnit::Celsius),
            "f" | "fahrenheit" => Ok(TemperatureUnit::Fahrenheit),
            _ => Err(anyhow::anyhow!(
                "Unknown temperature unit '{value}'. Supported units: celsius, fahrenheit."
            )),
        }
    }
}

/// Raw temperature in the requested scale, rounded to a whole degree.
///
/// The raw value is taken as-is for Celsius; no Kelvin offset is applied.
pub fn display_temperature(raw: f64, unit: TemperatureUnit) -> i64 {
    match unit {
        TemperatureUnit::Celsius => raw.round() as i64,
        TemperatureUnit::Fahrenheit => (raw * 9.0 / 5.0 + 32.0).round() as i64,
    }
}

/// UNIX seconds as "HH:MM AM" in the machine's local zone.
pub fn format_time(timestamp: i64) -> String {
    format_time_in(timestamp, &Local)
}

/// UNIX seconds as "HH:MM AM" in `tz`. Out-of-range timestamps render as "--:--".
pub fn format_time_in<Tz>(timestamp: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match DateTime::from_timestamp(timestamp, 0) {
        Some(utc) => utc.with_timezone(tz).format("%I:%M %p").to_string(),
        None => "--:--".to_string(),
    }
}

pub fn meters_to_km(meters: f64) -> i64 {
    (meters / 1000.0).round() as i64
}

pub fn mps_to_mph(mps: f64) -> i64 {
    (mps * MPS_TO_MPH).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn celsius_rounds_raw_value() {
        assert_eq!(display_temperature(15.0, TemperatureUnit::Celsius), 15);
        assert_eq!(display_temperature(14.6, TemperatureUnit::Celsius), 15);
        assert_eq!(display_temperature(14.4, TemperatureUnit::Celsius), 14);
        assert_eq!(display_temperature(-3.7, TemperatureUnit::Celsius), -4);
    }

    #[test]
    fn fahrenheit_converts_then_rounds() {
        assert_eq!(display_temperature(15.0, TemperatureUnit::Fahrenheit), 59);
        assert_eq!(display_temperature(0.0, TemperatureUnit::Fahrenheit), 32);
        assert_eq!(display_temperature(-40.0, TemperatureUnit::Fahrenheit), -40);
        assert_eq!(display_temperature(21.3, TemperatureUnit::Fahrenheit), 70);
    }

    #[test]
    fn toggling_twice_restores_display() {
        for raw in [-12.5, 0.0, 15.0, 27.8, 300.15] {
            let unit = TemperatureUnit::Celsius;
            let back = unit.toggle().toggle();
            assert_eq!(back, unit);
            assert_eq!(display_temperature(raw, back), display_temperature(raw, unit));
        }
    }

    #[test]
    fn distance_and_speed_conversions() {
        assert_eq!(meters_to_km(0.0), 0);
        assert_eq!(meters_to_km(1500.0), 2);
        assert_eq!(meters_to_km(10000.0), 10);
        assert_eq!(mps_to_mph(1.0), 2);
        assert_eq!(mps_to_mph(3.0), 7);
        assert_eq!(mps_to_mph(0.0), 0);
    }

    #[test]
    fn time_uses_twelve_hour_clock() {
        assert_eq!(format_time_in(1_700_000_000, &Utc), "10:13 PM");
        assert_eq!(format_time_in(1_700_040_000, &Utc), "09:20 AM");

        let paris = FixedOffset::east_opt(3600).unwrap();
        assert_eq!(format_time_in(1_700_000_000, &paris), "11:13 PM");
    }

    #[test]
    fn local_time_has_expected_shape() {
        let s = format_time(1_700_000_000);
        let (clock, suffix) = s.split_once(' ').unwrap();
        let (hh, mm) = clock.split_once(':').unwrap();

        assert!(suffix == "AM" || suffix == "PM", "unexpected suffix in {s}");
        assert_eq!(hh.len(), 2);
        assert_eq!(mm.len(), 2);
        let hour: u32 = hh.parse().unwrap();
        assert!((1..=12).contains(&hour));
        assert!(mm.parse::<u32>().unwrap() < 60);
    }

    #[test]
    fn out_of_range_timestamp_renders_placeholder() {
        assert_eq!(format_time_in(i64::MAX, &Utc), "--:--");
    }

    #[test]
    fn unit_parsing() {
        assert_eq!(TemperatureUnit::try_from("F").unwrap(), TemperatureUnit::Fahrenheit);
        assert_eq!(TemperatureUnit::try_from(" celsius ").unwrap(), TemperatureUnit::Celsius);
        let err = TemperatureUnit::try_from("kelvin").unwrap_err();
        assert!(err.to_string().contains("Unknown temperature unit"));
    }

    #[test]
    fn unit_str_roundtrip() {
        for unit in TemperatureUnit::all() {
            assert_eq!(TemperatureUnit::try_from(unit.as_str()).unwrap(), *unit);
        }
    }
}
