//! Pure mapping from view state to what gets drawn.

use chrono::{Local, TimeZone};
use std::fmt::{self, Display};

use crate::{
    model::WeatherSnapshot,
    units::{TemperatureUnit, display_temperature, format_time_in, meters_to_km, mps_to_mph},
    view::{Phase, ViewState},
};

pub const PROMPT: &str = "Search for a city to see weather";
pub const LOADING: &str = "Loading...";

/// One tile of the details grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metric {
    pub label: &'static str,
    pub value: String,
}

/// Everything shown once a snapshot is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub query: String,
    pub location: String,
    pub condition: String,
    pub temperature: String,
    pub unit: TemperatureUnit,
    /// Humidity, wind, sunrise, visibility, pressure, sunset; always in that order.
    pub metrics: [Metric; 6],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Empty { query: String },
    Loading { query: String },
    Loaded(Report),
}

/// Render with sunrise/sunset in the machine's local zone.
pub fn render(state: &ViewState) -> Screen {
    render_in(state, &Local)
}

pub fn render_in<Tz>(state: &ViewState, tz: &Tz) -> Screen
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let query = state.city().to_string();

    match (state.phase(), state.snapshot()) {
        (Phase::Loaded, Some(snapshot)) => Screen::Loaded(report(query, snapshot, state.unit(), tz)),
        (Phase::Loading, _) => Screen::Loading { query },
        _ => Screen::Empty { query },
    }
}

fn report<Tz>(query: String, snapshot: &WeatherSnapshot, unit: TemperatureUnit, tz: &Tz) -> Report
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    Report {
        query,
        location: snapshot.location(),
        condition: snapshot.condition().to_string(),
        temperature: format!(
            "{}°{}",
            display_temperature(snapshot.temperature(), unit),
            unit.symbol()
        ),
        unit,
        metrics: [
            metric("Humidity", format!("{}%", snapshot.humidity_pct())),
            metric("Wind", format!("{} mph", mps_to_mph(snapshot.wind_speed_mps()))),
            metric("Sunrise", format_time_in(snapshot.sunrise(), tz)),
            metric("Visibility", format!("{} km", meters_to_km(snapshot.visibility_m()))),
            metric("Pressure", format!("{} hPa", snapshot.pressure_hpa())),
            metric("Sunset", format_time_in(snapshot.sunset(), tz)),
        ],
    }
}

fn metric(label: &'static str, value: String) -> Metric {
    Metric { label, value }
}

impl Screen {
    pub fn query(&self) -> &str {
        match self {
            Screen::Empty { query } | Screen::Loading { query } => query,
            Screen::Loaded(report) => &report.query,
        }
    }
}

const TILE_WIDTH: usize = 22;

impl Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[ search: {} ]", self.query())?;
        writeln!(f)?;

        let report = match self {
            Screen::Empty { .. } => return writeln!(f, "{PROMPT}"),
            Screen::Loading { .. } => return writeln!(f, "{LOADING}"),
            Screen::Loaded(report) => report,
        };

        let (c, fahr) = match report.unit {
            TemperatureUnit::Celsius => ("(*)", "( )"),
            TemperatureUnit::Fahrenheit => ("( )", "(*)"),
        };

        writeln!(f, "{}", report.location)?;
        writeln!(f, "{}", report.condition)?;
        writeln!(f, "{}", report.temperature)?;
        writeln!(f, "{c} °C  {fahr} °F")?;
        writeln!(f)?;

        for row in report.metrics.chunks(3) {
            for tile in row {
                write!(f, "{:<TILE_WIDTH$}", tile.value)?;
            }
            writeln!(f)?;
            for tile in row {
                write!(f, "{:<TILE_WIDTH$}", tile.label)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SourcePayload, tests::paris};
    use chrono::Utc;

    fn loaded_state(unit: TemperatureUnit) -> ViewState {
        let mut state = ViewState::new(unit);
        state.set_city("Paris");
        let ticket = state.begin_search().unwrap();
        state.finish_search(&ticket, Ok(SourcePayload::Success(paris())));
        state
    }

    fn values(report: &Report) -> Vec<(&str, &str)> {
        report.metrics.iter().map(|m| (m.label, m.value.as_str())).collect()
    }

    #[test]
    fn empty_state_shows_prompt() {
        let screen = render_in(&ViewState::default(), &Utc);
        assert_eq!(screen, Screen::Empty { query: String::new() });
        assert!(screen.to_string().contains(PROMPT));
    }

    #[test]
    fn loading_without_snapshot_shows_loading() {
        let mut state = ViewState::default();
        state.set_city("Paris");
        state.begin_search().unwrap();

        let screen = render_in(&state, &Utc);
        assert_eq!(screen, Screen::Loading { query: "Paris".into() });
        assert!(screen.to_string().contains(LOADING));
    }

    #[test]
    fn paris_scenario() {
        let Screen::Loaded(report) = render_in(&loaded_state(TemperatureUnit::Celsius), &Utc)
        else {
            panic!("expected loaded screen");
        };

        assert_eq!(report.location, "Paris,FR");
        assert_eq!(report.condition, "Clear");
        assert_eq!(report.temperature, "15°C");
        assert_eq!(
            values(&report),
            vec![
                ("Humidity", "60%"),
                ("Wind", "7 mph"),
                ("Sunrise", "10:13 PM"),
                ("Visibility", "10 km"),
                ("Pressure", "1012 hPa"),
                ("Sunset", "09:20 AM"),
            ]
        );
    }

    #[test]
    fn fahrenheit_changes_only_temperature() {
        let celsius = render_in(&loaded_state(TemperatureUnit::Celsius), &Utc);
        let mut state = loaded_state(TemperatureUnit::Celsius);
        state.toggle_unit();
        let fahrenheit = render_in(&state, &Utc);

        let (Screen::Loaded(c), Screen::Loaded(f)) = (celsius, fahrenheit) else {
            panic!("expected loaded screens");
        };
        assert_eq!(f.temperature, "59°F");
        assert_eq!(c.metrics, f.metrics);
    }

    #[test]
    fn loaded_snapshot_stays_visible_while_loading() {
        let mut state = loaded_state(TemperatureUnit::Celsius);
        state.set_city("Lyon");
        state.begin_search().unwrap();

        let Screen::Loaded(report) = render_in(&state, &Utc) else {
            panic!("expected loaded screen");
        };
        assert_eq!(report.query, "Lyon");
        assert_eq!(report.location, "Paris,FR");
    }

    #[test]
    fn text_card_lists_every_tile() {
        let text = render_in(&loaded_state(TemperatureUnit::Celsius), &Utc).to_string();

        for needle in [
            "[ search: Paris ]",
            "Paris,FR",
            "15°C",
            "(*) °C  ( ) °F",
            "Humidity",
            "1012 hPa",
            "09:20 AM",
        ] {
            assert!(text.contains(needle), "missing {needle:?} in:\n{text}");
        }
    }

    #[test]
    fn render_is_repeatable() {
        let state = loaded_state(TemperatureUnit::Fahrenheit);
        assert_eq!(render_in(&state, &Utc), render_in(&state, &Utc));
    }
}
