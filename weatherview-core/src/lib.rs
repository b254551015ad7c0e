//! Core library for the `weatherview` CLI.
//!
//! This crate defines:
//! - The weather snapshot model and its JSON payload parsing
//! - Unit conversions for display
//! - Data sources (live OpenWeather, static JSON file)
//! - The view state machine and its pure renderer
//! - Configuration handling
//!
//! It is used by `weatherview-cli`, but the view can be driven by any front end.

pub mod config;
pub mod model;
pub mod render;
pub mod source;
pub mod units;
pub mod view;

pub use config::{Config, FileConfig, OpenWeatherConfig};
pub use model::{SourcePayload, WeatherSnapshot};
pub use render::{Metric, Report, Screen, render, render_in};
pub use source::{SourceError, SourceId, WeatherSource};
pub use units::TemperatureUnit;
pub use view::{Completion, Phase, SearchTicket, ViewState, WeatherView};
