//! The weather view's state and the transitions that mutate it.
//!
//! `ViewState` is plain data. `WeatherView` pairs it with a source and drives
//! one search at a time through `submit`.

use tracing::{debug, error, info, warn};

use crate::{
    model::{SourcePayload, WeatherSnapshot},
    render::{Screen, render},
    source::{SourceError, WeatherSource},
    units::TemperatureUnit,
};

/// What the renderer should show, derived from snapshot presence and loading flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Empty,
    Loading,
    Loaded,
}

/// Handle for one submitted search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    id: u64,
    city: String,
}

impl SearchTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Trimmed city name that was submitted.
    pub fn city(&self) -> &str {
        &self.city
    }
}

/// How a finished search affected the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Snapshot replaced.
    Updated,
    /// Source answered with a non-200 status; snapshot kept.
    Rejected(Option<i64>),
    /// Request or parse error; snapshot kept.
    Failed,
    /// A newer search was submitted meanwhile; result dropped.
    Stale,
}

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    city: String,
    snapshot: Option<WeatherSnapshot>,
    unit: TemperatureUnit,
    loading: bool,
    issued: u64,
}

impl ViewState {
    pub fn new(unit: TemperatureUnit) -> Self {
        Self { unit, ..Self::default() }
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn unit(&self) -> TemperatureUnit {
        self.unit
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn phase(&self) -> Phase {
        match (&self.snapshot, self.loading) {
            (Some(_), _) => Phase::Loaded,
            (None, true) => Phase::Loading,
            (None, false) => Phase::Empty,
        }
    }

    /// Replace the pending city text. No validation.
    pub fn set_city(&mut self, city: impl Into<String>) {
        self.city = city.into();
    }

    pub fn toggle_unit(&mut self) {
        self.unit = self.unit.toggle();
    }

    /// Start a search for the current city text.
    ///
    /// Blank input yields `None` and leaves the state untouched.
    pub fn begin_search(&mut self) -> Option<SearchTicket> {
        let city = self.city.trim();
        if city.is_empty() {
            return None;
        }

        self.issued += 1;
        self.loading = true;

        Some(SearchTicket { id: self.issued, city: city.to_string() })
    }

    /// Apply the outcome of `ticket`'s fetch.
    ///
    /// Only the most recently issued ticket may touch the state.
    pub fn finish_search(
        &mut self,
        ticket: &SearchTicket,
        result: Result<SourcePayload, SourceError>,
    ) -> Completion {
        if ticket.id != self.issued {
            warn!(
                city = ticket.city(),
                ticket = ticket.id,
                latest = self.issued,
                "dropping response for superseded search"
            );
            return Completion::Stale;
        }

        self.loading = false;

        match result {
            Ok(SourcePayload::Success(snapshot)) => {
                debug!(city = ticket.city(), location = %snapshot.location(), "weather updated");
                self.snapshot = Some(snapshot);
                Completion::Updated
            }
            Ok(SourcePayload::Rejected { code, message }) => {
                info!(city = ticket.city(), ?code, ?message, "weather source rejected lookup");
                Completion::Rejected(code)
            }
            Err(e) => {
                error!(city = ticket.city(), error = %e, "error fetching weather");
                Completion::Failed
            }
        }
    }
}

/// A view bound to the source it searches against.
#[derive(Debug)]
pub struct WeatherView {
    state: ViewState,
    source: Box<dyn WeatherSource>,
}

impl WeatherView {
    pub fn new(source: Box<dyn WeatherSource>, unit: TemperatureUnit) -> Self {
        Self { state: ViewState::new(unit), source }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn set_city(&mut self, city: impl Into<String>) {
        self.state.set_city(city);
    }

    pub fn toggle_unit(&mut self) {
        self.state.toggle_unit();
    }

    /// Search for the current city text. `None` when the text was blank.
    pub async fn submit(&mut self) -> Option<Completion> {
        let ticket = self.state.begin_search()?;
        let result = self.source.fetch(ticket.city()).await;
        Some(self.state.finish_search(&ticket, result))
    }

    pub fn screen(&self) -> Screen {
        render(&self.state)
    }
}
