//! The display model: last known reading, scale preference and fetch status.
//!
//! Fetches are issued with a [`RequestTicket`]. Only the most recently
//! issued ticket may update the model, so a slow response for an earlier
//! city can never overwrite a newer one.

use tracing::{info, warn};

use crate::{
    error::WeatherError,
    model::{CityZone, Metric, Observation, Reading},
    scale::{Converted, TemperatureScale, convert},
};

/// Sequence number handed out when a fetch is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn seq(&self) -> u64 {
        self.0
    }
}

/// User-visible fetch status.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(String),
}

/// Outcome of feeding a fetch result into the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Updated,
    Failed,
    /// A newer request was issued after this one; the result was dropped.
    Stale,
}

#[derive(Debug, Clone, Default)]
pub struct DisplayModel {
    scale: TemperatureScale,
    reading: Option<Reading>,
    city: Option<String>,
    location_name: Option<String>,
    zone: Option<CityZone>,
    status: Status,
    issued: u64,
}

impl DisplayModel {
    pub fn new(scale: TemperatureScale) -> Self {
        Self {
            scale,
            ..Self::default()
        }
    }

    pub fn scale(&self) -> TemperatureScale {
        self.scale
    }

    pub fn set_scale(&mut self, scale: TemperatureScale) {
        self.scale = scale;
    }

    pub fn toggle_scale(&mut self) -> TemperatureScale {
        self.scale = self.scale.toggle();
        self.scale
    }

    pub fn reading(&self) -> Option<&Reading> {
        self.reading.as_ref()
    }

    pub fn zone(&self) -> Option<&CityZone> {
        self.zone.as_ref()
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    /// City most recently requested.
    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    /// Name of the place the shown reading belongs to, falling back to
    /// the raw query before the first success.
    pub fn title(&self) -> Option<&str> {
        self.location_name.as_deref().or(self.city.as_deref())
    }

    /// Register a new fetch for `city` and return its ticket.
    pub fn begin_request(&mut self, city: &str) -> RequestTicket {
        self.issued += 1;
        self.city = Some(city.to_string());
        self.status = Status::Loading;
        RequestTicket(self.issued)
    }

    pub fn is_latest(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.issued
    }

    /// Apply a fetch result. On failure the last good reading is kept.
    pub fn apply(
        &mut self,
        ticket: RequestTicket,
        result: Result<Observation, WeatherError>,
    ) -> Applied {
        if !self.is_latest(ticket) {
            warn!(
                ticket = ticket.0,
                latest = self.issued,
                "Dropping response for superseded request"
            );
            return Applied::Stale;
        }

        match result {
            Ok(obs) => {
                info!(
                    location = %obs.location_name,
                    temp_c = obs.reading.current,
                    humidity = obs.reading.humidity_pct,
                    "Reading updated"
                );
                self.reading = Some(obs.reading);
                self.location_name = Some(obs.location_name);
                self.zone = Some(obs.zone);
                self.status = Status::Ready;
                Applied::Updated
            }
            Err(err) => {
                warn!(error = %err, "Weather fetch failed; keeping last reading");
                self.status = Status::Failed(err.to_string());
                Applied::Failed
            }
        }
    }

    /// Temperature of `metric` in the selected scale, with its own coefficient.
    pub fn temperature(&self, metric: Metric) -> Option<Converted> {
        self.reading
            .map(|r| convert(self.scale, r.temperature(metric)))
    }

    pub fn humidity(&self) -> Option<u8> {
        self.reading.map(|r| r.humidity_pct)
    }
}
