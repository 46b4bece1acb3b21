use serde::{Deserialize, Serialize};

/// Offset between Kelvin and Celsius.
pub const KELVIN_OFFSET: f64 = 273.15;

/// Latest known weather snapshot, temperatures in whole degrees Celsius.
///
/// A `Reading` is always built as a whole; callers replace it, they never
/// patch individual fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    pub current: i32,
    pub max: i32,
    pub min: i32,
    pub humidity_pct: u8,
}

impl Reading {
    /// Build a reading from provider values in Kelvin.
    pub fn from_kelvin(current: f64, max: f64, min: f64, humidity_pct: u8) -> Self {
        Self {
            current: kelvin_to_celsius(current),
            max: kelvin_to_celsius(max),
            min: kelvin_to_celsius(min),
            humidity_pct,
        }
    }

    pub fn temperature(&self, metric: Metric) -> i32 {
        match metric {
            Metric::High => self.max,
            Metric::Current => self.current,
            Metric::Low => self.min,
        }
    }
}

/// `floor(kelvin - 273.15)`.
pub fn kelvin_to_celsius(kelvin: f64) -> i32 {
    (kelvin - KELVIN_OFFSET).floor() as i32
}

/// Which temperature of a reading a bar shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    High,
    Current,
    Low,
}

/// Fixed UTC offset of a city, with a printable label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityZone {
    pub offset_hours: f64,
    pub label: String,
}

impl CityZone {
    pub fn from_offset_secs(secs: i32) -> Self {
        let sign = if secs < 0 { '-' } else { '+' };
        let abs = secs.unsigned_abs();
        let hours = abs / 3600;
        let minutes = (abs % 3600) / 60;

        Self {
            offset_hours: f64::from(secs) / 3600.0,
            label: format!("UTC{sign}{hours:02}:{minutes:02}"),
        }
    }

    pub fn offset_secs(&self) -> i32 {
        (self.offset_hours * 3600.0).round() as i32
    }
}

/// Everything one provider round trip yields for a city.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub location_name: String,
    pub reading: Reading,
    pub zone: CityZone,
}
