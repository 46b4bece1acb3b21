//! Core library for the `skybars` weather widget.
//!
//! This crate defines:
//! - Temperature scale conversion and per-bar display coefficients
//! - The display model (last reading, scale preference, fetch status)
//! - Bar and header layout in surface pixels
//! - Abstraction over weather providers, with an OpenWeather implementation
//! - Configuration handling
//!
//! It is used by `skybars-cli`, but has no terminal dependencies of its own.

pub mod clock;
pub mod config;
pub mod display;
pub mod error;
pub mod layout;
pub mod model;
pub mod provider;
pub mod scale;

pub use clock::{ClockLabels, Daylight};
pub use config::Config;
pub use display::{Applied, DisplayModel, RequestTicket, Status};
pub use error::WeatherError;
pub use layout::{Bar, BarKind, Label, PLACEHOLDER, Scene, Surface};
pub use model::{CityZone, Metric, Observation, Reading};
pub use provider::{WeatherProvider, provider_from_config};
pub use scale::{Converted, DisplayCoefficient, TemperatureScale, convert};
