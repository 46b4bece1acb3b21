use crate::{
    Config,
    error::WeatherError,
    model::{CityZone, Observation, Reading},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Asynchronous source of current weather for a free-text city query.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// One round trip: reading, resolved name and UTC offset.
    async fn fetch_observation(&self, query: &str) -> Result<Observation, WeatherError>;

    async fn fetch_weather(&self, query: &str) -> Result<Reading, WeatherError> {
        self.fetch_observation(query).await.map(|obs| obs.reading)
    }

    async fn fetch_time_zone(&self, query: &str) -> Result<CityZone, WeatherError> {
        self.fetch_observation(query).await.map(|obs| obs.zone)
    }
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeather API key configured.\n\
                 Hint: run `skybars configure` and enter your API key."
        )
    })?;

    let provider = OpenWeatherProvider::new(api_key.to_owned())?.with_base_url(&config.base_url);

    Ok(Box::new(provider))
}
