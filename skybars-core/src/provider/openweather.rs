use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::{
    error::WeatherError,
    model::{CityZone, Observation, Reading},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

const REQUEST_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = concat!("skybars/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            http,
        })
    }

    /// Point the provider at another endpoint root, e.g. a local mock.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn current_url(&self) -> String {
        format!("{}/weather", self.base_url)
    }

    fn parse_current(query: &str, body: &str) -> Result<Observation, WeatherError> {
        let parsed: OwCurrentResponse = serde_json::from_str(body)?;

        if parsed.main.humidity > 100 {
            return Err(WeatherError::MalformedResponse(format!(
                "humidity {} is outside 0..=100",
                parsed.main.humidity
            )));
        }

        let reading = Reading::from_kelvin(
            parsed.main.temp,
            parsed.main.temp_max,
            parsed.main.temp_min,
            parsed.main.humidity,
        );

        let location_name = match parsed.sys.and_then(|s| s.country) {
            Some(country) if !parsed.name.is_empty() => format!("{}, {}", parsed.name, country),
            _ if !parsed.name.is_empty() => parsed.name,
            _ => query.to_string(),
        };

        Ok(Observation {
            location_name,
            reading,
            zone: CityZone::from_offset_secs(parsed.timezone),
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    temp_max: f64,
    temp_min: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    #[serde(default)]
    name: String,
    main: OwMain,
    /// Shift from UTC in seconds; required.
    timezone: i32,
    sys: Option<OwSys>,
}

/// Error payload; `cod` arrives as a string or a number depending on endpoint.
#[derive(Debug, Deserialize)]
struct OwError {
    cod: serde_json::Value,
}

impl OwError {
    fn is_not_found(&self) -> bool {
        match &self.cod {
            serde_json::Value::String(s) => s == "404",
            serde_json::Value::Number(n) => n.as_u64() == Some(404),
            _ => false,
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip(self))]
    async fn fetch_observation(&self, query: &str) -> Result<Observation, WeatherError> {
        let url = self.current_url();
        debug!(url = %url, "Fetching current weather");

        let res = self
            .http
            .get(&url)
            .query(&[("q", query), ("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| WeatherError::Network(e.to_string()))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| WeatherError::Network(e.to_string()))?;

        if status == StatusCode::NOT_FOUND {
            return Err(WeatherError::NotFound(query.to_string()));
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(WeatherError::Unauthorized);
        }
        if !status.is_success() {
            warn!(%status, "OpenWeather request failed");
            return Err(WeatherError::Http {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        // Some gateways answer 200 with an error document.
        if let Ok(err) = serde_json::from_str::<OwError>(&body) {
            if err.is_not_found() {
                return Err(WeatherError::NotFound(query.to_string()));
            }
        }

        Self::parse_current(query, &body)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn seattle_body() -> serde_json::Value {
        serde_json::json!({
            "name": "Seattle",
            "cod": 200,
            "timezone": -25200,
            "sys": { "country": "US" },
            "main": {
                "temp": 285.93,
                "temp_max": 288.15,
                "temp_min": 283.71,
                "humidity": 72
            }
        })
    }

    async fn provider_for(server: &MockServer) -> OpenWeatherProvider {
        OpenWeatherProvider::new("KEY".into())
            .expect("client creation should succeed")
            .with_base_url(&server.uri())
    }

    #[tokio::test]
    async fn parses_current_weather() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "seattle"))
            .and(query_param("appid", "KEY"))
            .respond_with(ResponseTemplate::new(200).set_body_json(seattle_body()))
            .mount(&server)
            .await;

        let provider = provider_for(&server).await;
        let obs = provider.fetch_observation("seattle").await.expect("should parse");

        assert_eq!(obs.location_name, "Seattle, US");
        assert_eq!(obs.reading, Reading { current: 12, max: 15, min: 10, humidity_pct: 72 });
        assert_eq!(obs.zone.label, "UTC-07:00");
    }

    #[tokio::test]
    async fn free_text_query_is_passed_through() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "New York"))
            .respond_with(ResponseTemplate::new(200).set_body_json(seattle_body()))
            .mount(&server)
            .await;

        let provider = provider_for(&server).await;
        assert!(provider.fetch_weather("New York").await.is_ok());
    }

    #[tokio::test]
    async fn not_found_status_maps_to_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "cod": "404",
                "message": "city not found"
            })))
            .mount(&server)
            .await;

        let provider = provider_for(&server).await;
        let err = provider.fetch_observation("Atlantis").await.unwrap_err();
        assert!(matches!(err, WeatherError::NotFound(ref q) if q == "Atlantis"));
    }

    #[tokio::test]
    async fn unauthorized_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let provider = provider_for(&server).await;
        let err = provider.fetch_observation("seattle").await.unwrap_err();
        assert!(matches!(err, WeatherError::Unauthorized));
    }

    #[tokio::test]
    async fn server_error_keeps_status_and_truncated_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("x".repeat(500)))
            .mount(&server)
            .await;

        let provider = provider_for(&server).await;
        match provider.fetch_observation("seattle").await.unwrap_err() {
            WeatherError::Http { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body.len(), 203);
                assert!(body.ends_with("..."));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_fields_are_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "Seattle",
                "main": { "temp": 285.0 }
            })))
            .mount(&server)
            .await;

        let provider = provider_for(&server).await;
        let err = provider.fetch_observation("seattle").await.unwrap_err();
        assert!(matches!(err, WeatherError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn unreachable_provider_is_network_error() {
        let provider = OpenWeatherProvider::new("KEY".into())
            .expect("client creation should succeed")
            .with_base_url("http://127.0.0.1:9");

        let err = provider.fetch_observation("seattle").await.unwrap_err();
        assert!(matches!(err, WeatherError::Network(_)));
    }

    #[test]
    fn humidity_above_hundred_is_rejected() {
        let body = r#"{"name":"X","timezone":0,"main":{"temp":280,"temp_max":281,"temp_min":279,"humidity":140}}"#;
        let err = OpenWeatherProvider::parse_current("x", body).unwrap_err();
        assert!(err.to_string().contains("humidity 140"));
    }

    #[test]
    fn nameless_response_falls_back_to_query() {
        let body = r#"{"timezone":0,"main":{"temp":280,"temp_max":281,"temp_min":279,"humidity":40}}"#;
        let obs = OpenWeatherProvider::parse_current("somewhere", body).expect("should parse");
        assert_eq!(obs.location_name, "somewhere");
        assert_eq!(obs.zone.label, "UTC+00:00");
    }

    #[test]
    fn missing_timezone_is_malformed() {
        let body = r#"{"name":"X","main":{"temp":280,"temp_max":281,"temp_min":279,"humidity":40}}"#;
        let err = OpenWeatherProvider::parse_current("x", body).unwrap_err();
        assert!(matches!(err, WeatherError::MalformedResponse(ref msg) if msg.contains("timezone")));
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let body = "é".repeat(300);
        let truncated = truncate_body(&body);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }
}
