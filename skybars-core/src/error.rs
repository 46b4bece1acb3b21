use thiserror::Error;

/// Failures of a weather provider round trip.
///
/// Every variant is recoverable: the display model keeps its last good
/// reading and shows the message instead.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Provider unreachable or the connection dropped.
    #[error("Network error: {0}")]
    Network(String),

    /// The query did not resolve to a known location.
    #[error("City not found: {0}")]
    NotFound(String),

    /// The response lacked expected fields or held impossible values.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The API key was rejected.
    #[error("API key rejected by provider")]
    Unauthorized,

    /// Any other non-success status.
    #[error("Request failed with status {status}: {body}")]
    Http { status: u16, body: String },
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            WeatherError::MalformedResponse(err.to_string())
        } else {
            WeatherError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for WeatherError {
    fn from(err: serde_json::Error) -> Self {
        WeatherError::MalformedResponse(err.to_string())
    }
}
