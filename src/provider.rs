//! Weather provider client
//!
//! Fetches current conditions from a weatherapi.com-style query endpoint with
//! a single blocking GET. Callers on the async path run [`WeatherClient::fetch_current`]
//! under `tokio::task::spawn_blocking`. There is no retry and no cache: the
//! request either yields an observation or fails with
//! [`ProviderError::DataUnavailable`].

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Default current-conditions endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.weatherapi.com/v1/current.json";

const USER_AGENT: &str = "tmux-statusline/0.3";

/// The single recoverable provider failure. The caller decides whether to
/// show a placeholder or propagate.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("weather data unavailable: {0}")]
    DataUnavailable(String),
}

/// Current conditions as consumed by the weather segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Free-text condition description, the classification key.
    pub condition_text: String,
    pub temperature: f64,
}

/// Temperature unit picked out of the provider response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Units {
    #[default]
    Fahrenheit,
    Celsius,
}

impl Units {
    /// Parse a config value, defaulting to Fahrenheit for unknown input.
    #[must_use]
    pub fn from_name(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "c" | "celsius" | "metric" => Self::Celsius,
            _ => Self::Fahrenheit,
        }
    }
}

/// Blocking client for the current-conditions endpoint.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    endpoint: String,
    api_key: String,
    location: String,
    units: Units,
    timeout: Duration,
}

impl WeatherClient {
    #[must_use]
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        location: impl Into<String>,
        units: Units,
        timeout: Duration,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            location: location.into(),
            units,
            timeout,
        }
    }

    /// Fetch the current observation.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::DataUnavailable`] when the endpoint is
    /// unreachable, responds with a non-success status, or the body lacks the
    /// condition text or temperature.
    pub fn fetch_current(&self) -> Result<Observation, ProviderError> {
        let response = ureq::get(&self.endpoint)
            .query("key", &self.api_key)
            .query("q", &self.location)
            .timeout(self.timeout)
            .set("User-Agent", USER_AGENT)
            .call()
            .map_err(|err| ProviderError::DataUnavailable(truncate_message(&err.to_string())))?;

        let parsed: ApiResponse = response
            .into_json()
            .map_err(|err| ProviderError::DataUnavailable(format!("malformed response: {err}")))?;

        observation_from_response(parsed, self.units)
    }
}

fn observation_from_response(
    parsed: ApiResponse,
    units: Units,
) -> Result<Observation, ProviderError> {
    let scalar = match units {
        Units::Fahrenheit => parsed.current.temp_f,
        Units::Celsius => parsed.current.temp_c,
    };

    let temperature = scalar
        .as_ref()
        .and_then(Scalar::as_f64)
        .ok_or_else(|| ProviderError::DataUnavailable("response missing temperature".to_string()))?;

    let condition_text = parsed.current.condition.text.trim().to_string();
    if condition_text.is_empty() {
        return Err(ProviderError::DataUnavailable(
            "response missing condition text".to_string(),
        ));
    }

    Ok(Observation {
        condition_text,
        temperature,
    })
}

fn truncate_message(message: &str) -> String {
    const MAX: usize = 200;
    if message.len() > MAX {
        let mut end = MAX;
        while !message.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &message[..end])
    } else {
        message.to_string()
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    current: ApiCurrent,
}

#[derive(Debug, Deserialize)]
struct ApiCurrent {
    condition: ApiCondition,
    #[serde(default)]
    temp_c: Option<Scalar>,
    #[serde(default)]
    temp_f: Option<Scalar>,
}

#[derive(Debug, Deserialize)]
struct ApiCondition {
    #[serde(default)]
    text: String,
}

/// Providers send temperature either as a JSON number or a numeric string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Number(f64),
    Text(String),
}

impl Scalar {
    fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(value) => value.trim().parse().ok(),
        }
    }
}
