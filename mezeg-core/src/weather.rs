//! Current-conditions client for WeatherAPI.com.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{error::Error, model::WeatherReading};

const WEATHER_API_BASE: &str = "https://api.weatherapi.com/v1";

/// Source of current conditions. The orchestrator only sees this trait, so
/// tests can script readings without a network.
#[async_trait]
pub trait WeatherSource: Send + Sync + std::fmt::Debug {
    async fn current(&self, canonical_name: &str) -> Result<WeatherReading, Error>;
}

#[derive(Debug, Clone)]
pub struct WeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, WEATHER_API_BASE)
    }

    /// Point the client at a different endpoint; used by tests.
    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        Self { api_key, base_url: base_url.into(), http: Client::new() }
    }
}

#[async_trait]
impl WeatherSource for WeatherClient {
    async fn current(&self, canonical_name: &str) -> Result<WeatherReading, Error> {
        let url = format!("{}/current.json", self.base_url);
        tracing::debug!(locality = canonical_name, "fetching current conditions");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", canonical_name),
                ("lang", "en"),
            ])
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(Error::Status { status: status.as_u16() });
        }

        let body = res.text().await?;
        let parsed: WaResponse = serde_json::from_str(&body)
            .map_err(|err| Error::Parse(format!("weather response: {err}")))?;

        Ok(map_reading(parsed))
    }
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
    country: String,
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
    wind_kph: f64,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaResponse {
    location: WaLocation,
    current: WaCurrent,
}

fn map_reading(raw: WaResponse) -> WeatherReading {
    WeatherReading {
        location_name: raw.location.name,
        country: raw.location.country,
        temperature_c: raw.current.temp_c,
        condition_text: raw.current.condition.text,
        condition_icon_url: absolutize_icon_url(&raw.current.condition.icon),
        wind_kph: raw.current.wind_kph,
    }
}

/// WeatherAPI returns protocol-relative icon URLs (`//cdn.weatherapi.com/...`);
/// everything downstream expects a scheme-qualified one.
fn absolutize_icon_url(icon: &str) -> String {
    match icon.strip_prefix("//") {
        Some(rest) => format!("https://{rest}"),
        None => icon.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const BODY: &str = r#"{
        "location": {"name": "Haifa", "country": "Israel"},
        "current": {
            "temp_c": 27.3,
            "wind_kph": 14.8,
            "condition": {
                "text": "Sunny",
                "icon": "//cdn.weatherapi.com/weather/64x64/day/113.png"
            }
        }
    }"#;

    #[test]
    fn protocol_relative_icon_url_is_rewritten_to_https() {
        assert_eq!(
            absolutize_icon_url("//cdn.example.com/icon.png"),
            "https://cdn.example.com/icon.png"
        );
    }

    #[test]
    fn absolute_icon_url_is_left_alone() {
        assert_eq!(
            absolutize_icon_url("https://cdn.example.com/icon.png"),
            "https://cdn.example.com/icon.png"
        );
    }

    #[tokio::test]
    async fn current_maps_the_provider_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/current.json"))
            .and(query_param("key", "KEY"))
            .and(query_param("q", "Haifa"))
            .and(query_param("lang", "en"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(BODY, "application/json"))
            .mount(&server)
            .await;

        let client = WeatherClient::with_base_url("KEY".into(), server.uri());
        let reading = client.current("Haifa").await.expect("lookup should succeed");

        assert_eq!(reading.location_name, "Haifa");
        assert_eq!(reading.country, "Israel");
        assert_eq!(reading.temperature_c, 27.3);
        assert_eq!(reading.condition_text, "Sunny");
        assert_eq!(
            reading.condition_icon_url,
            "https://cdn.weatherapi.com/weather/64x64/day/113.png"
        );
        assert_eq!(reading.wind_kph, 14.8);
    }

    #[tokio::test]
    async fn current_reports_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = WeatherClient::with_base_url("KEY".into(), server.uri());
        let err = client.current("Haifa").await.unwrap_err();
        assert!(matches!(err, Error::Status { status: 500 }));
    }

    #[tokio::test]
    async fn current_reports_unexpected_shape_as_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw("[1,2,3]", "application/json"),
            )
            .mount(&server)
            .await;

        let client = WeatherClient::with_base_url("KEY".into(), server.uri());
        let err = client.current("Haifa").await.unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }
}
