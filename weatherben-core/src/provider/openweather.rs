use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{error::ProviderError, model::WeatherRecord};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            api_key,
            base_url,
            http: Client::new(),
        }
    }

    /// URL of the current-weather endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}/weather", self.base_url)
    }
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp_min: f64,
    temp_max: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    sys: OwSys,
    main: OwMain,
    weather: Vec<OwWeather>,
    timezone: i32,
}

impl From<OwCurrentResponse> for WeatherRecord {
    fn from(parsed: OwCurrentResponse) -> Self {
        let (condition_main, condition_description) = parsed
            .weather
            .into_iter()
            .next()
            .map(|w| (w.main, w.description))
            .unwrap_or_else(|| ("Unknown".to_string(), "unknown".to_string()));

        WeatherRecord {
            city_name: parsed.name,
            country_code: parsed.sys.country,
            temperature_min: parsed.main.temp_min,
            temperature_max: parsed.main.temp_max,
            humidity_percent: parsed.main.humidity,
            condition_main,
            condition_description,
            timezone_offset_seconds: parsed.timezone,
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(&self, query: &str) -> Result<WeatherRecord, ProviderError> {
        tracing::debug!(query, "requesting current weather");

        let res = self
            .http
            .get(self.endpoint())
            .query(&[
                ("q", query),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let parsed: OwCurrentResponse = serde_json::from_str(&body)?;

        Ok(parsed.into())
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

    const BANGKOK: &str = r#"{
        "coord": {"lon": 100.5167, "lat": 13.75},
        "weather": [{"id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d"}],
        "main": {
            "temp": 31.2, "feels_like": 36.4, "temp_min": 30.1, "temp_max": 32.6,
            "pressure": 1008, "humidity": 62
        },
        "sys": {"type": 1, "id": 9235, "country": "TH", "sunrise": 1710024335},
        "timezone": 25200,
        "name": "Bangkok",
        "cod": 200
    }"#;

    #[test]
    fn parses_current_response() {
        let parsed: OwCurrentResponse = serde_json::from_str(BANGKOK).unwrap();
        let record = WeatherRecord::from(parsed);

        assert_eq!(record.city_name, "Bangkok");
        assert_eq!(record.country_code, "TH");
        assert_eq!(record.temperature_min, 30.1);
        assert_eq!(record.temperature_max, 32.6);
        assert_eq!(record.humidity_percent, 62);
        assert_eq!(record.condition_main, "Clouds");
        assert_eq!(record.condition_description, "broken clouds");
        assert_eq!(record.timezone_offset_seconds, 25200);
    }

    #[test]
    fn missing_condition_falls_back_to_unknown() {
        let json = BANGKOK.replace(
            r#"[{"id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d"}]"#,
            "[]",
        );
        let parsed: OwCurrentResponse = serde_json::from_str(&json).unwrap();
        let record = WeatherRecord::from(parsed);

        assert_eq!(record.condition_main, "Unknown");
    }

    #[test]
    fn truncates_long_bodies() {
        let long = "x".repeat(250);
        let out = truncate_body(&long);
        assert_eq!(out.len(), 203);
        assert!(out.ends_with("..."));
        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn base_url_trailing_slash_is_ignored() {
        let provider = OpenWeatherProvider::with_base_url("k".into(), "http://example.test/");
        assert_eq!(provider.endpoint(), "http://example.test/weather");
        assert_eq!(
            OpenWeatherProvider::new("k".into()).endpoint(),
            "https://api.openweathermap.org/data/2.5/weather"
        );
    }
}
