use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::Result,
    http::{get_json, join_url},
    model::DisplayRecord,
};

use super::{ProviderId, WeatherProvider};

pub const WEATHERAPI_URL: &str = "https://api.weatherapi.com";

/// Secondary provider; only constructed when an API key is configured.
#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    http: Client,
    base_url: String,
}

impl WeatherApiProvider {
    pub fn new(http: Client, api_key: String) -> Self {
        Self::with_base_url(http, api_key, WEATHERAPI_URL)
    }

    pub fn with_base_url(http: Client, api_key: String, base_url: impl Into<String>) -> Self {
        Self { api_key, http, base_url: base_url.into() }
    }
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
    feelslike_c: f64,
    humidity: f64,
    wind_kph: f64,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaResponse {
    location: WaLocation,
    current: WaCurrent,
}

/// The service hands out protocol-relative icon paths (`//cdn.weatherapi.com/...`).
fn absolute_icon(icon: &str) -> String {
    if icon.starts_with("//") { format!("https:{icon}") } else { icon.to_string() }
}

fn normalize(parsed: WaResponse) -> DisplayRecord {
    DisplayRecord {
        city_name: parsed.location.name,
        temperature_c: parsed.current.temp_c,
        humidity_pct: parsed.current.humidity,
        wind_kph: parsed.current.wind_kph,
        feels_like_c: parsed.current.feelslike_c,
        icon_url: absolute_icon(&parsed.current.condition.icon),
        description: parsed.current.condition.text,
    }
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    fn id(&self) -> ProviderId {
        ProviderId::WeatherApi
    }

    async fn fetch_weather(&self, city: &str) -> Result<DisplayRecord> {
        let url = join_url(&self.base_url, "v1/current.json");

        let request = self
            .http
            .get(url)
            .query(&[("key", self.api_key.as_str()), ("q", city), ("aqi", "no")]);

        let parsed: WaResponse = get_json(request, "WeatherAPI.com").await?;
        Ok(normalize(parsed))
    }
}
