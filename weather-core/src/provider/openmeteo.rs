use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::{fmt, sync::Arc};

use crate::{
    codes::weather_code_lookup,
    error::Result,
    geocode::Geocoder,
    http::{get_json, join_url},
    model::{Coordinates, DisplayRecord},
};

use super::{ProviderId, WeatherProvider};

pub const OPEN_METEO_URL: &str = "https://api.open-meteo.com";

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,weather_code,wind_speed_10m";

/// Primary provider. Keyless, but needs coordinates, so every lookup geocodes first.
#[derive(Clone)]
pub struct OpenMeteoProvider {
    http: Client,
    base_url: String,
    geocoder: Arc<dyn Geocoder>,
}

impl fmt::Debug for OpenMeteoProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenMeteoProvider")
            .field("base_url", &self.base_url)
            .field("geocoder", &self.geocoder)
            .finish_non_exhaustive()
    }
}

impl OpenMeteoProvider {
    pub fn new(http: Client, geocoder: Arc<dyn Geocoder>) -> Self {
        Self::with_base_url(http, geocoder, OPEN_METEO_URL)
    }

    pub fn with_base_url(http: Client, geocoder: Arc<dyn Geocoder>, base_url: impl Into<String>) -> Self {
        Self { http, base_url: base_url.into(), geocoder }
    }

    async fn fetch_current(&self, coords: Coordinates) -> Result<OmCurrent> {
        let url = join_url(&self.base_url, "v1/forecast");

        let request = self.http.get(url).query(&[
            ("latitude", coords.latitude.to_string()),
            ("longitude", coords.longitude.to_string()),
            ("current", CURRENT_FIELDS.to_string()),
            ("timezone", "auto".to_string()),
        ]);

        let parsed: OmResponse = get_json(request, "Open-Meteo").await?;
        Ok(parsed.current)
    }
}

#[derive(Debug, Deserialize)]
struct OmResponse {
    current: OmCurrent,
}

#[derive(Debug, Deserialize)]
struct OmCurrent {
    temperature_2m: f64,
    relative_humidity_2m: f64,
    weather_code: i64,
    wind_speed_10m: f64,
}

/// Open-Meteo reports no apparent temperature in this query, so feels-like mirrors the air temperature.
fn normalize(city: &str, current: &OmCurrent) -> DisplayRecord {
    let info = weather_code_lookup(current.weather_code);

    DisplayRecord {
        city_name: city.to_string(),
        temperature_c: current.temperature_2m,
        humidity_pct: current.relative_humidity_2m,
        wind_kph: current.wind_speed_10m,
        feels_like_c: current.temperature_2m,
        description: info.description.to_string(),
        icon_url: info.icon_url.to_string(),
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    fn id(&self) -> ProviderId {
        ProviderId::OpenMeteo
    }

    async fn fetch_weather(&self, city: &str) -> Result<DisplayRecord> {
        let coords = self.geocoder.geocode_city(city).await?;
        let current = self.fetch_current(coords).await?;
        Ok(normalize(city, &current))
    }
}
