use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    codes::{simple_icon, temperature_category},
    error::Result,
    http::{get_json, join_url},
    model::DisplayRecord,
};

use super::{ProviderId, WeatherProvider};

pub const API_NINJAS_URL: &str = "https://api.api-ninjas.com";

/// Last resort. The service gives numbers only, so the description is derived from temperature.
#[derive(Debug, Clone)]
pub struct ApiNinjasProvider {
    api_key: Option<String>,
    http: Client,
    base_url: String,
}

impl ApiNinjasProvider {
    pub fn new(http: Client, api_key: Option<String>) -> Self {
        Self::with_base_url(http, api_key, API_NINJAS_URL)
    }

    pub fn with_base_url(http: Client, api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self { api_key, http, base_url: base_url.into() }
    }
}

#[derive(Debug, Deserialize)]
struct NinjasResponse {
    temp: f64,
    humidity: f64,
    wind_speed: f64,
    feels_like: f64,
}

fn normalize(city: &str, parsed: &NinjasResponse) -> DisplayRecord {
    let category = temperature_category(parsed.temp);

    DisplayRecord {
        city_name: city.to_string(),
        temperature_c: parsed.temp,
        humidity_pct: parsed.humidity,
        wind_kph: parsed.wind_speed,
        feels_like_c: parsed.feels_like,
        description: category.to_string(),
        icon_url: simple_icon(category.as_str()).to_string(),
    }
}

#[async_trait]
impl WeatherProvider for ApiNinjasProvider {
    fn id(&self) -> ProviderId {
        ProviderId::ApiNinjas
    }

    async fn fetch_weather(&self, city: &str) -> Result<DisplayRecord> {
        let url = join_url(&self.base_url, "v1/weather");

        let mut request = self.http.get(url).query(&[("city", city)]);
        if let Some(key) = &self.api_key {
            request = request.header("X-Api-Key", key);
        }

        let parsed: NinjasResponse = get_json(request, "API Ninjas").await?;
        Ok(normalize(city, &parsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(temp: f64) -> NinjasResponse {
        NinjasResponse { temp, humidity: 55.0, wind_speed: 4.6, feels_like: temp - 1.0 }
    }

    #[test]
    fn description_follows_temperature() {
        assert_eq!(normalize("Reykjavik", &sample(3.0)).description, "Cold");
        assert_eq!(normalize("Lisbon", &sample(22.0)).description, "Clear");
        assert_eq!(normalize("Dubai", &sample(38.0)).description, "Hot");
    }

    #[test]
    fn cold_uses_snow_icon_and_keeps_searched_city() {
        let rec = normalize("Reykjavik", &sample(3.0));

        assert_eq!(rec.city_name, "Reykjavik");
        assert_eq!(rec.icon_url, "https://openweathermap.org/img/wn/13d@2x.png");
        assert_eq!(rec.feels_like_label(), "Feels like: 2°C");
        assert_eq!(rec.wind_label(), "Wind: 5 km/h");
    }
}
