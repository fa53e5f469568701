use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::provider::ProviderId;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Service-agnostic current conditions, ready to be rendered.
///
/// Numeric fields keep the precision the service reported; the `*_label`
/// helpers round to whole units for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayRecord {
    pub city_name: String,
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub wind_kph: f64,
    pub feels_like_c: f64,
    pub description: String,
    pub icon_url: String,
}

impl DisplayRecord {
    pub fn city_label(&self) -> String {
        format!("Weather in {}", self.city_name)
    }

    pub fn temperature_label(&self) -> String {
        format!("{}°C", round_whole(self.temperature_c))
    }

    pub fn humidity_label(&self) -> String {
        format!("Humidity: {}%", round_whole(self.humidity_pct))
    }

    pub fn wind_label(&self) -> String {
        format!("Wind: {} km/h", round_whole(self.wind_kph))
    }

    pub fn feels_like_label(&self) -> String {
        format!("Feels like: {}°C", round_whole(self.feels_like_c))
    }

    /// Landscape photo keyed by the resolved city name.
    pub fn background_url(&self) -> String {
        format!("https://source.unsplash.com/1600x900/?{} landscape", self.city_name)
    }
}

/// A record together with where and when it came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherReport {
    pub provider: ProviderId,
    pub record: DisplayRecord,
    pub fetched_at: DateTime<Utc>,
}

/// Half away from zero; integer output so `-0.3` renders as `0`.
fn round_whole(value: f64) -> i64 {
    value.round() as i64
}
