//! City name ⇄ coordinates resolution backed by OpenStreetMap Nominatim.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt::Debug;

use crate::{
    error::{Result, WeatherError},
    http::{get_json, join_url},
    model::Coordinates,
};

pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// Resolve a free-text place name to the coordinates of its first match.
    async fn geocode_city(&self, name: &str) -> Result<Coordinates>;

    /// Resolve coordinates to a locality (city, town, village or county).
    async fn reverse_geocode(&self, coords: Coordinates) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    http: Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(http: Client) -> Self {
        Self::with_base_url(http, NOMINATIM_URL)
    }

    pub fn with_base_url(http: Client, base_url: impl Into<String>) -> Self {
        Self { http, base_url: base_url.into() }
    }
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    address: Option<Address>,
}

#[derive(Debug, Default, Deserialize)]
struct Address {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    county: Option<String>,
}

impl Address {
    fn locality(self) -> Option<String> {
        [self.city, self.town, self.village, self.county]
            .into_iter()
            .flatten()
            .find(|s| !s.trim().is_empty())
    }
}

fn parse_coordinate(raw: &str, axis: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|e| WeatherError::parse(format!("invalid {axis} '{raw}' in Nominatim response: {e}")))
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode_city(&self, name: &str) -> Result<Coordinates> {
        let url = join_url(&self.base_url, "search");
        let request = self
            .http
            .get(url)
            .query(&[("format", "json"), ("q", name), ("limit", "1")]);

        let hits: Vec<SearchHit> = get_json(request, "Nominatim search").await?;

        let first = hits
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::not_found(format!("City '{name}' not found")))?;

        let coords = Coordinates::new(
            parse_coordinate(&first.lat, "latitude")?,
            parse_coordinate(&first.lon, "longitude")?,
        );
        tracing::debug!(city = name, lat = coords.latitude, lon = coords.longitude, "geocoded");
        Ok(coords)
    }

    async fn reverse_geocode(&self, coords: Coordinates) -> Result<String> {
        let url = join_url(&self.base_url, "reverse");
        let request = self.http.get(url).query(&[
            ("format", "json".to_string()),
            ("lat", coords.latitude.to_string()),
            ("lon", coords.longitude.to_string()),
            ("zoom", "10".to_string()),
        ]);

        let body: ReverseResponse = get_json(request, "Nominatim reverse").await?;

        let locality = body
            .address
            .and_then(Address::locality)
            .ok_or_else(|| {
                WeatherError::not_found(format!(
                    "No locality at ({}, {})",
                    coords.latitude, coords.longitude
                ))
            })?;

        tracing::debug!(%locality, "reverse geocoded");
        Ok(locality)
    }
}
