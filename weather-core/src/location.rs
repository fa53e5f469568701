//! Startup location: current position → locality → city to search.
//!
//! This is the one place where failures are absorbed rather than reported:
//! any problem along the way substitutes the default city.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt::Debug;

use crate::{
    error::{Result, WeatherError},
    geocode::Geocoder,
    http::{get_json, join_url},
    model::Coordinates,
};

pub const DEFAULT_CITY: &str = "Delhi";

pub const IP_API_URL: &str = "http://ip-api.com";

/// Something that can tell where the user currently is.
#[async_trait]
pub trait LocationSource: Send + Sync + Debug {
    async fn current_position(&self) -> Result<Coordinates>;
}

/// Coordinates supplied up front, e.g. from the command line.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Coordinates);

#[async_trait]
impl LocationSource for FixedLocation {
    async fn current_position(&self) -> Result<Coordinates> {
        Ok(self.0)
    }
}

/// Positioning disabled or unsupported.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocation;

#[async_trait]
impl LocationSource for NoLocation {
    async fn current_position(&self) -> Result<Coordinates> {
        Err(WeatherError::CapabilityUnavailable("geolocation not supported".into()))
    }
}

/// Approximate position from the public IP address via ip-api.com.
#[derive(Debug, Clone)]
pub struct IpLocation {
    http: Client,
    base_url: String,
}

impl IpLocation {
    pub fn new(http: Client) -> Self {
        Self::with_base_url(http, IP_API_URL)
    }

    pub fn with_base_url(http: Client, base_url: impl Into<String>) -> Self {
        Self { http, base_url: base_url.into() }
    }
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

#[async_trait]
impl LocationSource for IpLocation {
    async fn current_position(&self) -> Result<Coordinates> {
        let url = join_url(&self.base_url, "json/");
        let body: IpApiResponse = get_json(self.http.get(url), "ip-api").await?;

        if body.status != "success" {
            return Err(WeatherError::CapabilityUnavailable(
                body.message.unwrap_or_else(|| format!("ip-api status '{}'", body.status)),
            ));
        }

        match (body.lat, body.lon) {
            (Some(lat), Some(lon)) => Ok(Coordinates::new(lat, lon)),
            _ => Err(WeatherError::parse("ip-api response is missing coordinates")),
        }
    }
}

/// Position, then locality. Every failure kind is surfaced to the caller.
pub async fn locate_city(source: &dyn LocationSource, geocoder: &dyn Geocoder) -> Result<String> {
    let coords = source.current_position().await?;
    geocoder.reverse_geocode(coords).await
}

/// Like [`locate_city`], but substitutes `default_city` on any failure.
pub async fn city_or_default(
    source: &dyn LocationSource,
    geocoder: &dyn Geocoder,
    default_city: &str,
) -> String {
    match locate_city(source, geocoder).await {
        Ok(city) => city,
        Err(err) => {
            tracing::warn!(error = %err, default_city, "could not determine location, using default city");
            default_city.to_string()
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Geocoder that answers from fixed values without touching the network.
    #[derive(Debug, Default)]
    pub(crate) struct FakeGeocoder {
        pub locality: Option<String>,
    }

    #[async_trait]
    impl Geocoder for FakeGeocoder {
        async fn geocode_city(&self, name: &str) -> Result<Coordinates> {
            Err(WeatherError::not_found(format!("City '{name}' not found")))
        }

        async fn reverse_geocode(&self, _coords: Coordinates) -> Result<String> {
            self.locality
                .clone()
                .ok_or_else(|| WeatherError::not_found("no locality"))
        }
    }

    #[tokio::test]
    async fn unavailable_capability_is_reported_by_locate() {
        let err = locate_city(&NoLocation, &FakeGeocoder::default()).await.unwrap_err();
        assert!(matches!(err, WeatherError::CapabilityUnavailable(_)));
    }

    #[tokio::test]
    async fn unavailable_capability_falls_back_to_default() {
        let city = city_or_default(&NoLocation, &FakeGeocoder::default(), DEFAULT_CITY).await;
        assert_eq!(city, "Delhi");
    }

    #[tokio::test]
    async fn missing_locality_falls_back_to_default() {
        let source = FixedLocation(Coordinates::new(0.0, -30.0));
        let city = city_or_default(&source, &FakeGeocoder::default(), DEFAULT_CITY).await;
        assert_eq!(city, "Delhi");
    }

    #[tokio::test]
    async fn resolved_locality_is_used() {
        let source = FixedLocation(Coordinates::new(48.85, 2.35));
        let geocoder = FakeGeocoder { locality: Some("Paris".into()) };

        let city = city_or_default(&source, &geocoder, DEFAULT_CITY).await;
        assert_eq!(city, "Paris");
    }
}
