use crate::{
    Config, DisplayRecord,
    error,
    geocode::Geocoder,
    provider::{apininjas::ApiNinjasProvider, openmeteo::OpenMeteoProvider, weatherapi::WeatherApiProvider},
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt::Debug, sync::Arc};

pub mod apininjas;
pub mod openmeteo;
pub mod weatherapi;

/// Known weather services, in fallback priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    OpenMeteo,
    WeatherApi,
    ApiNinjas,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenMeteo => "openmeteo",
            ProviderId::WeatherApi => "weatherapi",
            ProviderId::ApiNinjas => "apininjas",
        }
    }

    /// Priority order; the fallback chain never reorders it.
    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::OpenMeteo, ProviderId::WeatherApi, ProviderId::ApiNinjas]
    }

    /// Whether the service accepts a credential at all.
    pub fn takes_api_key(&self) -> bool {
        !matches!(self, ProviderId::OpenMeteo)
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "openmeteo" | "open-meteo" => Ok(ProviderId::OpenMeteo),
            "weatherapi" => Ok(ProviderId::WeatherApi),
            "apininjas" | "api-ninjas" => Ok(ProviderId::ApiNinjas),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: openmeteo, weatherapi, apininjas."
            )),
        }
    }
}

/// One external weather service: builds its request and normalizes its answer.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    fn id(&self) -> ProviderId;

    async fn fetch_weather(&self, city: &str) -> error::Result<DisplayRecord>;
}

/// Build every usable provider from config, in priority order.
///
/// WeatherAPI only joins when a key is configured; the other two work keyless.
pub fn providers_from_config(
    config: &Config,
    http: &Client,
    geocoder: Arc<dyn Geocoder>,
) -> Vec<Box<dyn WeatherProvider>> {
    let mut providers: Vec<Box<dyn WeatherProvider>> = Vec::with_capacity(ProviderId::all().len());

    for &id in ProviderId::all() {
        let base_url = config.endpoints.base_url(id);
        match id {
            ProviderId::OpenMeteo => providers.push(Box::new(OpenMeteoProvider::with_base_url(
                http.clone(),
                geocoder.clone(),
                base_url,
            ))),
            ProviderId::WeatherApi => match config.provider_api_key(id) {
                Some(key) => providers.push(Box::new(WeatherApiProvider::with_base_url(
                    http.clone(),
                    key.to_owned(),
                    base_url,
                ))),
                None => tracing::debug!("No API key for {id}; leaving it out of the chain"),
            },
            ProviderId::ApiNinjas => providers.push(Box::new(ApiNinjasProvider::with_base_url(
                http.clone(),
                config.provider_api_key(id).map(str::to_owned),
                base_url,
            ))),
        }
    }

    providers
}
