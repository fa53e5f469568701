use chrono::Utc;
use reqwest::Client;
use std::sync::Arc;

use crate::{
    Config,
    error::{Result, WeatherError},
    geocode::Geocoder,
    model::WeatherReport,
    provider::{WeatherProvider, providers_from_config},
};

/// Providers tried strictly one after another until one succeeds.
#[derive(Debug)]
pub struct FallbackChain {
    providers: Vec<Box<dyn WeatherProvider>>,
}

impl FallbackChain {
    pub fn new(providers: Vec<Box<dyn WeatherProvider>>) -> Self {
        Self { providers }
    }

    pub fn from_config(config: &Config, http: &Client, geocoder: Arc<dyn Geocoder>) -> Self {
        Self::new(providers_from_config(config, http, geocoder))
    }

    pub fn providers(&self) -> &[Box<dyn WeatherProvider>] {
        &self.providers
    }

    /// Fetch current weather for `city`.
    ///
    /// Each failure is logged and the next provider is attempted; only when
    /// all of them fail is [`WeatherError::AllProvidersFailed`] returned.
    pub async fn fetch_weather(&self, city: &str) -> Result<WeatherReport> {
        let mut failures = Vec::new();

        for provider in &self.providers {
            let id = provider.id();
            tracing::debug!(provider = %id, city, "trying provider");

            match provider.fetch_weather(city).await {
                Ok(record) => {
                    tracing::info!(provider = %id, city, "weather fetched");
                    return Ok(WeatherReport { provider: id, record, fetched_at: Utc::now() });
                }
                Err(err) => {
                    tracing::warn!(provider = %id, city, error = %err, "provider failed, falling back");
                    failures.push((id, err));
                }
            }
        }

        tracing::error!(city, attempted = failures.len(), "all weather services failed");
        Err(WeatherError::AllProvidersFailed { failures })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{model::DisplayRecord, provider::ProviderId};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    /// Scripted provider that records which cities it was asked about.
    #[derive(Debug)]
    pub(crate) struct StubProvider {
        pub id: ProviderId,
        pub succeed: bool,
        pub calls: Arc<Mutex<Vec<(ProviderId, String)>>>,
    }

    pub(crate) fn record_for(city: &str, description: &str) -> DisplayRecord {
        DisplayRecord {
            city_name: city.to_string(),
            temperature_c: 20.0,
            humidity_pct: 50.0,
            wind_kph: 10.0,
            feels_like_c: 19.0,
            description: description.to_string(),
            icon_url: "https://example.test/icon.png".to_string(),
        }
    }

    #[async_trait]
    impl WeatherProvider for StubProvider {
        fn id(&self) -> ProviderId {
            self.id
        }

        async fn fetch_weather(&self, city: &str) -> Result<DisplayRecord> {
            self.calls.lock().unwrap().push((self.id, city.to_string()));
            if self.succeed {
                Ok(record_for(city, self.id.as_str()))
            } else {
                Err(WeatherError::network("simulated outage"))
            }
        }
    }

    pub(crate) fn chain(
        outcomes: [bool; 3],
    ) -> (FallbackChain, Arc<Mutex<Vec<(ProviderId, String)>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let providers = ProviderId::all()
            .iter()
            .zip(outcomes)
            .map(|(&id, succeed)| {
                Box::new(StubProvider { id, succeed, calls: calls.clone() }) as Box<dyn WeatherProvider>
            })
            .collect();
        (FallbackChain::new(providers), calls)
    }

    fn attempted(calls: &Arc<Mutex<Vec<(ProviderId, String)>>>) -> Vec<ProviderId> {
        calls.lock().unwrap().iter().map(|(id, _)| *id).collect()
    }

    #[tokio::test]
    async fn first_success_stops_the_chain() {
        let (chain, calls) = chain([true, true, true]);

        let report = chain.fetch_weather("London").await.unwrap();

        assert_eq!(report.provider, ProviderId::OpenMeteo);
        assert_eq!(attempted(&calls), vec![ProviderId::OpenMeteo]);
    }

    #[tokio::test]
    async fn primary_failure_moves_to_secondary_not_tertiary() {
        let (chain, calls) = chain([false, true, true]);

        let report = chain.fetch_weather("London").await.unwrap();

        assert_eq!(report.provider, ProviderId::WeatherApi);
        assert_eq!(attempted(&calls), vec![ProviderId::OpenMeteo, ProviderId::WeatherApi]);
    }

    #[tokio::test]
    async fn tertiary_result_is_used_when_first_two_fail() {
        let (chain, calls) = chain([false, false, true]);

        let report = chain.fetch_weather("Cairo").await.unwrap();

        assert_eq!(report.provider, ProviderId::ApiNinjas);
        assert_eq!(report.record.description, "apininjas");
        assert_eq!(report.record.city_name, "Cairo");
        assert_eq!(attempted(&calls).len(), 3);
    }

    #[tokio::test]
    async fn total_failure_collects_every_attempt() {
        let (chain, calls) = chain([false, false, false]);

        let err = chain.fetch_weather("Atlantis").await.unwrap_err();

        match err {
            WeatherError::AllProvidersFailed { failures } => {
                let ids: Vec<_> = failures.iter().map(|(id, _)| *id).collect();
                assert_eq!(ids, ProviderId::all().to_vec());
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(calls.lock().unwrap().iter().all(|(_, city)| city == "Atlantis"));
    }

    #[tokio::test]
    async fn empty_chain_fails() {
        let chain = FallbackChain::new(Vec::new());
        let err = chain.fetch_weather("Paris").await.unwrap_err();
        assert!(matches!(err, WeatherError::AllProvidersFailed { failures } if failures.is_empty()));
    }
}
