use std::sync::atomic::{AtomicU64, Ordering};

use crate::{
    error::WeatherError,
    fallback::FallbackChain,
    geocode::Geocoder,
    location::{LocationSource, city_or_default},
    model::WeatherReport,
};

#[derive(Debug)]
pub enum SearchOutcome {
    /// Blank input; nothing was requested.
    Ignored,
    /// Latest search finished; render this.
    Ready(WeatherReport),
    /// A newer search started before this one finished; drop the result.
    Superseded,
    /// Every provider failed.
    Failed(WeatherError),
}

/// Runs searches against one display surface.
///
/// Each search takes a token from a monotonically increasing counter; only
/// the holder of the latest token may hand back something to render.
#[derive(Debug)]
pub struct SearchSession {
    chain: FallbackChain,
    generation: AtomicU64,
}

impl SearchSession {
    pub fn new(chain: FallbackChain) -> Self {
        Self { chain, generation: AtomicU64::new(0) }
    }

    pub fn chain(&self) -> &FallbackChain {
        &self.chain
    }

    pub async fn search(&self, input: &str) -> SearchOutcome {
        let city = input.trim();
        if city.is_empty() {
            return SearchOutcome::Ignored;
        }

        let token = self.next_token();
        self.run(city, token).await
    }

    /// Search for wherever the user is, or `default_city` if that cannot be determined.
    ///
    /// The token is taken before the location lookup, so a search started
    /// while the lookup is still running wins over the bootstrap.
    pub async fn search_here(
        &self,
        source: &dyn LocationSource,
        geocoder: &dyn Geocoder,
        default_city: &str,
    ) -> SearchOutcome {
        let token = self.next_token();
        let city = city_or_default(source, geocoder, default_city).await;

        if self.generation.load(Ordering::SeqCst) != token {
            tracing::debug!(%city, token, "location lookup superseded");
            return SearchOutcome::Superseded;
        }

        match city.trim() {
            "" => SearchOutcome::Ignored,
            city => self.run(city, token).await,
        }
    }

    fn next_token(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    async fn run(&self, city: &str, token: u64) -> SearchOutcome {
        let result = self.chain.fetch_weather(city).await;

        if self.generation.load(Ordering::SeqCst) != token {
            tracing::debug!(city, token, "discarding stale result");
            return SearchOutcome::Superseded;
        }

        match result {
            Ok(report) => SearchOutcome::Ready(report),
            Err(err) => SearchOutcome::Failed(err),
        }
    }
}
