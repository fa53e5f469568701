use thiserror::Error;

use crate::provider::ProviderId;

/// Failure kinds produced while resolving locations or fetching weather.
///
/// The fallback chain treats every kind the same way; the distinction only
/// matters for logging and tests.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Request could not be sent, or the service answered with a non-success status.
    #[error("network error: {0}")]
    Network(String),

    /// Geocoding or reverse geocoding returned no usable result.
    #[error("not found: {0}")]
    NotFound(String),

    /// Response body did not have the expected shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// No way to obtain the current position.
    #[error("location services unavailable: {0}")]
    CapabilityUnavailable(String),

    /// Every provider in the chain failed. Kept for diagnostics, never shown to users.
    #[error("all weather providers failed ({} attempted)", failures.len())]
    AllProvidersFailed {
        failures: Vec<(ProviderId, WeatherError)>,
    },
}

impl WeatherError {
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, WeatherError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_providers_failed_reports_count_only() {
        let err = WeatherError::AllProvidersFailed {
            failures: vec![
                (ProviderId::OpenMeteo, WeatherError::network("boom")),
                (ProviderId::ApiNinjas, WeatherError::parse("bad json")),
            ],
        };

        let msg = err.to_string();
        assert_eq!(msg, "all weather providers failed (2 attempted)");
        assert!(!msg.contains("boom"));
    }
}
