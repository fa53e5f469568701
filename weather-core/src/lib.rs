//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Geocoding and current-location lookup
//! - Weather provider adapters and the fallback chain over them
//! - Shared domain models (display records, reports)
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod codes;
pub mod config;
pub mod error;
pub mod fallback;
pub mod geocode;
pub mod http;
pub mod location;
pub mod model;
pub mod provider;
pub mod session;

pub use codes::{TemperatureCategory, WeatherCodeEntry, temperature_category, weather_code_lookup};
pub use config::{Config, Endpoints, ProviderConfig};
pub use error::WeatherError;
pub use fallback::FallbackChain;
pub use geocode::{Geocoder, NominatimGeocoder};
pub use location::{DEFAULT_CITY, FixedLocation, IpLocation, LocationSource, NoLocation};
pub use model::{Coordinates, DisplayRecord, WeatherReport};
pub use provider::{ProviderId, WeatherProvider};
pub use session::{SearchOutcome, SearchSession};
