use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::PathBuf};

use crate::{
    geocode::NOMINATIM_URL,
    location::{DEFAULT_CITY, IP_API_URL},
    provider::{
        ProviderId, apininjas::API_NINJAS_URL, openmeteo::OPEN_METEO_URL, weatherapi::WEATHERAPI_URL,
    },
};

/// Configuration for a single provider (e.g., API key).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,
}

/// Base URL overrides, mostly useful for self-hosted mirrors and tests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Endpoints {
    pub nominatim: Option<String>,
    pub ip_api: Option<String>,
    pub open_meteo: Option<String>,
    pub weatherapi: Option<String>,
    pub api_ninjas: Option<String>,
}

impl Endpoints {
    pub fn base_url(&self, id: ProviderId) -> String {
        let (custom, default) = match id {
            ProviderId::OpenMeteo => (&self.open_meteo, OPEN_METEO_URL),
            ProviderId::WeatherApi => (&self.weatherapi, WEATHERAPI_URL),
            ProviderId::ApiNinjas => (&self.api_ninjas, API_NINJAS_URL),
        };
        custom.clone().unwrap_or_else(|| default.to_string())
    }

    pub fn nominatim_url(&self) -> String {
        self.nominatim.clone().unwrap_or_else(|| NOMINATIM_URL.to_string())
    }

    pub fn ip_api_url(&self) -> String {
        self.ip_api.clone().unwrap_or_else(|| IP_API_URL.to_string())
    }
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// City searched when the current location cannot be determined.
    pub default_city: Option<String>,

    /// Example TOML:
    /// [providers.weatherapi]
    /// api_key = "..."
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    #[serde(default)]
    pub endpoints: Endpoints,
}

/// Environment variables that take precedence over stored keys.
pub fn api_key_env_var(id: ProviderId) -> Option<&'static str> {
    match id {
        ProviderId::OpenMeteo => None,
        ProviderId::WeatherApi => Some("WEATHERAPI_KEY"),
        ProviderId::ApiNinjas => Some("API_NINJAS_KEY"),
    }
}

impl Config {
    pub fn default_city(&self) -> &str {
        self.default_city
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CITY)
    }

    pub fn provider_config(&self, id: ProviderId) -> Option<&ProviderConfig> {
        self.providers.get(id.as_str())
    }

    /// Load config from disk (or defaults) and apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut cfg = Self::load_file()?;
        cfg.apply_env_overrides(|name| std::env::var(name).ok());
        Ok(cfg)
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load_file() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Replace stored keys with non-blank values from the environment.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        for &id in ProviderId::all() {
            let Some(var) = api_key_env_var(id) else { continue };
            if let Some(key) = lookup(var).filter(|k| !k.trim().is_empty()) {
                tracing::debug!(provider = %id, var, "using API key from environment");
                self.upsert_provider_api_key(id, key);
            }
        }
    }

    /// Set or replace a provider API key.
    pub fn upsert_provider_api_key(&mut self, provider_id: ProviderId, api_key: String) {
        self.providers.insert(provider_id.as_str().to_string(), ProviderConfig { api_key });
    }

    /// Returns API key for a provider, if present and not blank.
    pub fn provider_api_key(&self, provider_id: ProviderId) -> Option<&str> {
        self.provider_config(provider_id)
            .map(|cfg| cfg.api_key.as_str())
            .filter(|k| !k.trim().is_empty())
    }

    pub fn is_provider_configured(&self, provider_id: ProviderId) -> bool {
        self.provider_api_key(provider_id).is_some()
    }
}
