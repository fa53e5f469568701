use std::{io::Write, sync::Arc};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, Text};
use weather_core::{
    Config, Coordinates, FallbackChain, FixedLocation, IpLocation, LocationSource, NoLocation,
    NominatimGeocoder, ProviderId, SearchOutcome, SearchSession, http::build_client,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather CLI")]
pub struct Cli {
    /// Log provider attempts and fallbacks to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials for a specific provider.
    Configure {
        /// Provider short name, e.g. "weatherapi" or "apininjas".
        provider: String,
    },

    /// Set the city used when the current location cannot be determined.
    DefaultCity {
        city: String,
    },

    /// Print the path of the config file.
    ConfigPath,

    /// Show current weather for a city.
    Show {
        /// City name.
        city: String,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show current weather for where you are.
    Here {
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Skip IP geolocation and go straight to the default city.
        #[arg(long, conflicts_with_all = ["lat", "lon"])]
        no_locate: bool,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Search repeatedly from a prompt.
    Interactive,
}

/// Everything a search needs, built once from config.
struct App {
    config: Config,
    session: SearchSession,
    geocoder: Arc<NominatimGeocoder>,
    http: reqwest::Client,
}

impl App {
    fn from_config(config: Config) -> anyhow::Result<Self> {
        let http = build_client().context("Failed to build HTTP client")?;
        let geocoder = Arc::new(NominatimGeocoder::with_base_url(
            http.clone(),
            config.endpoints.nominatim_url(),
        ));
        let chain = FallbackChain::from_config(&config, &http, geocoder.clone());

        tracing::debug!(
            providers = ?chain.providers().iter().map(|p| p.id()).collect::<Vec<_>>(),
            "fallback chain ready"
        );

        Ok(Self { config, session: SearchSession::new(chain), geocoder, http })
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { provider } => configure(&provider),
            Command::DefaultCity { city } => set_default_city(&city),
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
                Ok(())
            }
            Command::Show { city, json } => {
                let app = App::from_config(Config::load()?)?;
                let outcome = app.session.search(&city).await;
                finish(outcome, json, &mut std::io::stdout().lock())
            }
            Command::Here { lat, lon, no_locate, json } => {
                let app = App::from_config(Config::load()?)?;
                let source: Box<dyn LocationSource> = match (lat, lon) {
                    (Some(lat), Some(lon)) => Box::new(FixedLocation(Coordinates::new(lat, lon))),
                    _ if no_locate => Box::new(NoLocation),
                    _ => Box::new(IpLocation::with_base_url(
                        app.http.clone(),
                        app.config.endpoints.ip_api_url(),
                    )),
                };

                let outcome = app
                    .session
                    .search_here(source.as_ref(), app.geocoder.as_ref(), app.config.default_city())
                    .await;
                finish(outcome, json, &mut std::io::stdout().lock())
            }
            Command::Interactive => interactive(App::from_config(Config::load()?)?).await,
        }
    }
}

fn finish(outcome: SearchOutcome, json: bool, out: &mut impl Write) -> anyhow::Result<()> {
    match outcome {
        SearchOutcome::Ready(report) => {
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
            } else {
                write!(out, "{}", render::report(&report))?;
            }
            Ok(())
        }
        SearchOutcome::Ignored | SearchOutcome::Superseded => Ok(()),
        SearchOutcome::Failed(err) => {
            tracing::debug!(error = ?err, "search failed");
            bail!(render::FAILURE_NOTICE)
        }
    }
}

async fn interactive(app: App) -> anyhow::Result<()> {
    println!("Type a city and press Enter. `:q` or Esc to quit.");

    loop {
        let input = match Text::new("City:").prompt() {
            Ok(input) => input,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e).context("Failed to read city"),
        };

        if input.trim() == ":q" {
            break;
        }

        match app.session.search(&input).await {
            SearchOutcome::Ready(report) => print!("{}", render::report(&report)),
            SearchOutcome::Failed(_) => eprintln!("{}", render::FAILURE_NOTICE),
            SearchOutcome::Ignored | SearchOutcome::Superseded => {}
        }
    }

    Ok(())
}

fn configure(provider: &str) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;
    if !id.takes_api_key() {
        bail!("Provider '{id}' needs no API key.");
    }

    // Stored file only, so environment overrides are never persisted.
    let mut config = Config::load_file()?;

    let key = Password::new(&format!("API key for {id}:"))
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let key = key.trim();
    if key.is_empty() {
        bail!("API key must not be empty.");
    }

    config.upsert_provider_api_key(id, key.to_string());
    config.save()?;

    println!("Saved API key for {id} to {}", Config::config_file_path()?.display());
    Ok(())
}

fn set_default_city(city: &str) -> anyhow::Result<()> {
    let city = city.trim();
    if city.is_empty() {
        bail!("City must not be empty.");
    }

    let mut config = Config::load_file()?;
    config.default_city = Some(city.to_string());
    config.save()?;

    println!("Default city set to {city}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    use chrono::Utc;
    use weather_core::{DisplayRecord, WeatherError, WeatherReport};

    fn ready(city: &str) -> SearchOutcome {
        SearchOutcome::Ready(WeatherReport {
            provider: ProviderId::ApiNinjas,
            record: DisplayRecord {
                city_name: city.into(),
                temperature_c: 31.0,
                humidity_pct: 20.0,
                wind_kph: 7.0,
                feels_like_c: 33.0,
                description: "Hot".into(),
                icon_url: "https://openweathermap.org/img/wn/01d@2x.png".into(),
            },
            fetched_at: Utc::now(),
        })
    }

    #[test]
    fn total_failure_shows_only_the_generic_notice() {
        let failed = SearchOutcome::Failed(WeatherError::AllProvidersFailed {
            failures: vec![(ProviderId::OpenMeteo, WeatherError::network("503 upstream"))],
        });
        let mut out = Vec::new();

        let err = finish(failed, false, &mut out).unwrap_err();

        assert_eq!(err.to_string(), render::FAILURE_NOTICE);
        assert!(out.is_empty());
    }

    #[test]
    fn ignored_and_superseded_print_nothing() {
        for outcome in [SearchOutcome::Ignored, SearchOutcome::Superseded] {
            let mut out = Vec::new();
            finish(outcome, false, &mut out).unwrap();
            assert!(out.is_empty());
        }
    }

    #[test]
    fn ready_prints_text_or_json() {
        let mut text = Vec::new();
        finish(ready("Jaipur"), false, &mut text).unwrap();
        assert!(String::from_utf8(text).unwrap().starts_with("Weather in Jaipur\n"));

        let mut json = Vec::new();
        finish(ready("Jaipur"), true, &mut json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(value["provider"], "apininjas");
        assert_eq!(value["record"]["city_name"], "Jaipur");
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn here_requires_both_coordinates() {
        assert!(Cli::try_parse_from(["weather", "here", "--lat", "10"]).is_err());

        let cli = Cli::try_parse_from(["weather", "here", "--lat", "-33.9", "--lon", "18.4"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Here { lat: Some(_), lon: Some(_), no_locate: false, json: false }
        ));
    }

    #[test]
    fn show_takes_city_and_json_flag() {
        let cli = Cli::try_parse_from(["weather", "-v", "show", "New York", "--json"]).unwrap();

        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Show { ref city, json: true } if city == "New York"));
    }
}
