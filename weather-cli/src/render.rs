//! Plain-text presentation of a weather report.

use chrono::Local;
use std::fmt::Write as _;
use weather_core::WeatherReport;

/// The only thing a user sees when every provider fails.
pub const FAILURE_NOTICE: &str = "Unable to fetch weather data. Please try again later.";

pub fn report(report: &WeatherReport) -> String {
    let rec = &report.record;
    let mut out = String::new();

    let _ = writeln!(out, "{}", rec.city_label());
    let _ = writeln!(out, "  {}  {}", rec.temperature_label(), rec.description);
    let _ = writeln!(out, "  {}", rec.humidity_label());
    let _ = writeln!(out, "  {}", rec.wind_label());
    let _ = writeln!(out, "  {}", rec.feels_like_label());
    let _ = writeln!(out, "  Icon: {}", rec.icon_url);
    let _ = writeln!(out, "  Background: {}", rec.background_url());
    let _ = writeln!(
        out,
        "  via {} at {}",
        report.provider,
        report.fetched_at.with_timezone(&Local).format("%H:%M")
    );

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use weather_core::{DisplayRecord, ProviderId};

    #[test]
    fn renders_every_field() {
        let report = WeatherReport {
            provider: ProviderId::OpenMeteo,
            record: DisplayRecord {
                city_name: "London".into(),
                temperature_c: 15.4,
                humidity_pct: 70.0,
                wind_kph: 12.1,
                feels_like_c: 15.4,
                description: "Overcast".into(),
                icon_url: "https://openweathermap.org/img/wn/04d@2x.png".into(),
            },
            fetched_at: Utc::now(),
        };

        let text = super::report(&report);

        assert!(text.starts_with("Weather in London\n"));
        assert!(text.contains("15°C  Overcast"));
        assert!(text.contains("Humidity: 70%"));
        assert!(text.contains("Wind: 12 km/h"));
        assert!(text.contains("Feels like: 15°C"));
        assert!(text.contains("04d@2x.png"));
        assert!(text.contains("via openmeteo at "));
    }
}
