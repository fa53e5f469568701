//! Weather-code lookup table and the temperature-only fallback classification.
//!
//! Codes follow the WMO numbering used by Open-Meteo; only the subset below is
//! recognised; anything else maps to [`UNKNOWN`].

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeatherCodeEntry {
    pub description: &'static str,
    pub icon_url: &'static str,
}

const fn entry(description: &'static str, icon_url: &'static str) -> WeatherCodeEntry {
    WeatherCodeEntry { description, icon_url }
}

const ICON_CLEAR: &str = "https://openweathermap.org/img/wn/01d@2x.png";
const ICON_FEW_CLOUDS: &str = "https://openweathermap.org/img/wn/02d@2x.png";
const ICON_SCATTERED: &str = "https://openweathermap.org/img/wn/03d@2x.png";
const ICON_BROKEN: &str = "https://openweathermap.org/img/wn/04d@2x.png";
const ICON_SHOWERS: &str = "https://openweathermap.org/img/wn/09d@2x.png";
const ICON_RAIN: &str = "https://openweathermap.org/img/wn/10d@2x.png";
const ICON_THUNDER: &str = "https://openweathermap.org/img/wn/11d@2x.png";
const ICON_SNOW: &str = "https://openweathermap.org/img/wn/13d@2x.png";
const ICON_MIST: &str = "https://openweathermap.org/img/wn/50d@2x.png";

pub const UNKNOWN: WeatherCodeEntry = entry("Unknown", ICON_CLEAR);

/// Look up a weather code; unrecognised codes yield [`UNKNOWN`].
pub fn weather_code_lookup(code: i64) -> WeatherCodeEntry {
    match code {
        0 => entry("Clear sky", ICON_CLEAR),
        1 => entry("Mainly clear", ICON_FEW_CLOUDS),
        2 => entry("Partly cloudy", ICON_SCATTERED),
        3 => entry("Overcast", ICON_BROKEN),
        45 => entry("Fog", ICON_MIST),
        48 => entry("Depositing rime fog", ICON_MIST),
        51 => entry("Light drizzle", ICON_SHOWERS),
        53 => entry("Moderate drizzle", ICON_SHOWERS),
        55 => entry("Dense drizzle", ICON_SHOWERS),
        61 => entry("Slight rain", ICON_RAIN),
        63 => entry("Moderate rain", ICON_RAIN),
        65 => entry("Heavy rain", ICON_RAIN),
        80 => entry("Light showers", ICON_SHOWERS),
        81 => entry("Moderate showers", ICON_SHOWERS),
        82 => entry("Violent showers", ICON_SHOWERS),
        95 => entry("Thunderstorm", ICON_THUNDER),
        _ => UNKNOWN,
    }
}

/// Coarse condition used when a service reports no textual description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureCategory {
    Clear,
    Cold,
    Hot,
    Cloudy,
    Rain,
}

impl TemperatureCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureCategory::Clear => "Clear",
            TemperatureCategory::Cold => "Cold",
            TemperatureCategory::Hot => "Hot",
            TemperatureCategory::Cloudy => "Cloudy",
            TemperatureCategory::Rain => "Rain",
        }
    }

    pub fn icon_url(&self) -> &'static str {
        match self {
            TemperatureCategory::Clear | TemperatureCategory::Hot => ICON_CLEAR,
            TemperatureCategory::Cold => ICON_SNOW,
            TemperatureCategory::Cloudy => ICON_SCATTERED,
            TemperatureCategory::Rain => ICON_RAIN,
        }
    }
}

impl std::fmt::Display for TemperatureCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Below 10 is cold, above 30 is hot; both bounds themselves are clear.
pub fn temperature_category(temperature_c: f64) -> TemperatureCategory {
    if temperature_c < 10.0 {
        TemperatureCategory::Cold
    } else if temperature_c > 30.0 {
        TemperatureCategory::Hot
    } else {
        TemperatureCategory::Clear
    }
}

/// Icon for a category name; unknown names get the clear-sky icon.
pub fn simple_icon(category: &str) -> &'static str {
    [
        TemperatureCategory::Clear,
        TemperatureCategory::Cold,
        TemperatureCategory::Hot,
        TemperatureCategory::Cloudy,
        TemperatureCategory::Rain,
    ]
    .iter()
    .find(|c| c.as_str() == category)
    .map(|c| c.icon_url())
    .unwrap_or(ICON_CLEAR)
}
