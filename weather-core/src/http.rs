//! Request plumbing shared by the geocoder, location sources and provider adapters.

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::error::{Result, WeatherError};

/// Nominatim rejects requests without an identifying User-Agent.
pub const USER_AGENT: &str = concat!("weather-cli/", env!("CARGO_PKG_VERSION"));

/// Build the HTTP client shared by every outbound call.
pub fn build_client() -> anyhow::Result<Client> {
    let client = Client::builder().user_agent(USER_AGENT).build()?;
    Ok(client)
}

/// Send `request`, require a success status and decode the body as JSON.
pub(crate) async fn get_json<T: DeserializeOwned>(request: RequestBuilder, service: &str) -> Result<T> {
    let res = request
        .send()
        .await
        .map_err(|e| WeatherError::network(format!("Failed to send request to {service}: {e}")))?;

    let status = res.status();
    let body = res
        .text()
        .await
        .map_err(|e| WeatherError::network(format!("Failed to read {service} response body: {e}")))?;

    if !status.is_success() {
        return Err(WeatherError::network(format!(
            "{service} request failed with status {status}: {}",
            truncate_body(&body),
        )));
    }

    serde_json::from_str(&body)
        .map_err(|e| WeatherError::parse(format!("Failed to parse {service} JSON: {e}")))
}

/// Join a configured base URL and a path without doubling slashes.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
