use moka::future::Cache;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::config::Config;

#[derive(Error, Debug)]
pub enum GeocodeError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("JSON parsing failed: {0}")]
    JsonParsing(#[from] serde_json::Error),
    #[error("API error: {0}")]
    ApiError(String),
}

pub type GeocodeCache = Cache<String, Vec<Place>>;

/// Place names move slowly; cache lookups for a day.
pub fn init_geocode_cache() -> GeocodeCache {
    Cache::builder()
        .max_capacity(1000)
        .time_to_live(Duration::from_secs(24 * 60 * 60))
        .build()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeocodeSearchResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeocodeResult {
    name: String,
    latitude: f64,
    longitude: f64,
    timezone: Option<String>,
    country: Option<String>,
    admin1: Option<String>,
}

/// A geocoding candidate with its display name already assembled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub timezone: Option<String>,
}

impl From<GeocodeResult> for Place {
    fn from(result: GeocodeResult) -> Self {
        let mut name = result.name;
        if let Some(admin1) = result.admin1.as_deref().filter(|s| !s.is_empty()) {
            name.push_str(", ");
            name.push_str(admin1);
        }
        if let Some(country) = result.country.as_deref().filter(|s| !s.is_empty()) {
            name.push_str(", ");
            name.push_str(country);
        }
        Place {
            name,
            lat: result.latitude,
            lon: result.longitude,
            timezone: result.timezone,
        }
    }
}

pub struct GeocodeClient {
    client: Client,
    config: Config,
}

impl GeocodeClient {
    pub fn new(config: Config) -> Self {
        let client = Client::builder()
            .user_agent("MeteogramDashboard/1.0")
            .timeout(Duration::from_secs(15))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    /// Search places by name, best match first.
    pub async fn search(&self, query: &str) -> Result<Vec<Place>, GeocodeError> {
        let url = format!(
            "{}{}",
            self.config.geocoding_base_url, self.config.geocoding_search_path
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("name", query),
                ("count", "5"),
                ("language", "it"),
                ("format", "json"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GeocodeError::ApiError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let json: Value = response.json().await?;
        let parsed: GeocodeSearchResponse = serde_json::from_value(json)?;
        Ok(parsed.results.into_iter().map(Place::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_display_name_assembly() {
        let result = GeocodeResult {
            name: "Ostia".to_string(),
            latitude: 41.73,
            longitude: 12.29,
            timezone: Some("Europe/Rome".to_string()),
            country: Some("Italia".to_string()),
            admin1: Some("Lazio".to_string()),
        };
        let place = Place::from(result);
        assert_eq!(place.name, "Ostia, Lazio, Italia");
    }

    #[test]
    fn test_place_display_name_skips_missing_parts() {
        let result = GeocodeResult {
            name: "Null Island".to_string(),
            latitude: 0.0,
            longitude: 0.0,
            timezone: None,
            country: None,
            admin1: Some("".to_string()),
        };
        let place = Place::from(result);
        assert_eq!(place.name, "Null Island");
    }
}
