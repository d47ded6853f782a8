use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use super::types::MeteogramResponse;
use crate::config::Config;

#[derive(Error, Debug)]
pub enum MeteoAmError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("JSON parsing failed: {0}")]
    JsonParsing(#[from] serde_json::Error),
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Invalid coordinates")]
    InvalidCoordinates,
}

pub struct MeteoAmClient {
    client: Client,
    config: Config,
}

impl MeteoAmClient {
    pub fn new(config: Config) -> Self {
        let client = Client::builder()
            .user_agent("MeteogramDashboard/1.0")
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    /// Fetch the atmospheric meteogram preset for a point.
    pub async fn get_meteogram(&self, lat: f64, lon: f64) -> Result<MeteogramResponse, MeteoAmError> {
        self.fetch_preset(&self.config.meteoam_meteogram_path, lat, lon)
            .await
    }

    /// Fetch the marine preset. Inland points typically get an empty or
    /// error response; callers treat failure as "no marine data".
    pub async fn get_marine_meteogram(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<MeteogramResponse, MeteoAmError> {
        self.fetch_preset(&self.config.meteoam_marine_path, lat, lon)
            .await
    }

    async fn fetch_preset(
        &self,
        path: &str,
        lat: f64,
        lon: f64,
    ) -> Result<MeteogramResponse, MeteoAmError> {
        if !self.is_valid_coordinates(lat, lon) {
            return Err(MeteoAmError::InvalidCoordinates);
        }

        // The provider addresses points by path segment, not query string.
        let url = format!("{}{}/{},{}", self.config.meteoam_base_url, path, lat, lon);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(MeteoAmError::ApiError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let json: Value = response.json().await?;
        let payload: MeteogramResponse = serde_json::from_value(json)?;
        Ok(payload)
    }

    fn is_valid_coordinates(&self, lat: f64, lon: f64) -> bool {
        crate::utils::validate_coordinates(lat, lon).is_ok()
    }
}
