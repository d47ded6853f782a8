use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use super::types::MoonApiResponse;
use super::AstroError;
use crate::config::Config;

pub struct MoonClient {
    client: Client,
    config: Config,
}

impl MoonClient {
    pub fn new(config: Config) -> Self {
        let client = Client::builder()
            .user_agent("MeteogramDashboard/1.0")
            .timeout(Duration::from_secs(15))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    /// Moon phase and rise/set for one civil day ("YYYY-MM-DD").
    pub async fn fetch_day(
        &self,
        lat: f64,
        lon: f64,
        date: &str,
    ) -> Result<MoonApiResponse, AstroError> {
        let url = format!("{}/astronomy", self.config.astronomy_base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("apiKey", self.config.astronomy_api_key.as_str()),
                ("lat", lat.to_string().as_str()),
                ("long", lon.to_string().as_str()),
                ("date", date),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AstroError::ApiError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let json: Value = response.json().await?;
        let parsed: MoonApiResponse = serde_json::from_value(json)?;
        Ok(parsed)
    }
}
