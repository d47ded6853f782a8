use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use super::types::{SunApiResponse, SunTimes};
use super::AstroError;
use crate::config::Config;

pub struct SunClient {
    client: Client,
    config: Config,
}

impl SunClient {
    pub fn new(config: Config) -> Self {
        let client = Client::builder()
            .user_agent("MeteogramDashboard/1.0")
            .timeout(Duration::from_secs(15))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    /// Sunrise/sunset and twilight boundaries for one civil day
    /// ("YYYY-MM-DD"). `formatted=0` makes the provider return RFC3339
    /// instants instead of locale strings.
    pub async fn fetch_day(&self, lat: f64, lon: f64, date: &str) -> Result<SunTimes, AstroError> {
        let url = format!("{}/json", self.config.sun_api_base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", lat.to_string().as_str()),
                ("lng", lon.to_string().as_str()),
                ("date", date),
                ("formatted", "0"),
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
        let parsed: SunApiResponse = serde_json::from_value(json)?;
        if parsed.status != "OK" {
            return Err(AstroError::ProviderStatus(parsed.status));
        }
        parsed
            .results
            .ok_or_else(|| AstroError::ProviderStatus("OK without results".to_string()))
    }
}
