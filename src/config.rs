use serde::{Deserialize, Serialize};
use std::env;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    pub meteoam_base_url: String,
    pub meteoam_meteogram_path: String,
    pub meteoam_marine_path: String,
    pub geocoding_base_url: String,
    pub geocoding_search_path: String,
    pub sun_api_base_url: String,
    pub astronomy_api_key: String,
    pub astronomy_base_url: String,
    pub default_location_name: String,
    pub default_lat: f64,
    pub default_lon: f64,
    pub default_timezone: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Config {
            meteoam_base_url: env::var("METEOAM_BASE_URL")
                .unwrap_or_else(|_| "https://api.meteoam.it".to_string()),
            meteoam_meteogram_path: env::var("METEOAM_METEOGRAM_PATH")
                .unwrap_or_else(|_| "/deda-meteograms/api/GetMeteogram/preset1".to_string()),
            meteoam_marine_path: env::var("METEOAM_MARINE_PATH")
                .unwrap_or_else(|_| "/deda-meteograms/api/GetMeteogram/preset2".to_string()),
            geocoding_base_url: env::var("GEOCODING_BASE_URL")
                .unwrap_or_else(|_| "https://geocoding-api.open-meteo.com".to_string()),
            geocoding_search_path: env::var("GEOCODING_SEARCH_PATH")
                .unwrap_or_else(|_| "/v1/search".to_string()),
            sun_api_base_url: env::var("SUN_API_BASE_URL")
                .unwrap_or_else(|_| "https://api.sunrise-sunset.org".to_string()),
            astronomy_api_key: env::var("ASTRONOMY_API_KEY")
                .map_err(|_| anyhow::anyhow!("ASTRONOMY_API_KEY not set"))?,
            astronomy_base_url: env::var("ASTRONOMY_BASE_URL")
                .unwrap_or_else(|_| "https://api.ipgeolocation.io".to_string()),
            default_location_name: env::var("DEFAULT_LOCATION_NAME")
                .unwrap_or_else(|_| "Roma, IT".to_string()),
            default_lat: env::var("DEFAULT_LAT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(41.902783),
            default_lon: env::var("DEFAULT_LON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(12.496366),
            default_timezone: env::var("DEFAULT_TIMEZONE")
                .unwrap_or_else(|_| "Europe/Rome".to_string()),
        })
    }
}
