use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Raw provider values keyed by parameter position, then by time index.
/// Both keys are stringified integers; rows may be sparse or absent.
pub type Dataset = HashMap<String, HashMap<String, Value>>;

/// One meteogram payload as the provider ships it. The marine preset uses
/// the same envelope with its own timeseries and paramlist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeteogramResponse {
    #[serde(default)]
    pub timeseries: Vec<DateTime<Utc>>,
    #[serde(default)]
    pub paramlist: Vec<String>,
    #[serde(default)]
    pub datasets: HashMap<String, Dataset>,
    pub extrainfo: Option<ExtraInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtraInfo {
    pub timezone: Option<String>,
    pub elevation: Option<f64>,
    #[serde(default)]
    pub stats: Vec<DailyStat>,
}

/// Provider-computed daily summary, passed through for the day cards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyStat {
    #[serde(rename = "localDate")]
    pub local_date: String,
    pub icon: Option<String>,
    #[serde(rename = "maxCelsius")]
    pub max_celsius: Option<f64>,
    #[serde(rename = "minCelsius")]
    pub min_celsius: Option<f64>,
}

/// One normalized hour. Every field except the instant is optional: missing
/// or unparsable provider cells come through as None, and the marine fields
/// are None whenever no marine sample shares this exact instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourlyRecord {
    pub time: DateTime<Utc>,
    pub temp: Option<f64>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
    pub rain: Option<f64>,
    pub wind_dir: Option<f64>,
    pub wind_card: Option<String>,
    pub wind_speed: Option<f64>,
    /// Gust in km/h, already converted from the provider's m/s series.
    /// Only meaningful when greater than `wind_speed`; that comparison is
    /// left to the presentation layer, both raw values are kept.
    pub gust: Option<f64>,
    pub icon: Option<String>,
    pub wave_height: Option<f64>,
    pub wave_period: Option<f64>,
    pub wave_dir: Option<f64>,
    pub wave_card: Option<String>,
    pub beaufort: Option<f64>,
}

/// All hours falling on one civil calendar day of the target timezone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayGroup {
    pub date: String,
    pub hours: Vec<HourlyRecord>,
    /// True iff at least one contained hour carries a numeric marine field.
    pub has_marine: bool,
}

/// Temperature and precipitation extracted full-length for the overview
/// line chart, parallel to `times`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSeries {
    pub times: Vec<DateTime<Utc>>,
    pub temp: Vec<Option<f64>>,
    pub rain: Vec<Option<f64>>,
}
