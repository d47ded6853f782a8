use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Astronomical data for one civil day. Every field degrades to None on its
/// own: a failed sun lookup leaves the moon fields alone and vice versa.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AstroInfo {
    pub sunrise: Option<DateTime<Utc>>,
    pub sunset: Option<DateTime<Utc>>,
    pub civil_dawn: Option<DateTime<Utc>>,
    pub civil_dusk: Option<DateTime<Utc>>,
    pub nautical_dawn: Option<DateTime<Utc>>,
    pub nautical_dusk: Option<DateTime<Utc>>,
    pub astronomical_dawn: Option<DateTime<Utc>>,
    pub astronomical_dusk: Option<DateTime<Utc>>,
    /// Phase label exactly as the provider sent it.
    pub moon_phase: Option<String>,
    /// Local wall-clock "HH:MM" strings, passed through verbatim.
    pub moonrise: Option<String>,
    pub moonset: Option<String>,
    /// Set only on the first day of a run of equal phases, so the UI shows
    /// a moon icon once per transition instead of on every day.
    pub phase_marker: Option<MoonPhase>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoonPhase {
    New,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    Full,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl MoonPhase {
    /// Normalize a provider phase label. Providers disagree on casing,
    /// separators and wording; anything unrecognized yields None.
    pub fn normalize(raw: &str) -> Option<Self> {
        let lowered = raw.trim().to_lowercase().replace(['_', '-'], " ");
        let canonical = lowered.split_whitespace().collect::<Vec<_>>().join(" ");
        match canonical.as_str() {
            "new" | "new moon" => Some(Self::New),
            "waxing crescent" => Some(Self::WaxingCrescent),
            "first quarter" | "1st quarter" => Some(Self::FirstQuarter),
            "waxing gibbous" => Some(Self::WaxingGibbous),
            "full" | "full moon" => Some(Self::Full),
            "waning gibbous" => Some(Self::WaningGibbous),
            "last quarter" | "third quarter" | "3rd quarter" => Some(Self::LastQuarter),
            "waning crescent" => Some(Self::WaningCrescent),
            _ => None,
        }
    }
}

/// Envelope of the sunrise-sunset provider; `status` is "OK" on success.
#[derive(Debug, Clone, Deserialize)]
pub struct SunApiResponse {
    pub status: String,
    pub results: Option<SunTimes>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SunTimes {
    pub sunrise: Option<DateTime<Utc>>,
    pub sunset: Option<DateTime<Utc>>,
    pub civil_twilight_begin: Option<DateTime<Utc>>,
    pub civil_twilight_end: Option<DateTime<Utc>>,
    pub nautical_twilight_begin: Option<DateTime<Utc>>,
    pub nautical_twilight_end: Option<DateTime<Utc>>,
    pub astronomical_twilight_begin: Option<DateTime<Utc>>,
    pub astronomical_twilight_end: Option<DateTime<Utc>>,
}

/// The slice of the astronomy provider's response this service reads.
#[derive(Debug, Clone, Deserialize)]
pub struct MoonApiResponse {
    pub moon_phase: Option<String>,
    pub moonrise: Option<String>,
    pub moonset: Option<String>,
}
