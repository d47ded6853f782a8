use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Validate latitude and longitude coordinates
pub fn validate_coordinates(lat: f64, lon: f64) -> Result<(), String> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err(format!("Invalid latitude: {}. Must be between -90 and 90", lat));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(format!("Invalid longitude: {}. Must be between -180 and 180", lon));
    }
    Ok(())
}

/// Parse timezone string and validate
pub fn parse_timezone(tz_str: &str) -> Result<Tz, String> {
    tz_str
        .parse::<Tz>()
        .map_err(|_| format!("Invalid timezone: {}", tz_str))
}

/// Civil calendar date of an instant as observed in the given timezone,
/// formatted "YYYY-MM-DD" with zero-padded month and day.
pub fn civil_day_key(instant: DateTime<Utc>, tz: &Tz) -> String {
    instant.with_timezone(tz).format("%Y-%m-%d").to_string()
}

/// Convert wind speed between m/s and km/h
pub fn ms_to_kmh(ms: f64) -> f64 {
    ms * 3.6
}

pub fn kmh_to_ms(kmh: f64) -> f64 {
    kmh / 3.6
}

/// 16-point compass label for a wind direction in degrees. Degrees outside
/// [0, 360) are wrapped first.
pub fn deg_to_cardinal(deg: f64) -> &'static str {
    const DIRS: [&str; 17] = [
        "N", "N-NE", "NE", "E-NE", "E", "E-SE", "SE", "S-SE", "S", "S-SW", "SW", "W-SW", "W",
        "W-NW", "NW", "N-NW", "N",
    ];
    let wrapped = ((deg % 360.0) + 360.0) % 360.0;
    DIRS[(wrapped / 22.5).round() as usize]
}
