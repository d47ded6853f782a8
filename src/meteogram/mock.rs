use chrono::{DateTime, Duration, Timelike, Utc};
use serde_json::json;
use std::collections::HashMap;

use super::types::{DailyStat, Dataset, ExtraInfo, MeteogramResponse};

/// Parameter layout of the provider's atmospheric preset.
pub const ATMO_PARAMLIST: [&str; 10] = [
    "2t", "r", "pmsl", "tpp", "wdir", "wcar", "wspd", "wkmh", "2tf", "icon",
];

/// Parameter layout of the marine preset.
pub const MARINE_PARAMLIST: [&str; 5] = ["swh", "mwp", "mwd", "mcar", "wbeauf"];

/// Generate a realistic atmospheric meteogram payload: diurnal temperature
/// and humidity curves, occasional rain, and a few deliberately missing
/// cells so consumers keep exercising their null paths.
pub fn generate_meteogram(start: DateTime<Utc>, hours: usize, timezone: &str) -> MeteogramResponse {
    let timeseries: Vec<DateTime<Utc>> =
        (0..hours).map(|h| start + Duration::hours(h as i64)).collect();

    let mut dataset = Dataset::new();
    for (position, name) in ATMO_PARAMLIST.iter().enumerate() {
        let mut row = HashMap::new();
        for (i, instant) in timeseries.iter().enumerate() {
            // Sparse rows: drop roughly one cell in twenty.
            if fastrand::u8(0..20) == 0 {
                continue;
            }
            let hour_of_day = instant.hour() as f64;
            let diurnal = ((hour_of_day - 6.0) * std::f64::consts::PI / 12.0).sin();
            let value = match *name {
                "2t" => json!(18.0 + 8.0 * diurnal),
                "2tf" => json!(17.0 + 8.0 * diurnal),
                "r" => json!((70.0 - 25.0 * diurnal).clamp(20.0, 100.0)),
                "pmsl" => json!(1013.0 + 6.0 * fastrand::f64()),
                "tpp" => {
                    if i % 9 == 0 {
                        json!(2.5 * fastrand::f64())
                    } else {
                        json!(0.0)
                    }
                }
                "wdir" => json!(360.0 * fastrand::f64()),
                "wcar" => json!(["N", "NE", "E", "SE", "S", "SW", "W", "NW"][fastrand::usize(0..8)]),
                "wspd" => json!(1.0 + 6.0 * fastrand::f64()),
                "wkmh" => json!(5.0 + 20.0 * fastrand::f64()),
                "icon" => json!(format!("{:02}", 1 + fastrand::u8(0..9))),
                _ => unreachable!(),
            };
            row.insert(i.to_string(), value);
        }
        dataset.insert(position.to_string(), row);
    }

    let stats = timeseries
        .iter()
        .step_by(24)
        .map(|day_start| DailyStat {
            local_date: day_start.format("%Y-%m-%dT00:00:00").to_string(),
            icon: Some(format!("{:02}", 1 + fastrand::u8(0..9))),
            max_celsius: Some(26.0),
            min_celsius: Some(12.0),
        })
        .collect();

    MeteogramResponse {
        timeseries,
        paramlist: ATMO_PARAMLIST.iter().map(|s| s.to_string()).collect(),
        datasets: HashMap::from([("0".to_string(), dataset)]),
        extrainfo: Some(ExtraInfo {
            timezone: Some(timezone.to_string()),
            elevation: Some(21.0),
            stats,
        }),
    }
}

/// Generate a marine payload sampled every three hours on the same grid, as
/// the provider does for coastal points.
pub fn generate_marine_meteogram(start: DateTime<Utc>, hours: usize) -> MeteogramResponse {
    let timeseries: Vec<DateTime<Utc>> = (0..hours)
        .step_by(3)
        .map(|h| start + Duration::hours(h as i64))
        .collect();

    let mut dataset = Dataset::new();
    for (position, name) in MARINE_PARAMLIST.iter().enumerate() {
        let mut row = HashMap::new();
        for i in 0..timeseries.len() {
            let value = match *name {
                "swh" => json!(0.3 + 1.8 * fastrand::f64()),
                "mwp" => json!(4.0 + 4.0 * fastrand::f64()),
                "mwd" => json!(360.0 * fastrand::f64()),
                "mcar" => json!(["N", "NE", "E", "SE", "S", "SW", "W", "NW"][fastrand::usize(0..8)]),
                "wbeauf" => json!(fastrand::u8(0..7)),
                _ => unreachable!(),
            };
            row.insert(i.to_string(), value);
        }
        dataset.insert(position.to_string(), row);
    }

    MeteogramResponse {
        timeseries,
        paramlist: MARINE_PARAMLIST.iter().map(|s| s.to_string()).collect(),
        datasets: HashMap::from([("0".to_string(), dataset)]),
        extrainfo: None,
    }
}
