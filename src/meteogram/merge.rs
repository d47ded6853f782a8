use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::collections::HashMap;
use thiserror::Error;

use super::params::{
    read_cell_number, read_cell_string, read_series, read_string_series, ParamIndex,
};
use super::types::{ChartSeries, DayGroup, HourlyRecord, MeteogramResponse};
use crate::utils::{civil_day_key, ms_to_kmh};

/// Key of the single dataset block inside the payload's `datasets` map.
const PRIMARY_DATASET: &str = "0";

#[derive(Error, Debug)]
pub enum MergeError {
    /// The payload carries no dataset block at all. This is the one fatal
    /// condition: without it there is nothing to normalize. Sparse or
    /// missing individual parameters degrade to nulls instead.
    #[error("meteogram payload carries no primary dataset")]
    MissingDataset,
}

/// Marine fields sampled at one instant of the marine timeseries.
struct MarineSample {
    wave_height: Option<f64>,
    wave_period: Option<f64>,
    wave_dir: Option<f64>,
    wave_card: Option<String>,
    beaufort: Option<f64>,
}

impl MarineSample {
    /// A cardinal label alone does not count as marine data.
    fn has_data(&self) -> bool {
        self.wave_height.is_some()
            || self.wave_period.is_some()
            || self.wave_dir.is_some()
            || self.beaufort.is_some()
    }
}

/// Normalize a meteogram payload into per-civil-day buckets of hourly
/// records, joining an optional marine payload by exact instant.
///
/// Day groups come out in first-seen order of the timeseries; every instant
/// lands in exactly one group. An empty timeseries yields an empty result.
pub fn group_hours_by_day(
    primary: &MeteogramResponse,
    marine: Option<&MeteogramResponse>,
    tz: &Tz,
) -> Result<Vec<DayGroup>, MergeError> {
    let dataset = primary
        .datasets
        .get(PRIMARY_DATASET)
        .ok_or(MergeError::MissingDataset)?;
    let n = primary.timeseries.len();
    if n == 0 {
        return Ok(Vec::new());
    }

    let params = ParamIndex::new(&primary.paramlist);
    let temp = read_series(dataset, params.get("2t"), n);
    let humidity = read_series(dataset, params.get("r"), n);
    let pressure = read_series(dataset, params.get("pmsl"), n);
    let rain = read_series(dataset, params.get("tpp"), n);
    let wind_dir = read_series(dataset, params.get("wdir"), n);
    let wind_card = read_string_series(dataset, params.get("wcar"), n);
    let wind_speed = read_series(dataset, params.get("wkmh"), n);
    // Gust arrives in m/s on the `wspd` channel while sustained speed is
    // already km/h; convert here so the two are comparable downstream.
    let gust: Vec<Option<f64>> = read_series(dataset, params.get("wspd"), n)
        .into_iter()
        .map(|v| v.map(|ms| ms_to_kmh(ms).round()))
        .collect();
    let icon = read_string_series(dataset, params.get("icon"), n);

    let marine_by_instant = marine.map(index_marine).unwrap_or_default();

    let mut groups: Vec<DayGroup> = Vec::new();
    let mut group_index: HashMap<String, usize> = HashMap::new();

    for (i, instant) in primary.timeseries.iter().enumerate() {
        let key = civil_day_key(*instant, tz);
        let slot = match group_index.get(&key) {
            Some(&slot) => slot,
            None => {
                let slot = groups.len();
                groups.push(DayGroup {
                    date: key.clone(),
                    hours: Vec::new(),
                    has_marine: false,
                });
                group_index.insert(key, slot);
                slot
            }
        };

        let sample = marine_by_instant.get(instant);
        let record = HourlyRecord {
            time: *instant,
            temp: temp[i],
            humidity: humidity[i],
            pressure: pressure[i],
            rain: rain[i],
            wind_dir: wind_dir[i],
            wind_card: wind_card[i].clone(),
            wind_speed: wind_speed[i],
            gust: gust[i],
            icon: icon[i].clone(),
            wave_height: sample.and_then(|m| m.wave_height),
            wave_period: sample.and_then(|m| m.wave_period),
            wave_dir: sample.and_then(|m| m.wave_dir),
            wave_card: sample.and_then(|m| m.wave_card.clone()),
            beaufort: sample.and_then(|m| m.beaufort),
        };

        let group = &mut groups[slot];
        if sample.is_some_and(MarineSample::has_data) {
            group.has_marine = true;
        }
        group.hours.push(record);
    }

    Ok(groups)
}

/// The temperature and precipitation series the overview chart plots,
/// extracted full-length from the same payload the day grouping consumes.
pub fn extract_chart_series(primary: &MeteogramResponse) -> Result<ChartSeries, MergeError> {
    let dataset = primary
        .datasets
        .get(PRIMARY_DATASET)
        .ok_or(MergeError::MissingDataset)?;
    let n = primary.timeseries.len();
    let params = ParamIndex::new(&primary.paramlist);
    Ok(ChartSeries {
        times: primary.timeseries.clone(),
        temp: read_series(dataset, params.get("2t"), n),
        rain: read_series(dataset, params.get("tpp"), n),
    })
}

/// Index the marine payload by instant via single-cell reads. Samples whose
/// instants match no primary instant stay unreachable; there is no
/// interpolation onto the primary grid.
fn index_marine(marine: &MeteogramResponse) -> HashMap<DateTime<Utc>, MarineSample> {
    let mut by_instant = HashMap::new();
    let dataset = match marine.datasets.get(PRIMARY_DATASET) {
        // A marine payload with no samples behaves like no payload at all.
        Some(dataset) if !marine.timeseries.is_empty() => dataset,
        _ => return by_instant,
    };

    let params = ParamIndex::new(&marine.paramlist);
    for (j, instant) in marine.timeseries.iter().enumerate() {
        by_instant.insert(
            *instant,
            MarineSample {
                wave_height: read_cell_number(dataset, params.get("swh"), j),
                wave_period: read_cell_number(dataset, params.get("mwp"), j),
                wave_dir: read_cell_number(dataset, params.get("mwd"), j),
                wave_card: read_cell_string(dataset, params.get("mcar"), j),
                beaufort: read_cell_number(dataset, params.get("wbeauf"), j),
            },
        );
    }
    by_instant
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::{json, Value};

    const ATMO_PARAMS: [&str; 10] = [
        "2t", "r", "pmsl", "tpp", "wdir", "wcar", "wspd", "wkmh", "2tf", "icon",
    ];
    const MARINE_PARAMS: [&str; 5] = ["swh", "mwp", "mwd", "mcar", "wbeauf"];

    fn rome() -> Tz {
        "Europe/Rome".parse().unwrap()
    }

    fn instants(start: &str, hours: usize) -> Vec<DateTime<Utc>> {
        let start: DateTime<Utc> = start.parse().unwrap();
        (0..hours).map(|h| start + Duration::hours(h as i64)).collect()
    }

    /// Build a payload with dense rows for the named parameters.
    fn payload(
        timeseries: Vec<DateTime<Utc>>,
        paramlist: &[&str],
        rows: &[(&str, Vec<Value>)],
    ) -> MeteogramResponse {
        let mut dataset = super::super::types::Dataset::new();
        for (name, values) in rows {
            let position = paramlist
                .iter()
                .position(|p| p == name)
                .expect("row for unknown parameter")
                .to_string();
            let row = values
                .iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v.clone()))
                .collect();
            dataset.insert(position, row);
        }
        MeteogramResponse {
            timeseries,
            paramlist: paramlist.iter().map(|s| s.to_string()).collect(),
            datasets: HashMap::from([(PRIMARY_DATASET.to_string(), dataset)]),
            extrainfo: None,
        }
    }

    fn numbers(values: &[f64]) -> Vec<Value> {
        values.iter().map(|v| json!(v)).collect()
    }

    #[test]
    fn test_missing_dataset_is_fatal() {
        let mut primary = payload(instants("2024-06-01T00:00:00Z", 3), &ATMO_PARAMS, &[]);
        primary.datasets.clear();
        let result = group_hours_by_day(&primary, None, &rome());
        assert!(matches!(result, Err(MergeError::MissingDataset)));
    }

    #[test]
    fn test_empty_timeseries_yields_no_groups() {
        let primary = payload(Vec::new(), &ATMO_PARAMS, &[]);
        let groups = group_hours_by_day(&primary, None, &rome()).unwrap();
        assert!(groups.is_empty());
    }

    #[test]
    fn test_partition_across_local_midnight() {
        // 48 hourly samples starting 10:00 UTC = 12:00 in Rome (CEST).
        // Local days: 12 hours on day one, 24 on day two, 12 on day three.
        let ts = instants("2024-06-01T10:00:00Z", 48);
        let temps: Vec<f64> = (0..48).map(|i| i as f64).collect();
        let primary = payload(ts, &ATMO_PARAMS, &[("2t", numbers(&temps))]);

        let groups = group_hours_by_day(&primary, None, &rome()).unwrap();

        assert_eq!(groups.len(), 3);
        assert_eq!(
            groups.iter().map(|g| g.date.as_str()).collect::<Vec<_>>(),
            vec!["2024-06-01", "2024-06-02", "2024-06-03"]
        );
        assert_eq!(
            groups.iter().map(|g| g.hours.len()).collect::<Vec<_>>(),
            vec![12, 24, 12]
        );
        let total: usize = groups.iter().map(|g| g.hours.len()).sum();
        assert_eq!(total, 48);
        // Boundary hours land on the right side of midnight.
        assert_eq!(groups[0].hours.last().unwrap().temp, Some(11.0));
        assert_eq!(groups[1].hours.first().unwrap().temp, Some(12.0));
    }

    #[test]
    fn test_day_groups_keep_first_seen_order() {
        let day2: DateTime<Utc> = "2024-06-02T12:00:00Z".parse().unwrap();
        let day1: DateTime<Utc> = "2024-06-01T12:00:00Z".parse().unwrap();
        let ts = vec![day2, day1, day2 + Duration::hours(1)];
        let primary = payload(ts, &ATMO_PARAMS, &[]);

        let groups = group_hours_by_day(&primary, None, &rome()).unwrap();

        assert_eq!(
            groups.iter().map(|g| g.date.as_str()).collect::<Vec<_>>(),
            vec!["2024-06-02", "2024-06-01"]
        );
        assert_eq!(groups[0].hours.len(), 2);
        assert_eq!(groups[1].hours.len(), 1);
    }

    #[test]
    fn test_gust_is_converted_from_ms() {
        let ts = instants("2024-06-01T00:00:00Z", 3);
        let primary = payload(
            ts,
            &ATMO_PARAMS,
            &[
                ("wspd", vec![json!(10.0), json!(10.3), json!(null)]),
                ("wkmh", numbers(&[30.0, 40.0, 20.0])),
            ],
        );

        let groups = group_hours_by_day(&primary, None, &rome()).unwrap();
        let hours: Vec<_> = groups.iter().flat_map(|g| g.hours.iter()).collect();

        assert_eq!(hours[0].gust, Some(36.0));
        assert_eq!(hours[1].gust, Some(37.0));
        assert_eq!(hours[2].gust, None);
        // Sustained speed comes from its own channel, unconverted.
        assert_eq!(hours[0].wind_speed, Some(30.0));
        // Gust below sustained speed is preserved, not zeroed out.
        assert_eq!(hours[1].wind_speed, Some(40.0));
        assert_eq!(hours[1].gust, Some(37.0));
    }

    #[test]
    fn test_missing_parameter_null_fills_without_failing() {
        let ts = instants("2024-06-01T00:00:00Z", 2);
        // Paramlist without pmsl: pressure must be all-null, the rest intact.
        let list = ["2t", "r", "tpp", "wdir", "wcar", "wspd", "wkmh", "icon"];
        let primary = payload(ts, &list, &[("2t", numbers(&[20.0, 21.0]))]);

        let groups = group_hours_by_day(&primary, None, &rome()).unwrap();
        let hours: Vec<_> = groups.iter().flat_map(|g| g.hours.iter()).collect();

        assert_eq!(hours[0].temp, Some(20.0));
        assert!(hours.iter().all(|h| h.pressure.is_none()));
    }

    #[test]
    fn test_string_cells_and_coercion() {
        let ts = instants("2024-06-01T00:00:00Z", 2);
        let primary = payload(
            ts,
            &ATMO_PARAMS,
            &[
                ("2t", vec![json!("21.5"), json!("n/a")]),
                ("wcar", vec![json!("NE"), json!(null)]),
                ("icon", vec![json!("03"), json!(9)]),
            ],
        );

        let groups = group_hours_by_day(&primary, None, &rome()).unwrap();
        let hours: Vec<_> = groups.iter().flat_map(|g| g.hours.iter()).collect();

        assert_eq!(hours[0].temp, Some(21.5));
        assert_eq!(hours[1].temp, None);
        assert_eq!(hours[0].wind_card.as_deref(), Some("NE"));
        assert_eq!(hours[1].wind_card, None);
        assert_eq!(hours[0].icon.as_deref(), Some("03"));
        assert_eq!(hours[1].icon.as_deref(), Some("9"));
    }

    #[test]
    fn test_no_marine_payload_leaves_marine_fields_null() {
        let ts = instants("2024-06-01T00:00:00Z", 6);
        let primary = payload(ts, &ATMO_PARAMS, &[]);

        let groups = group_hours_by_day(&primary, None, &rome()).unwrap();

        assert!(groups.iter().all(|g| !g.has_marine));
        assert!(groups
            .iter()
            .flat_map(|g| g.hours.iter())
            .all(|h| h.wave_height.is_none()
                && h.wave_period.is_none()
                && h.wave_dir.is_none()
                && h.wave_card.is_none()
                && h.beaufort.is_none()));
    }

    #[test]
    fn test_marine_joined_by_exact_instant() {
        let ts = instants("2024-06-01T00:00:00Z", 4);
        let primary = payload(ts.clone(), &ATMO_PARAMS, &[]);

        // One sample on the shared grid, one 30 minutes off it.
        let marine_ts = vec![ts[1], ts[2] + Duration::minutes(30)];
        let marine = payload(
            marine_ts,
            &MARINE_PARAMS,
            &[
                ("swh", numbers(&[1.2, 9.9])),
                ("mwp", numbers(&[6.0, 9.9])),
                ("mwd", numbers(&[180.0, 9.9])),
                ("mcar", vec![json!("S"), json!("S")]),
                ("wbeauf", numbers(&[3.0, 9.9])),
            ],
        );

        let groups = group_hours_by_day(&primary, Some(&marine), &rome()).unwrap();
        let hours: Vec<_> = groups.iter().flat_map(|g| g.hours.iter()).collect();

        assert_eq!(hours[1].wave_height, Some(1.2));
        assert_eq!(hours[1].wave_period, Some(6.0));
        assert_eq!(hours[1].wave_dir, Some(180.0));
        assert_eq!(hours[1].wave_card.as_deref(), Some("S"));
        assert_eq!(hours[1].beaufort, Some(3.0));
        // The off-grid sample joins nowhere.
        for i in [0, 2, 3] {
            assert!(hours[i].wave_height.is_none());
            assert!(hours[i].beaufort.is_none());
        }
        assert!(groups[0].has_marine);
    }

    #[test]
    fn test_empty_marine_payload_behaves_like_none() {
        let ts = instants("2024-06-01T00:00:00Z", 3);
        let primary = payload(ts, &ATMO_PARAMS, &[]);
        let marine = payload(Vec::new(), &MARINE_PARAMS, &[]);

        let groups = group_hours_by_day(&primary, Some(&marine), &rome()).unwrap();

        assert!(groups.iter().all(|g| !g.has_marine));
    }

    #[test]
    fn test_cardinal_only_marine_sample_does_not_set_flag() {
        let ts = instants("2024-06-01T00:00:00Z", 2);
        let primary = payload(ts.clone(), &ATMO_PARAMS, &[]);
        let marine = payload(
            vec![ts[0]],
            &MARINE_PARAMS,
            &[("mcar", vec![json!("NW")])],
        );

        let groups = group_hours_by_day(&primary, Some(&marine), &rome()).unwrap();

        assert_eq!(groups[0].hours[0].wave_card.as_deref(), Some("NW"));
        assert!(!groups[0].has_marine);
    }

    #[test]
    fn test_chart_series_parallel_to_timeseries() {
        let ts = instants("2024-06-01T00:00:00Z", 3);
        let primary = payload(
            ts.clone(),
            &ATMO_PARAMS,
            &[
                ("2t", numbers(&[18.0, 19.0, 20.0])),
                ("tpp", vec![json!(0.0), json!(null), json!(1.4)]),
            ],
        );

        let chart = extract_chart_series(&primary).unwrap();

        assert_eq!(chart.times, ts);
        assert_eq!(chart.temp, vec![Some(18.0), Some(19.0), Some(20.0)]);
        assert_eq!(chart.rain, vec![Some(0.0), None, Some(1.4)]);
    }
}
