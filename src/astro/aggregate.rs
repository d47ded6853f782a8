use futures::future::join_all;
use std::collections::{BTreeSet, HashMap};

use super::moon::MoonClient;
use super::sun::SunClient;
use super::types::{AstroInfo, MoonPhase};

/// Collect per-day astronomical data for the given day keys.
///
/// Sun/twilight lookups are independent per day and fire concurrently; a
/// failure leaves that day's sun fields null and touches nothing else. Moon
/// lookups run one day at a time in chronological order because the
/// phase-transition markers depend on the previous day's phase.
pub async fn collect_astro(
    sun: &SunClient,
    moon: &MoonClient,
    day_keys: &[String],
    lat: f64,
    lon: f64,
) -> HashMap<String, AstroInfo> {
    // Ascending lexicographic order on "YYYY-MM-DD" keys is chronological.
    let days: Vec<String> = day_keys
        .iter()
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut astro: HashMap<String, AstroInfo> = days
        .iter()
        .map(|day| (day.clone(), AstroInfo::default()))
        .collect();

    let sun_results = join_all(days.iter().map(|day| async move {
        (day.as_str(), sun.fetch_day(lat, lon, day).await)
    }))
    .await;

    for (day, result) in sun_results {
        match result {
            Ok(times) => {
                if let Some(info) = astro.get_mut(day) {
                    info.sunrise = times.sunrise;
                    info.sunset = times.sunset;
                    info.civil_dawn = times.civil_twilight_begin;
                    info.civil_dusk = times.civil_twilight_end;
                    info.nautical_dawn = times.nautical_twilight_begin;
                    info.nautical_dusk = times.nautical_twilight_end;
                    info.astronomical_dawn = times.astronomical_twilight_begin;
                    info.astronomical_dusk = times.astronomical_twilight_end;
                }
            }
            Err(e) => {
                tracing::warn!("Sun lookup failed for {}: {}", day, e);
            }
        }
    }

    let mut phases: Vec<Option<MoonPhase>> = Vec::with_capacity(days.len());
    for day in &days {
        match moon.fetch_day(lat, lon, day).await {
            Ok(response) => {
                phases.push(response.moon_phase.as_deref().and_then(MoonPhase::normalize));
                if let Some(info) = astro.get_mut(day) {
                    info.moon_phase = response.moon_phase;
                    info.moonrise = response.moonrise;
                    info.moonset = response.moonset;
                }
            }
            Err(e) => {
                tracing::warn!("Moon lookup failed for {}: {}", day, e);
                phases.push(None);
            }
        }
    }

    for (day, marker) in days.iter().zip(mark_phase_transitions(&phases)) {
        if marker.is_some() {
            if let Some(info) = astro.get_mut(day) {
                info.phase_marker = marker;
            }
        }
    }

    astro
}

/// Walk normalized per-day phases in chronological order and emit a marker
/// only on days whose phase differs from the last phase seen. Days without
/// a usable phase neither advance the cursor nor receive a marker.
pub fn mark_phase_transitions(phases: &[Option<MoonPhase>]) -> Vec<Option<MoonPhase>> {
    let mut last: Option<MoonPhase> = None;
    phases
        .iter()
        .map(|phase| match phase {
            Some(p) if last != Some(*p) => {
                last = Some(*p);
                Some(*p)
            }
            _ => None,
        })
        .collect()
}
