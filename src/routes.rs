use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::{
    astro::{aggregate::collect_astro, moon::MoonClient, sun::SunClient, types::AstroInfo},
    config::Config,
    geocode::{GeocodeCache, GeocodeClient, Place},
    meteogram::{
        merge::{extract_chart_series, group_hours_by_day},
        meteoam::MeteoAmClient,
        types::{ChartSeries, DailyStat, DayGroup},
    },
    utils::{parse_timezone, validate_coordinates},
};

// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub meteoam: Arc<MeteoAmClient>,
    pub geocoder: Arc<GeocodeClient>,
    pub sun: Arc<SunClient>,
    pub moon: Arc<MoonClient>,
    pub geocode_cache: GeocodeCache,
}

// Request/Response types
#[derive(Debug, Deserialize)]
pub struct GeocodeQuery {
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    pub q: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct LocationInfo {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub timezone: String,
    pub elevation: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    pub location: LocationInfo,
    pub days: Vec<DayGroup>,
    pub astro: HashMap<String, AstroInfo>,
    pub stats: Vec<DailyStat>,
    pub chart: ChartSeries,
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

// Route handlers
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn geocode(
    State(state): State<AppState>,
    Query(params): Query<GeocodeQuery>,
) -> Result<Json<Vec<Place>>, StatusCode> {
    let query = params.q.trim().to_string();
    if query.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    if let Some(hit) = state.geocode_cache.get(&query).await {
        return Ok(Json(hit));
    }

    match state.geocoder.search(&query).await {
        Ok(places) => {
            state.geocode_cache.insert(query, places.clone()).await;
            Ok(Json(places))
        }
        Err(e) => {
            tracing::error!("Geocoding failed: {}", e);
            Err(StatusCode::BAD_GATEWAY)
        }
    }
}

pub async fn get_forecast(
    State(state): State<AppState>,
    Query(params): Query<ForecastQuery>,
) -> Result<Json<ForecastResponse>, StatusCode> {
    // Resolve the requested place: search query, explicit coordinates, or
    // the configured default location.
    let (name, lat, lon) = if let Some(q) = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
    {
        let places = state.geocoder.search(q).await.map_err(|e| {
            tracing::error!("Geocoding failed: {}", e);
            StatusCode::BAD_GATEWAY
        })?;
        let best = places.into_iter().next().ok_or(StatusCode::NOT_FOUND)?;
        (best.name, best.lat, best.lon)
    } else if let (Some(lat), Some(lon)) = (params.lat, params.lon) {
        let name = params
            .name
            .clone()
            .unwrap_or_else(|| format!("{:.3}, {:.3}", lat, lon));
        (name, lat, lon)
    } else {
        (
            state.config.default_location_name.clone(),
            state.config.default_lat,
            state.config.default_lon,
        )
    };

    if validate_coordinates(lat, lon).is_err() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let payload = state.meteoam.get_meteogram(lat, lon).await.map_err(|e| {
        tracing::error!("Meteogram fetch failed: {}", e);
        StatusCode::BAD_GATEWAY
    })?;

    // The marine preset is best-effort: coastal points have one, inland
    // points usually do not.
    let marine = match state.meteoam.get_marine_meteogram(lat, lon).await {
        Ok(m) => Some(m),
        Err(e) => {
            tracing::warn!("Marine meteogram unavailable: {}", e);
            None
        }
    };

    let tz_name = payload
        .extrainfo
        .as_ref()
        .and_then(|x| x.timezone.clone())
        .unwrap_or_else(|| state.config.default_timezone.clone());
    let tz = parse_timezone(&tz_name)
        .or_else(|_| parse_timezone(&state.config.default_timezone))
        .unwrap_or(chrono_tz::UTC);

    let days = group_hours_by_day(&payload, marine.as_ref(), &tz).map_err(|e| {
        tracing::error!("Day grouping failed: {}", e);
        StatusCode::BAD_GATEWAY
    })?;
    let chart = extract_chart_series(&payload).map_err(|e| {
        tracing::error!("Chart extraction failed: {}", e);
        StatusCode::BAD_GATEWAY
    })?;

    let day_keys: Vec<String> = days.iter().map(|d| d.date.clone()).collect();
    let astro = collect_astro(&state.sun, &state.moon, &day_keys, lat, lon).await;

    let (elevation, stats) = match payload.extrainfo {
        Some(extra) => (extra.elevation, extra.stats),
        None => (None, Vec::new()),
    };

    Ok(Json(ForecastResponse {
        location: LocationInfo {
            name,
            lat,
            lon,
            timezone: tz_name,
            elevation,
        },
        days,
        astro,
        stats,
        chart,
        generated_at: chrono::Utc::now(),
    }))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/geocode", get(geocode))
        .route("/forecast", get(get_forecast))
        .with_state(state)
}
