use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod astro;
mod config;
mod geocode;
mod meteogram;
mod routes;
mod utils;

use astro::{moon::MoonClient, sun::SunClient};
use config::Config;
use geocode::{init_geocode_cache, GeocodeClient};
use meteogram::meteoam::MeteoAmClient;
use routes::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "meteogram_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize provider clients
    let meteoam = Arc::new(MeteoAmClient::new(config.clone()));
    let geocoder = Arc::new(GeocodeClient::new(config.clone()));
    let sun = Arc::new(SunClient::new(config.clone()));
    let moon = Arc::new(MoonClient::new(config.clone()));
    let geocode_cache = init_geocode_cache();

    let config = Arc::new(config);

    // Create application state
    let state = AppState {
        config,
        meteoam,
        geocoder,
        sun,
        moon,
        geocode_cache,
    };

    let app = create_router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
    tracing::info!("Server starting on http://0.0.0.0:8080");

    axum::serve(listener, app).await?;

    Ok(())
}
