use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod cache;
mod config;
mod heuristics;
mod places;
mod ratelimit;
mod routes;

use config::AppConfig;
use paws_shared::clients::redis::RedisClient;
use places::client::PlacesClient;
use ratelimit::SlidingWindowLimiter;

pub struct AppState {
    pub config: AppConfig,
    pub redis: RedisClient,
    pub places: PlacesClient,
    pub limiter: SlidingWindowLimiter,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    paws_shared::middleware::init_tracing("paws-location");

    let config = AppConfig::load()?;
    let port = config.port;

    // Set JWT_SECRET env var for the auth extractor middleware
    std::env::set_var("JWT_SECRET", &config.jwt_secret);

    let redis = RedisClient::connect(&config.redis_url).await?;
    let places = PlacesClient::new(config.places_base_url.clone(), config.places_api_key.clone())?;
    let limiter =
        SlidingWindowLimiter::new(config.rate_limit_max_calls, config.rate_limit_window_secs);

    let state = Arc::new(AppState { config, redis, places, limiter });

    // Static /locations/autocomplete takes precedence over the
    // /locations/:place_id capture in axum's router
    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/locations/search", get(routes::locations::search_locations))
        .route("/locations/autocomplete", get(routes::locations::autocomplete))
        .route("/locations/:place_id", get(routes::locations::get_location))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "paws-location starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
