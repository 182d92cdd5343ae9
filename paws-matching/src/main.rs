use axum::routing::{get, post, put};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod clients;
mod config;
mod events;
mod matching;
mod models;
mod routes;
mod schema;

use clients::profile::ProfileClient;
use config::AppConfig;
use paws_shared::clients::db::{create_pool, DbPool};
use paws_shared::clients::rabbitmq::RabbitMQClient;

pub struct AppState {
    pub db: DbPool,
    pub config: AppConfig,
    pub rabbitmq: RabbitMQClient,
    pub profile: ProfileClient,
    pub metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    paws_shared::middleware::init_tracing("paws-matching");

    let config = AppConfig::load()?;
    let port = config.port;

    // Set JWT_SECRET env var for the auth extractor middleware
    std::env::set_var("JWT_SECRET", &config.jwt_secret);

    let db = create_pool(&config.database_url)?;
    let rabbitmq = RabbitMQClient::connect(&config.rabbitmq_url).await?;

    let http_client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()?;
    let profile = ProfileClient::new(http_client, config.profile_service_url.clone());

    let metrics_handle = paws_shared::middleware::init_metrics()?;

    let state = Arc::new(AppState { db, config, rabbitmq, profile, metrics_handle });

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::health::metrics))
        // Swipes
        .route("/swipes", post(routes::swipes::record_swipe))
        .route(
            "/swipes/check/:swiper_dog_id/:swiped_dog_id",
            get(routes::swipes::check_swipe),
        )
        // Matches
        .route("/matches", get(routes::matches::list_matches))
        .route("/matches/:id", get(routes::matches::get_match))
        .route("/matches/:id/respond", put(routes::matches::respond_to_match))
        // Discovery feed
        .route("/candidates", get(routes::candidates::list_candidates))
        // Internal service-to-service endpoints (no auth)
        .route("/internal/matches/:id", get(routes::internal::get_match_info))
        .layer(axum::middleware::from_fn(paws_shared::middleware::metrics_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "paws-matching starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
