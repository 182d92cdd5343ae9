use axum::routing::{get, post, put};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod clients;
mod config;
mod events;
mod models;
mod routes;
mod schema;
mod workflow;

use clients::matching::MatchingClient;
use config::AppConfig;
use paws_shared::clients::db::{create_pool, DbPool};
use paws_shared::clients::rabbitmq::RabbitMQClient;

pub struct AppState {
    pub db: DbPool,
    pub config: AppConfig,
    pub rabbitmq: RabbitMQClient,
    pub matching: MatchingClient,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    paws_shared::middleware::init_tracing("paws-playdate");

    let config = AppConfig::load()?;
    let port = config.port;

    // Set JWT_SECRET env var for the auth extractor middleware
    std::env::set_var("JWT_SECRET", &config.jwt_secret);

    let db = create_pool(&config.database_url)?;
    let rabbitmq = RabbitMQClient::connect(&config.rabbitmq_url).await?;

    let http_client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()?;
    let matching = MatchingClient::new(http_client, config.matching_service_url.clone());

    let state = Arc::new(AppState { db, config, rabbitmq, matching });

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        // Requests
        .route(
            "/playdate-requests",
            post(routes::requests::create_request).get(routes::requests::list_requests),
        )
        .route(
            "/playdate-requests/:id/respond",
            put(routes::requests::respond_to_request),
        )
        // Playdates
        .route("/playdates", get(routes::playdates::list_playdates))
        .route("/playdates/:id", get(routes::playdates::get_playdate))
        .route("/playdates/:id/complete", put(routes::playdates::complete_playdate))
        .route("/playdates/:id/cancel", put(routes::playdates::cancel_playdate))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "paws-playdate starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
