use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod config;
mod models;
mod routes;
mod schema;

use config::AppConfig;
use paws_shared::clients::db::{create_pool, DbPool};

pub struct AppState {
    pub db: DbPool,
    pub config: AppConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    paws_shared::middleware::init_tracing("paws-profile");

    let config = AppConfig::load()?;
    let port = config.port;

    // Set JWT_SECRET env var for the auth extractor middleware
    std::env::set_var("JWT_SECRET", &config.jwt_secret);

    let db = create_pool(&config.database_url)?;

    let state = Arc::new(AppState { db, config });

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/me", post(routes::profile::create_profile)
            .get(routes::profile::get_profile)
            .patch(routes::profile::update_profile))
        .route("/dogs", post(routes::dogs::create_dog).get(routes::dogs::list_my_dogs))
        .route("/dogs/:id", get(routes::dogs::get_dog)
            .patch(routes::dogs::update_dog)
            .delete(routes::dogs::delete_dog))
        // Internal service-to-service endpoints (no auth)
        .route("/internal/dogs/batch", post(routes::internal::batch_dogs))
        .route("/internal/dogs/discover", get(routes::internal::discover_dogs))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "paws-profile starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
