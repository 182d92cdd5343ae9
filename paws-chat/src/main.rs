use axum::routing::{get, put};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod config;
mod events;
mod models;
mod routes;
mod schema;

use config::AppConfig;
use paws_shared::clients::db::{create_pool, DbPool};
use paws_shared::clients::rabbitmq::RabbitMQClient;

pub struct AppState {
    pub db: DbPool,
    pub config: AppConfig,
    pub rabbitmq: RabbitMQClient,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    paws_shared::middleware::init_tracing("paws-chat");

    let config = AppConfig::load()?;
    let port = config.port;

    // Set JWT_SECRET env var for the auth extractor middleware
    std::env::set_var("JWT_SECRET", &config.jwt_secret);

    let db = create_pool(&config.database_url)?;
    let rabbitmq = RabbitMQClient::connect(&config.rabbitmq_url).await?;

    let state = Arc::new(AppState { db, config, rabbitmq });

    // Conversations are opened by the matching service's events
    let sub_state = state.clone();
    tokio::spawn(async move {
        if let Err(e) = events::subscriber::listen_match_created(sub_state).await {
            tracing::error!(error = %e, "match.created subscriber failed");
        }
    });

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        // Conversations
        .route("/conversations", get(routes::conversations::list_conversations))
        .route("/conversations/:id", get(routes::conversations::get_conversation))
        .route("/conversations/:id/read", put(routes::messages::mark_as_read))
        // Messages
        .route(
            "/conversations/:id/messages",
            get(routes::messages::list_messages).post(routes::messages::send_message),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "paws-chat starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
