use axum::Json;
use paws_shared::types::api::HealthResponse;

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy("paws-location", env!("CARGO_PKG_VERSION")))
}
