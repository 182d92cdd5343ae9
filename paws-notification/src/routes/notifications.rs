use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use uuid::Uuid;

use paws_shared::errors::AppResult;
use paws_shared::types::auth::AuthUser;
use paws_shared::types::pagination::{Paginated, PaginationParams};
use paws_shared::types::ApiResponse;

use crate::models::Notification;
use crate::services::notification_service;
use crate::AppState;

/// GET /notifications - the user's notifications, newest first.
pub async fn list_notifications(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ApiResponse<Paginated<Notification>>>> {
    let (items, total) = notification_service::list_notifications(
        &state.db,
        user.id,
        params.limit() as i64,
        params.offset() as i64,
    )?;

    Ok(Json(ApiResponse::ok(Paginated::new(items, total as u64, &params))))
}

#[derive(Debug, serde::Serialize)]
pub struct UnreadCountResponse {
    pub count: i64,
}

/// GET /notifications/unread-count
pub async fn unread_count(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<UnreadCountResponse>>> {
    let count = notification_service::count_unread(&state.db, user.id)?;
    Ok(Json(ApiResponse::ok(UnreadCountResponse { count })))
}

#[derive(Debug, serde::Serialize)]
pub struct MarkAllReadResponse {
    pub updated: usize,
}

/// POST /notifications/mark-all-read
pub async fn mark_all_read(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<MarkAllReadResponse>>> {
    let updated = notification_service::mark_all_read(&state.db, user.id)?;
    Ok(Json(ApiResponse::ok(MarkAllReadResponse { updated })))
}

/// POST /notifications/:id/read
pub async fn mark_read(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Notification>>> {
    let notification = notification_service::mark_read(&state.db, id, user.id)?;
    Ok(Json(ApiResponse::ok(notification)))
}
