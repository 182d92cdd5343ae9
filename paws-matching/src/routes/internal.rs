use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use paws_shared::errors::{AppError, AppResult, ErrorCode};

use crate::matching::status::{effective_status, MatchStatus};
use crate::models::Match;
use crate::schema::matches;
use crate::AppState;

/// Participants and effective status, as served to the playdate service.
#[derive(Debug, Serialize)]
pub struct MatchInfo {
    pub id: Uuid,
    pub user_a_id: Uuid,
    pub user_b_id: Uuid,
    pub dog_a_id: Uuid,
    pub dog_b_id: Uuid,
    pub status: String,
    pub expires_at: DateTime<Utc>,
}

/// GET /internal/matches/:id (service-to-service, no auth)
pub async fn get_match_info(
    State(state): State<Arc<AppState>>,
    Path(match_id): Path<Uuid>,
) -> AppResult<Json<MatchInfo>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let m: Match = matches::table
        .find(match_id)
        .first::<Match>(&mut conn)
        .optional()?
        .ok_or_else(|| AppError::new(ErrorCode::MatchNotFound, "match not found"))?;

    let stored = MatchStatus::from_str(&m.status).map_err(AppError::internal)?;
    let effective = effective_status(stored, m.expires_at, Utc::now());

    Ok(Json(MatchInfo {
        id: m.id,
        user_a_id: m.user_a_id,
        user_b_id: m.user_b_id,
        dog_a_id: m.dog_a_id,
        dog_b_id: m.dog_b_id,
        status: effective.as_str().to_string(),
        expires_at: m.expires_at,
    }))
}
