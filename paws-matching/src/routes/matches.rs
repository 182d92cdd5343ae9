use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use diesel::prelude::*;
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use paws_shared::errors::{AppError, AppResult, ErrorCode};
use paws_shared::types::auth::AuthUser;
use paws_shared::types::ApiResponse;

use crate::matching::status::{can_respond, effective_status, MatchStatus};
use crate::models::Match;
use crate::schema::matches;
use crate::AppState;

fn parse_status(m: &Match) -> AppResult<MatchStatus> {
    MatchStatus::from_str(&m.status).map_err(AppError::internal)
}

/// Apply lazy expiry to a loaded match: if the stored status and the
/// effective one disagree, opportunistically persist the expired state
/// and return the corrected row.
fn apply_lazy_expiry(conn: &mut PgConnection, mut m: Match) -> AppResult<Match> {
    let stored = parse_status(&m)?;
    let effective = effective_status(stored, m.expires_at, Utc::now());

    if effective != stored {
        let updated = diesel::update(matches::table.find(m.id))
            .set((
                matches::status.eq(effective.as_str()),
                matches::updated_at.eq(Utc::now()),
            ))
            .execute(conn);
        if let Err(e) = updated {
            // Reads still report expired even when the write-back fails
            tracing::warn!(error = %e, match_id = %m.id, "failed to persist lazy expiry");
        }
        m.status = effective.as_str().to_string();
    }

    Ok(m)
}

fn is_participant(m: &Match, user_id: Uuid) -> bool {
    m.user_a_id == user_id || m.user_b_id == user_id
}

// --- GET /matches ---

pub async fn list_matches(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<Vec<Match>>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let rows: Vec<Match> = matches::table
        .filter(matches::user_a_id.eq(user.id).or(matches::user_b_id.eq(user.id)))
        .order(matches::created_at.desc())
        .load::<Match>(&mut conn)?;

    let mut out = Vec::with_capacity(rows.len());
    for m in rows {
        out.push(apply_lazy_expiry(&mut conn, m)?);
    }

    Ok(Json(ApiResponse::ok(out)))
}

// --- GET /matches/:id ---

pub async fn get_match(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(match_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Match>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let m: Match = matches::table
        .find(match_id)
        .first::<Match>(&mut conn)
        .optional()?
        .ok_or_else(|| AppError::new(ErrorCode::MatchNotFound, "match not found"))?;

    if !is_participant(&m, user.id) {
        return Err(AppError::new(ErrorCode::NotMatchParticipant, "not a participant of this match"));
    }

    let m = apply_lazy_expiry(&mut conn, m)?;

    Ok(Json(ApiResponse::ok(m)))
}

// --- PUT /matches/:id/respond ---

#[derive(Debug, Deserialize)]
pub struct RespondRequest {
    pub accept: bool,
}

pub async fn respond_to_match(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(match_id): Path<Uuid>,
    Json(req): Json<RespondRequest>,
) -> AppResult<Json<ApiResponse<Match>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let m: Match = matches::table
        .find(match_id)
        .first::<Match>(&mut conn)
        .optional()?
        .ok_or_else(|| AppError::new(ErrorCode::MatchNotFound, "match not found"))?;

    if !is_participant(&m, user.id) {
        return Err(AppError::new(ErrorCode::NotMatchParticipant, "not a participant of this match"));
    }

    let m = apply_lazy_expiry(&mut conn, m)?;
    let status = parse_status(&m)?;

    if status == MatchStatus::Expired {
        return Err(AppError::new(ErrorCode::MatchExpired, "match has expired"));
    }
    if !can_respond(status) {
        return Err(AppError::new(ErrorCode::MatchAlreadyResolved, "match already resolved"));
    }

    let next = if req.accept { MatchStatus::Active } else { MatchStatus::Declined };

    let updated: Match = diesel::update(matches::table.find(m.id))
        .set((
            matches::status.eq(next.as_str()),
            matches::updated_at.eq(Utc::now()),
        ))
        .get_result(&mut conn)?;

    tracing::info!(
        match_id = %updated.id,
        user_id = %user.id,
        status = %updated.status,
        "match responded"
    );

    Ok(Json(ApiResponse::ok(updated)))
}
