use axum::extract::{Path, Query, State};
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

use crate::events::publisher;
use crate::models::Playdate;
use crate::schema::playdates;
use crate::workflow::{playdate_can_transition, PlaydateStatus};
use crate::AppState;

fn is_participant(p: &Playdate, user_id: Uuid) -> bool {
    p.user_a_id == user_id || p.user_b_id == user_id
}

fn load_own_playdate(
    conn: &mut PgConnection,
    playdate_id: Uuid,
    user_id: Uuid,
) -> AppResult<Playdate> {
    let playdate: Playdate = playdates::table
        .find(playdate_id)
        .first::<Playdate>(conn)
        .optional()?
        .ok_or_else(|| AppError::new(ErrorCode::PlaydateNotFound, "playdate not found"))?;

    if !is_participant(&playdate, user_id) {
        return Err(AppError::new(
            ErrorCode::NotPlaydateParticipant,
            "not a participant of this playdate",
        ));
    }

    Ok(playdate)
}

fn transition(
    conn: &mut PgConnection,
    playdate: &Playdate,
    to: PlaydateStatus,
) -> AppResult<Playdate> {
    let current = PlaydateStatus::from_str(&playdate.status).map_err(AppError::internal)?;

    if !playdate_can_transition(current, to) {
        return Err(AppError::new(
            ErrorCode::PlaydateNotScheduled,
            format!("playdate is {current}, cannot become {to}", current = current.as_str(), to = to.as_str()),
        ));
    }

    let updated: Playdate = diesel::update(playdates::table.find(playdate.id))
        .set((
            playdates::status.eq(to.as_str()),
            playdates::updated_at.eq(Utc::now()),
        ))
        .get_result(conn)?;

    Ok(updated)
}

// --- GET /playdates ---

#[derive(Debug, Deserialize)]
pub struct ListPlaydatesParams {
    pub when: Option<String>,
}

pub async fn list_playdates(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListPlaydatesParams>,
) -> AppResult<Json<ApiResponse<Vec<Playdate>>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let mut query = playdates::table
        .filter(playdates::user_a_id.eq(user.id).or(playdates::user_b_id.eq(user.id)))
        .into_boxed();

    match params.when.as_deref() {
        Some("upcoming") => {
            query = query
                .filter(playdates::scheduled_at.ge(Utc::now()))
                .order(playdates::scheduled_at.asc())
        }
        Some("past") => {
            query = query
                .filter(playdates::scheduled_at.lt(Utc::now()))
                .order(playdates::scheduled_at.desc())
        }
        None => query = query.order(playdates::scheduled_at.desc()),
        Some(other) => {
            return Err(AppError::new(
                ErrorCode::BadRequest,
                format!("when must be upcoming or past, got {other}"),
            ))
        }
    }

    let list = query.load::<Playdate>(&mut conn)?;

    Ok(Json(ApiResponse::ok(list)))
}

// --- GET /playdates/:id ---

pub async fn get_playdate(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(playdate_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Playdate>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;
    let playdate = load_own_playdate(&mut conn, playdate_id, user.id)?;
    Ok(Json(ApiResponse::ok(playdate)))
}

// --- PUT /playdates/:id/complete ---

pub async fn complete_playdate(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(playdate_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Playdate>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;
    let playdate = load_own_playdate(&mut conn, playdate_id, user.id)?;
    let updated = transition(&mut conn, &playdate, PlaydateStatus::Completed)?;

    tracing::info!(playdate_id = %updated.id, user_id = %user.id, "playdate completed");

    Ok(Json(ApiResponse::ok(updated)))
}

// --- PUT /playdates/:id/cancel ---

pub async fn cancel_playdate(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(playdate_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Playdate>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;
    let playdate = load_own_playdate(&mut conn, playdate_id, user.id)?;
    let updated = transition(&mut conn, &playdate, PlaydateStatus::Canceled)?;

    tracing::info!(playdate_id = %updated.id, user_id = %user.id, "playdate canceled");

    publisher::publish_playdate_canceled(&state.rabbitmq, &updated, user.id).await;

    Ok(Json(ApiResponse::ok(updated)))
}
