use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use paws_shared::errors::{AppError, AppResult, ErrorCode};
use paws_shared::types::auth::AuthUser;
use paws_shared::types::ApiResponse;

use crate::events::publisher;
use crate::models::{NewPlaydate, NewPlaydateRequest, Playdate, PlaydateRequest};
use crate::schema::{playdate_requests, playdates};
use crate::workflow::{
    request_can_transition, validate_proposed_times, validate_selected_time, PlaydateStatus,
    RequestStatus,
};
use crate::AppState;

// --- POST /playdate-requests ---

#[derive(Debug, Deserialize, Validate)]
pub struct CreateRequestRequest {
    pub match_id: Uuid,
    #[validate(length(min = 1, max = 255, message = "location_id must be 1-255 characters"))]
    pub location_id: String,
    #[validate(length(min = 1, max = 255, message = "location_name must be 1-255 characters"))]
    pub location_name: String,
    pub proposed_times: Vec<DateTime<Utc>>,
}

pub async fn create_request(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateRequestRequest>,
) -> AppResult<Json<ApiResponse<PlaydateRequest>>> {
    req.validate()
        .map_err(|e| AppError::new(ErrorCode::ValidationError, e.to_string()))?;
    validate_proposed_times(&req.proposed_times, Utc::now())
        .map_err(|e| AppError::new(ErrorCode::InvalidProposedTimes, e))?;

    // Playdates hang off an active match; verify with paws-matching
    let match_info = state.matching.fetch_match(req.match_id).await?;

    let receiver_id = match_info
        .other_participant(user.id)
        .ok_or_else(|| AppError::new(ErrorCode::NotMatchParticipant, "not a participant of this match"))?;

    if match_info.status != "active" {
        return Err(AppError::new(
            ErrorCode::MatchNotActive,
            format!("match is {}, playdates need an active match", match_info.status),
        ));
    }

    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let proposed_times = serde_json::to_value(&req.proposed_times)
        .map_err(|e| AppError::internal(e.to_string()))?;

    let new_request = NewPlaydateRequest {
        match_id: req.match_id,
        requester_id: user.id,
        receiver_id,
        location_id: req.location_id,
        location_name: req.location_name,
        proposed_times,
        status: RequestStatus::Pending.as_str().to_string(),
    };

    let request: PlaydateRequest = diesel::insert_into(playdate_requests::table)
        .values(&new_request)
        .get_result(&mut conn)?;

    tracing::info!(
        request_id = %request.id,
        match_id = %request.match_id,
        requester = %request.requester_id,
        receiver = %request.receiver_id,
        "playdate request created"
    );

    publisher::publish_request_created(&state.rabbitmq, &request).await;

    Ok(Json(ApiResponse::ok(request)))
}

// --- PUT /playdate-requests/:id/respond ---

#[derive(Debug, Deserialize)]
pub struct RespondRequest {
    pub accept: bool,
    pub selected_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct RespondResponse {
    pub request: PlaydateRequest,
    /// Present only when the request was accepted.
    pub playdate: Option<Playdate>,
}

pub async fn respond_to_request(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(request_id): Path<Uuid>,
    Json(req): Json<RespondRequest>,
) -> AppResult<Json<ApiResponse<RespondResponse>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let request: PlaydateRequest = playdate_requests::table
        .find(request_id)
        .first::<PlaydateRequest>(&mut conn)
        .optional()?
        .ok_or_else(|| AppError::new(ErrorCode::PlaydateRequestNotFound, "playdate request not found"))?;

    if request.receiver_id != user.id {
        return Err(AppError::new(
            ErrorCode::NotRequestReceiver,
            "only the receiver can respond to a playdate request",
        ));
    }

    let current = RequestStatus::from_str(&request.status).map_err(AppError::internal)?;
    let next = if req.accept { RequestStatus::Accepted } else { RequestStatus::Declined };

    if !request_can_transition(current, next) {
        return Err(AppError::new(
            ErrorCode::RequestAlreadyResolved,
            format!("request is already {current}", current = current.as_str()),
        ));
    }

    if !req.accept {
        let updated: PlaydateRequest = diesel::update(playdate_requests::table.find(request.id))
            .set((
                playdate_requests::status.eq(RequestStatus::Declined.as_str()),
                playdate_requests::responded_at.eq(Utc::now()),
                playdate_requests::updated_at.eq(Utc::now()),
            ))
            .get_result(&mut conn)?;

        publisher::publish_request_responded(&state.rabbitmq, &updated, false, None).await;

        return Ok(Json(ApiResponse::ok(RespondResponse { request: updated, playdate: None })));
    }

    let selected_time = req
        .selected_time
        .ok_or_else(|| AppError::new(ErrorCode::SelectedTimeNotProposed, "selected_time is required to accept"))?;
    validate_selected_time(selected_time, &request.proposed_times())
        .map_err(|e| AppError::new(ErrorCode::SelectedTimeNotProposed, e))?;

    // One transaction: accept the request and materialize the playdate.
    // The unique request_id index guarantees at most one playdate per
    // request even if two accepts race past the status check.
    let (updated, playdate) = conn
        .transaction::<(PlaydateRequest, Playdate), AppError, _>(|conn| {
            let updated: PlaydateRequest = diesel::update(playdate_requests::table.find(request.id))
                .set((
                    playdate_requests::status.eq(RequestStatus::Accepted.as_str()),
                    playdate_requests::selected_time.eq(selected_time),
                    playdate_requests::responded_at.eq(Utc::now()),
                    playdate_requests::updated_at.eq(Utc::now()),
                ))
                .get_result(conn)?;

            let new_playdate = NewPlaydate {
                request_id: updated.id,
                match_id: updated.match_id,
                user_a_id: updated.requester_id,
                user_b_id: updated.receiver_id,
                location_id: updated.location_id.clone(),
                location_name: updated.location_name.clone(),
                scheduled_at: selected_time,
                status: PlaydateStatus::Scheduled.as_str().to_string(),
            };

            let playdate: Playdate = diesel::insert_into(playdates::table)
                .values(&new_playdate)
                .get_result(conn)?;

            Ok((updated, playdate))
        })
        .map_err(map_accept_conflict)?;

    tracing::info!(
        request_id = %updated.id,
        playdate_id = %playdate.id,
        scheduled_at = %playdate.scheduled_at,
        "playdate request accepted"
    );

    publisher::publish_request_responded(&state.rabbitmq, &updated, true, Some(&playdate)).await;

    Ok(Json(ApiResponse::ok(RespondResponse { request: updated, playdate: Some(playdate) })))
}

// Two accepts can race past the status check; the loser hits the unique
// request_id index on playdates. Surface that as the same conflict the
// status check would have reported.
fn map_accept_conflict(e: AppError) -> AppError {
    match e {
        AppError::Database(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            _,
        )) => AppError::new(ErrorCode::RequestAlreadyResolved, "request is already accepted"),
        other => other,
    }
}

// --- GET /playdate-requests ---

#[derive(Debug, Deserialize)]
pub struct ListRequestsParams {
    pub direction: Option<String>,
    pub status: Option<String>,
}

pub async fn list_requests(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListRequestsParams>,
) -> AppResult<Json<ApiResponse<Vec<PlaydateRequest>>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let mut query = playdate_requests::table.into_boxed();

    match params.direction.as_deref() {
        Some("incoming") => query = query.filter(playdate_requests::receiver_id.eq(user.id)),
        Some("outgoing") => query = query.filter(playdate_requests::requester_id.eq(user.id)),
        None => {
            query = query.filter(
                playdate_requests::requester_id
                    .eq(user.id)
                    .or(playdate_requests::receiver_id.eq(user.id)),
            )
        }
        Some(other) => {
            return Err(AppError::new(
                ErrorCode::BadRequest,
                format!("direction must be incoming or outgoing, got {other}"),
            ))
        }
    }

    if let Some(ref status) = params.status {
        RequestStatus::from_str(status)
            .map_err(|e| AppError::new(ErrorCode::BadRequest, e))?;
        query = query.filter(playdate_requests::status.eq(status.clone()));
    }

    let requests: Vec<PlaydateRequest> = query
        .order(playdate_requests::created_at.desc())
        .load::<PlaydateRequest>(&mut conn)?;

    Ok(Json(ApiResponse::ok(requests)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    fn unique_violation() -> AppError {
        AppError::Database(DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key value violates unique constraint".to_string()),
        ))
    }

    #[test]
    fn losing_accept_reports_a_resolved_conflict() {
        let mapped = map_accept_conflict(unique_violation());
        match mapped {
            AppError::Known { code, .. } => assert_eq!(code, ErrorCode::RequestAlreadyResolved),
            other => panic!("expected a known conflict, got {other:?}"),
        }
    }

    #[test]
    fn unrelated_errors_pass_through_unchanged() {
        let original = AppError::Database(DieselError::NotFound);
        match map_accept_conflict(original) {
            AppError::Database(DieselError::NotFound) => {}
            other => panic!("expected the database error untouched, got {other:?}"),
        }
    }
}
