use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use diesel::dsl::count_star;
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use paws_shared::errors::{AppError, AppResult, ErrorCode};
use paws_shared::types::auth::AuthUser;
use paws_shared::types::pagination::{Paginated, PaginationParams};
use paws_shared::types::ApiResponse;

use crate::events::publisher;
use crate::models::{Message, NewMessage};
use crate::routes::conversations::verify_membership;
use crate::schema::{conversation_members, conversations, messages};
use crate::AppState;

pub const MAX_CONTENT_CHARS: usize = 2000;

// --- GET /conversations/:id/messages ---

/// Paginated messages, newest first.
pub async fn list_messages(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(conversation_id): Path<Uuid>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ApiResponse<Paginated<Message>>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    verify_membership(&mut conn, conversation_id, user.id)?;

    let total: i64 = messages::table
        .filter(messages::conversation_id.eq(conversation_id))
        .select(count_star())
        .first::<i64>(&mut conn)?;

    let items: Vec<Message> = messages::table
        .filter(messages::conversation_id.eq(conversation_id))
        .order(messages::created_at.desc())
        .offset(params.offset() as i64)
        .limit(params.limit() as i64)
        .load::<Message>(&mut conn)?;

    Ok(Json(ApiResponse::ok(Paginated::new(items, total as u64, &params))))
}

// --- POST /conversations/:id/messages ---

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}

pub async fn send_message(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(conversation_id): Path<Uuid>,
    Json(req): Json<SendMessageRequest>,
) -> AppResult<Json<ApiResponse<Message>>> {
    let content = req.content.trim().to_string();
    if content.is_empty() {
        return Err(AppError::new(ErrorCode::ValidationError, "message content is required"));
    }
    if content.chars().count() > MAX_CONTENT_CHARS {
        return Err(AppError::new(
            ErrorCode::ValidationError,
            format!("message content max {MAX_CONTENT_CHARS} characters"),
        ));
    }

    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    verify_membership(&mut conn, conversation_id, user.id)?;

    let message: Message = diesel::insert_into(messages::table)
        .values(&NewMessage {
            conversation_id,
            sender_id: user.id,
            content,
        })
        .get_result(&mut conn)?;

    // Bump the conversation so previews sort it to the top
    if let Err(e) = diesel::update(conversations::table.find(conversation_id))
        .set(conversations::updated_at.eq(Utc::now()))
        .execute(&mut conn)
    {
        tracing::warn!(error = %e, conversation_id = %conversation_id, "failed to bump conversation");
    }

    let recipient_ids: Vec<Uuid> = conversation_members::table
        .filter(conversation_members::conversation_id.eq(conversation_id))
        .filter(conversation_members::user_id.ne(user.id))
        .select(conversation_members::user_id)
        .load::<Uuid>(&mut conn)
        .unwrap_or_default();

    publisher::publish_message_sent(&state.rabbitmq, &message, recipient_ids).await;

    Ok(Json(ApiResponse::ok(message)))
}

// --- PUT /conversations/:id/read ---

/// Advance the caller's read cursor to now.
pub async fn mark_as_read(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(conversation_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let read_at = Utc::now();
    let updated_rows = diesel::update(
        conversation_members::table
            .filter(conversation_members::conversation_id.eq(conversation_id))
            .filter(conversation_members::user_id.eq(user.id)),
    )
    .set(conversation_members::last_read_at.eq(read_at))
    .execute(&mut conn)?;

    if updated_rows == 0 {
        return Err(AppError::new(
            ErrorCode::NotConversationMember,
            "you are not a member of this conversation",
        ));
    }

    Ok(Json(ApiResponse::ok(serde_json::json!({
        "conversation_id": conversation_id,
        "read_at": read_at,
    }))))
}
