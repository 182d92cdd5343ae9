use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use diesel::dsl::count_star;
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use paws_shared::errors::{AppError, AppResult, ErrorCode};
use paws_shared::types::auth::AuthUser;
use paws_shared::types::ApiResponse;

use crate::models::{Conversation, ConversationMember, Message};
use crate::schema::{conversation_members, conversations, messages};
use crate::AppState;

// --- Response DTOs ---

#[derive(Debug, Serialize)]
pub struct ConversationPreview {
    pub id: Uuid,
    pub match_id: Uuid,
    pub partner_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub last_message: Option<String>,
    pub last_message_at: Option<DateTime<Utc>>,
    pub unread_count: i64,
}

#[derive(Debug, Serialize)]
pub struct ConversationDetail {
    #[serde(flatten)]
    pub conversation: Conversation,
    pub members: Vec<ConversationMember>,
}

// --- Helpers ---

pub(crate) fn verify_membership(
    conn: &mut PgConnection,
    conversation_id: Uuid,
    user_id: Uuid,
) -> AppResult<()> {
    let is_member: bool = conversation_members::table
        .filter(conversation_members::conversation_id.eq(conversation_id))
        .filter(conversation_members::user_id.eq(user_id))
        .select(count_star())
        .first::<i64>(conn)
        .map(|c| c > 0)?;

    if !is_member {
        return Err(AppError::new(
            ErrorCode::NotConversationMember,
            "you are not a member of this conversation",
        ));
    }

    Ok(())
}

// --- GET /conversations ---

/// Previews for the user's conversations: last message, unread count
/// and the other participant, newest activity first.
pub async fn list_conversations(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<Vec<ConversationPreview>>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let memberships: Vec<(Uuid, DateTime<Utc>)> = conversation_members::table
        .filter(conversation_members::user_id.eq(user.id))
        .select((conversation_members::conversation_id, conversation_members::last_read_at))
        .load::<(Uuid, DateTime<Utc>)>(&mut conn)?;

    if memberships.is_empty() {
        return Ok(Json(ApiResponse::ok(vec![])));
    }

    let conversation_ids: Vec<Uuid> = memberships.iter().map(|(id, _)| *id).collect();
    let convs: Vec<Conversation> = conversations::table
        .filter(conversations::id.eq_any(&conversation_ids))
        .load::<Conversation>(&mut conn)?;

    let mut previews = Vec::with_capacity(convs.len());
    for conv in convs {
        let last_read_at = memberships
            .iter()
            .find(|(cid, _)| *cid == conv.id)
            .map(|(_, lr)| *lr)
            .unwrap_or(conv.created_at);

        let last_msg: Option<Message> = messages::table
            .filter(messages::conversation_id.eq(conv.id))
            .order(messages::created_at.desc())
            .first::<Message>(&mut conn)
            .optional()?;

        // Unread = newer than the read cursor and sent by someone else
        let unread: i64 = messages::table
            .filter(messages::conversation_id.eq(conv.id))
            .filter(messages::created_at.gt(last_read_at))
            .filter(messages::sender_id.ne(user.id))
            .select(count_star())
            .first::<i64>(&mut conn)?;

        let partner_id: Option<Uuid> = conversation_members::table
            .filter(conversation_members::conversation_id.eq(conv.id))
            .filter(conversation_members::user_id.ne(user.id))
            .select(conversation_members::user_id)
            .first::<Uuid>(&mut conn)
            .optional()?;

        previews.push(ConversationPreview {
            id: conv.id,
            match_id: conv.match_id,
            partner_id,
            created_at: conv.created_at,
            last_message: last_msg.as_ref().map(|m| m.content.clone()),
            last_message_at: last_msg.map(|m| m.created_at),
            unread_count: unread,
        });
    }

    previews.sort_by(|a, b| {
        let a_time = a.last_message_at.unwrap_or(a.created_at);
        let b_time = b.last_message_at.unwrap_or(b.created_at);
        b_time.cmp(&a_time)
    });

    Ok(Json(ApiResponse::ok(previews)))
}

// --- GET /conversations/:id ---

pub async fn get_conversation(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(conversation_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ConversationDetail>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    verify_membership(&mut conn, conversation_id, user.id)?;

    let conversation: Conversation = conversations::table
        .find(conversation_id)
        .first::<Conversation>(&mut conn)
        .optional()?
        .ok_or_else(|| AppError::new(ErrorCode::ConversationNotFound, "conversation not found"))?;

    let members: Vec<ConversationMember> = conversation_members::table
        .filter(conversation_members::conversation_id.eq(conversation_id))
        .load::<ConversationMember>(&mut conn)?;

    Ok(Json(ApiResponse::ok(ConversationDetail { conversation, members })))
}
