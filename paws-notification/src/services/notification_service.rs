use diesel::prelude::*;
use uuid::Uuid;

use paws_shared::clients::db::DbPool;
use paws_shared::errors::{AppError, AppResult, ErrorCode};

use crate::models::{Category, NewNotification, Notification};
use crate::schema::notifications;

pub fn create_notification(
    pool: &DbPool,
    user_id: Uuid,
    category: Category,
    title: &str,
    body: &str,
    data: Option<serde_json::Value>,
) -> AppResult<Notification> {
    let mut conn = pool.get().map_err(|e| AppError::internal(e.to_string()))?;

    let notification: Notification = diesel::insert_into(notifications::table)
        .values(&NewNotification {
            user_id,
            category: category.as_str().to_string(),
            title: title.to_string(),
            body: body.to_string(),
            data,
        })
        .get_result(&mut conn)?;

    tracing::debug!(
        notification_id = %notification.id,
        user_id = %user_id,
        category = %notification.category,
        "notification created"
    );

    Ok(notification)
}

pub fn list_notifications(
    pool: &DbPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> AppResult<(Vec<Notification>, i64)> {
    let mut conn = pool.get().map_err(|e| AppError::internal(e.to_string()))?;

    let total: i64 = notifications::table
        .filter(notifications::user_id.eq(user_id))
        .count()
        .get_result(&mut conn)?;

    let items = notifications::table
        .filter(notifications::user_id.eq(user_id))
        .order(notifications::created_at.desc())
        .limit(limit)
        .offset(offset)
        .load::<Notification>(&mut conn)?;

    Ok((items, total))
}

pub fn count_unread(pool: &DbPool, user_id: Uuid) -> AppResult<i64> {
    let mut conn = pool.get().map_err(|e| AppError::internal(e.to_string()))?;

    let count: i64 = notifications::table
        .filter(notifications::user_id.eq(user_id))
        .filter(notifications::is_read.eq(false))
        .count()
        .get_result(&mut conn)?;

    Ok(count)
}

pub fn mark_all_read(pool: &DbPool, user_id: Uuid) -> AppResult<usize> {
    let mut conn = pool.get().map_err(|e| AppError::internal(e.to_string()))?;

    let updated = diesel::update(
        notifications::table
            .filter(notifications::user_id.eq(user_id))
            .filter(notifications::is_read.eq(false)),
    )
    .set(notifications::is_read.eq(true))
    .execute(&mut conn)?;

    Ok(updated)
}

/// Mark a single notification as read; scoped to the owner, so a foreign
/// id reads as not found.
pub fn mark_read(pool: &DbPool, notification_id: Uuid, user_id: Uuid) -> AppResult<Notification> {
    let mut conn = pool.get().map_err(|e| AppError::internal(e.to_string()))?;

    diesel::update(
        notifications::table
            .filter(notifications::id.eq(notification_id))
            .filter(notifications::user_id.eq(user_id)),
    )
    .set(notifications::is_read.eq(true))
    .get_result::<Notification>(&mut conn)
    .map_err(|e| match e {
        diesel::result::Error::NotFound => {
            AppError::new(ErrorCode::NotificationNotFound, "notification not found")
        }
        other => AppError::Database(other),
    })
}
