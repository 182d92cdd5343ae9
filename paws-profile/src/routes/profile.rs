use axum::extract::State;
use axum::Json;
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use paws_shared::errors::{AppError, AppResult, ErrorCode};
use paws_shared::types::auth::AuthUser;
use paws_shared::types::geo::GeoPoint;
use paws_shared::types::ApiResponse;

use crate::models::{NewUser, UpdateUser, User};
use crate::schema::users;
use crate::AppState;

fn validate_display_name(name: &str) -> AppResult<()> {
    if name.len() < 3 || name.len() > 20 {
        return Err(AppError::new(
            ErrorCode::InvalidDisplayName,
            "display name must be between 3 and 20 characters",
        ));
    }
    if !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(AppError::new(
            ErrorCode::InvalidDisplayName,
            "display name can only contain letters, numbers, and underscores",
        ));
    }
    Ok(())
}

/// Coordinates come as a pair or not at all.
fn validate_coordinates(latitude: Option<f64>, longitude: Option<f64>) -> AppResult<()> {
    match (latitude, longitude) {
        (None, None) => Ok(()),
        (Some(lat), Some(lng)) => {
            GeoPoint::new(lat, lng)
                .ok_or_else(|| AppError::new(ErrorCode::ValidationError, "coordinates out of range"))?;
            Ok(())
        }
        _ => Err(AppError::new(
            ErrorCode::ValidationError,
            "latitude and longitude must be provided together",
        )),
    }
}

// --- POST /me ---

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProfileRequest {
    pub display_name: String,
    #[validate(length(max = 500, message = "bio max 500 characters"))]
    pub bio: Option<String>,
    #[validate(length(max = 80, message = "city max 80 characters"))]
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

pub async fn create_profile(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateProfileRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    req.validate()
        .map_err(|e| AppError::new(ErrorCode::ValidationError, e.to_string()))?;
    validate_display_name(&req.display_name)?;
    validate_coordinates(req.latitude, req.longitude)?;

    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let exists: bool = users::table
        .filter(users::id.eq(user.id))
        .count()
        .get_result::<i64>(&mut conn)
        .map(|c| c > 0)?;

    if exists {
        return Err(AppError::new(ErrorCode::ProfileAlreadyExists, "profile already exists"));
    }

    let new_user = NewUser {
        id: user.id,
        display_name: req.display_name,
        bio: req.bio,
        city: req.city,
        latitude: req.latitude,
        longitude: req.longitude,
    };

    let profile = diesel::insert_into(users::table)
        .values(&new_user)
        .get_result::<User>(&mut conn)?;

    tracing::info!(user_id = %profile.id, "profile created");

    Ok(Json(ApiResponse::ok(profile)))
}

// --- GET /me ---

pub async fn get_profile(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<User>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let profile = users::table
        .filter(users::id.eq(user.id))
        .first::<User>(&mut conn)
        .map_err(|_| AppError::new(ErrorCode::ProfileNotFound, "profile not found"))?;

    Ok(Json(ApiResponse::ok(profile)))
}

// --- PATCH /me ---

pub async fn update_profile(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<UpdateUser>,
) -> AppResult<Json<ApiResponse<User>>> {
    if let Some(ref name) = payload.display_name {
        validate_display_name(name)?;
    }
    validate_coordinates(payload.latitude, payload.longitude)?;

    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let exists: bool = users::table
        .filter(users::id.eq(user.id))
        .count()
        .get_result::<i64>(&mut conn)
        .map(|c| c > 0)?;

    if !exists {
        return Err(AppError::new(ErrorCode::ProfileNotFound, "profile not found"));
    }

    let updated = diesel::update(users::table.filter(users::id.eq(user.id)))
        .set((
            &payload,
            users::updated_at.eq(chrono::Utc::now()),
        ))
        .get_result::<User>(&mut conn)?;

    Ok(Json(ApiResponse::ok(updated)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_rules() {
        assert!(validate_display_name("rex_and_me").is_ok());
        assert!(validate_display_name("ab").is_err());
        assert!(validate_display_name("a".repeat(21).as_str()).is_err());
        assert!(validate_display_name("bad name!").is_err());
    }

    #[test]
    fn coordinates_must_come_as_a_pair() {
        assert!(validate_coordinates(None, None).is_ok());
        assert!(validate_coordinates(Some(48.85), Some(2.35)).is_ok());
        assert!(validate_coordinates(Some(48.85), None).is_err());
        assert!(validate_coordinates(None, Some(2.35)).is_err());
        assert!(validate_coordinates(Some(95.0), Some(2.35)).is_err());
    }
}
