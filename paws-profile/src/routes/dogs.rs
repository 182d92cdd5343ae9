use axum::extract::{Path, State};
use axum::Json;
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use paws_shared::errors::{AppError, AppResult, ErrorCode};
use paws_shared::types::auth::AuthUser;
use paws_shared::types::ApiResponse;

use crate::models::{Dog, NewDog, UpdateDog};
use crate::schema::{dogs, users};
use crate::AppState;

pub const MAX_DOGS_PER_OWNER: i64 = 5;
pub const MAX_DOG_AGE_MONTHS: i32 = 360;

const ENERGY_LEVELS: [&str; 3] = ["low", "medium", "high"];
const DOG_SIZES: [&str; 4] = ["small", "medium", "large", "giant"];

fn validate_energy_level(value: &str) -> AppResult<()> {
    if ENERGY_LEVELS.contains(&value) {
        Ok(())
    } else {
        Err(AppError::new(
            ErrorCode::ValidationError,
            format!("energy_level must be one of: {}", ENERGY_LEVELS.join(", ")),
        ))
    }
}

fn validate_size(value: &str) -> AppResult<()> {
    if DOG_SIZES.contains(&value) {
        Ok(())
    } else {
        Err(AppError::new(
            ErrorCode::ValidationError,
            format!("size must be one of: {}", DOG_SIZES.join(", ")),
        ))
    }
}

fn validate_age_months(value: i32) -> AppResult<()> {
    if (0..=MAX_DOG_AGE_MONTHS).contains(&value) {
        Ok(())
    } else {
        Err(AppError::new(
            ErrorCode::ValidationError,
            format!("age_months must be between 0 and {MAX_DOG_AGE_MONTHS}"),
        ))
    }
}

// --- POST /dogs ---

#[derive(Debug, Deserialize, Validate)]
pub struct CreateDogRequest {
    #[validate(length(min = 2, max = 40, message = "name must be 2-40 characters"))]
    pub name: String,
    #[validate(length(min = 2, max = 60, message = "breed must be 2-60 characters"))]
    pub breed: String,
    pub age_months: i32,
    pub energy_level: String,
    pub size: String,
    #[serde(default)]
    pub play_styles: Vec<String>,
    #[validate(length(max = 500, message = "bio max 500 characters"))]
    pub bio: Option<String>,
    pub photo_url: Option<String>,
}

pub async fn create_dog(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateDogRequest>,
) -> AppResult<Json<ApiResponse<Dog>>> {
    req.validate()
        .map_err(|e| AppError::new(ErrorCode::ValidationError, e.to_string()))?;
    validate_age_months(req.age_months)?;
    validate_energy_level(&req.energy_level)?;
    validate_size(&req.size)?;

    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    // Dogs hang off an owner profile; require one first
    let has_profile: bool = users::table
        .filter(users::id.eq(user.id))
        .count()
        .get_result::<i64>(&mut conn)
        .map(|c| c > 0)?;

    if !has_profile {
        return Err(AppError::new(ErrorCode::ProfileNotFound, "create a profile first"));
    }

    let owned: i64 = dogs::table
        .filter(dogs::owner_id.eq(user.id))
        .count()
        .get_result(&mut conn)?;

    if owned >= MAX_DOGS_PER_OWNER {
        return Err(AppError::new(
            ErrorCode::DogLimitReached,
            format!("maximum {MAX_DOGS_PER_OWNER} dogs per owner"),
        ));
    }

    let play_styles = serde_json::to_value(&req.play_styles)
        .map_err(|e| AppError::internal(e.to_string()))?;

    let new_dog = NewDog {
        owner_id: user.id,
        name: req.name,
        breed: req.breed,
        age_months: req.age_months,
        energy_level: req.energy_level,
        size: req.size,
        play_styles,
        bio: req.bio,
        photo_url: req.photo_url,
    };

    let dog = diesel::insert_into(dogs::table)
        .values(&new_dog)
        .get_result::<Dog>(&mut conn)?;

    tracing::info!(dog_id = %dog.id, owner_id = %user.id, "dog profile created");

    Ok(Json(ApiResponse::ok(dog)))
}

// --- GET /dogs ---

pub async fn list_my_dogs(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<Vec<Dog>>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let list = dogs::table
        .filter(dogs::owner_id.eq(user.id))
        .order(dogs::created_at.asc())
        .load::<Dog>(&mut conn)?;

    Ok(Json(ApiResponse::ok(list)))
}

// --- GET /dogs/:id ---

pub async fn get_dog(
    _user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(dog_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Dog>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let dog = dogs::table
        .find(dog_id)
        .first::<Dog>(&mut conn)
        .optional()?
        .ok_or_else(|| AppError::new(ErrorCode::DogNotFound, "dog not found"))?;

    Ok(Json(ApiResponse::ok(dog)))
}

// --- PATCH /dogs/:id ---

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateDogRequest {
    #[validate(length(min = 2, max = 40, message = "name must be 2-40 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 2, max = 60, message = "breed must be 2-60 characters"))]
    pub breed: Option<String>,
    pub age_months: Option<i32>,
    pub energy_level: Option<String>,
    pub size: Option<String>,
    pub play_styles: Option<Vec<String>>,
    #[validate(length(max = 500, message = "bio max 500 characters"))]
    pub bio: Option<String>,
    pub photo_url: Option<String>,
}

pub async fn update_dog(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(dog_id): Path<Uuid>,
    Json(req): Json<UpdateDogRequest>,
) -> AppResult<Json<ApiResponse<Dog>>> {
    req.validate()
        .map_err(|e| AppError::new(ErrorCode::ValidationError, e.to_string()))?;
    if let Some(age) = req.age_months {
        validate_age_months(age)?;
    }
    if let Some(ref level) = req.energy_level {
        validate_energy_level(level)?;
    }
    if let Some(ref size) = req.size {
        validate_size(size)?;
    }

    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let dog = dogs::table
        .find(dog_id)
        .first::<Dog>(&mut conn)
        .optional()?
        .ok_or_else(|| AppError::new(ErrorCode::DogNotFound, "dog not found"))?;

    if dog.owner_id != user.id {
        return Err(AppError::new(ErrorCode::NotDogOwner, "you do not own this dog"));
    }

    let play_styles = match req.play_styles {
        Some(styles) => Some(
            serde_json::to_value(&styles).map_err(|e| AppError::internal(e.to_string()))?,
        ),
        None => None,
    };

    let changes = UpdateDog {
        name: req.name,
        breed: req.breed,
        age_months: req.age_months,
        energy_level: req.energy_level,
        size: req.size,
        play_styles,
        bio: req.bio,
        photo_url: req.photo_url,
    };

    let updated = diesel::update(dogs::table.find(dog_id))
        .set((
            &changes,
            dogs::updated_at.eq(chrono::Utc::now()),
        ))
        .get_result::<Dog>(&mut conn)?;

    Ok(Json(ApiResponse::ok(updated)))
}

// --- DELETE /dogs/:id ---

pub async fn delete_dog(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(dog_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let dog = dogs::table
        .find(dog_id)
        .first::<Dog>(&mut conn)
        .optional()?
        .ok_or_else(|| AppError::new(ErrorCode::DogNotFound, "dog not found"))?;

    if dog.owner_id != user.id {
        return Err(AppError::new(ErrorCode::NotDogOwner, "you do not own this dog"));
    }

    diesel::delete(dogs::table.find(dog_id)).execute(&mut conn)?;

    tracing::info!(dog_id = %dog_id, owner_id = %user.id, "dog profile deleted");

    Ok(Json(ApiResponse::ok(serde_json::json!({ "deleted": true }))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_known_energy_levels_and_sizes() {
        for level in ENERGY_LEVELS {
            assert!(validate_energy_level(level).is_ok());
        }
        for size in DOG_SIZES {
            assert!(validate_size(size).is_ok());
        }
        assert!(validate_energy_level("hyper").is_err());
        assert!(validate_size("enormous").is_err());
    }

    #[test]
    fn age_months_bounds() {
        assert!(validate_age_months(0).is_ok());
        assert!(validate_age_months(36).is_ok());
        assert!(validate_age_months(MAX_DOG_AGE_MONTHS).is_ok());
        assert!(validate_age_months(-1).is_err());
        assert!(validate_age_months(MAX_DOG_AGE_MONTHS + 1).is_err());
    }
}
