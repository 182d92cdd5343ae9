use axum::extract::{Query, State};
use axum::Json;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use paws_shared::errors::{AppError, AppResult, ErrorCode};
use paws_shared::types::auth::AuthUser;
use paws_shared::types::ApiResponse;

use crate::clients::profile::DogCard;
use crate::matching::scoring;
use crate::schema::swipes;
use crate::AppState;

pub const DEFAULT_CANDIDATE_RADIUS_KM: f64 = 25.0;
pub const MAX_CANDIDATE_RADIUS_KM: f64 = 100.0;
const MAX_CANDIDATES: usize = 50;

#[derive(Debug, Deserialize)]
pub struct CandidateParams {
    pub dog_id: Uuid,
    pub radius_km: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct Candidate {
    pub dog_id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub breed: String,
    pub age_months: i32,
    pub energy_level: String,
    pub size: String,
    pub play_styles: Vec<String>,
    pub photo_url: Option<String>,
    pub compatibility_score: f64,
    pub distance_km: Option<f64>,
}

/// GET /candidates?dog_id=&radius_km= - discovery feed, scored and
/// sorted, minus dogs this dog has already swiped.
pub async fn list_candidates(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Query(params): Query<CandidateParams>,
) -> AppResult<Json<ApiResponse<Vec<Candidate>>>> {
    let my_dog = state.profile.fetch_dog(params.dog_id).await?;
    if my_dog.owner_id != user.id {
        return Err(AppError::new(ErrorCode::SwiperDogNotOwned, "you do not own this dog"));
    }

    let my_profile = my_dog.scoring_profile()?;
    let center = my_profile
        .owner_location
        .ok_or_else(|| AppError::new(ErrorCode::LocationNotSet, "set your location to discover dogs"))?;

    let radius_km = params
        .radius_km
        .unwrap_or(DEFAULT_CANDIDATE_RADIUS_KM)
        .clamp(1.0, MAX_CANDIDATE_RADIUS_KM);

    let nearby = state
        .profile
        .discover_dogs(center.latitude, center.longitude, radius_km, user.id)
        .await?;

    // Dogs this dog has already swiped drop out of the feed
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;
    let already_swiped: HashSet<Uuid> = swipes::table
        .filter(swipes::swiper_dog_id.eq(my_dog.id))
        .select(swipes::swiped_dog_id)
        .load::<Uuid>(&mut conn)?
        .into_iter()
        .collect();

    let mut candidates: Vec<Candidate> = nearby
        .into_iter()
        .filter(|card| !already_swiped.contains(&card.id))
        .filter_map(|card| score_candidate(&my_profile, card))
        .collect();

    candidates.sort_by(|a, b| {
        b.compatibility_score
            .partial_cmp(&a.compatibility_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    candidates.truncate(MAX_CANDIDATES);

    Ok(Json(ApiResponse::ok(candidates)))
}

/// Cards with unparseable attributes are skipped, not fatal: the feed
/// should survive one bad row in another service's data.
fn score_candidate(mine: &scoring::ScoringProfile, card: DogCard) -> Option<Candidate> {
    let theirs = match card.scoring_profile() {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!(dog_id = %card.id, error = %e, "skipping unparseable dog card");
            return None;
        }
    };

    let compat = scoring::compatibility(mine, &theirs);

    Some(Candidate {
        dog_id: card.id,
        owner_id: card.owner_id,
        name: card.name,
        breed: card.breed,
        age_months: card.age_months,
        energy_level: card.energy_level,
        size: card.size,
        play_styles: card.play_styles,
        photo_url: card.photo_url,
        compatibility_score: compat.score,
        distance_km: compat.distance_km,
    })
}
