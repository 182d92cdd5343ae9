use axum::extract::{Path, State};
use axum::Json;
use chrono::{Duration, Utc};
use diesel::prelude::*;
use metrics::counter;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use paws_shared::errors::{AppError, AppResult, ErrorCode};
use paws_shared::types::auth::AuthUser;
use paws_shared::types::ApiResponse;

use crate::clients::profile::DogCard;
use crate::events::publisher;
use crate::matching::scoring::{self, MatchType};
use crate::matching::status::MatchStatus;
use crate::models::{Match, NewMatch, NewMatchCounter, NewSwipe, Swipe};
use crate::schema::{match_counters, matches, swipes};
use crate::AppState;

// --- POST /swipes ---

#[derive(Debug, Deserialize)]
pub struct RecordSwipeRequest {
    pub swiper_dog_id: Uuid,
    pub swiped_dog_id: Uuid,
    pub liked: bool,
}

#[derive(Debug, Serialize)]
pub struct SwipeResponse {
    pub swipe: Swipe,
    /// Present only when this swipe completed a mutual like.
    #[serde(rename = "match")]
    pub created_match: Option<Match>,
}

/// The match row stores the dog pair ordered by UUID, so racing mutual
/// swipes from both sides target the same unique index row and the
/// insert-or-nothing conflict target makes creation exactly-once.
fn canonical_pair<'a>(x: &'a DogCard, y: &'a DogCard) -> (&'a DogCard, &'a DogCard) {
    if x.id <= y.id {
        (x, y)
    } else {
        (y, x)
    }
}

pub async fn record_swipe(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<RecordSwipeRequest>,
) -> AppResult<Json<ApiResponse<SwipeResponse>>> {
    if req.swiper_dog_id == req.swiped_dog_id {
        return Err(AppError::new(ErrorCode::CannotSwipeOwnDog, "a dog cannot swipe itself"));
    }

    // Both cards in one batch round-trip to paws-profile
    let cards = state
        .profile
        .fetch_dogs(&[req.swiper_dog_id, req.swiped_dog_id])
        .await?;

    let swiper = cards
        .iter()
        .find(|c| c.id == req.swiper_dog_id)
        .ok_or_else(|| AppError::new(ErrorCode::DogNotFound, "swiper dog not found"))?
        .clone();
    let swiped = cards
        .iter()
        .find(|c| c.id == req.swiped_dog_id)
        .ok_or_else(|| AppError::new(ErrorCode::DogNotFound, "swiped dog not found"))?
        .clone();

    if swiper.owner_id != user.id {
        return Err(AppError::new(ErrorCode::SwiperDogNotOwned, "you do not own the swiping dog"));
    }
    if swiped.owner_id == user.id {
        return Err(AppError::new(ErrorCode::CannotSwipeOwnDog, "cannot swipe your own dog"));
    }

    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    // Upsert on the pair key: re-swiping the same pair replaces `liked`
    let new_swipe = NewSwipe {
        swiper_dog_id: swiper.id,
        swiped_dog_id: swiped.id,
        swiper_user_id: swiper.owner_id,
        swiped_user_id: swiped.owner_id,
        liked: req.liked,
    };

    let swipe: Swipe = diesel::insert_into(swipes::table)
        .values(&new_swipe)
        .on_conflict((swipes::swiper_dog_id, swipes::swiped_dog_id))
        .do_update()
        .set((swipes::liked.eq(req.liked), swipes::updated_at.eq(Utc::now())))
        .get_result(&mut conn)?;

    counter!("paws_swipes_recorded_total").increment(1);

    // A dislike never triggers match logic
    if !req.liked {
        return Ok(Json(ApiResponse::ok(SwipeResponse { swipe, created_match: None })));
    }

    // Mutual-like detection: single existence read of the reverse pair
    let reverse_like: Option<Swipe> = swipes::table
        .filter(swipes::swiper_dog_id.eq(swiped.id))
        .filter(swipes::swiped_dog_id.eq(swiper.id))
        .filter(swipes::liked.eq(true))
        .first::<Swipe>(&mut conn)
        .optional()?;

    if reverse_like.is_none() {
        return Ok(Json(ApiResponse::ok(SwipeResponse { swipe, created_match: None })));
    }

    let created = create_match(&mut conn, &swiper, &swiped)?;

    if let Some(ref m) = created {
        counter!("paws_matches_created_total").increment(1);
        tracing::info!(
            match_id = %m.id,
            dog_a = %m.dog_a_id,
            dog_b = %m.dog_b_id,
            score = m.compatibility_score,
            match_type = %m.match_type,
            "match created"
        );
        publisher::publish_match_created(&state.rabbitmq, m).await;
    }

    Ok(Json(ApiResponse::ok(SwipeResponse { swipe, created_match: created })))
}

/// Score the pair and run the one atomic multi-write in the system:
/// match insert plus both owners' counters, in a single transaction.
/// ON CONFLICT DO NOTHING against the pair index means the losing side
/// of a race inserts nothing and skips the counter bump.
fn create_match(
    conn: &mut PgConnection,
    swiper: &DogCard,
    swiped: &DogCard,
) -> AppResult<Option<Match>> {
    let (first, second) = canonical_pair(swiper, swiped);

    let profile_a = first.scoring_profile()?;
    let profile_b = second.scoring_profile()?;
    let compat = scoring::compatibility(&profile_a, &profile_b);
    let match_type = MatchType::from_score(compat.score);

    let new_match = NewMatch {
        dog_a_id: first.id,
        dog_b_id: second.id,
        user_a_id: first.owner_id,
        user_b_id: second.owner_id,
        compatibility_score: compat.score,
        distance_km: compat.distance_km,
        match_type: match_type.as_str().to_string(),
        status: MatchStatus::Pending.as_str().to_string(),
        expires_at: Utc::now() + Duration::hours(match_type.expiry_hours()),
    };

    let created = conn.transaction::<Option<Match>, diesel::result::Error, _>(|conn| {
        let inserted: Option<Match> = diesel::insert_into(matches::table)
            .values(&new_match)
            .on_conflict((matches::dog_a_id, matches::dog_b_id))
            .do_nothing()
            .get_result(conn)
            .optional()?;

        if let Some(ref m) = inserted {
            let counters = vec![
                NewMatchCounter { user_id: m.user_a_id, total_matches: 1 },
                NewMatchCounter { user_id: m.user_b_id, total_matches: 1 },
            ];
            diesel::insert_into(match_counters::table)
                .values(&counters)
                .on_conflict(match_counters::user_id)
                .do_update()
                .set((
                    match_counters::total_matches.eq(match_counters::total_matches + 1),
                    match_counters::updated_at.eq(Utc::now()),
                ))
                .execute(conn)?;
        }

        Ok(inserted)
    })?;

    Ok(created)
}

// --- GET /swipes/check/:swiper_dog_id/:swiped_dog_id ---

#[derive(Debug, Serialize)]
pub struct SwipeCheckResponse {
    pub swiped: bool,
    pub liked: Option<bool>,
}

pub async fn check_swipe(
    _user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path((swiper_dog_id, swiped_dog_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ApiResponse<SwipeCheckResponse>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let existing: Option<Swipe> = swipes::table
        .filter(swipes::swiper_dog_id.eq(swiper_dog_id))
        .filter(swipes::swiped_dog_id.eq(swiped_dog_id))
        .first::<Swipe>(&mut conn)
        .optional()?;

    Ok(Json(ApiResponse::ok(SwipeCheckResponse {
        swiped: existing.is_some(),
        liked: existing.map(|s| s.liked),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: Uuid, owner_id: Uuid) -> DogCard {
        DogCard {
            id,
            owner_id,
            name: "Rex".into(),
            breed: "Beagle".into(),
            age_months: 24,
            energy_level: "medium".into(),
            size: "medium".into(),
            play_styles: vec![],
            photo_url: None,
            owner_latitude: None,
            owner_longitude: None,
        }
    }

    #[test]
    fn canonical_pair_is_order_independent() {
        let a = card(Uuid::from_u128(1), Uuid::from_u128(10));
        let b = card(Uuid::from_u128(2), Uuid::from_u128(20));

        let (x1, y1) = canonical_pair(&a, &b);
        let (x2, y2) = canonical_pair(&b, &a);

        assert_eq!(x1.id, x2.id);
        assert_eq!(y1.id, y2.id);
        assert!(x1.id <= y1.id);
    }
}
