use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::schema::{match_counters, matches, swipes};

// --- Swipe ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = swipes)]
pub struct Swipe {
    pub id: Uuid,
    pub swiper_dog_id: Uuid,
    pub swiped_dog_id: Uuid,
    pub swiper_user_id: Uuid,
    pub swiped_user_id: Uuid,
    pub liked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = swipes)]
pub struct NewSwipe {
    pub swiper_dog_id: Uuid,
    pub swiped_dog_id: Uuid,
    pub swiper_user_id: Uuid,
    pub swiped_user_id: Uuid,
    pub liked: bool,
}

// --- Match ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = matches)]
pub struct Match {
    pub id: Uuid,
    pub dog_a_id: Uuid,
    pub dog_b_id: Uuid,
    pub user_a_id: Uuid,
    pub user_b_id: Uuid,
    pub compatibility_score: f64,
    pub distance_km: Option<f64>,
    pub match_type: String,
    pub status: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = matches)]
pub struct NewMatch {
    pub dog_a_id: Uuid,
    pub dog_b_id: Uuid,
    pub user_a_id: Uuid,
    pub user_b_id: Uuid,
    pub compatibility_score: f64,
    pub distance_km: Option<f64>,
    pub match_type: String,
    pub status: String,
    pub expires_at: DateTime<Utc>,
}

// --- Match counter ---

#[derive(Debug, Queryable, Serialize, Clone)]
#[diesel(table_name = match_counters)]
pub struct MatchCounter {
    pub user_id: Uuid,
    pub total_matches: i64,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = match_counters)]
pub struct NewMatchCounter {
    pub user_id: Uuid,
    pub total_matches: i64,
}
