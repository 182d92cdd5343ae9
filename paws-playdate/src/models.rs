use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::schema::{playdate_requests, playdates};

// --- PlaydateRequest ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = playdate_requests)]
pub struct PlaydateRequest {
    pub id: Uuid,
    pub match_id: Uuid,
    pub requester_id: Uuid,
    pub receiver_id: Uuid,
    pub location_id: String,
    pub location_name: String,
    pub proposed_times: serde_json::Value,
    pub status: String,
    pub selected_time: Option<DateTime<Utc>>,
    pub responded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PlaydateRequest {
    pub fn proposed_times(&self) -> Vec<DateTime<Utc>> {
        serde_json::from_value(self.proposed_times.clone()).unwrap_or_default()
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = playdate_requests)]
pub struct NewPlaydateRequest {
    pub match_id: Uuid,
    pub requester_id: Uuid,
    pub receiver_id: Uuid,
    pub location_id: String,
    pub location_name: String,
    pub proposed_times: serde_json::Value,
    pub status: String,
}

// --- Playdate ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = playdates)]
pub struct Playdate {
    pub id: Uuid,
    pub request_id: Uuid,
    pub match_id: Uuid,
    pub user_a_id: Uuid,
    pub user_b_id: Uuid,
    pub location_id: String,
    pub location_name: String,
    pub scheduled_at: DateTime<Utc>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = playdates)]
pub struct NewPlaydate {
    pub request_id: Uuid,
    pub match_id: Uuid,
    pub user_a_id: Uuid,
    pub user_b_id: Uuid,
    pub location_id: String,
    pub location_name: String,
    pub scheduled_at: DateTime<Utc>,
    pub status: String,
}
