use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::{dogs, users};

// --- User (dog owner) ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = users)]
pub struct User {
    pub id: Uuid,
    pub display_name: String,
    pub bio: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub id: Uuid,
    pub display_name: String,
    pub bio: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, AsChangeset, Deserialize, Default)]
#[diesel(table_name = users)]
pub struct UpdateUser {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

// --- Dog ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = dogs)]
pub struct Dog {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub breed: String,
    pub age_months: i32,
    pub energy_level: String,
    pub size: String,
    pub play_styles: serde_json::Value,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = dogs)]
pub struct NewDog {
    pub owner_id: Uuid,
    pub name: String,
    pub breed: String,
    pub age_months: i32,
    pub energy_level: String,
    pub size: String,
    pub play_styles: serde_json::Value,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
}

#[derive(Debug, AsChangeset, Default)]
#[diesel(table_name = dogs)]
pub struct UpdateDog {
    pub name: Option<String>,
    pub breed: Option<String>,
    pub age_months: Option<i32>,
    pub energy_level: Option<String>,
    pub size: Option<String>,
    pub play_styles: Option<serde_json::Value>,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
}
