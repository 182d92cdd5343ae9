use axum::extract::{Query, State};
use axum::Json;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use paws_shared::types::geo::{distance_km, GeoPoint};

use crate::models::Dog;
use crate::schema::{dogs, users};
use crate::AppState;

pub const DEFAULT_DISCOVER_RADIUS_KM: f64 = 25.0;
pub const MAX_DISCOVER_RADIUS_KM: f64 = 100.0;
const DISCOVER_LIMIT: i64 = 200;

/// Dog attributes plus owner coordinates, as served to other services.
#[derive(Debug, Serialize)]
pub struct DogCard {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub breed: String,
    pub age_months: i32,
    pub energy_level: String,
    pub size: String,
    pub play_styles: Vec<String>,
    pub photo_url: Option<String>,
    pub owner_latitude: Option<f64>,
    pub owner_longitude: Option<f64>,
}

fn to_card(dog: Dog, owner_latitude: Option<f64>, owner_longitude: Option<f64>) -> DogCard {
    let play_styles: Vec<String> = serde_json::from_value(dog.play_styles).unwrap_or_default();
    DogCard {
        id: dog.id,
        owner_id: dog.owner_id,
        name: dog.name,
        breed: dog.breed,
        age_months: dog.age_months,
        energy_level: dog.energy_level,
        size: dog.size,
        play_styles,
        photo_url: dog.photo_url,
        owner_latitude,
        owner_longitude,
    }
}

// --- Batch dog lookup ---

#[derive(Debug, Deserialize)]
pub struct BatchDogsRequest {
    pub dog_ids: Vec<Uuid>,
}

/// POST /internal/dogs/batch — dog cards for a list of dog ids (service-to-service, no auth)
pub async fn batch_dogs(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BatchDogsRequest>,
) -> Json<Vec<DogCard>> {
    let mut conn = match state.db.get() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "failed to get db connection for batch dogs");
            return Json(vec![]);
        }
    };

    let rows: Vec<(Dog, Option<f64>, Option<f64>)> = dogs::table
        .inner_join(users::table)
        .filter(dogs::id.eq_any(&req.dog_ids))
        .select((dogs::all_columns, users::latitude, users::longitude))
        .load::<(Dog, Option<f64>, Option<f64>)>(&mut conn)
        .unwrap_or_default();

    let cards = rows
        .into_iter()
        .map(|(dog, lat, lng)| to_card(dog, lat, lng))
        .collect();

    Json(cards)
}

// --- Radius discovery ---

#[derive(Debug, Deserialize)]
pub struct DiscoverParams {
    pub lat: f64,
    pub lng: f64,
    pub radius_km: Option<f64>,
    pub exclude_owner: Option<Uuid>,
}

/// Degree spans covering `radius_km` around a latitude. Used as a SQL
/// prefilter before the exact haversine cut; one degree of longitude
/// shrinks with the cosine of the latitude.
fn bounding_box(lat: f64, radius_km: f64) -> (f64, f64) {
    let lat_delta = radius_km / 111.0;
    let lng_delta = radius_km / (111.0 * lat.to_radians().cos().max(0.01));
    (lat_delta, lng_delta)
}

/// GET /internal/dogs/discover — dogs whose owners are within radius_km (service-to-service, no auth)
pub async fn discover_dogs(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DiscoverParams>,
) -> Json<Vec<DogCard>> {
    let center = match GeoPoint::new(params.lat, params.lng) {
        Some(p) => p,
        None => {
            tracing::warn!(lat = params.lat, lng = params.lng, "discover called with bad coordinates");
            return Json(vec![]);
        }
    };

    let radius_km = params
        .radius_km
        .unwrap_or(DEFAULT_DISCOVER_RADIUS_KM)
        .clamp(1.0, MAX_DISCOVER_RADIUS_KM);

    let mut conn = match state.db.get() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "failed to get db connection for discover");
            return Json(vec![]);
        }
    };

    let (lat_delta, lng_delta) = bounding_box(center.latitude, radius_km);

    let mut query = dogs::table
        .inner_join(users::table)
        .filter(users::latitude.is_not_null())
        .filter(users::longitude.is_not_null())
        .filter(users::latitude.ge(center.latitude - lat_delta))
        .filter(users::latitude.le(center.latitude + lat_delta))
        .filter(users::longitude.ge(center.longitude - lng_delta))
        .filter(users::longitude.le(center.longitude + lng_delta))
        .into_boxed();

    if let Some(owner_id) = params.exclude_owner {
        query = query.filter(dogs::owner_id.ne(owner_id));
    }

    let rows: Vec<(Dog, Option<f64>, Option<f64>)> = query
        .select((dogs::all_columns, users::latitude, users::longitude))
        .limit(DISCOVER_LIMIT)
        .load::<(Dog, Option<f64>, Option<f64>)>(&mut conn)
        .unwrap_or_default();

    // Bounding box is square; cut the corners with the exact distance
    let cards: Vec<DogCard> = rows
        .into_iter()
        .filter(|(_, lat, lng)| match (lat, lng) {
            (Some(lat), Some(lng)) => {
                let there = GeoPoint { latitude: *lat, longitude: *lng };
                distance_km(center, there) <= radius_km
            }
            _ => false,
        })
        .map(|(dog, lat, lng)| to_card(dog, lat, lng))
        .collect();

    Json(cards)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounding_box_widens_longitude_near_poles() {
        let (lat_eq, lng_eq) = bounding_box(0.0, 10.0);
        let (lat_no, lng_no) = bounding_box(60.0, 10.0);
        assert!((lat_eq - lat_no).abs() < 1e-9, "latitude span does not depend on latitude");
        assert!(lng_no > lng_eq * 1.9, "longitude span should roughly double at 60N");
    }

    #[test]
    fn bounding_box_covers_the_radius() {
        // 1 degree of latitude is ~111 km, so 111 km needs a span >= 1 degree
        let (lat_delta, _) = bounding_box(45.0, 111.0);
        assert!(lat_delta >= 1.0);
    }
}
