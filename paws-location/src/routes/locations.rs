use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

use paws_shared::errors::{AppError, AppResult, ErrorCode};
use paws_shared::types::auth::AuthUser;
use paws_shared::types::geo::{distance_km, GeoPoint};
use paws_shared::types::ApiResponse;

use crate::cache;
use crate::heuristics::{classify_venue, infer_amenities, Amenities, VenueType};
use crate::places::client::{Prediction, RawPlace, RawPlaceDetails};
use crate::AppState;

pub const DEFAULT_SEARCH_RADIUS_KM: f64 = 5.0;
pub const MAX_SEARCH_RADIUS_KM: f64 = 50.0;

// --- DTOs ---

#[derive(Debug, Serialize)]
pub struct DogFriendlyLocation {
    pub place_id: String,
    pub name: String,
    pub venue_type: VenueType,
    pub address: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub rating: Option<f64>,
    pub distance_km: f64,
    pub amenities: Amenities,
}

#[derive(Debug, Serialize)]
pub struct LocationDetail {
    pub place_id: String,
    pub name: String,
    pub venue_type: VenueType,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub rating: Option<f64>,
    pub amenities: Amenities,
}

// --- GET /locations/search ---

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub lat: f64,
    pub lng: f64,
    pub radius_km: Option<f64>,
    pub venue_type: Option<String>,
    pub fenced: Option<bool>,
    pub off_leash: Option<bool>,
    pub water_station: Option<bool>,
    pub indoor_friendly: Option<bool>,
    pub serves_food: Option<bool>,
    pub outdoor_seating: Option<bool>,
}

#[derive(Debug, Clone, Copy)]
struct AmenityFilters {
    fenced: bool,
    off_leash: bool,
    water_station: bool,
    indoor_friendly: bool,
    serves_food: bool,
    outdoor_seating: bool,
}

impl AmenityFilters {
    fn from_params(params: &SearchParams) -> Self {
        Self {
            fenced: params.fenced.unwrap_or(false),
            off_leash: params.off_leash.unwrap_or(false),
            water_station: params.water_station.unwrap_or(false),
            indoor_friendly: params.indoor_friendly.unwrap_or(false),
            serves_food: params.serves_food.unwrap_or(false),
            outdoor_seating: params.outdoor_seating.unwrap_or(false),
        }
    }
}

/// Upstream fetch radius for a requested radius. The cache key buckets
/// radii by whole kilometers rounded up, so the fetch must cover the
/// whole bucket: a 4.2 km search fills the 5 km bucket, and a later
/// 5.0 km search served from that entry would otherwise miss the
/// 4.2–5.0 km ring.
fn fetch_radius_m(radius_km: f64) -> u32 {
    (radius_km.ceil() as u32) * 1000
}

/// A requested amenity must be present; unrequested ones are ignored.
fn passes_amenity_filters(amenities: &Amenities, filters: &AmenityFilters) -> bool {
    (!filters.fenced || amenities.fenced)
        && (!filters.off_leash || amenities.off_leash)
        && (!filters.water_station || amenities.water_station)
        && (!filters.indoor_friendly || amenities.indoor_friendly)
        && (!filters.serves_food || amenities.serves_food)
        && (!filters.outdoor_seating || amenities.outdoor_seating)
}

pub async fn search_locations(
    _user: AuthUser,
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<ApiResponse<Vec<DogFriendlyLocation>>>> {
    let center = GeoPoint::new(params.lat, params.lng)
        .ok_or_else(|| AppError::new(ErrorCode::InvalidCoordinates, "coordinates out of range"))?;

    let radius_km = params.radius_km.unwrap_or(DEFAULT_SEARCH_RADIUS_KM);
    if !(0.1..=MAX_SEARCH_RADIUS_KM).contains(&radius_km) {
        return Err(AppError::new(
            ErrorCode::RadiusTooLarge,
            format!("radius_km must be between 0.1 and {MAX_SEARCH_RADIUS_KM}"),
        ));
    }

    let venue_filter = match params.venue_type.as_deref() {
        Some(raw) => Some(
            VenueType::from_str(raw).map_err(|e| AppError::new(ErrorCode::BadRequest, e))?,
        ),
        None => None,
    };
    let amenity_filters = AmenityFilters::from_params(&params);

    // The unfiltered result set is cached per rounded-coordinate bucket;
    // filters are applied after, so every filter combination shares the
    // same upstream call.
    let key = cache::nearby_key(center.latitude, center.longitude, radius_km);
    let ttl = state.config.cache_ttl_secs;

    let places: Vec<RawPlace> = match cache::get_fresh(&state.redis, &key, ttl).await {
        Some(cached) => {
            tracing::debug!(key = %key, "nearby search served from cache");
            cached
        }
        None => {
            if !state.limiter.try_acquire().await {
                return Err(AppError::new(
                    ErrorCode::PlacesRateLimited,
                    "too many location searches, try again shortly",
                ));
            }
            let fetched = state
                .places
                .nearby_search(center.latitude, center.longitude, fetch_radius_m(radius_km), Some("dog"))
                .await?;
            cache::store(&state.redis, &key, ttl, &fetched).await;
            fetched
        }
    };

    let mut results: Vec<DogFriendlyLocation> = places
        .into_iter()
        .map(|place| to_location(place, center))
        // The rounded cache bucket and the API's radius are both
        // approximate; cut to the exact requested radius here
        .filter(|loc| loc.distance_km <= radius_km)
        .filter(|loc| venue_filter.map_or(true, |v| loc.venue_type == v))
        .filter(|loc| passes_amenity_filters(&loc.amenities, &amenity_filters))
        .collect();

    results.sort_by(|a, b| {
        a.distance_km
            .partial_cmp(&b.distance_km)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Ok(Json(ApiResponse::ok(results)))
}

fn to_location(place: RawPlace, center: GeoPoint) -> DogFriendlyLocation {
    let venue_type = classify_venue(&place.types, &place.name);
    let amenities = infer_amenities(venue_type, &place.types, &place.name);
    let there = GeoPoint {
        latitude: place.geometry.location.lat,
        longitude: place.geometry.location.lng,
    };

    DogFriendlyLocation {
        place_id: place.place_id,
        name: place.name,
        venue_type,
        address: place.vicinity,
        latitude: there.latitude,
        longitude: there.longitude,
        rating: place.rating,
        distance_km: distance_km(center, there),
        amenities,
    }
}

// --- GET /locations/autocomplete ---

#[derive(Debug, Deserialize)]
pub struct AutocompleteParams {
    pub q: String,
}

pub async fn autocomplete(
    _user: AuthUser,
    State(state): State<Arc<AppState>>,
    Query(params): Query<AutocompleteParams>,
) -> AppResult<Json<ApiResponse<Vec<Prediction>>>> {
    let query = params.q.trim();
    if query.len() < 2 {
        return Err(AppError::new(ErrorCode::BadRequest, "query must be at least 2 characters"));
    }

    let key = cache::autocomplete_key(query);
    let ttl = state.config.cache_ttl_secs;

    if let Some(cached) = cache::get_fresh::<Vec<Prediction>>(&state.redis, &key, ttl).await {
        return Ok(Json(ApiResponse::ok(cached)));
    }

    if !state.limiter.try_acquire().await {
        return Err(AppError::new(
            ErrorCode::PlacesRateLimited,
            "too many location searches, try again shortly",
        ));
    }

    let predictions = state.places.autocomplete(query).await?;
    cache::store(&state.redis, &key, ttl, &predictions).await;

    Ok(Json(ApiResponse::ok(predictions)))
}

// --- GET /locations/:place_id ---

pub async fn get_location(
    _user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(place_id): Path<String>,
) -> AppResult<Json<ApiResponse<LocationDetail>>> {
    let key = cache::details_key(&place_id);
    let ttl = state.config.cache_ttl_secs;

    let details: RawPlaceDetails = match cache::get_fresh(&state.redis, &key, ttl).await {
        Some(cached) => cached,
        None => {
            if !state.limiter.try_acquire().await {
                return Err(AppError::new(
                    ErrorCode::PlacesRateLimited,
                    "too many location searches, try again shortly",
                ));
            }
            let fetched = state.places.place_details(&place_id).await?;
            cache::store(&state.redis, &key, ttl, &fetched).await;
            fetched
        }
    };

    let venue_type = classify_venue(&details.types, &details.name);
    let amenities = infer_amenities(venue_type, &details.types, &details.name);

    Ok(Json(ApiResponse::ok(LocationDetail {
        place_id: details.place_id,
        name: details.name,
        venue_type,
        address: details.formatted_address,
        phone: details.formatted_phone_number,
        website: details.website,
        latitude: details.geometry.location.lat,
        longitude: details.geometry.location.lng,
        rating: details.rating,
        amenities,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache;

    #[test]
    fn fetch_radius_covers_the_whole_cache_bucket() {
        // Radii sharing a cache bucket must fetch the same (bucket-sized)
        // upstream radius, or the first writer under-fills the entry
        assert_eq!(cache::nearby_key(0.0, 0.0, 4.2), cache::nearby_key(0.0, 0.0, 5.0));
        assert_eq!(fetch_radius_m(4.2), fetch_radius_m(5.0));
        assert_eq!(fetch_radius_m(4.2), 5_000);
        assert_eq!(fetch_radius_m(0.1), 1_000);
        assert_eq!(fetch_radius_m(50.0), 50_000);
    }

    fn no_filters() -> AmenityFilters {
        AmenityFilters {
            fenced: false,
            off_leash: false,
            water_station: false,
            indoor_friendly: false,
            serves_food: false,
            outdoor_seating: false,
        }
    }

    #[test]
    fn unrequested_amenities_are_ignored() {
        let amenities = Amenities::default();
        assert!(passes_amenity_filters(&amenities, &no_filters()));
    }

    #[test]
    fn requested_amenities_must_be_present() {
        let mut filters = no_filters();
        filters.fenced = true;

        let mut amenities = Amenities::default();
        assert!(!passes_amenity_filters(&amenities, &filters));

        amenities.fenced = true;
        assert!(passes_amenity_filters(&amenities, &filters));

        filters.off_leash = true;
        assert!(!passes_amenity_filters(&amenities, &filters));
    }
}
