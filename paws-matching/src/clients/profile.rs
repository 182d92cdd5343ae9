use serde::Deserialize;
use uuid::Uuid;

use paws_shared::errors::{AppError, AppResult, ErrorCode};
use paws_shared::types::geo::GeoPoint;

use crate::matching::scoring::{DogSize, EnergyLevel, ScoringProfile};

/// Dog card as served by paws-profile's internal endpoints.
#[derive(Debug, Clone, Deserialize)]
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

impl DogCard {
    /// Parse the card's string attributes into a scoring profile.
    /// Cards with unknown enum values (schema drift between services)
    /// are rejected rather than silently mis-scored.
    pub fn scoring_profile(&self) -> AppResult<ScoringProfile> {
        let energy_level: EnergyLevel = self
            .energy_level
            .parse()
            .map_err(|e: String| AppError::internal(e))?;
        let size: DogSize = self.size.parse().map_err(|e: String| AppError::internal(e))?;

        let owner_location = match (self.owner_latitude, self.owner_longitude) {
            (Some(lat), Some(lng)) => GeoPoint::new(lat, lng),
            _ => None,
        };

        Ok(ScoringProfile {
            energy_level,
            size,
            age_months: self.age_months,
            play_styles: self.play_styles.clone(),
            owner_location,
        })
    }
}

/// Thin client for paws-profile's service-to-service endpoints.
pub struct ProfileClient {
    http: reqwest::Client,
    base_url: String,
}

impl ProfileClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self { http, base_url: base_url.into() }
    }

    /// POST /internal/dogs/batch
    pub async fn fetch_dogs(&self, dog_ids: &[Uuid]) -> AppResult<Vec<DogCard>> {
        let url = format!("{}/internal/dogs/batch", self.base_url);
        let cards = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "dog_ids": dog_ids }))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "profile service unreachable");
                AppError::new(ErrorCode::ServiceUnavailable, "profile service unavailable")
            })?
            .json::<Vec<DogCard>>()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "bad response from profile service");
                AppError::new(ErrorCode::ServiceUnavailable, "profile service unavailable")
            })?;

        Ok(cards)
    }

    /// Fetch exactly one dog card or fail with not-found.
    pub async fn fetch_dog(&self, dog_id: Uuid) -> AppResult<DogCard> {
        let cards = self.fetch_dogs(&[dog_id]).await?;
        cards
            .into_iter()
            .find(|c| c.id == dog_id)
            .ok_or_else(|| AppError::new(ErrorCode::DogNotFound, "dog not found"))
    }

    /// GET /internal/dogs/discover
    pub async fn discover_dogs(
        &self,
        lat: f64,
        lng: f64,
        radius_km: f64,
        exclude_owner: Uuid,
    ) -> AppResult<Vec<DogCard>> {
        let url = format!("{}/internal/dogs/discover", self.base_url);
        let cards = self
            .http
            .get(&url)
            .query(&[
                ("lat", lat.to_string()),
                ("lng", lng.to_string()),
                ("radius_km", radius_km.to_string()),
                ("exclude_owner", exclude_owner.to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "profile service unreachable");
                AppError::new(ErrorCode::ServiceUnavailable, "profile service unavailable")
            })?
            .json::<Vec<DogCard>>()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "bad response from profile service");
                AppError::new(ErrorCode::ServiceUnavailable, "profile service unavailable")
            })?;

        Ok(cards)
    }
}
