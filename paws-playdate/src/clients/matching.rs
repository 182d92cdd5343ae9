use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use paws_shared::errors::{AppError, AppResult, ErrorCode};

/// Match participants and effective status, as served by paws-matching's
/// internal endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchInfo {
    pub id: Uuid,
    pub user_a_id: Uuid,
    pub user_b_id: Uuid,
    pub dog_a_id: Uuid,
    pub dog_b_id: Uuid,
    pub status: String,
    pub expires_at: DateTime<Utc>,
}

impl MatchInfo {
    pub fn is_participant(&self, user_id: Uuid) -> bool {
        self.user_a_id == user_id || self.user_b_id == user_id
    }

    /// The other participant of a two-party match.
    pub fn other_participant(&self, user_id: Uuid) -> Option<Uuid> {
        if self.user_a_id == user_id {
            Some(self.user_b_id)
        } else if self.user_b_id == user_id {
            Some(self.user_a_id)
        } else {
            None
        }
    }
}

/// Thin client for paws-matching's service-to-service endpoint.
pub struct MatchingClient {
    http: reqwest::Client,
    base_url: String,
}

impl MatchingClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self { http, base_url: base_url.into() }
    }

    /// GET /internal/matches/:id
    pub async fn fetch_match(&self, match_id: Uuid) -> AppResult<MatchInfo> {
        let url = format!("{}/internal/matches/{}", self.base_url, match_id);
        let resp = self.http.get(&url).send().await.map_err(|e| {
            tracing::error!(error = %e, "matching service unreachable");
            AppError::new(ErrorCode::ServiceUnavailable, "matching service unavailable")
        })?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::new(ErrorCode::MatchNotFound, "match not found"));
        }

        resp.json::<MatchInfo>().await.map_err(|e| {
            tracing::error!(error = %e, "bad response from matching service");
            AppError::new(ErrorCode::ServiceUnavailable, "matching service unavailable")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(a: Uuid, b: Uuid) -> MatchInfo {
        MatchInfo {
            id: Uuid::from_u128(99),
            user_a_id: a,
            user_b_id: b,
            dog_a_id: Uuid::from_u128(1),
            dog_b_id: Uuid::from_u128(2),
            status: "active".into(),
            expires_at: Utc::now(),
        }
    }

    #[test]
    fn other_participant_flips_sides() {
        let a = Uuid::from_u128(10);
        let b = Uuid::from_u128(20);
        let stranger = Uuid::from_u128(30);
        let m = info(a, b);

        assert_eq!(m.other_participant(a), Some(b));
        assert_eq!(m.other_participant(b), Some(a));
        assert_eq!(m.other_participant(stranger), None);
        assert!(m.is_participant(a));
        assert!(!m.is_participant(stranger));
    }
}
