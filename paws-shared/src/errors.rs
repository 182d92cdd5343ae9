use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::types::ApiErrorResponse;

/// Application error codes following the pattern E{service}{sequence}
///
/// Ranges:
/// - E0xxx: Shared/infrastructure errors
/// - E1xxx: Profile errors
/// - E2xxx: Matching errors
/// - E3xxx: Playdate errors
/// - E4xxx: Location errors
/// - E5xxx: Chat errors
/// - E6xxx: Notification errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Shared (E0xxx)
    InternalError,
    ValidationError,
    NotFound,
    Unauthorized,
    Forbidden,
    RateLimited,
    ServiceUnavailable,
    BadRequest,
    TokenExpired,
    TokenInvalid,

    // Profile (E1xxx)
    ProfileNotFound,
    ProfileAlreadyExists,
    InvalidDisplayName,
    DogNotFound,
    DogLimitReached,
    NotDogOwner,
    LocationNotSet,

    // Matching (E2xxx)
    MatchNotFound,
    NotMatchParticipant,
    MatchAlreadyResolved,
    MatchExpired,
    CannotSwipeOwnDog,
    SwiperDogNotOwned,

    // Playdate (E3xxx)
    PlaydateRequestNotFound,
    NotRequestReceiver,
    RequestAlreadyResolved,
    InvalidProposedTimes,
    SelectedTimeNotProposed,
    PlaydateNotFound,
    NotPlaydateParticipant,
    PlaydateNotScheduled,
    MatchNotActive,

    // Location (E4xxx)
    InvalidCoordinates,
    PlacesUnavailable,
    PlacesRateLimited,
    PlaceNotFound,
    RadiusTooLarge,

    // Chat (E5xxx)
    ConversationNotFound,
    NotConversationMember,

    // Notification (E6xxx)
    NotificationNotFound,
}

impl ErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            // Shared
            Self::InternalError => "E0001",
            Self::ValidationError => "E0002",
            Self::NotFound => "E0003",
            Self::Unauthorized => "E0004",
            Self::Forbidden => "E0005",
            Self::RateLimited => "E0006",
            Self::ServiceUnavailable => "E0007",
            Self::BadRequest => "E0008",
            Self::TokenExpired => "E0009",
            Self::TokenInvalid => "E0010",

            // Profile
            Self::ProfileNotFound => "E1001",
            Self::ProfileAlreadyExists => "E1002",
            Self::InvalidDisplayName => "E1003",
            Self::DogNotFound => "E1004",
            Self::DogLimitReached => "E1005",
            Self::NotDogOwner => "E1006",
            Self::LocationNotSet => "E1007",

            // Matching
            Self::MatchNotFound => "E2001",
            Self::NotMatchParticipant => "E2002",
            Self::MatchAlreadyResolved => "E2003",
            Self::MatchExpired => "E2004",
            Self::CannotSwipeOwnDog => "E2005",
            Self::SwiperDogNotOwned => "E2006",

            // Playdate
            Self::PlaydateRequestNotFound => "E3001",
            Self::NotRequestReceiver => "E3002",
            Self::RequestAlreadyResolved => "E3003",
            Self::InvalidProposedTimes => "E3004",
            Self::SelectedTimeNotProposed => "E3005",
            Self::PlaydateNotFound => "E3006",
            Self::NotPlaydateParticipant => "E3007",
            Self::PlaydateNotScheduled => "E3008",
            Self::MatchNotActive => "E3009",

            // Location
            Self::InvalidCoordinates => "E4001",
            Self::PlacesUnavailable => "E4002",
            Self::PlacesRateLimited => "E4003",
            Self::PlaceNotFound => "E4004",
            Self::RadiusTooLarge => "E4005",

            // Chat
            Self::ConversationNotFound => "E5001",
            Self::NotConversationMember => "E5002",

            // Notification
            Self::NotificationNotFound => "E6001",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InternalError | Self::ServiceUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ValidationError | Self::BadRequest | Self::InvalidDisplayName
            | Self::InvalidProposedTimes | Self::SelectedTimeNotProposed
            | Self::InvalidCoordinates | Self::RadiusTooLarge | Self::CannotSwipeOwnDog
            | Self::LocationNotSet => StatusCode::BAD_REQUEST,
            Self::NotFound | Self::ProfileNotFound | Self::DogNotFound | Self::MatchNotFound
            | Self::PlaydateRequestNotFound | Self::PlaydateNotFound | Self::PlaceNotFound
            | Self::ConversationNotFound | Self::NotificationNotFound => StatusCode::NOT_FOUND,
            Self::Unauthorized | Self::TokenExpired | Self::TokenInvalid => StatusCode::UNAUTHORIZED,
            Self::Forbidden | Self::NotDogOwner | Self::SwiperDogNotOwned
            | Self::NotMatchParticipant | Self::NotRequestReceiver
            | Self::NotPlaydateParticipant | Self::NotConversationMember => StatusCode::FORBIDDEN,
            Self::RateLimited | Self::PlacesRateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::ProfileAlreadyExists | Self::DogLimitReached | Self::MatchAlreadyResolved
            | Self::MatchExpired | Self::RequestAlreadyResolved | Self::PlaydateNotScheduled
            | Self::MatchNotActive => StatusCode::CONFLICT,
            Self::PlacesUnavailable => StatusCode::BAD_GATEWAY,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Known {
        code: ErrorCode,
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Known {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(code: ErrorCode, message: impl Into<String>, details: serde_json::Value) -> Self {
        Self::Known {
            code,
            message: message.into(),
            details: Some(details),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match &self {
            AppError::Known { code, message, details } => {
                let status = code.status_code();
                let mut resp = ApiErrorResponse::new(code.code(), message);
                if let Some(d) = details {
                    resp = resp.with_details(d.clone());
                }
                (status, resp)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorResponse::new("E0001", "internal server error"),
                )
            }
            AppError::Database(err) => {
                tracing::error!(error = %err, "database error");
                match err {
                    diesel::result::Error::NotFound => (
                        StatusCode::NOT_FOUND,
                        ApiErrorResponse::new("E0003", "resource not found"),
                    ),
                    _ => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ApiErrorResponse::new("E0001", "database error"),
                    ),
                }
            }
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ApiErrorResponse::new("E0002", msg),
            ),
        };

        (status, Json(error_response)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_map_to_their_statuses() {
        assert_eq!(ErrorCode::ProfileNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::ProfileAlreadyExists.status_code(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::RequestAlreadyResolved.status_code(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::PlacesRateLimited.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(ErrorCode::NotConversationMember.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn database_failures_surface_as_internal_errors() {
        // An infrastructure failure must never read as a domain answer
        // like "profile not found" or "already exists"
        let err = AppError::Database(diesel::result::Error::BrokenTransactionManager);
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn database_not_found_maps_to_404() {
        let err = AppError::Database(diesel::result::Error::NotFound);
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
