use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// RabbitMQ Event envelope wrapping all domain events.
///
/// Routing key format: `paws.{service}.{entity}.{action}`
/// Example: `paws.matching.match.created`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event<T: Serialize> {
    pub id: Uuid,
    pub source: String,
    pub event_type: String,
    pub timestamp: DateTime<Utc>,
    pub correlation_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub data: T,
}

impl<T: Serialize> Event<T> {
    pub fn new(source: impl Into<String>, event_type: impl Into<String>, data: T) -> Self {
        Self {
            id: Uuid::now_v7(),
            source: source.into(),
            event_type: event_type.into(),
            timestamp: Utc::now(),
            correlation_id: None,
            user_id: None,
            data,
        }
    }

    pub fn with_user(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_correlation(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }
}

/// RabbitMQ routing keys
pub mod routing_keys {
    // Matching events
    pub const MATCHING_MATCH_CREATED: &str = "paws.matching.match.created";

    // Playdate events
    pub const PLAYDATE_REQUEST_CREATED: &str = "paws.playdate.request.created";
    pub const PLAYDATE_REQUEST_ACCEPTED: &str = "paws.playdate.request.accepted";
    pub const PLAYDATE_REQUEST_DECLINED: &str = "paws.playdate.request.declined";
    pub const PLAYDATE_CANCELED: &str = "paws.playdate.playdate.canceled";

    // Chat events
    pub const CHAT_MESSAGE_SENT: &str = "paws.chat.message.sent";
}

/// Common event data payloads
pub mod payloads {
    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct MatchCreated {
        pub match_id: Uuid,
        pub user_a_id: Uuid,
        pub user_b_id: Uuid,
        pub dog_a_id: Uuid,
        pub dog_b_id: Uuid,
        pub compatibility_score: f64,
        pub match_type: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct PlaydateRequestCreated {
        pub request_id: Uuid,
        pub match_id: Uuid,
        pub requester_id: Uuid,
        pub receiver_id: Uuid,
        pub location_name: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct PlaydateRequestResponded {
        pub request_id: Uuid,
        pub match_id: Uuid,
        pub requester_id: Uuid,
        pub receiver_id: Uuid,
        pub accepted: bool,
        pub playdate_id: Option<Uuid>,
        pub scheduled_at: Option<chrono::DateTime<chrono::Utc>>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct PlaydateCanceled {
        pub playdate_id: Uuid,
        pub match_id: Uuid,
        pub user_a_id: Uuid,
        pub user_b_id: Uuid,
        pub canceled_by: Uuid,
        pub scheduled_at: chrono::DateTime<chrono::Utc>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct MessageSent {
        pub message_id: Uuid,
        pub conversation_id: Uuid,
        pub sender_id: Uuid,
        pub recipient_ids: Vec<Uuid>,
        pub content_preview: String,
    }
}
