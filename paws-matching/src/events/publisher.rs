use paws_shared::clients::rabbitmq::RabbitMQClient;
use paws_shared::types::event::{payloads, routing_keys, Event};

use crate::models::Match;

/// Fire-and-forget after commit: a lost event costs a notification and
/// a chat conversation, never the match row itself.
pub async fn publish_match_created(rabbitmq: &RabbitMQClient, created: &Match) {
    let event = Event::new(
        "paws-matching",
        routing_keys::MATCHING_MATCH_CREATED,
        payloads::MatchCreated {
            match_id: created.id,
            user_a_id: created.user_a_id,
            user_b_id: created.user_b_id,
            dog_a_id: created.dog_a_id,
            dog_b_id: created.dog_b_id,
            compatibility_score: created.compatibility_score,
            match_type: created.match_type.clone(),
        },
    );

    if let Err(e) = rabbitmq.publish(routing_keys::MATCHING_MATCH_CREATED, &event).await {
        tracing::error!(error = %e, match_id = %created.id, "failed to publish match.created event");
    }
}
