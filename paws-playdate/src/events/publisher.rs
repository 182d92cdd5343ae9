use paws_shared::clients::rabbitmq::RabbitMQClient;
use paws_shared::types::event::{payloads, routing_keys, Event};

use crate::models::{Playdate, PlaydateRequest};

pub async fn publish_request_created(rabbitmq: &RabbitMQClient, request: &PlaydateRequest) {
    let event = Event::new(
        "paws-playdate",
        routing_keys::PLAYDATE_REQUEST_CREATED,
        payloads::PlaydateRequestCreated {
            request_id: request.id,
            match_id: request.match_id,
            requester_id: request.requester_id,
            receiver_id: request.receiver_id,
            location_name: request.location_name.clone(),
        },
    )
    .with_user(request.requester_id);

    if let Err(e) = rabbitmq.publish(routing_keys::PLAYDATE_REQUEST_CREATED, &event).await {
        tracing::error!(error = %e, request_id = %request.id, "failed to publish request.created event");
    }
}

pub async fn publish_request_responded(
    rabbitmq: &RabbitMQClient,
    request: &PlaydateRequest,
    accepted: bool,
    playdate: Option<&Playdate>,
) {
    let routing_key = if accepted {
        routing_keys::PLAYDATE_REQUEST_ACCEPTED
    } else {
        routing_keys::PLAYDATE_REQUEST_DECLINED
    };

    let event = Event::new(
        "paws-playdate",
        routing_key,
        payloads::PlaydateRequestResponded {
            request_id: request.id,
            match_id: request.match_id,
            requester_id: request.requester_id,
            receiver_id: request.receiver_id,
            accepted,
            playdate_id: playdate.map(|p| p.id),
            scheduled_at: playdate.map(|p| p.scheduled_at),
        },
    )
    .with_user(request.receiver_id);

    if let Err(e) = rabbitmq.publish(routing_key, &event).await {
        tracing::error!(error = %e, request_id = %request.id, "failed to publish request response event");
    }
}

pub async fn publish_playdate_canceled(
    rabbitmq: &RabbitMQClient,
    playdate: &Playdate,
    canceled_by: uuid::Uuid,
) {
    let event = Event::new(
        "paws-playdate",
        routing_keys::PLAYDATE_CANCELED,
        payloads::PlaydateCanceled {
            playdate_id: playdate.id,
            match_id: playdate.match_id,
            user_a_id: playdate.user_a_id,
            user_b_id: playdate.user_b_id,
            canceled_by,
            scheduled_at: playdate.scheduled_at,
        },
    )
    .with_user(canceled_by);

    if let Err(e) = rabbitmq.publish(routing_keys::PLAYDATE_CANCELED, &event).await {
        tracing::error!(error = %e, playdate_id = %playdate.id, "failed to publish playdate.canceled event");
    }
}
