use std::sync::Arc;

use futures_lite::StreamExt;
use lapin::options::BasicAckOptions;
use uuid::Uuid;

use paws_shared::types::event::{payloads, routing_keys, Event};

use crate::models::Category;
use crate::services::notification_service;
use crate::AppState;

/// Listen for match.created and notify both participants.
pub async fn listen_match_events(state: Arc<AppState>) -> anyhow::Result<()> {
    let mut consumer = state
        .rabbitmq
        .subscribe("paws-notification.match.created", &[routing_keys::MATCHING_MATCH_CREATED])
        .await?;

    tracing::info!("listening for match events");

    while let Some(delivery) = consumer.next().await {
        match delivery {
            Ok(delivery) => {
                match serde_json::from_slice::<Event<payloads::MatchCreated>>(&delivery.data) {
                    Ok(event) => {
                        let data = &event.data;
                        tracing::info!(match_id = %data.match_id, "received match.created event");

                        let details = serde_json::json!({
                            "match_id": data.match_id,
                            "dog_a_id": data.dog_a_id,
                            "dog_b_id": data.dog_b_id,
                            "compatibility_score": data.compatibility_score,
                            "match_type": data.match_type,
                        });

                        for user_id in [data.user_a_id, data.user_b_id] {
                            if let Err(e) = notification_service::create_notification(
                                &state.db,
                                user_id,
                                Category::Match,
                                "New match!",
                                &format!("Your dogs are a {} match", data.match_type),
                                Some(details.clone()),
                            ) {
                                tracing::error!(error = %e, "failed to create match notification");
                            }
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "failed to deserialize match.created event");
                    }
                }
                let _ = delivery.ack(BasicAckOptions::default()).await;
            }
            Err(e) => {
                tracing::error!(error = %e, "match consumer error");
            }
        }
    }

    Ok(())
}

/// Listen for the playdate lifecycle: request created, accepted or
/// declined, and playdate canceled.
pub async fn listen_playdate_events(state: Arc<AppState>) -> anyhow::Result<()> {
    let mut consumer = state
        .rabbitmq
        .subscribe(
            "paws-notification.playdate",
            &[
                routing_keys::PLAYDATE_REQUEST_CREATED,
                routing_keys::PLAYDATE_REQUEST_ACCEPTED,
                routing_keys::PLAYDATE_REQUEST_DECLINED,
                routing_keys::PLAYDATE_CANCELED,
            ],
        )
        .await?;

    tracing::info!("listening for playdate events");

    while let Some(delivery) = consumer.next().await {
        match delivery {
            Ok(delivery) => {
                let routing_key = delivery.routing_key.to_string();

                if routing_key == routing_keys::PLAYDATE_REQUEST_CREATED {
                    match serde_json::from_slice::<Event<payloads::PlaydateRequestCreated>>(&delivery.data) {
                        Ok(event) => {
                            let data = &event.data;
                            tracing::info!(request_id = %data.request_id, "received request.created event");

                            if let Err(e) = notification_service::create_notification(
                                &state.db,
                                data.receiver_id,
                                Category::Playdate,
                                "New playdate request",
                                &format!("You have a playdate request at {}", data.location_name),
                                Some(serde_json::json!({
                                    "request_id": data.request_id,
                                    "match_id": data.match_id,
                                    "requester_id": data.requester_id,
                                    "location_name": data.location_name,
                                })),
                            ) {
                                tracing::error!(error = %e, "failed to create playdate request notification");
                            }
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "failed to deserialize request.created event");
                        }
                    }
                } else if routing_key == routing_keys::PLAYDATE_REQUEST_ACCEPTED
                    || routing_key == routing_keys::PLAYDATE_REQUEST_DECLINED
                {
                    match serde_json::from_slice::<Event<payloads::PlaydateRequestResponded>>(&delivery.data) {
                        Ok(event) => {
                            let data = &event.data;
                            tracing::info!(
                                request_id = %data.request_id,
                                accepted = data.accepted,
                                "received request response event"
                            );

                            let (title, body) = if data.accepted {
                                ("Playdate confirmed", "Your playdate request was accepted".to_string())
                            } else {
                                ("Playdate declined", "Your playdate request was declined".to_string())
                            };

                            if let Err(e) = notification_service::create_notification(
                                &state.db,
                                data.requester_id,
                                Category::Playdate,
                                title,
                                &body,
                                Some(serde_json::json!({
                                    "request_id": data.request_id,
                                    "match_id": data.match_id,
                                    "accepted": data.accepted,
                                    "playdate_id": data.playdate_id,
                                    "scheduled_at": data.scheduled_at,
                                })),
                            ) {
                                tracing::error!(error = %e, "failed to create playdate response notification");
                            }
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "failed to deserialize request response event");
                        }
                    }
                } else if routing_key == routing_keys::PLAYDATE_CANCELED {
                    match serde_json::from_slice::<Event<payloads::PlaydateCanceled>>(&delivery.data) {
                        Ok(event) => {
                            let data = &event.data;
                            tracing::info!(playdate_id = %data.playdate_id, "received playdate.canceled event");

                            match counterparty(data.user_a_id, data.user_b_id, data.canceled_by) {
                                Some(recipient) => {
                                    if let Err(e) = notification_service::create_notification(
                                        &state.db,
                                        recipient,
                                        Category::Update,
                                        "Playdate canceled",
                                        "A scheduled playdate was canceled",
                                        Some(serde_json::json!({
                                            "playdate_id": data.playdate_id,
                                            "match_id": data.match_id,
                                            "canceled_by": data.canceled_by,
                                            "scheduled_at": data.scheduled_at,
                                        })),
                                    ) {
                                        tracing::error!(error = %e, "failed to create cancellation notification");
                                    }
                                }
                                None => {
                                    tracing::warn!(
                                        playdate_id = %data.playdate_id,
                                        canceled_by = %data.canceled_by,
                                        "canceled_by is not a participant, skipping notification"
                                    );
                                }
                            }
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "failed to deserialize playdate.canceled event");
                        }
                    }
                }

                let _ = delivery.ack(BasicAckOptions::default()).await;
            }
            Err(e) => {
                tracing::error!(error = %e, "playdate consumer error");
            }
        }
    }

    Ok(())
}

/// Listen for chat message events and notify the recipients.
pub async fn listen_message_events(state: Arc<AppState>) -> anyhow::Result<()> {
    let mut consumer = state
        .rabbitmq
        .subscribe("paws-notification.message.sent", &[routing_keys::CHAT_MESSAGE_SENT])
        .await?;

    tracing::info!("listening for message events");

    while let Some(delivery) = consumer.next().await {
        match delivery {
            Ok(delivery) => {
                match serde_json::from_slice::<Event<payloads::MessageSent>>(&delivery.data) {
                    Ok(event) => {
                        let data = &event.data;
                        tracing::info!(
                            conversation_id = %data.conversation_id,
                            recipients = data.recipient_ids.len(),
                            "received message.sent event"
                        );

                        for recipient in &data.recipient_ids {
                            if *recipient == data.sender_id {
                                continue;
                            }
                            if let Err(e) = notification_service::create_notification(
                                &state.db,
                                *recipient,
                                Category::Message,
                                "New message",
                                &data.content_preview,
                                Some(serde_json::json!({
                                    "conversation_id": data.conversation_id,
                                    "message_id": data.message_id,
                                    "sender_id": data.sender_id,
                                })),
                            ) {
                                tracing::error!(error = %e, "failed to create message notification");
                            }
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "failed to deserialize message.sent event");
                    }
                }
                let _ = delivery.ack(BasicAckOptions::default()).await;
            }
            Err(e) => {
                tracing::error!(error = %e, "message consumer error");
            }
        }
    }

    Ok(())
}

/// The participant who did not cancel, if the canceler is a participant.
fn counterparty(user_a: Uuid, user_b: Uuid, canceled_by: Uuid) -> Option<Uuid> {
    if canceled_by == user_a {
        Some(user_b)
    } else if canceled_by == user_b {
        Some(user_a)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counterparty_is_the_other_participant() {
        let a = Uuid::now_v7();
        let b = Uuid::now_v7();
        let stranger = Uuid::now_v7();

        assert_eq!(counterparty(a, b, a), Some(b));
        assert_eq!(counterparty(a, b, b), Some(a));
        assert_eq!(counterparty(a, b, stranger), None);
    }
}
