use diesel::prelude::*;
use futures_lite::StreamExt;
use lapin::options::BasicAckOptions;
use std::sync::Arc;
use uuid::Uuid;

use paws_shared::types::event::{payloads, routing_keys, Event};

use crate::models::{Conversation, NewConversation, NewConversationMember};
use crate::schema::{conversation_members, conversations};
use crate::AppState;

/// Listen for match.created events and open a conversation for the pair.
pub async fn listen_match_created(state: Arc<AppState>) -> anyhow::Result<()> {
    let mut consumer = state
        .rabbitmq
        .subscribe("paws-chat.matching.match.created", &[routing_keys::MATCHING_MATCH_CREATED])
        .await?;

    tracing::info!("listening for match.created events");

    while let Some(delivery) = consumer.next().await {
        match delivery {
            Ok(delivery) => {
                match serde_json::from_slice::<Event<payloads::MatchCreated>>(&delivery.data) {
                    Ok(event) => {
                        let data = &event.data;
                        tracing::info!(
                            match_id = %data.match_id,
                            user_a = %data.user_a_id,
                            user_b = %data.user_b_id,
                            "received match.created event"
                        );

                        if let Err(e) = create_conversation_for_match(
                            &state.db,
                            data.match_id,
                            data.user_a_id,
                            data.user_b_id,
                        ) {
                            tracing::error!(
                                error = %e,
                                match_id = %data.match_id,
                                "failed to create conversation for match"
                            );
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "failed to deserialize match.created event");
                    }
                }
                let _ = delivery.ack(BasicAckOptions::default()).await;
            }
            Err(e) => {
                tracing::error!(error = %e, "consumer error");
            }
        }
    }

    Ok(())
}

/// Create the conversation for a match unless one already exists. The
/// unique index on match_id makes redelivered events harmless.
fn create_conversation_for_match(
    db: &paws_shared::clients::db::DbPool,
    match_id: Uuid,
    user_a_id: Uuid,
    user_b_id: Uuid,
) -> anyhow::Result<()> {
    let mut conn = db.get()?;

    let created: Option<Conversation> = diesel::insert_into(conversations::table)
        .values(&NewConversation { match_id })
        .on_conflict(conversations::match_id)
        .do_nothing()
        .get_result(&mut conn)
        .optional()?;

    let Some(conversation) = created else {
        tracing::debug!(match_id = %match_id, "conversation already exists, skipping");
        return Ok(());
    };

    let members = vec![
        NewConversationMember {
            conversation_id: conversation.id,
            user_id: user_a_id,
        },
        NewConversationMember {
            conversation_id: conversation.id,
            user_id: user_b_id,
        },
    ];

    diesel::insert_into(conversation_members::table)
        .values(&members)
        .execute(&mut conn)?;

    tracing::info!(
        conversation_id = %conversation.id,
        match_id = %match_id,
        "conversation created from match.created"
    );

    Ok(())
}
