use uuid::Uuid;

use paws_shared::clients::rabbitmq::RabbitMQClient;
use paws_shared::types::event::{payloads, routing_keys, Event};

use crate::models::Message;

/// Previews are capped so the event stays small no matter the message.
pub const PREVIEW_MAX_CHARS: usize = 80;

pub fn content_preview(content: &str) -> String {
    content.chars().take(PREVIEW_MAX_CHARS).collect()
}

/// Fire-and-forget after the insert: a lost event costs the recipients a
/// notification, never the message itself.
pub async fn publish_message_sent(
    rabbitmq: &RabbitMQClient,
    message: &Message,
    recipient_ids: Vec<Uuid>,
) {
    let event = Event::new(
        "paws-chat",
        routing_keys::CHAT_MESSAGE_SENT,
        payloads::MessageSent {
            message_id: message.id,
            conversation_id: message.conversation_id,
            sender_id: message.sender_id,
            recipient_ids,
            content_preview: content_preview(&message.content),
        },
    )
    .with_user(message.sender_id);

    if let Err(e) = rabbitmq.publish(routing_keys::CHAT_MESSAGE_SENT, &event).await {
        tracing::error!(error = %e, message_id = %message.id, "failed to publish message.sent event");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_content_is_kept_whole() {
        assert_eq!(content_preview("see you at the park!"), "see you at the park!");
    }

    #[test]
    fn long_content_is_cut_at_the_char_limit() {
        let long = "a".repeat(500);
        assert_eq!(content_preview(&long).chars().count(), PREVIEW_MAX_CHARS);
    }

    #[test]
    fn preview_cuts_on_chars_not_bytes() {
        let content = "é".repeat(100);
        let preview = content_preview(&content);
        assert_eq!(preview.chars().count(), PREVIEW_MAX_CHARS);
        assert!(preview.chars().all(|c| c == 'é'));
    }
}
