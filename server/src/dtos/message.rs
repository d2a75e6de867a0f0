//! Message DTOs - Data Transfer Objects per messaggi diretti

use crate::entities::Message;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Struct per gestire io col client
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MessageDTO {
    pub message_id: i64,
    pub sender_id: i64,
    pub recipient_id: i64,
    pub content: String,
    pub sent_at: DateTime<Utc>,
    pub is_read: bool,
}

impl From<Message> for MessageDTO {
    fn from(value: Message) -> Self {
        Self {
            message_id: value.message_id,
            sender_id: value.sender_id,
            recipient_id: value.recipient_id,
            content: value.content,
            sent_at: value.sent_at,
            is_read: value.is_read,
        }
    }
}

/// Body di POST /messages/conversations/{id}
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct SendMessageDTO {
    #[validate(length(min = 1, max = 5000, message = "Message content must be between 1 and 5000 characters"))]
    pub content: String,
}

/// Frame inviato dal client sul WebSocket
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct WsOutgoingMessageDTO {
    pub recipient_id: i64,
    pub content: String,
}

/// DTO per creare un nuovo messaggio (senza message_id)
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateMessageDTO {
    pub sender_id: i64,
    pub recipient_id: i64,

    #[validate(length(min = 1, max = 5000, message = "Message content must be between 1 and 5000 characters"))]
    pub content: String,

    pub sent_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CountDTO {
    pub count: i64,
}
