//! WebSocket Event DTOs - Data Transfer Objects per eventi WebSocket

use crate::dtos::{MessageDTO, NotificationDTO};
use serde::{Deserialize, Serialize};

/// Tagged union per eventi WebSocket
/// Serde serializza questo come:
/// { "type": "Message", "data": { ... } }
/// oppure
/// { "type": "Notification", "data": { ... } }
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "type", content = "data")]
pub enum WsEventDTO {
    Message(MessageDTO),
    Notification(NotificationDTO),
    Error { code: u16, message: String },
}
