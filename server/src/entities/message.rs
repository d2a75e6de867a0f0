//! Message entity - Messaggio diretto tra due profili

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Message {
    pub message_id: i64,
    pub sender_id: i64,
    pub recipient_id: i64,
    pub content: String,
    pub sent_at: DateTime<Utc>,
    pub is_read: bool,
}
