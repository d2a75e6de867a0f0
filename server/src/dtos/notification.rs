//! Notification DTOs

use crate::entities::Notification;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NotificationDTO {
    pub notification_id: i64,
    pub title: String,
    pub message: String,
    pub link: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Notification> for NotificationDTO {
    fn from(value: Notification) -> Self {
        Self {
            notification_id: value.notification_id,
            title: value.title,
            message: value.message,
            link: value.link,
            is_read: value.is_read,
            created_at: value.created_at,
        }
    }
}

/// DTO per creare una nuova notifica
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateNotificationDTO {
    pub recipient_id: i64,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub message: String,
    pub link: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ReadAllDTO {
    pub updated: u64,
}
