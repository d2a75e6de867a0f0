//! NotificationRepository - Notifiche in-app

use super::{Create, Read};
use crate::dtos::CreateNotificationDTO;
use crate::entities::Notification;
use chrono::Utc;
use sqlx::{Error, SqlitePool};

const NOTIFICATION_SELECT: &str = r#"
    SELECT notification_id, recipient_id, title, message, link, is_read, created_at
    FROM notifications
"#;

pub struct NotificationRepository {
    connection_pool: SqlitePool,
}

impl NotificationRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    pub async fn find_many_by_recipient(
        &self,
        recipient_id: &i64,
        unread_only: bool,
    ) -> Result<Vec<Notification>, Error> {
        sqlx::query_as::<_, Notification>(&format!(
            r#"{NOTIFICATION_SELECT}
            WHERE recipient_id = ? AND (? = 0 OR is_read = 0)
            ORDER BY created_at DESC, notification_id DESC"#
        ))
        .bind(recipient_id)
        .bind(unread_only)
        .fetch_all(&self.connection_pool)
        .await
    }

    /// Aggiorna solo se la notifica appartiene a `recipient_id`
    pub async fn mark_read(&self, notification_id: &i64, recipient_id: &i64) -> Result<bool, Error> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = 1 WHERE notification_id = ? AND recipient_id = ?",
        )
        .bind(notification_id)
        .bind(recipient_id)
        .execute(&self.connection_pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Ritorna il numero di notifiche effettivamente modificate
    pub async fn mark_all_read(&self, recipient_id: &i64) -> Result<u64, Error> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = 1 WHERE recipient_id = ? AND is_read = 0",
        )
        .bind(recipient_id)
        .execute(&self.connection_pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn count_unread(&self, recipient_id: &i64) -> Result<i64, Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE recipient_id = ? AND is_read = 0",
        )
        .bind(recipient_id)
        .fetch_one(&self.connection_pool)
        .await
    }
}

impl Create<Notification, CreateNotificationDTO> for NotificationRepository {
    async fn create(&self, data: &CreateNotificationDTO) -> Result<Notification, Error> {
        let created_at = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO notifications (recipient_id, title, message, link, is_read, created_at)
            VALUES (?, ?, ?, ?, 0, ?)
            "#,
        )
        .bind(data.recipient_id)
        .bind(&data.title)
        .bind(&data.message)
        .bind(&data.link)
        .bind(created_at)
        .execute(&self.connection_pool)
        .await?;

        Ok(Notification {
            notification_id: result.last_insert_rowid(),
            recipient_id: data.recipient_id,
            title: data.title.clone(),
            message: data.message.clone(),
            link: data.link.clone(),
            is_read: false,
            created_at,
        })
    }
}

impl Read<Notification, i64> for NotificationRepository {
    async fn read(&self, id: &i64) -> Result<Option<Notification>, Error> {
        sqlx::query_as::<_, Notification>(&format!(
            "{NOTIFICATION_SELECT} WHERE notification_id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
    }
}
