//! MessageRepository - Repository per la gestione dei messaggi diretti

use super::{Create, Read};
use crate::dtos::CreateMessageDTO;
use crate::entities::Message;
use chrono::{DateTime, Utc};
use sqlx::{Error, SqlitePool};

const MESSAGE_SELECT: &str =
    "SELECT message_id, sender_id, recipient_id, content, sent_at, is_read FROM messages";

pub struct MessageRepository {
    connection_pool: SqlitePool,
}

impl MessageRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Messaggi scambiati tra due profili, dal più recente
    ///
    /// Con `before_date` restituisce la pagina precedente a quella data (esclusa).
    pub async fn find_conversation(
        &self,
        profile_a: &i64,
        profile_b: &i64,
        before_date: Option<&DateTime<Utc>>,
        limit: i64,
    ) -> Result<Vec<Message>, Error> {
        sqlx::query_as::<_, Message>(&format!(
            r#"{MESSAGE_SELECT}
            WHERE ((sender_id = ? AND recipient_id = ?) OR (sender_id = ? AND recipient_id = ?))
              AND (? IS NULL OR sent_at < ?)
            ORDER BY sent_at DESC, message_id DESC
            LIMIT ?"#
        ))
        .bind(profile_a)
        .bind(profile_b)
        .bind(profile_b)
        .bind(profile_a)
        .bind(before_date)
        .bind(before_date)
        .bind(limit)
        .fetch_all(&self.connection_pool)
        .await
    }

    pub async fn find_inbox(
        &self,
        recipient_id: &i64,
        before_date: Option<&DateTime<Utc>>,
        limit: i64,
    ) -> Result<Vec<Message>, Error> {
        sqlx::query_as::<_, Message>(&format!(
            r#"{MESSAGE_SELECT}
            WHERE recipient_id = ? AND (? IS NULL OR sent_at < ?)
            ORDER BY sent_at DESC, message_id DESC
            LIMIT ?"#
        ))
        .bind(recipient_id)
        .bind(before_date)
        .bind(before_date)
        .bind(limit)
        .fetch_all(&self.connection_pool)
        .await
    }

    pub async fn find_sent(
        &self,
        sender_id: &i64,
        before_date: Option<&DateTime<Utc>>,
        limit: i64,
    ) -> Result<Vec<Message>, Error> {
        sqlx::query_as::<_, Message>(&format!(
            r#"{MESSAGE_SELECT}
            WHERE sender_id = ? AND (? IS NULL OR sent_at < ?)
            ORDER BY sent_at DESC, message_id DESC
            LIMIT ?"#
        ))
        .bind(sender_id)
        .bind(before_date)
        .bind(before_date)
        .bind(limit)
        .fetch_all(&self.connection_pool)
        .await
    }

    /// Segna come letti i messaggi indicati, solo se destinati a `recipient_id`
    pub async fn mark_many_read(
        &self,
        recipient_id: &i64,
        message_ids: &[i64],
    ) -> Result<u64, Error> {
        if message_ids.is_empty() {
            return Ok(0);
        }

        let mut query_builder = sqlx::QueryBuilder::new(
            "UPDATE messages SET is_read = 1 WHERE is_read = 0 AND recipient_id = ",
        );
        query_builder.push_bind(recipient_id);
        query_builder.push(" AND message_id IN (");
        let mut separated = query_builder.separated(", ");
        for id in message_ids {
            separated.push_bind(id);
        }
        separated.push_unseparated(")");

        let result = query_builder.build().execute(&self.connection_pool).await?;
        Ok(result.rows_affected())
    }

    pub async fn mark_read(&self, message_id: &i64) -> Result<(), Error> {
        sqlx::query("UPDATE messages SET is_read = 1 WHERE message_id = ?")
            .bind(message_id)
            .execute(&self.connection_pool)
            .await?;
        Ok(())
    }

    pub async fn count_unread(&self, recipient_id: &i64) -> Result<i64, Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM messages WHERE recipient_id = ? AND is_read = 0")
            .bind(recipient_id)
            .fetch_one(&self.connection_pool)
            .await
    }

    pub async fn find_many(&self, is_read: Option<bool>) -> Result<Vec<Message>, Error> {
        sqlx::query_as::<_, Message>(&format!(
            "{MESSAGE_SELECT} WHERE (? IS NULL OR is_read = ?) ORDER BY sent_at DESC"
        ))
        .bind(is_read)
        .bind(is_read)
        .fetch_all(&self.connection_pool)
        .await
    }
}

impl Create<Message, CreateMessageDTO> for MessageRepository {
    async fn create(&self, data: &CreateMessageDTO) -> Result<Message, Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO messages (sender_id, recipient_id, content, sent_at, is_read)
            VALUES (?, ?, ?, ?, 0)
            "#,
        )
        .bind(data.sender_id)
        .bind(data.recipient_id)
        .bind(&data.content)
        .bind(data.sent_at)
        .execute(&self.connection_pool)
        .await?;

        Ok(Message {
            message_id: result.last_insert_rowid(),
            sender_id: data.sender_id,
            recipient_id: data.recipient_id,
            content: data.content.clone(),
            sent_at: data.sent_at,
            is_read: false,
        })
    }
}

impl Read<Message, i64> for MessageRepository {
    async fn read(&self, id: &i64) -> Result<Option<Message>, Error> {
        sqlx::query_as::<_, Message>(&format!("{MESSAGE_SELECT} WHERE message_id = ?"))
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await
    }
}
