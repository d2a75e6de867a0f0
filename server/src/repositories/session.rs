//! SessionRepository - Repository per le sessioni di mentoring

use super::{Create, Read};
use crate::dtos::CreateSessionDTO;
use crate::entities::{Session, SessionStatus};
use chrono::{DateTime, Utc};
use sqlx::{Error, SqlitePool};

const SESSION_SELECT: &str = r#"
    SELECT s.session_id, s.mentor_id, s.mentee_id,
           mu.username AS mentor_username, eu.username AS mentee_username,
           s.topic, s.scheduled_at, s.status, s.created_at
    FROM sessions s
    JOIN profiles mp ON mp.profile_id = s.mentor_id
    JOIN users mu ON mu.user_id = mp.user_id
    JOIN profiles ep ON ep.profile_id = s.mentee_id
    JOIN users eu ON eu.user_id = ep.user_id
"#;

pub struct SessionRepository {
    connection_pool: SqlitePool,
}

impl SessionRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Sessioni in cui il profilo è mentor o mentee, in ordine di data
    pub async fn find_many_by_profile(
        &self,
        profile_id: &i64,
        status: Option<SessionStatus>,
    ) -> Result<Vec<Session>, Error> {
        sqlx::query_as::<_, Session>(&format!(
            r#"{SESSION_SELECT}
            WHERE (s.mentor_id = ? OR s.mentee_id = ?)
              AND (? IS NULL OR s.status = ?)
            ORDER BY s.scheduled_at ASC"#
        ))
        .bind(profile_id)
        .bind(profile_id)
        .bind(status)
        .bind(status)
        .fetch_all(&self.connection_pool)
        .await
    }

    /// Sessioni PENDING o CONFIRMED programmate da `from` in poi
    pub async fn find_upcoming_by_profile(
        &self,
        profile_id: &i64,
        from: &DateTime<Utc>,
    ) -> Result<Vec<Session>, Error> {
        sqlx::query_as::<_, Session>(&format!(
            r#"{SESSION_SELECT}
            WHERE (s.mentor_id = ? OR s.mentee_id = ?)
              AND s.status IN ('PENDING', 'CONFIRMED')
              AND s.scheduled_at >= ?
            ORDER BY s.scheduled_at ASC"#
        ))
        .bind(profile_id)
        .bind(profile_id)
        .bind(from)
        .fetch_all(&self.connection_pool)
        .await
    }

    /// Conta le richieste PENDING come mentor (`as_mentor = true`) o come mentee
    pub async fn count_pending(&self, profile_id: &i64, as_mentor: bool) -> Result<i64, Error> {
        let query = if as_mentor {
            "SELECT COUNT(*) FROM sessions WHERE mentor_id = ? AND status = 'PENDING'"
        } else {
            "SELECT COUNT(*) FROM sessions WHERE mentee_id = ? AND status = 'PENDING'"
        };
        sqlx::query_scalar(query)
            .bind(profile_id)
            .fetch_one(&self.connection_pool)
            .await
    }

    pub async fn find_many(&self, status: Option<SessionStatus>) -> Result<Vec<Session>, Error> {
        sqlx::query_as::<_, Session>(&format!(
            "{SESSION_SELECT} WHERE (? IS NULL OR s.status = ?) ORDER BY s.scheduled_at DESC"
        ))
        .bind(status)
        .bind(status)
        .fetch_all(&self.connection_pool)
        .await
    }

    /// Cambia lo stato solo se la sessione è ancora in `from`
    ///
    /// None se nel frattempo un'altra richiesta ha già cambiato lo stato.
    pub async fn transition_status(
        &self,
        id: &i64,
        from: SessionStatus,
        to: SessionStatus,
    ) -> Result<Option<Session>, Error> {
        let result =
            sqlx::query("UPDATE sessions SET status = ? WHERE session_id = ? AND status = ?")
                .bind(to)
                .bind(id)
                .bind(from)
                .execute(&self.connection_pool)
                .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.read(id).await
    }
}

impl Create<Session, CreateSessionDTO> for SessionRepository {
    async fn create(&self, data: &CreateSessionDTO) -> Result<Session, Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO sessions (mentor_id, mentee_id, topic, scheduled_at, status, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(data.mentor_id)
        .bind(data.mentee_id)
        .bind(&data.topic)
        .bind(data.scheduled_at)
        .bind(SessionStatus::Pending)
        .bind(data.created_at)
        .execute(&self.connection_pool)
        .await?;

        self.read(&result.last_insert_rowid())
            .await?
            .ok_or(Error::RowNotFound)
    }
}

impl Read<Session, i64> for SessionRepository {
    async fn read(&self, id: &i64) -> Result<Option<Session>, Error> {
        sqlx::query_as::<_, Session>(&format!("{SESSION_SELECT} WHERE s.session_id = ?"))
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await
    }
}
