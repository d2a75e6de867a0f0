//! ConnectionRepository - Richieste di collegamento tra profili

use super::{Create, Delete, Read, Update};
use crate::dtos::{CreateConnectionDTO, UpdateConnectionDTO};
use crate::entities::{Connection, ConnectionStatus};
use chrono::Utc;
use sqlx::{Error, SqlitePool};

const CONNECTION_SELECT: &str = r#"
    SELECT connection_id, requester_id, addressee_id, status, created_at, responded_at
    FROM connections
"#;

pub struct ConnectionRepository {
    connection_pool: SqlitePool,
}

impl ConnectionRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Collegamento tra due profili, in qualunque direzione
    pub async fn find_between(
        &self,
        profile_a: &i64,
        profile_b: &i64,
    ) -> Result<Option<Connection>, Error> {
        sqlx::query_as::<_, Connection>(&format!(
            r#"{CONNECTION_SELECT}
            WHERE (requester_id = ? AND addressee_id = ?)
               OR (requester_id = ? AND addressee_id = ?)
            ORDER BY created_at DESC
            LIMIT 1"#
        ))
        .bind(profile_a)
        .bind(profile_b)
        .bind(profile_b)
        .bind(profile_a)
        .fetch_optional(&self.connection_pool)
        .await
    }

    pub async fn find_accepted_by_profile(&self, profile_id: &i64) -> Result<Vec<Connection>, Error> {
        sqlx::query_as::<_, Connection>(&format!(
            r#"{CONNECTION_SELECT}
            WHERE (requester_id = ? OR addressee_id = ?) AND status = 'ACCEPTED'
            ORDER BY responded_at DESC"#
        ))
        .bind(profile_id)
        .bind(profile_id)
        .fetch_all(&self.connection_pool)
        .await
    }

    /// Richieste in attesa ricevute dal profilo
    pub async fn find_pending_for(&self, addressee_id: &i64) -> Result<Vec<Connection>, Error> {
        sqlx::query_as::<_, Connection>(&format!(
            r#"{CONNECTION_SELECT}
            WHERE addressee_id = ? AND status = 'PENDING'
            ORDER BY created_at DESC"#
        ))
        .bind(addressee_id)
        .fetch_all(&self.connection_pool)
        .await
    }
}

impl Create<Connection, CreateConnectionDTO> for ConnectionRepository {
    /// Sostituisce un eventuale collegamento DECLINED tra i due profili
    ///
    /// Un collegamento PENDING o ACCEPTED in qualunque direzione fa fallire l'insert
    /// con una violazione di unicità.
    async fn create(&self, data: &CreateConnectionDTO) -> Result<Connection, Error> {
        let created_at = Utc::now();
        let mut tx = self.connection_pool.begin().await?;

        sqlx::query(
            r#"
            DELETE FROM connections
            WHERE status = 'DECLINED'
              AND ((requester_id = ? AND addressee_id = ?) OR (requester_id = ? AND addressee_id = ?))
            "#,
        )
        .bind(data.requester_id)
        .bind(data.addressee_id)
        .bind(data.addressee_id)
        .bind(data.requester_id)
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query(
            r#"
            INSERT INTO connections (requester_id, addressee_id, status, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(data.requester_id)
        .bind(data.addressee_id)
        .bind(ConnectionStatus::Pending)
        .bind(created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Connection {
            connection_id: result.last_insert_rowid(),
            requester_id: data.requester_id,
            addressee_id: data.addressee_id,
            status: ConnectionStatus::Pending,
            created_at,
            responded_at: None,
        })
    }
}

impl Read<Connection, i64> for ConnectionRepository {
    async fn read(&self, id: &i64) -> Result<Option<Connection>, Error> {
        sqlx::query_as::<_, Connection>(&format!("{CONNECTION_SELECT} WHERE connection_id = ?"))
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await
    }
}

impl Update<Connection, UpdateConnectionDTO, i64> for ConnectionRepository {
    /// Risponde a una richiesta ancora PENDING e registra il momento della risposta
    ///
    /// RowNotFound se il collegamento non esiste o ha già ricevuto una risposta.
    async fn update(&self, id: &i64, data: &UpdateConnectionDTO) -> Result<Connection, Error> {
        let Some(status) = data.status else {
            return self.read(id).await?.ok_or(Error::RowNotFound);
        };

        let result = sqlx::query(
            r#"
            UPDATE connections SET status = ?, responded_at = ?
            WHERE connection_id = ? AND status = 'PENDING'
            "#,
        )
        .bind(status)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.connection_pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::RowNotFound);
        }
        self.read(id).await?.ok_or(Error::RowNotFound)
    }
}

impl Delete<i64> for ConnectionRepository {
    async fn delete(&self, id: &i64) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM connections WHERE connection_id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
