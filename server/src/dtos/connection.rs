//! Connection DTOs

use crate::dtos::ProfileSummaryDTO;
use crate::entities::{Connection, ConnectionStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ConnectionDTO {
    pub connection_id: i64,
    pub requester_id: i64,
    pub addressee_id: i64,
    pub status: ConnectionStatus,
    pub created_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

impl From<Connection> for ConnectionDTO {
    fn from(value: Connection) -> Self {
        Self {
            connection_id: value.connection_id,
            requester_id: value.requester_id,
            addressee_id: value.addressee_id,
            status: value.status,
            created_at: value.created_at,
            responded_at: value.responded_at,
        }
    }
}

/// Connessione arricchita con il profilo dell'altra parte
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EnrichedConnectionDTO {
    #[serde(flatten)]
    pub connection: ConnectionDTO,
    pub other: Option<ProfileSummaryDTO>,
}

/// DTO per creare una nuova connessione (sempre PENDING)
#[derive(Debug, Clone)]
pub struct CreateConnectionDTO {
    pub requester_id: i64,
    pub addressee_id: i64,
}

/// DTO per aggiornare una connessione (solo lo stato è modificabile)
#[derive(Debug, Clone)]
pub struct UpdateConnectionDTO {
    pub status: Option<ConnectionStatus>,
}
