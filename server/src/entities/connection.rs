//! Connection entity - Richiesta di collegamento tra due profili

use super::enums::ConnectionStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Connection {
    pub connection_id: i64,
    pub requester_id: i64,
    pub addressee_id: i64,
    pub status: ConnectionStatus,
    pub created_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

impl Connection {
    pub fn involves(&self, profile_id: i64) -> bool {
        self.requester_id == profile_id || self.addressee_id == profile_id
    }

    pub fn other_party(&self, profile_id: i64) -> i64 {
        if self.requester_id == profile_id {
            self.addressee_id
        } else {
            self.requester_id
        }
    }
}
