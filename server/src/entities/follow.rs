//! Follow entity - Relazione "segui" tra profili

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Follow {
    pub follower_id: i64,
    pub following_id: i64,
    pub created_at: DateTime<Utc>,
}
