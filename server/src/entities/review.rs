//! Review entity - Recensione (1-5 stelle) di una sessione completata

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Review {
    pub review_id: i64,
    pub session_id: i64,
    pub rating: i64,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// Recensione arricchita con i dati della sessione, per le pagine dei mentor
#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct ReviewWithSession {
    #[sqlx(flatten)]
    pub review: Review,
    pub mentor_id: i64,
    pub topic: String,
    pub reviewer_username: String,
}
