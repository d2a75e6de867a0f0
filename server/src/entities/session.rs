//! Session entity - Sessione di mentoring richiesta da un mentee a un mentor

use super::enums::{SessionActor, SessionStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Session {
    pub session_id: i64,
    pub mentor_id: i64,
    pub mentee_id: i64,
    // letti in join da profiles/users
    pub mentor_username: String,
    pub mentee_username: String,
    pub topic: String,
    pub scheduled_at: DateTime<Utc>,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Ruolo del profilo nella sessione, None se non partecipa
    pub fn actor_for(&self, profile_id: i64) -> Option<SessionActor> {
        if profile_id == self.mentor_id {
            Some(SessionActor::Mentor)
        } else if profile_id == self.mentee_id {
            Some(SessionActor::Mentee)
        } else {
            None
        }
    }

    /// L'altro partecipante rispetto a `profile_id`
    pub fn counterpart_of(&self, profile_id: i64) -> i64 {
        if profile_id == self.mentor_id {
            self.mentee_id
        } else {
            self.mentor_id
        }
    }
}
