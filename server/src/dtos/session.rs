//! Session DTOs - Data Transfer Objects per le sessioni di mentoring

use crate::dtos::ReviewDTO;
use crate::entities::{Session, SessionStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SessionDTO {
    pub session_id: i64,
    pub mentor_id: i64,
    pub mentor_username: String,
    pub mentee_id: i64,
    pub mentee_username: String,
    pub topic: String,
    pub scheduled_at: DateTime<Utc>,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Session> for SessionDTO {
    fn from(value: Session) -> Self {
        Self {
            session_id: value.session_id,
            mentor_id: value.mentor_id,
            mentor_username: value.mentor_username,
            mentee_id: value.mentee_id,
            mentee_username: value.mentee_username,
            topic: value.topic,
            scheduled_at: value.scheduled_at,
            status: value.status,
            created_at: value.created_at,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SessionDetailDTO {
    #[serde(flatten)]
    pub session: SessionDTO,
    pub review: Option<ReviewDTO>,
}

/// Body di POST /mentors/{id}/sessions
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct SessionRequestDTO {
    #[validate(length(min = 1, max = 200, message = "Topic must be between 1 and 200 characters"))]
    pub topic: String,
    pub scheduled_at: DateTime<Utc>,
}

/// DTO per creare una nuova sessione (senza session_id)
#[derive(Debug, Clone)]
pub struct CreateSessionDTO {
    pub mentor_id: i64,
    pub mentee_id: i64,
    pub topic: String,
    pub scheduled_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
