//! Query DTOs - Data Transfer Objects per query string

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// GET /mentors?skill=python&search=al
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct MentorSearchQuery {
    pub skill: Option<String>,
    pub search: Option<String>,
}

/// DTO per query parameters di paginazione per data
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct BeforeDateQuery {
    #[serde(default)]
    pub before_date: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct SessionFilterQuery {
    pub status: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct NotificationQuery {
    #[serde(default)]
    pub unread_only: bool,
}

/// Filtri delle liste amministrative
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct AdminFilterQuery {
    pub role: Option<String>,
    pub status: Option<String>,
    pub rating: Option<i64>,
    pub is_read: Option<bool>,
}
