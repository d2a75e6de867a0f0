//! Review DTOs

use crate::entities::{Review, ReviewWithSession};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ReviewDTO {
    pub review_id: i64,
    pub session_id: i64,
    pub rating: i64,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_username: Option<String>,
}

impl From<Review> for ReviewDTO {
    fn from(value: Review) -> Self {
        Self {
            review_id: value.review_id,
            session_id: value.session_id,
            rating: value.rating,
            comment: value.comment,
            created_at: value.created_at,
            topic: None,
            reviewer_username: None,
        }
    }
}

impl From<ReviewWithSession> for ReviewDTO {
    fn from(value: ReviewWithSession) -> Self {
        Self {
            topic: Some(value.topic),
            reviewer_username: Some(value.reviewer_username),
            ..ReviewDTO::from(value.review)
        }
    }
}

/// Body di POST /sessions/{id}/review
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateReviewDTO {
    #[serde(default)]
    pub session_id: i64,

    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i64,

    #[serde(default)]
    #[validate(length(max = 2000, message = "Comment must be at most 2000 characters"))]
    pub comment: String,
}
