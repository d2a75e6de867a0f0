//! Profile DTOs - Profili, mentor e dashboard

use crate::dtos::{AvailabilityDTO, ReviewDTO, SessionDTO};
use crate::entities::{MentorSummary, Profile, ProfileRole};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ProfileDTO {
    pub profile_id: i64,
    pub user_id: i64,
    pub username: String,
    pub role: ProfileRole,
    pub bio: String,
    pub skills: Vec<String>,
    pub hourly_rate: Option<f64>,
}

impl From<Profile> for ProfileDTO {
    fn from(value: Profile) -> Self {
        let skills = value.skill_list();
        Self {
            profile_id: value.profile_id,
            user_id: value.user_id,
            username: value.username,
            role: value.role,
            bio: value.bio,
            skills,
            hourly_rate: value.hourly_rate,
        }
    }
}

/// Versione compatta usata nelle liste (follower, connessioni, ...)
#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct ProfileSummaryDTO {
    pub profile_id: i64,
    pub username: String,
    pub role: ProfileRole,
}

impl From<Profile> for ProfileSummaryDTO {
    fn from(value: Profile) -> Self {
        Self {
            profile_id: value.profile_id,
            username: value.username,
            role: value.role,
        }
    }
}

/// DTO per aggiornare il proprio profilo (solo campi modificabili)
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct UpdateProfileDTO {
    #[validate(length(max = 2000, message = "Bio must be at most 2000 characters"))]
    pub bio: Option<String>,

    #[validate(length(max = 255, message = "Skills must be at most 255 characters"))]
    pub skills: Option<String>,

    #[validate(range(min = 0.0, max = 9999.99, message = "Hourly rate must be between 0 and 9999.99"))]
    pub hourly_rate: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PublicProfileDTO {
    #[serde(flatten)]
    pub profile: ProfileDTO,
    pub followers_count: i64,
    pub following_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_count: Option<i64>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MentorSummaryDTO {
    #[serde(flatten)]
    pub profile: ProfileDTO,
    pub avg_rating: Option<f64>,
    pub review_count: i64,
}

impl From<MentorSummary> for MentorSummaryDTO {
    fn from(value: MentorSummary) -> Self {
        Self {
            profile: ProfileDTO::from(value.profile),
            avg_rating: value.avg_rating.map(round_rating),
            review_count: value.review_count,
        }
    }
}

/// Media arrotondata a due decimali
pub fn round_rating(avg: f64) -> f64 {
    (avg * 100.0).round() / 100.0
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MentorDetailDTO {
    #[serde(flatten)]
    pub mentor: MentorSummaryDTO,
    pub availability: Vec<AvailabilityDTO>,
    pub reviews: Vec<ReviewDTO>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DashboardDTO {
    pub profile: ProfileDTO,
    pub upcoming_sessions: Vec<SessionDTO>,
    pub pending_session_requests: i64,
    pub unread_messages: i64,
    pub unread_notifications: i64,
}

/// Una scelta di ruolo proposta in fase di registrazione
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RoleChoiceDTO {
    pub value: ProfileRole,
    pub label: String,
}

impl From<ProfileRole> for RoleChoiceDTO {
    fn from(value: ProfileRole) -> Self {
        Self {
            value,
            label: value.label().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_rating() {
        assert_eq!(round_rating(4.333333), 4.33);
        assert_eq!(round_rating(4.5), 4.5);
    }

    #[test]
    fn test_hourly_rate_range() {
        let dto = UpdateProfileDTO {
            bio: None,
            skills: None,
            hourly_rate: Some(10000.0),
        };
        assert!(dto.validate().is_err());
    }
}
