//! Profile services - Dashboard, profilo personale e profili pubblici

use crate::core::{AppError, AppState};
use crate::dtos::{DashboardDTO, ProfileDTO, PublicProfileDTO, SessionDTO, UpdateProfileDTO};
use crate::entities::Profile;
use crate::entities::profile::normalize_skills;
use crate::repositories::{Read, Update};
use axum::{
    Extension,
    extract::{Json, Path, State},
};
use chrono::Utc;
use futures::future::try_join4;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

#[instrument(skip(state, profile), fields(profile_id = profile.profile_id))]
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    Extension(profile): Extension<Profile>,
) -> Result<Json<DashboardDTO>, AppError> {
    // 1. Sessioni PENDING/CONFIRMED programmate da adesso in poi
    // 2. Richieste PENDING: ricevute se mentor, inviate se mentee
    // 3. Contatori di messaggi e notifiche non letti
    debug!("Building dashboard");
    let now = Utc::now();
    let (upcoming, pending, unread_messages, unread_notifications) = try_join4(
        state
            .session
            .find_upcoming_by_profile(&profile.profile_id, &now),
        state
            .session
            .count_pending(&profile.profile_id, profile.is_mentor()),
        state.msg.count_unread(&profile.profile_id),
        state.notification.count_unread(&profile.profile_id),
    )
    .await?;

    Ok(Json(DashboardDTO {
        profile: ProfileDTO::from(profile),
        upcoming_sessions: upcoming.into_iter().map(SessionDTO::from).collect(),
        pending_session_requests: pending,
        unread_messages,
        unread_notifications,
    }))
}

pub async fn get_my_profile(Extension(profile): Extension<Profile>) -> Json<ProfileDTO> {
    Json(ProfileDTO::from(profile))
}

#[instrument(skip(state, profile, body), fields(profile_id = profile.profile_id))]
pub async fn update_my_profile(
    State(state): State<Arc<AppState>>,
    Extension(profile): Extension<Profile>,
    Json(mut body): Json<UpdateProfileDTO>,
) -> Result<Json<ProfileDTO>, AppError> {
    body.validate()?;

    if body.hourly_rate.is_some() && !profile.is_mentor() {
        warn!("Mentee tried to set an hourly rate");
        return Err(AppError::bad_request("Only mentors can set an hourly rate"));
    }

    body.skills = body.skills.as_deref().map(normalize_skills);

    let updated = state.profile.update(&profile.profile_id, &body).await?;
    info!("Profile updated");
    Ok(Json(ProfileDTO::from(updated)))
}

#[instrument(skip(state))]
pub async fn get_public_profile(
    State(state): State<Arc<AppState>>,
    Path(profile_id): Path<i64>,
) -> Result<Json<PublicProfileDTO>, AppError> {
    let profile = state
        .profile
        .read(&profile_id)
        .await?
        .ok_or_else(|| AppError::not_found("Profile not found"))?;

    let (followers_count, following_count) = state.follow.count_for(&profile_id).await?;

    let (avg_rating, review_count) = if profile.is_mentor() {
        match state.profile.find_mentor_summary(&profile_id).await? {
            Some(summary) => (
                summary.avg_rating.map(crate::dtos::profile::round_rating),
                Some(summary.review_count),
            ),
            None => (None, Some(0)),
        }
    } else {
        (None, None)
    };

    Ok(Json(PublicProfileDTO {
        profile: ProfileDTO::from(profile),
        followers_count,
        following_count,
        avg_rating,
        review_count,
    }))
}
