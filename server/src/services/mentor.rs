//! Mentor services - Ricerca mentor, dettaglio e disponibilità settimanali

use crate::core::{AppError, AppState, require_role};
use crate::dtos::{
    AvailabilityDTO, CreateAvailabilityDTO, MentorDetailDTO, MentorSearchQuery, MentorSummaryDTO,
    ReviewDTO,
};
use crate::entities::{Profile, ProfileRole};
use crate::repositories::{Delete, Read};
use axum::{
    Extension,
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

/// Numero massimo di recensioni mostrate nel dettaglio di un mentor
const LATEST_REVIEWS: i64 = 20;

#[instrument(skip(state))]
pub async fn list_mentors(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MentorSearchQuery>,
) -> Result<Json<Vec<MentorSummaryDTO>>, AppError> {
    let skill = query.skill.as_deref().filter(|s| !s.trim().is_empty());
    let search = query.search.as_deref().filter(|s| !s.trim().is_empty());

    let mentors = state.profile.find_mentors(skill, search).await?;
    debug!(count = mentors.len(), "Mentors found");
    Ok(Json(mentors.into_iter().map(MentorSummaryDTO::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_mentor_detail(
    State(state): State<Arc<AppState>>,
    Path(profile_id): Path<i64>,
) -> Result<Json<MentorDetailDTO>, AppError> {
    let summary = state
        .profile
        .find_mentor_summary(&profile_id)
        .await?
        .ok_or_else(|| AppError::not_found("Mentor not found"))?;

    let availability = state.availability.find_many_by_mentor(&profile_id).await?;
    let reviews = state
        .review
        .find_many_by_mentor(&profile_id, LATEST_REVIEWS)
        .await?;

    Ok(Json(MentorDetailDTO {
        mentor: MentorSummaryDTO::from(summary),
        availability: availability.into_iter().map(AvailabilityDTO::from).collect(),
        reviews: reviews.into_iter().map(ReviewDTO::from).collect(),
    }))
}

#[instrument(skip(state))]
pub async fn list_availability(
    State(state): State<Arc<AppState>>,
    Path(profile_id): Path<i64>,
) -> Result<Json<Vec<AvailabilityDTO>>, AppError> {
    let mentor = state.profile.read(&profile_id).await?;
    if !mentor.is_some_and(|p| p.is_mentor()) {
        return Err(AppError::not_found("Mentor not found"));
    }

    let slots = state.availability.find_many_by_mentor(&profile_id).await?;
    Ok(Json(slots.into_iter().map(AvailabilityDTO::from).collect()))
}

#[instrument(skip(state, profile, body), fields(profile_id = profile.profile_id))]
pub async fn create_availability(
    State(state): State<Arc<AppState>>,
    Extension(profile): Extension<Profile>,
    Json(mut body): Json<CreateAvailabilityDTO>,
) -> Result<(StatusCode, Json<AvailabilityDTO>), AppError> {
    // 1. Solo i mentor pubblicano disponibilità (FORBIDDEN)
    // 2. Validare giorno e intervallo: start_time < end_time (BAD_REQUEST)
    // 3. Rifiutare sovrapposizioni con fasce esistenti dello stesso giorno (CONFLICT)
    require_role(&profile, &[ProfileRole::Mentor])?;
    body.validate()?;

    if body.start_time >= body.end_time {
        return Err(AppError::bad_request("Start time must be before end time"));
    }

    body.mentor_id = profile.profile_id;
    let slot = state
        .availability
        .create_if_free(&body)
        .await?
        .ok_or_else(|| {
            warn!("Overlapping availability slot");
            AppError::conflict("Overlapping availability slot")
        })?;
    info!(availability_id = slot.availability_id, "Availability created");
    Ok((StatusCode::CREATED, Json(AvailabilityDTO::from(slot))))
}

#[instrument(skip(state, profile), fields(profile_id = profile.profile_id))]
pub async fn delete_availability(
    State(state): State<Arc<AppState>>,
    Extension(profile): Extension<Profile>,
    Path(availability_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let slot = state
        .availability
        .read(&availability_id)
        .await?
        .ok_or_else(|| AppError::not_found("Availability not found"))?;

    if slot.mentor_id != profile.profile_id {
        return Err(AppError::forbidden("You can only remove your own availability"));
    }

    state.availability.delete(&availability_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
