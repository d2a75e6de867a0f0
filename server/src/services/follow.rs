//! Follow services - Seguire e smettere di seguire un profilo

use crate::core::{AppError, AppState};
use crate::dtos::ProfileSummaryDTO;
use crate::entities::Profile;
use crate::repositories::{Create, Delete, Read};
use crate::services::notification::notify;
use axum::{
    Extension,
    extract::{Json, Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{info, instrument};

async fn ensure_profile_exists(state: &AppState, profile_id: i64) -> Result<(), AppError> {
    match state.profile.read(&profile_id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::not_found("Profile not found")),
    }
}

#[instrument(skip(state, profile), fields(profile_id = profile.profile_id))]
pub async fn follow_profile(
    State(state): State<Arc<AppState>>,
    Extension(profile): Extension<Profile>,
    Path(target_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if target_id == profile.profile_id {
        return Err(AppError::bad_request("You cannot follow yourself"));
    }
    ensure_profile_exists(&state, target_id).await?;

    if state
        .follow
        .read(&(profile.profile_id, target_id))
        .await?
        .is_some()
    {
        return Err(AppError::conflict("You already follow this profile"));
    }

    state.follow.create(&(profile.profile_id, target_id)).await?;

    notify(
        &state,
        target_id,
        "New follower",
        format!("{} started following you", profile.username),
        format!("/profiles/{}", profile.profile_id),
    )
    .await;

    info!(target_id, "Profile followed");
    Ok(StatusCode::CREATED)
}

#[instrument(skip(state, profile), fields(profile_id = profile.profile_id))]
pub async fn unfollow_profile(
    State(state): State<Arc<AppState>>,
    Extension(profile): Extension<Profile>,
    Path(target_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if !state.follow.delete(&(profile.profile_id, target_id)).await? {
        return Err(AppError::not_found("You do not follow this profile"));
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_followers(
    State(state): State<Arc<AppState>>,
    Path(profile_id): Path<i64>,
) -> Result<Json<Vec<ProfileSummaryDTO>>, AppError> {
    ensure_profile_exists(&state, profile_id).await?;
    Ok(Json(state.follow.find_followers(&profile_id).await?))
}

pub async fn list_following(
    State(state): State<Arc<AppState>>,
    Path(profile_id): Path<i64>,
) -> Result<Json<Vec<ProfileSummaryDTO>>, AppError> {
    ensure_profile_exists(&state, profile_id).await?;
    Ok(Json(state.follow.find_following(&profile_id).await?))
}
