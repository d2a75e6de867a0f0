//! Admin services - Liste amministrative riservate allo staff
//!
//! Ogni lista accetta un filtro opzionale tramite `AdminFilterQuery`.

use crate::core::{AppError, AppState};
use crate::dtos::{AdminFilterQuery, MessageDTO, ProfileDTO, ReviewDTO, SessionDTO};
use crate::entities::{ProfileRole, SessionStatus};
use axum::extract::{Json, Query, State};
use axum_macros::debug_handler;
use std::sync::Arc;

#[debug_handler]
pub async fn admin_list_profiles(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AdminFilterQuery>,
) -> Result<Json<Vec<ProfileDTO>>, AppError> {
    let role = match query.role.as_deref() {
        Some(value) => Some(
            ProfileRole::parse(value).ok_or_else(|| AppError::bad_request("Unknown role"))?,
        ),
        None => None,
    };
    let profiles = state.profile.find_many(role).await?;
    Ok(Json(profiles.into_iter().map(ProfileDTO::from).collect()))
}

#[debug_handler]
pub async fn admin_list_sessions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AdminFilterQuery>,
) -> Result<Json<Vec<SessionDTO>>, AppError> {
    let status = match query.status.as_deref() {
        Some(value) => Some(
            SessionStatus::parse(value)
                .ok_or_else(|| AppError::bad_request("Unknown session status"))?,
        ),
        None => None,
    };
    let sessions = state.session.find_many(status).await?;
    Ok(Json(sessions.into_iter().map(SessionDTO::from).collect()))
}

pub async fn admin_list_reviews(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AdminFilterQuery>,
) -> Result<Json<Vec<ReviewDTO>>, AppError> {
    let reviews = state.review.find_many(query.rating).await?;
    Ok(Json(reviews.into_iter().map(ReviewDTO::from).collect()))
}

pub async fn admin_list_messages(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AdminFilterQuery>,
) -> Result<Json<Vec<MessageDTO>>, AppError> {
    let messages = state.msg.find_many(query.is_read).await?;
    Ok(Json(messages.into_iter().map(MessageDTO::from).collect()))
}
