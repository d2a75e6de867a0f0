//! Review services - Recensione di una sessione completata

use crate::core::{AppError, AppState};
use crate::dtos::{CreateReviewDTO, ReviewDTO};
use crate::entities::{Profile, SessionActor, SessionStatus};
use crate::repositories::{Create, Read};
use crate::services::notification::notify;
use axum::{
    Extension,
    extract::{Json, Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use validator::Validate;

#[instrument(skip(state, profile, body), fields(profile_id = profile.profile_id))]
pub async fn leave_review(
    State(state): State<Arc<AppState>>,
    Extension(profile): Extension<Profile>,
    Path(session_id): Path<i64>,
    Json(mut body): Json<CreateReviewDTO>,
) -> Result<(StatusCode, Json<ReviewDTO>), AppError> {
    let session = state
        .session
        .read(&session_id)
        .await?
        .ok_or_else(|| AppError::not_found("Session not found"))?;

    if session.actor_for(profile.profile_id) != Some(SessionActor::Mentee) {
        warn!("Only the mentee can review a session");
        return Err(AppError::forbidden("Only the session's mentee can leave a review"));
    }

    if session.status != SessionStatus::Completed {
        return Err(AppError::bad_request("Only completed sessions can be reviewed"));
    }

    body.validate()?;

    if state.review.find_by_session_id(&session_id).await?.is_some() {
        return Err(AppError::conflict("This session has already been reviewed"));
    }

    body.session_id = session_id;
    body.comment = body.comment.trim().to_string();
    let review = state.review.create(&body).await?;

    notify(
        &state,
        session.mentor_id,
        "New review",
        format!(
            "{} rated \"{}\" {}/5",
            profile.username, session.topic, review.rating
        ),
        format!("/mentors/{}", session.mentor_id),
    )
    .await;

    info!(review_id = review.review_id, "Review created");
    Ok((StatusCode::CREATED, Json(ReviewDTO::from(review))))
}
