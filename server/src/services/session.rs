//! Session services - Richiesta, consultazione e ciclo di vita delle sessioni

use crate::core::{AppError, AppState, require_role};
use crate::dtos::{
    CreateSessionDTO, ReviewDTO, SessionDTO, SessionDetailDTO, SessionFilterQuery,
    SessionRequestDTO,
};
use crate::entities::{Profile, ProfileRole, SessionStatus, TransitionCheck};
use crate::repositories::{Create, Read};
use crate::services::notification::notify;
use axum::{
    Extension,
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

fn parse_status(value: &str) -> Result<SessionStatus, AppError> {
    SessionStatus::parse(value).ok_or_else(|| {
        AppError::bad_request("Unknown session status")
            .with_details("status must be one of PENDING, CONFIRMED, COMPLETED, CANCELLED")
    })
}

#[instrument(skip(state, profile, body), fields(profile_id = profile.profile_id))]
pub async fn request_session(
    State(state): State<Arc<AppState>>,
    Extension(profile): Extension<Profile>,
    Path(mentor_id): Path<i64>,
    Json(body): Json<SessionRequestDTO>,
) -> Result<(StatusCode, Json<SessionDTO>), AppError> {
    // 1. Solo i mentee possono chiedere una sessione (FORBIDDEN)
    // 2. Il profilo indicato deve essere un mentor (NOT_FOUND)
    // 3. Argomento valido e data nel futuro (BAD_REQUEST)
    // 4. Salvare la sessione come PENDING e notificare il mentor
    require_role(&profile, &[ProfileRole::Mentee])?;

    let mentor = state
        .profile
        .read(&mentor_id)
        .await?
        .filter(|p| p.is_mentor())
        .ok_or_else(|| AppError::not_found("Mentor not found"))?;

    body.validate()?;
    let now = Utc::now();
    if body.scheduled_at <= now {
        return Err(AppError::bad_request("Session must be scheduled in the future"));
    }

    let session = state
        .session
        .create(&CreateSessionDTO {
            mentor_id: mentor.profile_id,
            mentee_id: profile.profile_id,
            topic: body.topic.trim().to_string(),
            scheduled_at: body.scheduled_at,
            created_at: now,
        })
        .await?;

    notify(
        &state,
        mentor.profile_id,
        "New session request",
        format!("{} requested a session: {}", profile.username, session.topic),
        format!("/sessions/{}", session.session_id),
    )
    .await;

    info!(session_id = session.session_id, "Session requested");
    Ok((StatusCode::CREATED, Json(SessionDTO::from(session))))
}

#[instrument(skip(state, profile), fields(profile_id = profile.profile_id))]
pub async fn list_my_sessions(
    State(state): State<Arc<AppState>>,
    Extension(profile): Extension<Profile>,
    Query(query): Query<SessionFilterQuery>,
) -> Result<Json<Vec<SessionDTO>>, AppError> {
    let status = match query.status.as_deref().filter(|s| !s.is_empty()) {
        Some(value) => Some(parse_status(value)?),
        None => None,
    };

    let sessions = state
        .session
        .find_many_by_profile(&profile.profile_id, status)
        .await?;
    Ok(Json(sessions.into_iter().map(SessionDTO::from).collect()))
}

#[instrument(skip(state, profile), fields(profile_id = profile.profile_id))]
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Extension(profile): Extension<Profile>,
    Path(session_id): Path<i64>,
) -> Result<Json<SessionDetailDTO>, AppError> {
    let session = state
        .session
        .read(&session_id)
        .await?
        .ok_or_else(|| AppError::not_found("Session not found"))?;

    if session.actor_for(profile.profile_id).is_none() {
        return Err(AppError::forbidden("You are not a participant of this session"));
    }

    let review = state.review.find_by_session_id(&session_id).await?;
    Ok(Json(SessionDetailDTO {
        session: SessionDTO::from(session),
        review: review.map(ReviewDTO::from),
    }))
}

#[instrument(skip(state, profile), fields(profile_id = profile.profile_id))]
pub async fn update_session_status(
    State(state): State<Arc<AppState>>,
    Extension(profile): Extension<Profile>,
    Path((session_id, new_status)): Path<(i64, String)>,
) -> Result<Json<SessionDTO>, AppError> {
    // 1. Stato richiesto riconosciuto (BAD_REQUEST)
    // 2. Sessione esistente (NOT_FOUND) e profilo partecipante (FORBIDDEN)
    // 3. Transizione ammessa per questo partecipante (FORBIDDEN / CONFLICT)
    // 4. Aggiornare solo se lo stato non è cambiato (CONFLICT) e notificare l'altro partecipante
    let next = parse_status(&new_status)?;

    let session = state
        .session
        .read(&session_id)
        .await?
        .ok_or_else(|| AppError::not_found("Session not found"))?;

    let actor = session.actor_for(profile.profile_id).ok_or_else(|| {
        warn!("Non participant tried to change session status");
        AppError::forbidden("You are not a participant of this session")
    })?;

    match session.status.check_transition(next, actor) {
        TransitionCheck::Allowed => {}
        TransitionCheck::WrongActor => {
            return Err(AppError::forbidden("Only the mentor can perform this transition"));
        }
        TransitionCheck::Invalid => {
            debug!(from = ?session.status, to = ?next, "Invalid transition");
            return Err(AppError::conflict("Invalid status transition").with_details(format!(
                "cannot move a {} session to {}",
                session.status.as_str(),
                next.as_str()
            )));
        }
    }

    // l'update è condizionato allo stato letto: una richiesta concorrente che lo ha già
    // cambiato fa fallire questa con CONFLICT
    let updated = state
        .session
        .transition_status(&session_id, session.status, next)
        .await?
        .ok_or_else(|| {
            warn!(from = ?session.status, "Session status changed concurrently");
            AppError::conflict("Invalid status transition")
                .with_details("the session status changed in the meantime")
        })?;

    notify(
        &state,
        updated.counterpart_of(profile.profile_id),
        "Session updated",
        format!(
            "{} marked \"{}\" as {}",
            profile.username,
            updated.topic,
            next.as_str().to_lowercase()
        ),
        format!("/sessions/{}", updated.session_id),
    )
    .await;

    info!(status = next.as_str(), "Session status updated");
    Ok(Json(SessionDTO::from(updated)))
}
