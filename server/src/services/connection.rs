//! Connection services - Richieste di collegamento tra profili

use crate::core::{AppError, AppState};
use crate::dtos::{
    ConnectionDTO, CreateConnectionDTO, EnrichedConnectionDTO, ProfileSummaryDTO,
    UpdateConnectionDTO,
};
use crate::entities::{Connection, ConnectionStatus, Profile};
use crate::repositories::{Create, Delete, Read, Update};
use crate::services::notification::notify;
use axum::{
    Extension,
    extract::{Json, Path, State},
    http::StatusCode,
};
use futures_util::future::try_join_all;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Azioni possibili sul path /connections/{id}/{action}
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConnectionAction {
    Accept,
    Decline,
}

impl ConnectionAction {
    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "accept" => Some(Self::Accept),
            "decline" => Some(Self::Decline),
            _ => None,
        }
    }

    fn target_status(&self) -> ConnectionStatus {
        match self {
            Self::Accept => ConnectionStatus::Accepted,
            Self::Decline => ConnectionStatus::Declined,
        }
    }
}

/// Aggiunge il profilo dell'altra parte a ogni collegamento
async fn enrich(
    state: &AppState,
    viewer_id: i64,
    connections: Vec<Connection>,
) -> Result<Vec<EnrichedConnectionDTO>, AppError> {
    let others = try_join_all(connections.iter().map(|c| {
        let other_id = c.other_party(viewer_id);
        async move { state.profile.read(&other_id).await }
    }))
    .await?;

    Ok(connections
        .into_iter()
        .zip(others)
        .map(|(connection, other)| EnrichedConnectionDTO {
            connection: ConnectionDTO::from(connection),
            other: other.map(ProfileSummaryDTO::from),
        })
        .collect())
}

#[instrument(skip(state, profile), fields(profile_id = profile.profile_id))]
pub async fn request_connection(
    State(state): State<Arc<AppState>>,
    Extension(profile): Extension<Profile>,
    Path(target_id): Path<i64>,
) -> Result<(StatusCode, Json<ConnectionDTO>), AppError> {
    // 1. Non ci si collega a se stessi (BAD_REQUEST)
    // 2. Il profilo destinatario deve esistere (NOT_FOUND)
    // 3. Un collegamento PENDING o ACCEPTED in qualunque direzione blocca la richiesta (CONFLICT)
    // 4. Un collegamento DECLINED viene sostituito dalla nuova richiesta
    if target_id == profile.profile_id {
        return Err(AppError::bad_request("You cannot connect with yourself"));
    }

    if state.profile.read(&target_id).await?.is_none() {
        return Err(AppError::not_found("Profile not found"));
    }

    if let Some(existing) = state
        .connection
        .find_between(&profile.profile_id, &target_id)
        .await?
    {
        match existing.status {
            ConnectionStatus::Pending | ConnectionStatus::Accepted => {
                warn!(connection_id = existing.connection_id, "Connection already exists");
                return Err(AppError::conflict("A connection already exists"));
            }
            ConnectionStatus::Declined => {
                debug!(connection_id = existing.connection_id, "Replacing declined connection");
            }
        }
    }

    // la create rimuove il DECLINED e inserisce nella stessa transazione; una richiesta
    // incrociata arrivata nel frattempo viola l'indice sulla coppia
    let connection = state
        .connection
        .create(&CreateConnectionDTO {
            requester_id: profile.profile_id,
            addressee_id: target_id,
        })
        .await
        .map_err(|err| match err {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                warn!("Concurrent connection request for the same pair");
                AppError::conflict("A connection already exists")
            }
            other => AppError::from(other),
        })?;

    notify(
        &state,
        target_id,
        "New connection request",
        format!("{} wants to connect with you", profile.username),
        "/connections/pending",
    )
    .await;

    info!(connection_id = connection.connection_id, "Connection requested");
    Ok((StatusCode::CREATED, Json(ConnectionDTO::from(connection))))
}

#[instrument(skip(state, profile), fields(profile_id = profile.profile_id))]
pub async fn list_connections(
    State(state): State<Arc<AppState>>,
    Extension(profile): Extension<Profile>,
) -> Result<Json<Vec<EnrichedConnectionDTO>>, AppError> {
    let connections = state
        .connection
        .find_accepted_by_profile(&profile.profile_id)
        .await?;
    Ok(Json(enrich(&state, profile.profile_id, connections).await?))
}

#[instrument(skip(state, profile), fields(profile_id = profile.profile_id))]
pub async fn list_pending_connections(
    State(state): State<Arc<AppState>>,
    Extension(profile): Extension<Profile>,
) -> Result<Json<Vec<EnrichedConnectionDTO>>, AppError> {
    let pending = state
        .connection
        .find_pending_for(&profile.profile_id)
        .await?;
    Ok(Json(enrich(&state, profile.profile_id, pending).await?))
}

#[instrument(skip(state, profile), fields(profile_id = profile.profile_id))]
pub async fn respond_to_connection(
    State(state): State<Arc<AppState>>,
    Extension(profile): Extension<Profile>,
    Path((connection_id, action)): Path<(i64, String)>,
) -> Result<Json<ConnectionDTO>, AppError> {
    let action = ConnectionAction::parse(&action).ok_or_else(|| {
        AppError::bad_request("Unknown action").with_details("action must be accept or decline")
    })?;

    let connection = state
        .connection
        .read(&connection_id)
        .await?
        .ok_or_else(|| AppError::not_found("Connection not found"))?;

    if connection.addressee_id != profile.profile_id {
        return Err(AppError::forbidden("Only the addressee can respond to this request"));
    }

    if connection.status != ConnectionStatus::Pending {
        return Err(AppError::conflict("This request has already been answered"));
    }

    // l'update tocca solo righe ancora PENDING
    let updated = state
        .connection
        .update(
            &connection_id,
            &UpdateConnectionDTO {
                status: Some(action.target_status()),
            },
        )
        .await
        .map_err(|err| match err {
            sqlx::Error::RowNotFound => {
                AppError::conflict("This request has already been answered")
            }
            other => AppError::from(other),
        })?;

    let verb = match action {
        ConnectionAction::Accept => "accepted",
        ConnectionAction::Decline => "declined",
    };
    notify(
        &state,
        updated.requester_id,
        "Connection request answered",
        format!("{} {} your connection request", profile.username, verb),
        format!("/profiles/{}", profile.profile_id),
    )
    .await;

    info!(status = ?updated.status, "Connection request answered");
    Ok(Json(ConnectionDTO::from(updated)))
}

#[instrument(skip(state, profile), fields(profile_id = profile.profile_id))]
pub async fn delete_connection(
    State(state): State<Arc<AppState>>,
    Extension(profile): Extension<Profile>,
    Path(connection_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let connection = state
        .connection
        .read(&connection_id)
        .await?
        .ok_or_else(|| AppError::not_found("Connection not found"))?;

    if !connection.involves(profile.profile_id) {
        return Err(AppError::forbidden("You are not part of this connection"));
    }

    state.connection.delete(&connection_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
