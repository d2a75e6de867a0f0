//! Notification services - Creazione e lettura delle notifiche in-app

use crate::core::{AppError, AppState};
use crate::dtos::{CountDTO, CreateNotificationDTO, NotificationDTO, NotificationQuery, ReadAllDTO, WsEventDTO};
use crate::entities::Profile;
use crate::repositories::Create;
use crate::ws::InternalSignal;
use axum::{
    Extension,
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{debug, error, instrument};

/// Salva una notifica e la inoltra via WebSocket se il destinatario è online
///
/// Gli errori vengono solo loggati: una notifica persa non deve far fallire l'operazione
/// che l'ha generata.
#[instrument(skip(state, message, link))]
pub async fn notify(
    state: &AppState,
    recipient_id: i64,
    title: &str,
    message: impl Into<String>,
    link: impl Into<String>,
) {
    let data = CreateNotificationDTO {
        recipient_id,
        title: title.to_string(),
        message: message.into(),
        link: link.into(),
    };

    match state.notification.create(&data).await {
        Ok(notification) => {
            debug!(notification_id = notification.notification_id, "Notification stored");
            state.users_online.send_server_message_if_online(
                &recipient_id,
                InternalSignal::Event(WsEventDTO::Notification(NotificationDTO::from(
                    notification,
                ))),
            );
        }
        Err(e) => error!("Failed to store notification: {:?}", e),
    }
}

#[instrument(skip(state, profile), fields(profile_id = profile.profile_id))]
pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    Extension(profile): Extension<Profile>,
    Query(query): Query<NotificationQuery>,
) -> Result<Json<Vec<NotificationDTO>>, AppError> {
    let notifications = state
        .notification
        .find_many_by_recipient(&profile.profile_id, query.unread_only)
        .await?;
    Ok(Json(
        notifications.into_iter().map(NotificationDTO::from).collect(),
    ))
}

/// Le notifiche di altri profili risultano inesistenti
#[instrument(skip(state, profile), fields(profile_id = profile.profile_id))]
pub async fn mark_notification_read(
    State(state): State<Arc<AppState>>,
    Extension(profile): Extension<Profile>,
    Path(notification_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if !state
        .notification
        .mark_read(&notification_id, &profile.profile_id)
        .await?
    {
        return Err(AppError::not_found("Notification not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, profile), fields(profile_id = profile.profile_id))]
pub async fn mark_all_notifications_read(
    State(state): State<Arc<AppState>>,
    Extension(profile): Extension<Profile>,
) -> Result<Json<ReadAllDTO>, AppError> {
    let updated = state.notification.mark_all_read(&profile.profile_id).await?;
    debug!(updated, "Notifications marked as read");
    Ok(Json(ReadAllDTO { updated }))
}

pub async fn unread_notifications_count(
    State(state): State<Arc<AppState>>,
    Extension(profile): Extension<Profile>,
) -> Result<Json<CountDTO>, AppError> {
    let count = state.notification.count_unread(&profile.profile_id).await?;
    Ok(Json(CountDTO { count }))
}
