//! Message services - Messaggi diretti tra profili

use crate::core::{AppError, AppState};
use crate::dtos::{
    BeforeDateQuery, CountDTO, CreateMessageDTO, MessageDTO, SendMessageDTO, WsEventDTO,
};
use crate::entities::Profile;
use crate::repositories::{Create, Read};
use crate::services::notification::notify;
use crate::ws::InternalSignal;
use axum::{
    Extension,
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

/// Dimensione di pagina per conversazioni, inbox e inviati
pub const MESSAGE_PAGE_SIZE: i64 = 50;

/// Anteprima del contenuto usata nel testo della notifica
fn preview(content: &str) -> String {
    const MAX_PREVIEW: usize = 80;
    if content.chars().count() <= MAX_PREVIEW {
        content.to_string()
    } else {
        let truncated: String = content.chars().take(MAX_PREVIEW).collect();
        format!("{}...", truncated)
    }
}

/// Percorso unico di invio, usato sia dall'endpoint REST sia dal listener WebSocket
/// Operazioni:
/// 1. Rifiutare i messaggi a se stessi (BAD_REQUEST)
/// 2. Verificare che il destinatario esista (NOT_FOUND)
/// 3. Validare il contenuto e salvare il messaggio
/// 4. Inoltrare l'evento Message al destinatario se online
/// 5. Creare la notifica per il destinatario
#[instrument(skip(state, sender, content), fields(sender_id = sender.profile_id))]
pub async fn deliver_message(
    state: &AppState,
    sender: &Profile,
    recipient_id: i64,
    content: String,
) -> Result<MessageDTO, AppError> {
    if recipient_id == sender.profile_id {
        warn!("Attempt to message self");
        return Err(AppError::bad_request("You cannot message yourself"));
    }

    if state.profile.read(&recipient_id).await?.is_none() {
        return Err(AppError::not_found("Recipient not found"));
    }

    let data = CreateMessageDTO {
        sender_id: sender.profile_id,
        recipient_id,
        content,
        sent_at: Utc::now(),
    };
    data.validate()?;

    let message = MessageDTO::from(state.msg.create(&data).await?);

    state.users_online.send_server_message_if_online(
        &recipient_id,
        InternalSignal::Event(WsEventDTO::Message(message.clone())),
    );

    notify(
        state,
        recipient_id,
        "New message",
        format!("{}: {}", sender.username, preview(&message.content)),
        format!("/messages/conversations/{}", sender.profile_id),
    )
    .await;

    info!(message_id = message.message_id, "Message sent");
    Ok(message)
}

#[instrument(skip(state, profile, body), fields(profile_id = profile.profile_id))]
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Extension(profile): Extension<Profile>,
    Path(recipient_id): Path<i64>,
    Json(body): Json<SendMessageDTO>,
) -> Result<(StatusCode, Json<MessageDTO>), AppError> {
    body.validate()?;
    let message = deliver_message(&state, &profile, recipient_id, body.content).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// Conversazione con un altro profilo; i messaggi ricevuti nella pagina vengono segnati come letti
#[instrument(skip(state, profile), fields(profile_id = profile.profile_id))]
pub async fn get_conversation(
    State(state): State<Arc<AppState>>,
    Extension(profile): Extension<Profile>,
    Path(other_id): Path<i64>,
    Query(query): Query<BeforeDateQuery>,
) -> Result<Json<Vec<MessageDTO>>, AppError> {
    if state.profile.read(&other_id).await?.is_none() {
        return Err(AppError::not_found("Profile not found"));
    }

    let messages = state
        .msg
        .find_conversation(
            &profile.profile_id,
            &other_id,
            query.before_date.as_ref(),
            MESSAGE_PAGE_SIZE,
        )
        .await?;

    // solo i messaggi della pagina restituita
    let page_ids: Vec<i64> = messages.iter().map(|m| m.message_id).collect();
    let marked = state
        .msg
        .mark_many_read(&profile.profile_id, &page_ids)
        .await?;
    debug!(marked, "Conversation marked as read");

    Ok(Json(messages.into_iter().map(MessageDTO::from).collect()))
}

#[instrument(skip(state, profile), fields(profile_id = profile.profile_id))]
pub async fn list_inbox(
    State(state): State<Arc<AppState>>,
    Extension(profile): Extension<Profile>,
    Query(query): Query<BeforeDateQuery>,
) -> Result<Json<Vec<MessageDTO>>, AppError> {
    let messages = state
        .msg
        .find_inbox(&profile.profile_id, query.before_date.as_ref(), MESSAGE_PAGE_SIZE)
        .await?;
    Ok(Json(messages.into_iter().map(MessageDTO::from).collect()))
}

#[instrument(skip(state, profile), fields(profile_id = profile.profile_id))]
pub async fn list_sent(
    State(state): State<Arc<AppState>>,
    Extension(profile): Extension<Profile>,
    Query(query): Query<BeforeDateQuery>,
) -> Result<Json<Vec<MessageDTO>>, AppError> {
    let messages = state
        .msg
        .find_sent(&profile.profile_id, query.before_date.as_ref(), MESSAGE_PAGE_SIZE)
        .await?;
    Ok(Json(messages.into_iter().map(MessageDTO::from).collect()))
}

/// Solo il destinatario può segnare un messaggio come letto; per gli altri non esiste
#[instrument(skip(state, profile), fields(profile_id = profile.profile_id))]
pub async fn mark_message_read(
    State(state): State<Arc<AppState>>,
    Extension(profile): Extension<Profile>,
    Path(message_id): Path<i64>,
) -> Result<Json<MessageDTO>, AppError> {
    let mut message = state
        .msg
        .read(&message_id)
        .await?
        .filter(|m| m.recipient_id == profile.profile_id)
        .ok_or_else(|| AppError::not_found("Message not found"))?;

    if !message.is_read {
        state.msg.mark_read(&message_id).await?;
        message.is_read = true;
    }
    Ok(Json(MessageDTO::from(message)))
}

pub async fn unread_messages_count(
    State(state): State<Arc<AppState>>,
    Extension(profile): Extension<Profile>,
) -> Result<Json<CountDTO>, AppError> {
    let count = state.msg.count_unread(&profile.profile_id).await?;
    Ok(Json(CountDTO { count }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates_long_content() {
        assert_eq!(preview("short"), "short");
        let long = "x".repeat(200);
        let p = preview(&long);
        assert!(p.ends_with("..."));
        assert_eq!(p.chars().count(), 83);
    }
}
