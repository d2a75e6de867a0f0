//! WebSocket Event Handlers - Handler per i frame inviati dal client

use crate::AppState;
use crate::dtos::{WsEventDTO, WsOutgoingMessageDTO};
use crate::entities::Profile;
use crate::services::message::deliver_message;
use crate::ws::usermap::InternalSignal;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, instrument, warn};

/// Handler per messaggi diretti inviati via WebSocket
/// Operazioni:
/// 1. Validare e salvare il messaggio (stesso percorso di POST /messages/conversations/{id})
/// 2. Il destinatario, se online, riceve l'evento dal servizio
/// 3. In caso di errore il mittente riceve un evento Error sul proprio canale
#[instrument(skip(state, sender, internal_tx, frame), fields(sender_id = sender.profile_id, recipient_id = frame.recipient_id))]
pub async fn process_message(
    state: &AppState,
    sender: &Profile,
    internal_tx: &UnboundedSender<InternalSignal>,
    frame: WsOutgoingMessageDTO,
) {
    match deliver_message(state, sender, frame.recipient_id, frame.content).await {
        Ok(message) => {
            info!(message_id = message.message_id, "Message delivered");
            // eco al mittente, utile per altre schede aperte
            let _ = internal_tx.send(InternalSignal::Event(WsEventDTO::Message(message)));
        }
        Err(err) => {
            warn!("Message rejected: {}", err.message());
            let _ = internal_tx.send(InternalSignal::Event(WsEventDTO::Error {
                code: err.status().as_u16(),
                message: err.message().to_string(),
            }));
        }
    }
}
