//! WebSocket Module - Gestione WebSocket per comunicazione real-time
//!
//! Questo modulo gestisce le connessioni WebSocket per la consegna in tempo reale
//! di messaggi diretti e notifiche. Include:
//! - Gestione upgrade HTTP -> WebSocket
//! - Gestione connessioni (split sender/receiver)
//! - Handler per i frame inviati dal client

pub mod connection;
pub mod event_handlers;
pub mod usermap;

// Re-exports pubblici
pub use connection::handle_socket;
pub use usermap::{InternalSignal, UserMap};

use crate::{AppState, entities::Profile};
use axum::{
    Extension,
    extract::{State, ws::WebSocketUpgrade},
    response::Response,
};
use std::sync::Arc;

/// Chiusura della connessione dopo questo periodo senza frame dal client
pub const TIMEOUT_DURATION_SECONDS: u64 = 300;
/// Intervallo minimo tra due frame elaborati dallo stesso client
pub const RATE_LIMITER_MILLIS: u64 = 10;

/// Entry point per gestire richieste di upgrade WebSocket
/// Operazioni:
/// 1. Estrarre il profilo dall'autenticazione JWT
/// 2. Eseguire upgrade HTTP -> WebSocket
/// 3. Passare la connessione ad handle_socket
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Extension(current_profile): Extension<Profile>, // ottenuto dall'autenticazione JWT
) -> Response {
    ws
        // Possibile limitazione dei buffer, default 128 KB
        //.read_buffer_size(4*1024)
        //.write_buffer_size(16*1024)
        .on_upgrade(move |socket| handle_socket(socket, state, current_profile))
}
