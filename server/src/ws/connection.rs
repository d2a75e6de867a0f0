//! WebSocket Connection Management - Gestione connessioni WebSocket

use crate::ws::{RATE_LIMITER_MILLIS, TIMEOUT_DURATION_SECONDS};
use crate::{
    AppState,
    dtos::{WsEventDTO, WsOutgoingMessageDTO},
    entities::Profile,
    ws::{event_handlers::process_message, usermap::InternalSignal},
};
use axum::extract::ws::Utf8Bytes;
use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::time::Duration;
use tokio::time::{interval, timeout};
use tracing::{debug, error, info, instrument, warn};

#[instrument(skip(ws, state, profile), fields(profile_id = profile.profile_id))]
pub async fn handle_socket(ws: WebSocket, state: Arc<AppState>, profile: Profile) {
    info!("WebSocket connection established");

    // Dividiamo il WebSocket in due metà: sender e receiver
    let (ws_tx, ws_rx) = ws.split();

    // Canale interno: gli handler REST e il listener scrivono, il task di scrittura legge
    let (int_tx, int_rx) = unbounded_channel::<InternalSignal>();

    state
        .users_online
        .register_online(profile.profile_id, int_tx.clone());

    tokio::spawn(listen_ws(profile.clone(), ws_rx, int_tx, state.clone()));
    tokio::spawn(write_ws(profile.profile_id, ws_tx, int_rx));
}

#[instrument(skip(websocket_tx, internal_rx))]
pub async fn write_ws(
    profile_id: i64,
    mut websocket_tx: SplitSink<WebSocket, Message>,
    mut internal_rx: UnboundedReceiver<InternalSignal>,
) {
    info!("Write task started");

    while let Some(signal) = internal_rx.recv().await {
        match signal {
            InternalSignal::Shutdown => {
                info!("Shutdown signal received");
                break;
            }
            InternalSignal::Event(event) => {
                if send_event(&mut websocket_tx, &event).await.is_err() {
                    warn!("Failed to send event, closing connection");
                    break;
                }
            }
        }
    }

    let _ = websocket_tx.send(Message::Close(None)).await;
    info!("Write task terminated");
}

async fn send_event(
    websocket_tx: &mut SplitSink<WebSocket, Message>,
    event: &WsEventDTO,
) -> Result<(), axum::Error> {
    let json = serde_json::to_string(event).map_err(|e| {
        error!("Failed to serialize event: {:?}", e);
        axum::Error::new(e)
    })?;
    websocket_tx.send(Message::Text(Utf8Bytes::from(json))).await
}

#[instrument(skip(profile, websocket_rx, internal_tx, state), fields(profile_id = profile.profile_id))]
pub async fn listen_ws(
    profile: Profile,
    mut websocket_rx: SplitStream<WebSocket>,
    internal_tx: UnboundedSender<InternalSignal>,
    state: Arc<AppState>,
) {
    info!("Listen task started");

    let mut rate_limiter = interval(Duration::from_millis(RATE_LIMITER_MILLIS));
    let timeout_duration = Duration::from_secs(TIMEOUT_DURATION_SECONDS);

    loop {
        match timeout(timeout_duration, StreamExt::next(&mut websocket_rx)).await {
            Ok(Some(msg_result)) => {
                rate_limiter.tick().await;

                let msg = match msg_result {
                    Ok(m) => m,
                    Err(e) => {
                        warn!("WebSocket error: {:?}", e);
                        break;
                    }
                };

                match msg {
                    Message::Text(text) => {
                        match serde_json::from_str::<WsOutgoingMessageDTO>(&text) {
                            Ok(frame) => {
                                debug!("Message received from client");
                                process_message(&state, &profile, &internal_tx, frame).await;
                            }
                            Err(e) => {
                                warn!("Failed to deserialize message: {}", e);
                                let _ = internal_tx.send(InternalSignal::Event(WsEventDTO::Error {
                                    code: 400,
                                    message: "Invalid message format".to_string(),
                                }));
                            }
                        }
                    }
                    Message::Close(_) => {
                        info!("Close message received");
                        break;
                    }
                    _ => {}
                }
            }
            Ok(None) => {
                info!("WebSocket stream ended");
                break;
            }
            Err(_) => {
                warn!(
                    timeout_secs = TIMEOUT_DURATION_SECONDS,
                    "Connection timeout"
                );
                break;
            }
        }
    }

    // Cleanup
    info!("Cleaning up connection");
    let _ = internal_tx.send(InternalSignal::Shutdown);
    state
        .users_online
        .remove_from_online(&profile.profile_id, &internal_tx);
    info!("Listen task terminated");
}
