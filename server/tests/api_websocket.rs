//! Integration tests per il WebSocket
//!
//! Test per:
//! - UserMap: una nuova connessione sostituisce la precedente
//! - process_message: eco al mittente, evento al destinatario, errori
//! - Connessione reale su /ws con due client tokio-tungstenite
//!
//! Questi test usano `#[sqlx::test]` che:
//! - Crea automaticamente un database di test isolato
//! - Applica le migrations da `migrations/`
//! - Applica i fixtures specificati da `fixtures/`

mod common;

#[cfg(test)]
mod ws_tests {
    use super::common::*;
    use futures_util::{SinkExt, StreamExt};
    use mentorhub_server::dtos::{WsEventDTO, WsOutgoingMessageDTO};
    use mentorhub_server::repositories::Read;
    use mentorhub_server::ws::{InternalSignal, UserMap, event_handlers::process_message};
    use serde_json::{Value, json};
    use sqlx::SqlitePool;
    use std::net::SocketAddr;
    use std::sync::Arc;
    use tokio::net::TcpStream;
    use tokio::sync::mpsc;
    use tokio::time::{Duration, sleep, timeout};
    use tokio_tungstenite::tungstenite::client::IntoClientRequest;
    use tokio_tungstenite::tungstenite::http::HeaderValue;
    use tokio_tungstenite::tungstenite::{self, Message};
    use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

    type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

    // ============================================================
    // Test per UserMap
    // ============================================================

    /// Lo stesso profilo che si riconnette: il vecchio canale riceve Shutdown
    #[tokio::test]
    async fn test_usermap_duplicate_connection_overwrites() {
        let user_map = UserMap::new();
        let profile_id = 1;

        let (tx1, mut rx1) = mpsc::unbounded_channel();
        user_map.register_online(profile_id, tx1);
        assert!(user_map.is_user_online(&profile_id));

        let (tx2, _rx2) = mpsc::unbounded_channel();
        user_map.register_online(profile_id, tx2);

        assert_eq!(user_map.online_count(), 1, "Profile must not be duplicated");
        assert!(matches!(rx1.try_recv(), Ok(InternalSignal::Shutdown)));
    }

    // ============================================================
    // Test per process_message
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_process_message_reaches_online_recipient(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool);
        let alice = state.profile.read(&ALICE.0).await?.unwrap();

        let (alice_tx, mut alice_rx) = mpsc::unbounded_channel::<InternalSignal>();
        let (bob_tx, mut bob_rx) = mpsc::unbounded_channel::<InternalSignal>();
        state.users_online.register_online(ALICE.0, alice_tx.clone());
        state.users_online.register_online(BOB.0, bob_tx);

        let frame = WsOutgoingMessageDTO {
            recipient_id: BOB.0,
            content: "See you Monday".to_string(),
        };
        process_message(&state, &alice, &alice_tx, frame).await;

        // bob: prima il messaggio, poi la notifica
        match bob_rx.try_recv() {
            Ok(InternalSignal::Event(WsEventDTO::Message(m))) => {
                assert_eq!(m.sender_id, ALICE.0);
                assert_eq!(m.content, "See you Monday");
            }
            _ => panic!("Bob should receive the message event"),
        }
        assert!(matches!(
            bob_rx.try_recv(),
            Ok(InternalSignal::Event(WsEventDTO::Notification(_)))
        ));

        // alice riceve l'eco
        assert!(matches!(
            alice_rx.try_recv(),
            Ok(InternalSignal::Event(WsEventDTO::Message(_)))
        ));

        // salvato su database come non letto
        assert_eq!(state.msg.count_unread(&BOB.0).await?, 1);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_process_message_errors_go_to_sender(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool);
        let alice = state.profile.read(&ALICE.0).await?.unwrap();
        let (alice_tx, mut alice_rx) = mpsc::unbounded_channel::<InternalSignal>();

        let cases = [
            (ALICE.0, "hi me", 400),
            (999, "anyone?", 404),
            (BOB.0, "", 400),
        ];
        for (recipient_id, content, expected) in cases {
            let frame = WsOutgoingMessageDTO {
                recipient_id,
                content: content.to_string(),
            };
            process_message(&state, &alice, &alice_tx, frame).await;

            match alice_rx.try_recv() {
                Ok(InternalSignal::Event(WsEventDTO::Error { code, .. })) => {
                    assert_eq!(code, expected)
                }
                _ => panic!("Sender should receive an Error event"),
            }
        }
        Ok(())
    }

    // ============================================================
    // Test end-to-end su /ws
    // ============================================================

    async fn spawn_server(pool: SqlitePool) -> (SocketAddr, Arc<mentorhub_server::AppState>) {
        let state = create_test_state(pool);
        let app = mentorhub_server::create_router(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("test server");
        });
        (addr, state)
    }

    async fn connect(addr: SocketAddr, user: (i64, &str)) -> Client {
        let mut request = format!("ws://{}/ws", addr)
            .into_client_request()
            .expect("valid ws url");
        request.headers_mut().insert(
            "Authorization",
            HeaderValue::from_str(&bearer(user)).expect("valid header"),
        );
        let (client, _) = connect_async(request).await.expect("ws handshake");
        client
    }

    async fn wait_online(state: &mentorhub_server::AppState, profile_id: i64) {
        for _ in 0..50 {
            if state.users_online.is_user_online(&profile_id) {
                return;
            }
            sleep(Duration::from_millis(20)).await;
        }
        panic!("Profile {} never came online", profile_id);
    }

    async fn next_event(client: &mut Client) -> Value {
        loop {
            let frame = timeout(Duration::from_secs(2), client.next())
                .await
                .expect("event within timeout")
                .expect("stream open")
                .expect("valid frame");
            if let Message::Text(text) = frame {
                return serde_json::from_str(&text).expect("json event");
            }
        }
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_ws_message_between_two_clients(pool: SqlitePool) -> sqlx::Result<()> {
        let (addr, state) = spawn_server(pool).await;

        let mut bob = connect(addr, BOB).await;
        let mut alice = connect(addr, ALICE).await;
        wait_online(&state, BOB.0).await;
        wait_online(&state, ALICE.0).await;

        alice
            .send(Message::Text(
                json!({"recipient_id": BOB.0, "content": "Welcome aboard"}).to_string(),
            ))
            .await
            .expect("send frame");

        let received = next_event(&mut bob).await;
        assert_eq!(received["type"], "Message");
        assert_eq!(received["data"]["sender_id"], ALICE.0);
        assert_eq!(received["data"]["content"], "Welcome aboard");

        let notification = next_event(&mut bob).await;
        assert_eq!(notification["type"], "Notification");
        assert_eq!(notification["data"]["title"], "New message");

        let echo = next_event(&mut alice).await;
        assert_eq!(echo["type"], "Message");
        assert_eq!(echo["data"]["message_id"], received["data"]["message_id"]);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_ws_invalid_frame_returns_error(pool: SqlitePool) -> sqlx::Result<()> {
        let (addr, state) = spawn_server(pool).await;
        let mut bob = connect(addr, BOB).await;
        wait_online(&state, BOB.0).await;

        bob.send(Message::Text("{ not json".to_string()))
            .await
            .expect("send frame");

        let event = next_event(&mut bob).await;
        assert_eq!(event["type"], "Error");
        assert_eq!(event["data"]["code"], 400);

        // la connessione resta aperta
        assert!(state.users_online.is_user_online(&BOB.0));
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_ws_requires_token(pool: SqlitePool) -> sqlx::Result<()> {
        let (addr, _state) = spawn_server(pool).await;

        match connect_async(format!("ws://{}/ws", addr)).await {
            Err(tungstenite::Error::Http(response)) => {
                assert_eq!(response.status().as_u16(), 403)
            }
            _ => panic!("Handshake without token must be rejected"),
        }
        Ok(())
    }
}
