#![allow(dead_code)]

use axum_test::TestServer;
use mentorhub_server::core::AppState;
use sqlx::SqlitePool;
use std::sync::Arc;

pub const TEST_JWT_SECRET: &str = "ilmiobellissimosegretochevaassolutamentecambiato";

/// Profili definiti in `fixtures/users.sql` (user_id == profile_id)
pub const ALICE: (i64, &str) = (1, "alice"); // mentor
pub const BOB: (i64, &str) = (2, "bob"); // mentee
pub const CAROL: (i64, &str) = (3, "carol"); // mentor
pub const DAVE: (i64, &str) = (4, "dave"); // mentee
pub const ROOT: (i64, &str) = (5, "root"); // mentee, staff

/// Crea un AppState per i test
pub fn create_test_state(pool: SqlitePool) -> Arc<AppState> {
    Arc::new(AppState::new(pool, TEST_JWT_SECRET.to_string()))
}

/// Crea un TestServer per i test
pub fn create_test_server(state: Arc<AppState>) -> TestServer {
    let app = mentorhub_server::create_router(state);
    TestServer::new(app).expect("Failed to create test server")
}

/// Genera un JWT token per testing
///
/// # Returns
/// Token JWT valido per 24 ore
pub fn create_test_jwt(user_id: i64, username: &str, jwt_secret: &str) -> String {
    use chrono::{Duration, Utc};
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    struct Claims {
        id: i64,
        username: String,
        exp: usize,
        iat: usize,
    }

    let now = Utc::now();
    let expiration = now
        .checked_add_signed(Duration::hours(24))
        .expect("valid timestamp")
        .timestamp() as usize;

    let claims = Claims {
        id: user_id,
        username: username.to_string(),
        exp: expiration,
        iat: now.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .expect("Failed to create JWT token")
}

/// Valore dell'header Authorization per un utente dei fixtures
pub fn bearer(user: (i64, &str)) -> String {
    format!("Bearer {}", create_test_jwt(user.0, user.1, TEST_JWT_SECRET))
}
