//! Auth services - Registrazione con scelta del ruolo, login e logout

use crate::core::auth::TOKEN_COOKIE;
use crate::core::{AppError, AppState, encode_jwt};
use crate::dtos::{CreateUserDTO, LoginDTO, ProfileDTO, RegisterDTO, RoleChoiceDTO, SignupQuery};
use crate::entities::{ProfileRole, User};
use crate::repositories::Create;
use axum::{
    extract::{Json, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

const TOKEN_MAX_AGE_SECS: i64 = 24 * 60 * 60;

/// Headers Authorization + Set-Cookie per una sessione appena aperta
fn session_headers(token: &str) -> Result<HeaderMap, AppError> {
    let cookie_value = format!(
        "{}={}; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age={}",
        TOKEN_COOKIE, token, TOKEN_MAX_AGE_SECS
    );

    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie_value)
            .map_err(|_| AppError::internal_server_error("Failed to build session cookie"))?,
    );
    headers.insert(
        header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| AppError::internal_server_error("Failed to build session header"))?,
    );
    Ok(headers)
}

/// GET /auth/roles - ruoli selezionabili in fase di registrazione
pub async fn list_roles() -> Json<Vec<RoleChoiceDTO>> {
    Json(ProfileRole::ALL.into_iter().map(RoleChoiceDTO::from).collect())
}

#[instrument(skip(state, body), fields(username = %body.username))]
pub async fn register_user(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SignupQuery>,
    Json(body): Json<RegisterDTO>,
) -> Result<impl IntoResponse, AppError> {
    // 1. Verificare il ruolo scelto nella query string, altrimenti BAD_REQUEST
    // 2. Validare il DTO con validator e con le regole aggiuntive sulla password
    // 3. Se lo username è già usato, ritornare CONFLICT
    // 4. Salvare utente (password hashata) e profilo con il ruolo scelto
    // 5. Aprire subito la sessione: token JWT in Authorization e cookie
    debug!("Registering new user");

    let role = query
        .role
        .as_deref()
        .and_then(ProfileRole::parse)
        .ok_or_else(|| {
            warn!("Registration without a valid role: {:?}", query.role);
            AppError::bad_request("Please choose a role first")
                .with_details("role must be one of MENTOR, MENTEE")
        })?;

    body.validate()?;
    if let Some(problem) = body.password_problem() {
        return Err(AppError::bad_request("Validation error").with_details(problem));
    }

    if state.user.exists_by_username(&body.username).await? {
        warn!("Username already taken");
        return Err(AppError::conflict("Username already exists"));
    }

    let password_hash = User::hash_password(&body.password)?;

    let user = state
        .user
        .create(&CreateUserDTO {
            username: body.username,
            password: password_hash,
            date_joined: Utc::now(),
            role,
        })
        .await?;

    let profile = state
        .profile
        .find_by_user_id(&user.user_id)
        .await?
        .ok_or_else(|| AppError::internal_server_error("Profile not created"))?;

    let token = encode_jwt(user.username.clone(), user.user_id, &state.jwt_secret)?;
    let headers = session_headers(&token)?;

    info!(profile_id = profile.profile_id, role = %role, "User registered");
    Ok((StatusCode::CREATED, headers, Json(ProfileDTO::from(profile))))
}

#[instrument(skip(state, body), fields(username = %body.username))]
pub async fn login_user(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginDTO>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Login attempt");

    let user = match state.user.find_by_username(&body.username).await? {
        Some(user) => user,
        None => {
            warn!("Login attempt for unknown user");
            return Err(AppError::unauthorized("Invalid username or password"));
        }
    };

    if !user.verify_password(&body.password) {
        warn!("Wrong password");
        return Err(AppError::unauthorized("Invalid username or password"));
    }

    let token = encode_jwt(user.username.clone(), user.user_id, &state.jwt_secret)?;
    let headers = session_headers(&token)?;

    info!(user_id = user.user_id, "User logged in");
    Ok((StatusCode::OK, headers))
}

/// POST /auth/logout - il token è stateless, basta far scadere il cookie
pub async fn logout_user() -> Result<impl IntoResponse, AppError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&format!(
            "{}=; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age=0",
            TOKEN_COOKIE
        ))
        .map_err(|_| AppError::internal_server_error("Failed to build session cookie"))?,
    );
    Ok((StatusCode::OK, headers))
}
