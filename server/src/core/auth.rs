use crate::core::{AppError, AppState};
use crate::entities::{Profile, ProfileRole, User};
use axum::extract::State;
use axum::{Error, body::Body, extract::Request, http, http::Response, middleware::Next};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Nome del cookie che trasporta il token (alternativo all'header Authorization)
pub const TOKEN_COOKIE: &str = "token";

// struct che codifica il contenuto del token jwt
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub exp: usize, // Expiry time of the token
    pub iat: usize, // Issued at time of the token
    pub id: i64,
    pub username: String,
}

#[instrument(skip(secret), fields(username = %username, id = %id))]
pub fn encode_jwt(username: String, id: i64, secret: &str) -> Result<String, Error> {
    debug!("Encoding JWT token for user");
    let now = Utc::now();
    let expire: chrono::TimeDelta = Duration::hours(24);
    let exp: usize = (now + expire).timestamp() as usize;
    let iat: usize = now.timestamp() as usize;
    let claim = Claims {
        iat,
        exp,
        username,
        id,
    };

    encode(
        &Header::default(),
        &claim,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map(|token| {
        info!("JWT token encoded successfully");
        token
    })
    .map_err(|e| {
        error!("Failed to encode JWT token: {:?}", e);
        Error::new("Error in encoding jwt token")
    })
}

#[instrument(skip(jwt_token, secret))]
pub fn decode_jwt(jwt_token: &str, secret: &str) -> Result<TokenData<Claims>, Error> {
    debug!("Decoding JWT token");
    decode(
        jwt_token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .map(|data: TokenData<Claims>| {
        debug!("JWT token decoded successfully for user: {}", data.claims.username);
        data
    })
    .map_err(|e| {
        warn!("Failed to decode JWT token: {:?}", e);
        Error::new("Error in decoding jwt token")
    })
}

/// Estrae il token dalla richiesta
///
/// `Ok(None)` se non c'è alcuna credenziale, `Err` se l'header Authorization è presente
/// ma non nella forma `Bearer <token>`.
fn extract_token(req: &Request) -> Result<Option<String>, AppError> {
    if let Some(header) = req.headers().get(http::header::AUTHORIZATION) {
        let value = header.to_str().map_err(|_| {
            warn!("Invalid authorization header format");
            AppError::unauthorized("Invalid authorization header")
        })?;
        let mut parts = value.split_whitespace();
        return match (parts.next(), parts.next(), parts.next()) {
            (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => {
                Ok(Some(token.to_string()))
            }
            _ => {
                warn!("Malformed authorization header");
                Err(AppError::unauthorized("Invalid authorization header"))
            }
        };
    }

    let token = req
        .headers()
        .get_all(http::header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == TOKEN_COOKIE)
        .map(|(_, token)| token.to_string())
        .filter(|token| !token.is_empty());

    Ok(token)
}

#[instrument(skip(state, req, next))]
pub async fn authentication_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response<Body>, AppError> {
    debug!("Running authentication middleware");
    let Some(token) = extract_token(&req)? else {
        warn!("Missing credentials");
        return Err(AppError::forbidden("Please add the JWT token to the header"));
    };

    let token_data = decode_jwt(&token, &state.jwt_secret)
        .map_err(|_| AppError::unauthorized("Unable to decode token"))?;

    // Fetch the user details from the database
    let current_user = match state
        .user
        .find_by_username(&token_data.claims.username)
        .await?
    {
        Some(user) if user.user_id == token_data.claims.id => user,
        _ => {
            warn!("User not found in database: {}", token_data.claims.username);
            return Err(AppError::unauthorized("You are not an authorized user"));
        }
    };

    let profile = state
        .profile
        .find_by_user_id(&current_user.user_id)
        .await?
        .ok_or_else(|| {
            warn!("Profile missing for user {}", current_user.user_id);
            AppError::unauthorized("You are not an authorized user")
        })?;

    debug!("User authenticated: {}", current_user.username);
    req.extensions_mut().insert(current_user);
    req.extensions_mut().insert(profile);
    Ok(next.run(req).await)
}

/// Middleware per le rotte di amministrazione; va montato dopo `authentication_middleware`
#[instrument(skip(req, next))]
pub async fn staff_middleware(req: Request, next: Next) -> Result<Response<Body>, AppError> {
    let user = req.extensions().get::<User>().ok_or_else(|| {
        warn!("User not found in request extensions");
        AppError::unauthorized("User not authenticated")
    })?;

    if !user.is_staff {
        warn!("User {} is not staff", user.user_id);
        return Err(AppError::forbidden("Staff access required"));
    }

    Ok(next.run(req).await)
}

/// Helper function per verificare che un profilo abbia uno dei ruoli richiesti
///
/// # Returns
/// * `Ok(())` se il ruolo è permesso
/// * `Err(AppError)` 403 se il ruolo non è tra quelli permessi
pub fn require_role(profile: &Profile, allowed_roles: &[ProfileRole]) -> Result<(), AppError> {
    if !allowed_roles.contains(&profile.role) {
        warn!(
            "Profile {} has insufficient role {:?}, required one of: {:?}",
            profile.profile_id, profile.role, allowed_roles
        );
        return Err(AppError::forbidden("Insufficient role").with_details(format!(
            "This action requires one of the following roles: {:?}",
            allowed_roles
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(role: ProfileRole) -> Profile {
        Profile {
            profile_id: 1,
            user_id: 1,
            username: "alice".to_string(),
            role,
            bio: String::new(),
            skills: String::new(),
            hourly_rate: None,
        }
    }

    #[test]
    fn test_jwt_round_trip() {
        let token = encode_jwt("alice".to_string(), 7, "secret").unwrap();
        let data = decode_jwt(&token, "secret").unwrap();
        assert_eq!(data.claims.id, 7);
        assert_eq!(data.claims.username, "alice");
        assert!(data.claims.exp > data.claims.iat);
    }

    #[test]
    fn test_jwt_wrong_secret_fails() {
        let token = encode_jwt("alice".to_string(), 7, "secret").unwrap();
        assert!(decode_jwt(&token, "another secret").is_err());
    }

    #[test]
    fn test_require_role() {
        let mentor = profile(ProfileRole::Mentor);
        assert!(require_role(&mentor, &[ProfileRole::Mentor]).is_ok());

        let err = require_role(&mentor, &[ProfileRole::Mentee]).unwrap_err();
        assert_eq!(err.status(), http::StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_extract_token_from_cookie() {
        let req = Request::builder()
            .header(http::header::COOKIE, "theme=dark; token=abc.def.ghi")
            .body(Body::empty())
            .unwrap();
        assert_eq!(extract_token(&req).unwrap().as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_extract_token_header_wins() {
        let req = Request::builder()
            .header(http::header::AUTHORIZATION, "Bearer from-header")
            .header(http::header::COOKIE, "token=from-cookie")
            .body(Body::empty())
            .unwrap();
        assert_eq!(extract_token(&req).unwrap().as_deref(), Some("from-header"));
    }

    #[test]
    fn test_extract_token_malformed_header() {
        let req = Request::builder()
            .header(http::header::AUTHORIZATION, "Token")
            .body(Body::empty())
            .unwrap();
        assert_eq!(
            extract_token(&req).unwrap_err().status(),
            http::StatusCode::UNAUTHORIZED
        );

        let empty = Request::builder().body(Body::empty()).unwrap();
        assert!(extract_token(&empty).unwrap().is_none());
    }
}
