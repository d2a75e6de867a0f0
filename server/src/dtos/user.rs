//! User DTOs - Data Transfer Objects per utenti e autenticazione

use crate::entities::ProfileRole;
use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

lazy_static! {
    /// Lettere, cifre e @ . + - _
    pub static ref USERNAME_REGEX: Regex = Regex::new(r"^[A-Za-z0-9_.@+\-]+$").unwrap();
}

/// Body di POST /auth/register
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct RegisterDTO {
    #[validate(
        length(min = 1, max = 150, message = "Username must be between 1 and 150 characters"),
        regex(path = *USERNAME_REGEX, message = "Username may contain only letters, digits and @/./+/-/_")
    )]
    pub username: String,

    #[validate(length(min = 8, max = 128, message = "Password must be between 8 and 128 characters"))]
    pub password: String,

    pub password_confirm: String,
}

impl RegisterDTO {
    /// Regole aggiuntive sulla password non esprimibili con validator
    pub fn password_problem(&self) -> Option<&'static str> {
        if self.password != self.password_confirm {
            return Some("The two password fields didn't match");
        }
        if self.password.chars().all(|c| c.is_ascii_digit()) {
            return Some("This password is entirely numeric");
        }
        if self.password.eq_ignore_ascii_case(&self.username) {
            return Some("The password is too similar to the username");
        }
        None
    }
}

/// Dati per inserire un nuovo utente (password già hashata) insieme al suo profilo
#[derive(Debug, Clone)]
pub struct CreateUserDTO {
    pub username: String,
    pub password: String,
    pub date_joined: DateTime<Utc>,
    pub role: ProfileRole,
}

/// DTO per il login (solo username e password)
#[derive(Serialize, Deserialize, Debug)]
pub struct LoginDTO {
    pub username: String,
    pub password: String,
}

/// Query string di POST /auth/register
#[derive(Serialize, Deserialize, Debug)]
pub struct SignupQuery {
    pub role: Option<String>,
}
