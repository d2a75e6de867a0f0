//! User entity - Entità utente con metodi per gestione password

use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub user_id: i64,
    pub username: String,
    // hash bcrypt, mai serializzato verso il client
    #[serde(skip_serializing)]
    pub password: String,
    pub is_staff: bool,
    pub date_joined: DateTime<Utc>,
}

impl User {
    /// Verify if target_password matches the stored hashed password
    pub fn verify_password(&self, target_password: &str) -> bool {
        verify(target_password, &self.password).unwrap_or(false)
    }

    /// Hash a password using bcrypt with default cost
    pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
        let hash = hash(password, DEFAULT_COST)?;
        Ok(hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_password() {
        let hashed = User::hash_password("Mentoring123").unwrap();
        let user = User {
            user_id: 1,
            username: "alice".to_string(),
            password: hashed,
            is_staff: false,
            date_joined: Utc::now(),
        };
        assert!(user.verify_password("Mentoring123"));
        assert!(!user.verify_password("mentoring123"));
    }

    #[test]
    fn test_verify_fails_on_empty_hash() {
        let user = User {
            user_id: 2,
            username: "ghost".to_string(),
            password: String::new(),
            is_staff: false,
            date_joined: Utc::now(),
        };
        assert!(!user.verify_password(""));
    }
}
