use crate::config::Config;
use crate::error::AppError;
use argon2::{
    password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

pub const SESSION_COOKIE: &str = "admin_session";
pub const SESSION_HOURS: i64 = 24;

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Verifies the single admin account and mints/validates session tokens.
/// The password hash is computed exactly once, here, at construction time.
pub struct AuthService {
    admin_username: String,
    password_hash: String,
    secret: String,
}

impl AuthService {
    pub fn new(config: &Config) -> Self {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(config.admin_password.as_bytes(), &salt)
            .expect("Failed to hash admin password")
            .to_string();

        Self {
            admin_username: config.admin_username.clone(),
            password_hash,
            secret: config.session_secret.clone(),
        }
    }

    pub fn verify_credentials(&self, username: &str, password: &str) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(&self.password_hash) else {
            return false;
        };

        username == self.admin_username
            && Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok()
    }

    pub fn issue_session(&self) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: "admin".to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(SESSION_HOURS)).timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|_| AppError::Internal)
    }

    pub fn verify_session(&self, token: &str) -> bool {
        decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            database_url: "sqlite::memory:".into(),
            port: 0,
            admin_username: "admin".into(),
            admin_password: "correct horse battery staple".into(),
            session_secret: "test-secret".into(),
            public_base_url: "http://localhost:3000".into(),
        }
    }

    #[test]
    fn test_credentials_roundtrip() {
        let service = AuthService::new(&config());
        assert!(service.verify_credentials("admin", "correct horse battery staple"));
        assert!(!service.verify_credentials("admin", "wrong"));
        assert!(!service.verify_credentials("root", "correct horse battery staple"));
    }

    #[test]
    fn test_session_roundtrip() {
        let service = AuthService::new(&config());
        let token = service.issue_session().unwrap();
        assert!(service.verify_session(&token));
        assert!(!service.verify_session("not-a-jwt"));

        let other = AuthService::new(&Config {
            session_secret: "different-secret".into(),
            ..config()
        });
        assert!(!other.verify_session(&token));
    }
}
