//! Session tokens.
//!
//! HS256 JWTs carrying [`Claims`]. They travel in the `token` cookie (see
//! [`crate::auth::cookie`]) or an `Authorization: Bearer` header.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use nexus_core::roles::Role;
use nexus_core::types::DbId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{env_bool, env_or};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User id.
    pub sub: DbId,
    pub email: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

impl Claims {
    fn issue(user_id: DbId, email: &str, role: Role, ttl_mins: i64) -> Self {
        let iat = Utc::now().timestamp();
        Self {
            sub: user_id,
            email: email.to_owned(),
            role,
            exp: iat + ttl_mins * 60,
            iat,
            jti: Uuid::new_v4().to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Token and cookie lifetime.
    pub expiry_mins: i64,
    /// Adds `Secure` to the session cookie.
    pub cookie_secure: bool,
}

impl JwtConfig {
    /// `JWT_SECRET` (required), `JWT_EXPIRY_MINS` (default one day) and
    /// `COOKIE_SECURE` (default off).
    ///
    /// # Panics
    ///
    /// When `JWT_SECRET` is missing or empty.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").unwrap_or_default();
        assert!(!secret.is_empty(), "JWT_SECRET must be set to a non-empty value");

        Self {
            secret,
            expiry_mins: env_or("JWT_EXPIRY_MINS", 24 * 60),
            cookie_secure: env_bool("COOKIE_SECURE").unwrap_or(false),
        }
    }

    fn validation() -> Validation {
        // Default leeway is 60s; exp is always checked.
        Validation::new(Algorithm::HS256)
    }
}

pub fn generate_token(
    user_id: DbId,
    email: &str,
    role: Role,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims::issue(user_id, email, role, config.expiry_mins);
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Check signature and expiry, returning the payload.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let key = DecodingKey::from_secret(config.secret.as_bytes());
    decode::<Claims>(token, &key, &JwtConfig::validation()).map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.to_string(),
            expiry_mins: 60,
            cookie_secure: false,
        }
    }

    fn sign(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn issued_token_carries_user_and_role() {
        let cfg = config("unit-test-secret");
        let token = generate_token(42, "a@example.com", Role::Supervisor, &cfg).unwrap();

        let claims = validate_token(&token, &cfg).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.email, "a@example.com");
        assert_eq!(claims.role, Role::Supervisor);
        assert_eq!(claims.exp - claims.iat, 3600);
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn expired_token_is_rejected() {
        let mut claims = Claims::issue(1, "a@example.com", Role::Client, 60);
        claims.iat -= 7200;
        claims.exp = claims.iat + 60;

        let token = sign(&claims, "unit-test-secret");
        assert!(validate_token(&token, &config("unit-test-secret")).is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = generate_token(1, "a@example.com", Role::Admin, &config("one")).unwrap();
        assert!(validate_token(&token, &config("two")).is_err());
    }

    #[test]
    fn each_token_gets_a_fresh_jti() {
        let a = Claims::issue(1, "a@example.com", Role::Operator, 5);
        let b = Claims::issue(1, "a@example.com", Role::Operator, 5);
        assert_ne!(a.jti, b.jti);
    }
}
