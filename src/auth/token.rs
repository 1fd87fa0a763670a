//! Session token issuing and verification (HS256 JWT)

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use thiserror::Error;
use tracing::{debug, warn};

use super::models::{Claims, User};
use crate::common::safe_token_log;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token is malformed")]
    Malformed,

    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Signs and verifies session tokens with the process-wide secret
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Issue a token for `user` expiring `ttl` from now
    pub fn issue(&self, user: &User) -> Result<String, TokenError> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| TokenError::Signing("token lifetime out of range".to_string()))?;
        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            iat: now.timestamp() as usize,
            exp: expires_at.timestamp() as usize,
        };
        self.sign(&claims)
    }

    /// Sign an explicit claim set
    pub fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact: no grace period past `exp`
        validation.leeway = 0;

        match decode::<Claims>(token, &self.decoding, &validation) {
            Ok(data) => {
                debug!(user_id = %data.claims.sub, "Token verified");
                Ok(data.claims)
            }
            Err(e) => {
                let err = match e.kind() {
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                    _ => TokenError::Malformed,
                };
                warn!(
                    error = %e,
                    token = %safe_token_log(token),
                    "Token verification failed"
                );
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::Provider;

    fn user() -> User {
        User {
            id: "U_TEST0001".to_string(),
            email: "reader@blog.dev".to_string(),
            name: "Reader".to_string(),
            password_hash: None,
            provider: Provider::Local,
            provider_id: None,
            created_at: "2024-01-01 00:00:00".to_string(),
            updated_at: "2024-01-01 00:00:00".to_string(),
        }
    }

    #[test]
    fn test_issue_with_unrepresentable_expiry_fails() {
        let service = TokenService::new("test_secret_key", Duration::max_value());
        assert!(matches!(service.issue(&user()), Err(TokenError::Signing(_))));
    }

    #[test]
    fn test_issue_then_verify_carries_identity() {
        let service = TokenService::new("test_secret_key", Duration::hours(24));
        let token = service.issue(&user()).unwrap();
        let claims = service.verify(&token).unwrap();

        assert_eq!(claims.sub, "U_TEST0001");
        assert_eq!(claims.email, "reader@blog.dev");
        assert_eq!(claims.name, "Reader");
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn test_wrong_secret_is_invalid_signature() {
        let issuer = TokenService::new("test_secret_key", Duration::hours(1));
        let verifier = TokenService::new("wrong_secret_key", Duration::hours(1));
        let token = issuer.issue(&user()).unwrap();

        assert_eq!(verifier.verify(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_expired_token_rejected_despite_valid_signature() {
        let service = TokenService::new("test_secret_key", Duration::hours(1));
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: "U_TEST0001".to_string(),
            email: "reader@blog.dev".to_string(),
            name: "Reader".to_string(),
            iat: now - 7200,
            exp: now - 5,
        };
        let token = service.sign(&claims).unwrap();

        assert_eq!(service.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_garbage_is_malformed() {
        let service = TokenService::new("test_secret_key", Duration::hours(1));
        assert_eq!(service.verify("not.a.jwt"), Err(TokenError::Malformed));
        assert_eq!(service.verify(""), Err(TokenError::Malformed));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let service = TokenService::new("test_secret_key", Duration::hours(1));
        let token = service.issue(&user()).unwrap();
        let mut parts: Vec<&str> = token.split('.').collect();
        let other = service
            .sign(&Claims {
                sub: "U_ATTACKER".to_string(),
                email: "x@y.z".to_string(),
                name: "X".to_string(),
                iat: 0,
                exp: usize::MAX / 2,
            })
            .unwrap();
        let other_payload = other.split('.').nth(1).unwrap().to_string();
        parts[1] = &other_payload;
        let forged = parts.join(".");

        assert_eq!(service.verify(&forged), Err(TokenError::InvalidSignature));
    }
}
