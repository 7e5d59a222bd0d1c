//! Bearer token issuance and verification (HS256 JWT).
//!
//! The core never interprets tokens; registration and login hand the issued
//! token back to the HTTP layer, and only the bearer middleware verifies.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token encoding failed: {0}")]
    Encode(String),
    #[error("invalid or expired token: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub scopes: Vec<String>,
    pub iat: usize,
    pub exp: usize,
}

/// Issues and verifies signed, expiring bearer tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    secret: String,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: impl Into<String>, ttl_hours: i64) -> Self {
        Self { secret: secret.into(), ttl: Duration::hours(ttl_hours) }
    }

    /// Issue a token carrying the subject (email) and role claims.
    pub fn issue(&self, subject: &str, scopes: &[&str]) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            scopes: scopes.iter().map(|s| s.to_string()).collect(),
            iat: now.timestamp() as usize,
            exp: (now + self.ttl).timestamp() as usize,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(self.secret.as_bytes()))
            .map_err(|e| TokenError::Encode(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        decode::<Claims>(token, &DecodingKey::from_secret(self.secret.as_bytes()), &validation)
            .map(|data| data.claims)
            .map_err(|e| TokenError::Invalid(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_then_verify_roundtrip() {
        let issuer = TokenIssuer::new("test-secret", 12);
        let token = issuer.issue("luna@dev.com", &["ROLE_USER"]).unwrap();
        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.sub, "luna@dev.com");
        assert_eq!(claims.scopes, vec!["ROLE_USER".to_string()]);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let issuer = TokenIssuer::new("test-secret", 12);
        let other = TokenIssuer::new("other-secret", 12);
        let token = issuer.issue("luna@dev.com", &["ROLE_USER"]).unwrap();
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn verify_rejects_garbage() {
        let issuer = TokenIssuer::new("test-secret", 12);
        assert!(issuer.verify("not-a-jwt").is_err());
    }
}
