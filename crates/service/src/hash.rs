//! Credential hashing as an injected capability.
//!
//! Workflows never hash inline; they call through this trait so business
//! logic stays testable without real cryptography.

use argon2::{
    password_hash::{PasswordHasher, PasswordVerifier, SaltString},
    Argon2, PasswordHash,
};
use rand::rngs::OsRng;

use crate::customer::errors::CustomerError;

/// One-way credential hashing.
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<String, CustomerError>;
    fn verify(&self, plaintext: &str, hash: &str) -> bool;
}

/// Argon2id with a random per-hash salt.
#[derive(Default)]
pub struct Argon2Hasher;

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> Result<String, CustomerError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| CustomerError::Hash(e.to_string()))
    }

    fn verify(&self, plaintext: &str, hash: &str) -> bool {
        PasswordHash::new(hash)
            .map(|parsed| Argon2::default().verify_password(plaintext.as_bytes(), &parsed).is_ok())
            .unwrap_or(false)
    }
}
