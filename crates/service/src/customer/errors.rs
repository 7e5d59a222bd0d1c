use thiserror::Error;

/// Business errors for customer workflows
#[derive(Debug, Error)]
pub enum CustomerError {
    #[error("{0}")]
    NotFound(String),
    #[error("customer with email [{0}] already exists")]
    DuplicateEmail(String),
    #[error("no data changes found")]
    NoChanges,
    #[error("profile image for customer [{0}] not found")]
    NoImage(i32),
    #[error("profile image transfer failed")]
    Upload(#[source] storage::StorageError),
    #[error("invalid credentials")]
    Unauthorized,
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("hashing error: {0}")]
    Hash(String),
    #[error("repository error: {0}")]
    Repository(String),
}

impl CustomerError {
    pub fn not_found_id(id: i32) -> Self {
        Self::NotFound(format!("customer with id [{id}] not found"))
    }

    pub fn not_found_email(email: &str) -> Self {
        Self::NotFound(format!("customer with email [{email}] not found"))
    }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            CustomerError::Validation(_) => 1001,
            CustomerError::DuplicateEmail(_) => 1002,
            CustomerError::NotFound(_) => 1003,
            CustomerError::Unauthorized => 1004,
            CustomerError::NoChanges => 1005,
            CustomerError::NoImage(_) => 1006,
            CustomerError::Hash(_) => 1101,
            CustomerError::Upload(_) => 1102,
            CustomerError::Repository(_) => 1200,
        }
    }
}
