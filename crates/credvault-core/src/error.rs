//! Error types for the CredVault system.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("Authentication required: {reason}")]
    Unauthenticated { reason: String },

    #[error("Access denied: {reason}")]
    Forbidden { reason: String },

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Entity already exists: {entity}")]
    AlreadyExists { entity: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("User is already assigned to the specified {target}")]
    AlreadyAssigned { target: String },

    #[error("User is not assigned to the specified {target}")]
    NotAssigned { target: String },

    #[error("A credential with this username already exists in the division")]
    DuplicateCredential,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl VaultError {
    /// Shorthand for a [`VaultError::Forbidden`] with the given reason.
    pub fn forbidden(reason: impl Into<String>) -> Self {
        VaultError::Forbidden {
            reason: reason.into(),
        }
    }

    /// Shorthand for a [`VaultError::Validation`] with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        VaultError::Validation {
            message: message.into(),
        }
    }
}

pub type VaultResult<T> = Result<T, VaultError>;
