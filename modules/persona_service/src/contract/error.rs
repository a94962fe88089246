//! Contract error types for persona service
//!
//! These errors are transport-agnostic and used for inter-module communication.

use thiserror::Error;

/// Persona service domain errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersonaError {
    /// Record not found
    #[error("{resource} not found: {id}")]
    NotFound {
        /// Resource type (user, account, session, post, ...)
        resource: String,
        /// Resource identifier
        id: String,
    },
    /// Uniqueness violation
    #[error("Conflict: {reason}")]
    Conflict { reason: String },
    /// Input rejected before reaching storage
    #[error("Validation error: {message}")]
    Validation { message: String },
    /// Foreign key points at a missing record
    #[error("Referenced {resource} does not exist: {id}")]
    InvalidReference { resource: String, id: String },
    #[error("Internal error")]
    Internal,
}

impl PersonaError {
    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            resource: resource.to_string(),
            id: id.to_string(),
        }
    }

    pub fn conflict(reason: impl Into<String>) -> Self {
        Self::Conflict {
            reason: reason.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn invalid_reference(resource: &str, id: impl std::fmt::Display) -> Self {
        Self::InvalidReference {
            resource: resource.to_string(),
            id: id.to_string(),
        }
    }
}
