//! # DomainError
//!
//! Centralized error handling for the marketplace.
//! Maps domain-specific failures to actionable error types.

use thiserror::Error;

/// The primary error type for all domain operations and ports.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Client input failed validation (e.g., non-numeric page, blank title)
    #[error("validation error: {0}")]
    Validation(String),

    /// Missing, invalid or expired token, or rejected credentials
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Resource not found (entity kind, lookup key)
    #[error("{0} not found: {1}")]
    NotFound(String, String),

    /// Resource already exists (e.g., duplicate username)
    #[error("conflict: {0}")]
    Conflict(String),

    /// Infrastructure failure (e.g., DB down, hashing or signing failed)
    #[error("internal service error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// A specialized Result type for marketplace logic.
pub type Result<T> = std::result::Result<T, DomainError>;
