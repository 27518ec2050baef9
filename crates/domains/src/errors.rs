//! # Errors
//!
//! Centralized error handling for the board service.
//! Port failures are kept separate from the outcomes the services report.

use thiserror::Error;

/// Failures raised by a [`crate::ports::DocumentStore`] adapter.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Backend could not be reached or failed the operation.
    #[error("document store unavailable: {0}")]
    Unavailable(String),

    /// An update targeted a document that does not exist.
    #[error("document {collection}/{id} does not exist")]
    Missing { collection: String, id: String },

    /// A stored document could not be mapped to or from a domain type.
    #[error("malformed document: {0}")]
    Malformed(String),
}

/// Failures raised by a [`crate::ports::IdentityVerifier`] adapter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    #[error("token expired")]
    Expired,

    #[error("invalid token: {0}")]
    Invalid(String),
}

/// The error type returned by service operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// No token, a token that failed verification, or no profile record.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// The underlying store failed; never reported as an empty result.
    #[error("storage unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
}

/// A specialized Result type for service operations.
pub type Result<T> = std::result::Result<T, DomainError>;
