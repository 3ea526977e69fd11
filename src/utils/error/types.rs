//! Error types for the API

use crate::storage::StoreError;
use std::collections::BTreeMap;
use thiserror::Error;

/// Result type alias for the API
pub type Result<T> = std::result::Result<T, ApiError>;

/// Main error type for the API
///
/// Every variant maps to exactly one status code and one `{"error": ...}`
/// envelope; see the `ResponseError` impl.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Global or per-client admission control rejected the request
    #[error("rate limit exceeded")]
    AdmissionDenied,

    /// Malformed, unknown or expired bearer credential
    #[error("invalid or missing authentication token")]
    InvalidCredential,

    /// Anonymous request to a route that needs an identity
    #[error("you must be authenticated to access this resource")]
    AuthenticationRequired,

    /// Authenticated user whose account has not been activated
    #[error("your user account must be activated to access this resource")]
    InactiveAccount,

    /// Activated user lacking the permission code the route demands
    #[error("your user account doesn't have the necessary permissions to access this resource")]
    NotPermitted,

    /// Wrong email/password pair on the token endpoint
    #[error("invalid authentication credentials")]
    InvalidLogin,

    /// Unexpected failure; the detail is only ever logged
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Store collaborator failure that reached the HTTP layer unmapped
    #[error("Store error: {0}")]
    Store(StoreError),

    /// Server startup and runtime errors
    #[error("Server error: {0}")]
    Server(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Resource not found
    #[error("the requested resource could not be found")]
    NotFound,

    /// Method not supported by the resource
    #[error("the {0} method is not supported for this resource")]
    MethodNotAllowed(String),

    /// Malformed request (bad JSON, bad parameter)
    #[error("{0}")]
    BadRequest(String),

    /// Field-level validation failures
    #[error("validation failed")]
    FailedValidation(BTreeMap<String, String>),

    /// Optimistic concurrency check failed
    #[error("unable to update the record due to an edit conflict, please try again")]
    EditConflict,
}
