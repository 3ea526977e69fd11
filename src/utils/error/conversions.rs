//! Type conversions for ApiError

use super::types::ApiError;
use crate::storage::StoreError;

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::NotFound,
            StoreError::EditConflict => ApiError::EditConflict,
            other => ApiError::Store(other),
        }
    }
}

impl From<serde_yaml::Error> for ApiError {
    fn from(err: serde_yaml::Error) -> Self {
        ApiError::Config(format!("Failed to parse config: {}", err))
    }
}

impl From<argon2::password_hash::Error> for ApiError {
    fn from(err: argon2::password_hash::Error) -> Self {
        ApiError::Internal(format!("Password hashing failed: {}", err))
    }
}

impl From<actix_web::error::JsonPayloadError> for ApiError {
    fn from(err: actix_web::error::JsonPayloadError) -> Self {
        use actix_web::error::JsonPayloadError;

        match err {
            JsonPayloadError::OverflowKnownLength { limit, .. }
            | JsonPayloadError::Overflow { limit } => ApiError::BadRequest(format!(
                "request body must not be larger than {} bytes",
                limit
            )),
            JsonPayloadError::ContentType => {
                ApiError::BadRequest("request body must be application/json".to_string())
            }
            JsonPayloadError::Deserialize(e) if e.is_eof() && e.line() == 1 && e.column() == 0 => {
                ApiError::BadRequest("body must not be empty".to_string())
            }
            JsonPayloadError::Deserialize(e) => ApiError::BadRequest(format!("body contains {}", e)),
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}

impl From<actix_web::error::QueryPayloadError> for ApiError {
    fn from(err: actix_web::error::QueryPayloadError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<actix_web::error::PathError> for ApiError {
    fn from(_: actix_web::error::PathError) -> Self {
        ApiError::NotFound
    }
}
