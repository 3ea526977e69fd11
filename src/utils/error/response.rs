//! HTTP response handling for errors

use super::types::ApiError;
use actix_web::http::StatusCode;
use actix_web::http::header;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use std::collections::BTreeMap;

/// Message returned for every failure whose detail stays server-side
pub const INTERNAL_ERROR_MESSAGE: &str =
    "the server encountered a problem and could not process your request";

/// Standard error envelope: `{"error": ...}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

/// Either a human readable message or a map of field errors
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ErrorBody {
    Message(String),
    Fields(BTreeMap<String, String>),
}

impl ErrorResponse {
    pub fn message<S: Into<String>>(message: S) -> Self {
        Self {
            error: ErrorBody::Message(message.into()),
        }
    }

    pub fn fields(fields: BTreeMap<String, String>) -> Self {
        Self {
            error: ErrorBody::Fields(fields),
        }
    }
}

impl ApiError {
    /// Body of the envelope as seen by the client
    pub fn envelope(&self) -> ErrorResponse {
        match self {
            ApiError::FailedValidation(fields) => ErrorResponse::fields(fields.clone()),
            err if err.is_internal() => ErrorResponse::message(INTERNAL_ERROR_MESSAGE),
            err => ErrorResponse::message(err.to_string()),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::AdmissionDenied => StatusCode::TOO_MANY_REQUESTS,
            ApiError::InvalidCredential
            | ApiError::AuthenticationRequired
            | ApiError::InvalidLogin => StatusCode::UNAUTHORIZED,
            ApiError::InactiveAccount | ApiError::NotPermitted => StatusCode::FORBIDDEN,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::FailedValidation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::EditConflict => StatusCode::CONFLICT,
            ApiError::Internal(_)
            | ApiError::Store(_)
            | ApiError::Server(_)
            | ApiError::Config(_)
            | ApiError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());

        if matches!(self, ApiError::InvalidCredential) {
            builder.insert_header((header::WWW_AUTHENTICATE, "Bearer"));
        }

        builder.json(self.envelope())
    }
}
