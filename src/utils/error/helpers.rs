//! Helper functions for creating specific error types

use super::types::ApiError;
use std::collections::BTreeMap;

impl ApiError {
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn server<S: Into<String>>(message: S) -> Self {
        Self::Server(message.into())
    }

    pub fn bad_request<S: Into<String>>(message: S) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn failed_validation(errors: BTreeMap<String, String>) -> Self {
        Self::FailedValidation(errors)
    }

    /// Whether the error carries detail that must never reach a client
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Internal(_) | Self::Store(_) | Self::Server(_) | Self::Config(_) | Self::Io(_)
        )
    }

    /// Whether a client may retry the same request later without changing anything
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::AdmissionDenied | Self::EditConflict)
    }
}
