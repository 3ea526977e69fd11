//! Error handling for the API
//!
//! This module defines the error taxonomy shared by the admission, authorization
//! and handler layers, and the single JSON envelope every error renders to.

mod conversions;
mod helpers;
mod response;
mod types;

pub use response::{ErrorBody, ErrorResponse, INTERNAL_ERROR_MESSAGE};
pub use types::{ApiError, Result};
