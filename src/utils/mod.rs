//! Utility modules
//!
//! - **error**: the API error taxonomy and its JSON envelope
//! - **validator**: field validation helpers used by the handlers

pub mod error;
pub mod validator;
