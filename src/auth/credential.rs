//! Bearer credential parsing

use super::tokens;
use crate::utils::error::{ApiError, Result};

/// Outcome of reading the `Authorization` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential<'a> {
    /// No header, or an empty one
    Absent,
    /// A syntactically valid bearer token
    Bearer(&'a str),
}

/// Parse an `Authorization` header value.
///
/// The value must be exactly `Bearer <token>` with a well-formed token;
/// anything else is [`ApiError::InvalidCredential`].
pub fn parse_authorization(header: Option<&str>) -> Result<Credential<'_>> {
    let Some(value) = header.filter(|v| !v.is_empty()) else {
        return Ok(Credential::Absent);
    };

    let mut parts = value.split(' ');
    let (Some("Bearer"), Some(token), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(ApiError::InvalidCredential);
    };

    if !tokens::is_well_formed(token) {
        return Err(ApiError::InvalidCredential);
    }

    Ok(Credential::Bearer(token))
}
