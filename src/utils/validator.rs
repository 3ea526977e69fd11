//! Field validation helpers

use crate::utils::error::{ApiError, Result};
use once_cell::sync::OnceCell;
use regex::Regex;
use std::collections::{BTreeMap, HashSet};
use std::hash::Hash;

const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$";

static EMAIL_RX: OnceCell<Regex> = OnceCell::new();

/// Collects the first error reported for each field
#[derive(Debug, Default)]
pub struct Validator {
    errors: BTreeMap<String, String>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Record `message` for `key` unless the field already has an error
    pub fn add_error(&mut self, key: &str, message: &str) {
        self.errors
            .entry(key.to_string())
            .or_insert_with(|| message.to_string());
    }

    /// Record `message` for `key` when `ok` is false
    pub fn check(&mut self, ok: bool, key: &str, message: &str) {
        if !ok {
            self.add_error(key, message);
        }
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    /// `Ok` when no error was recorded, otherwise the field map
    pub fn finish(self) -> Result<()> {
        if self.valid() {
            Ok(())
        } else {
            Err(ApiError::failed_validation(self.errors))
        }
    }
}

pub fn permitted_value<T: PartialEq>(value: &T, permitted: &[T]) -> bool {
    permitted.contains(value)
}

/// Every element appears once
pub fn unique<T: Eq + Hash>(values: &[T]) -> bool {
    let mut seen = HashSet::with_capacity(values.len());
    values.iter().all(|v| seen.insert(v))
}

pub fn is_email(value: &str) -> Result<bool> {
    let rx = EMAIL_RX
        .get_or_try_init(|| Regex::new(EMAIL_PATTERN))
        .map_err(|e| ApiError::internal(format!("Regex error: {}", e)))?;
    Ok(rx.is_match(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_error_per_field_wins() {
        let mut v = Validator::new();
        v.check(false, "title", "must be provided");
        v.check(false, "title", "must not be more than 500 bytes long");
        v.check(true, "year", "must be provided");

        assert!(!v.valid());
        assert_eq!(v.errors().len(), 1);
        assert_eq!(v.errors()["title"], "must be provided");

        match v.finish() {
            Err(ApiError::FailedValidation(fields)) => assert_eq!(fields.len(), 1),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_empty_validator_finishes_ok() {
        assert!(Validator::new().finish().is_ok());
    }

    #[test]
    fn test_unique() {
        assert!(unique(&["drama", "comedy"]));
        assert!(!unique(&["drama", "drama"]));
        assert!(unique::<&str>(&[]));
    }

    #[test]
    fn test_permitted_value() {
        assert!(permitted_value(&"id", &["id", "title"]));
        assert!(!permitted_value(&"rating", &["id", "title"]));
    }

    #[test]
    fn test_is_email() {
        assert!(is_email("alice@example.com").unwrap());
        assert!(is_email("test.email+tag@domain.co.uk").unwrap());
        assert!(!is_email("invalid-email").unwrap());
        assert!(!is_email("@domain.com").unwrap());
    }
}
