//! Custom test assertions

use serde_json::Value;

/// Assert a body is the `{"error": "<message>"}` envelope
pub fn assert_error_message(body: &Value, expected: &str) {
    assert_eq!(
        body["error"].as_str(),
        Some(expected),
        "Expected error envelope with {:?}, got {}",
        expected,
        body
    );
}

/// Assert a body is the field-error envelope and carries `field`
pub fn assert_field_error(body: &Value, field: &str, expected: &str) {
    assert!(
        body["error"].is_object(),
        "Expected field error envelope, got {}",
        body
    );
    assert_eq!(
        body["error"][field].as_str(),
        Some(expected),
        "Unexpected error for field {:?} in {}",
        field,
        body
    );
}

/// Assert a response has the given status, printing the body otherwise
#[macro_export]
macro_rules! assert_status {
    ($res:expr, $status:expr) => {
        assert_eq!(
            $res.status(),
            $status,
            "unexpected status for {} {}",
            $res.request().method(),
            $res.request().uri()
        )
    };
}
