//! HTTP server utility methods

use crate::utils::error::ApiError;
use std::io::ErrorKind;

/// Format a readable message for a listener that could not be bound
pub(crate) fn format_bind_error(error: std::io::Error, bind_addr: &str, port: u16) -> ApiError {
    match error.kind() {
        ErrorKind::AddrInUse => ApiError::server(format!(
            "Port {} is already in use. Stop the other process or start with --port {}",
            port,
            port.saturating_add(1)
        )),
        ErrorKind::PermissionDenied => ApiError::server(format!(
            "Permission denied for port {}. Use a port >= 1024 or run with the required privileges",
            port
        )),
        _ => ApiError::server(format!("Failed to bind to {}: {}", bind_addr, error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Error;

    #[test]
    fn test_format_bind_error_address_in_use() {
        let error = Error::new(ErrorKind::AddrInUse, "Address already in use");
        let message = format_bind_error(error, "0.0.0.0:4000", 4000).to_string();

        assert!(message.contains("4000"));
        assert!(message.contains("already in use"));
        assert!(message.contains("4001"));
    }

    #[test]
    fn test_format_bind_error_permission_denied() {
        let error = Error::new(ErrorKind::PermissionDenied, "Permission denied");
        let message = format_bind_error(error, "0.0.0.0:80", 80).to_string();

        assert!(message.contains("Permission denied for port 80"));
    }

    #[test]
    fn test_format_bind_error_other() {
        let error = Error::new(ErrorKind::AddrNotAvailable, "cannot assign");
        let err = format_bind_error(error, "10.255.0.1:4000", 4000);

        assert!(matches!(err, ApiError::Server(_)));
        assert!(err.to_string().contains("10.255.0.1:4000"));
    }

    #[test]
    fn test_format_bind_error_max_port() {
        let error = Error::new(ErrorKind::AddrInUse, "Address already in use");
        let message = format_bind_error(error, "0.0.0.0:65535", 65535).to_string();
        assert!(message.contains("65535"));
    }
}
