//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service, and the mapping
//! of port errors onto HTTP responses.

use crate::config::ConfigError;
use axum::http::StatusCode;
use opion_crm_core::ports::PortError;
use tracing::error;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    /// Represents a failure while applying the embedded migrations.
    #[error("Migration Error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

/// The error half of every handler's return type.
pub type HandlerError = (StatusCode, String);

/// Maps a port error onto the status code and message a handler returns.
///
/// Unexpected failures are logged with `context` and hidden from the client.
pub fn port_error_response(context: &str, err: PortError) -> HandlerError {
    match err {
        PortError::NotFound(what) => (StatusCode::NOT_FOUND, what),
        PortError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
        PortError::Forbidden(reason) => (StatusCode::FORBIDDEN, reason),
        PortError::Invalid(reason) => (StatusCode::BAD_REQUEST, reason),
        PortError::Unexpected(cause) => {
            error!("{}: {}", context, cause);
            (StatusCode::INTERNAL_SERVER_ERROR, context.to_string())
        }
    }
}

pub fn forbidden(reason: &str) -> HandlerError {
    (StatusCode::FORBIDDEN, reason.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_errors_map_to_status_codes() {
        let cases = [
            (PortError::NotFound("Customer x not found".into()), StatusCode::NOT_FOUND),
            (PortError::Unauthorized, StatusCode::UNAUTHORIZED),
            (PortError::Forbidden("nope".into()), StatusCode::FORBIDDEN),
            (PortError::Invalid("name".into()), StatusCode::BAD_REQUEST),
            (PortError::Unexpected("pool timed out".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(port_error_response("Failed", err).0, expected);
        }
    }

    #[test]
    fn unexpected_cause_is_not_leaked() {
        let (_, body) = port_error_response(
            "Failed to list customers",
            PortError::Unexpected("password authentication failed".into()),
        );
        assert_eq!(body, "Failed to list customers");
    }
}
