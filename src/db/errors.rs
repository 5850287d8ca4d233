//! Translation of driver errors into user-facing messages.

use crate::config::ConnectionConfig;
use crate::error::AtlasError;
use sqlx::error::ErrorKind;

/// Maps sqlx connection errors to readable diagnostics.
pub(crate) fn map_connection_error(error: &sqlx::Error, config: &ConnectionConfig) -> AtlasError {
    let host = config.host.as_deref().unwrap_or("localhost");
    let port = config.effective_port();
    let user = config.user.as_deref().unwrap_or("unknown");
    let database = config.database.as_deref().unwrap_or("unknown");

    let error_str = error.to_string().to_lowercase();

    if error_str.contains("connection refused") || error_str.contains("could not connect") {
        AtlasError::connection(format!(
            "Cannot connect to {host}:{port}. Check that the server is running."
        ))
    } else if error_str.contains("access denied") || error_str.contains("authentication failed") {
        AtlasError::connection(format!(
            "Authentication failed for user '{user}'. Check your credentials."
        ))
    } else if error_str.contains("unknown database")
        || (error_str.contains("does not exist") && error_str.contains("database"))
    {
        AtlasError::connection(format!("Database '{database}' does not exist."))
    } else if error_str.contains("unable to open database file") {
        AtlasError::connection(format!("Cannot open database file '{database}'."))
    } else if error_str.contains("timed out") || error_str.contains("timeout") {
        AtlasError::connection(format!(
            "Connection to {host}:{port} timed out. The server may be overloaded or unreachable."
        ))
    } else if error_str.contains("failed to lookup address")
        || error_str.contains("name or service not known")
    {
        AtlasError::connection(format!("Host '{host}' could not be resolved."))
    } else {
        AtlasError::connection(error.to_string())
    }
}

/// Formats a statement error, naming the violated constraint when the store
/// reports one.
pub(crate) fn format_store_error(error: &sqlx::Error) -> String {
    let Some(db_error) = error.as_database_error() else {
        return error.to_string();
    };

    let summary = match db_error.kind() {
        ErrorKind::ForeignKeyViolation => Some(
            "A referenced record does not exist, or this record is still referenced by other records.",
        ),
        ErrorKind::UniqueViolation => Some("A record with the same key already exists."),
        ErrorKind::NotNullViolation => Some("A required field is missing."),
        ErrorKind::CheckViolation => Some("A value is outside the range the store accepts."),
        _ => None,
    };

    let mut result = String::new();
    if let Some(summary) = summary {
        result.push_str(summary);
        result.push_str("\n  DETAIL: ");
    } else {
        result.push_str("ERROR: ");
    }
    result.push_str(db_error.message());

    if let Some(constraint) = db_error.constraint() {
        result.push_str("\n  CONSTRAINT: ");
        result.push_str(constraint);
    }

    result
}

/// Returns true when the error came from establishing the connection rather
/// than from running the statement.
pub(crate) fn is_connection_failure(error: &sqlx::Error) -> bool {
    matches!(
        error,
        sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
    )
}
