//! Error types for Startup Atlas.
//!
//! Defines the main error enum used throughout the application.

use thiserror::Error;

/// Main error type for Startup Atlas operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AtlasError {
    /// Database connection errors (host unreachable, auth failed, missing schema).
    #[error("Connection error: {0}")]
    Connection(String),

    /// Read errors (malformed statement, unknown column, timeout).
    #[error("Query error: {0}")]
    Query(String),

    /// Write errors (constraint violations, zero rows affected, commit failures).
    #[error("Mutation error: {0}")]
    Mutation(String),

    /// Local checks that failed before anything was sent to the store.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration errors (invalid config file, bad connection string, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal application errors (unexpected states, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AtlasError {
    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error with the given message.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a mutation error with the given message.
    pub fn mutation(msg: impl Into<String>) -> Self {
        Self::Mutation(msg.into())
    }

    /// Creates a validation error with the given message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Connection(_) => "Connection Error",
            Self::Query(_) => "Query Error",
            Self::Mutation(_) => "Mutation Error",
            Self::Validation(_) => "Validation Error",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }

    /// Returns the bare message without the category prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Connection(m)
            | Self::Query(m)
            | Self::Mutation(m)
            | Self::Validation(m)
            | Self::Config(m)
            | Self::Internal(m) => m,
        }
    }

    /// Returns true for errors raised by local checks, before any store call.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true for write failures reported by the store.
    pub fn is_mutation(&self) -> bool {
        matches!(self, Self::Mutation(_))
    }
}

/// Result type alias using AtlasError.
pub type Result<T> = std::result::Result<T, AtlasError>;
