//! Database abstraction layer for Startup Atlas.
//!
//! Provides a trait-based interface for store operations, allowing
//! different database backends to be used interchangeably. Every call
//! opens its own connection; nothing is pooled or cached.

mod errors;
mod mock;
mod mysql;
pub mod schema;
mod sqlite;
mod types;

pub use mock::{FailingDatabaseClient, RecordedCall, RecordingDatabaseClient};
pub use mysql::MySqlClient;
pub use sqlite::SqliteClient;
pub use types::{ColumnInfo, QueryResult, Row, Value};

use crate::config::ConnectionConfig;
use crate::error::Result;
use async_trait::async_trait;

/// Supported database backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    #[default]
    MySql,
    Sqlite,
}

impl DatabaseBackend {
    /// Returns the backend as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MySql => "mysql",
            Self::Sqlite => "sqlite",
        }
    }

    /// Parses a backend from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mysql" | "mariadb" => Some(Self::MySql),
            "sqlite" | "sqlite3" => Some(Self::Sqlite),
            _ => None,
        }
    }

    /// Returns the default port for this backend (0 for file-based stores).
    pub fn default_port(&self) -> u16 {
        match self {
            Self::MySql => 3306,
            Self::Sqlite => 0,
        }
    }
}

/// Creates a database client for the configured backend.
///
/// No connection is opened here; clients connect per call.
pub fn connect(config: &ConnectionConfig) -> Result<Box<dyn DatabaseClient>> {
    match config.backend {
        DatabaseBackend::MySql => Ok(Box::new(MySqlClient::new(config)?)),
        DatabaseBackend::Sqlite => Ok(Box::new(SqliteClient::new(config)?)),
    }
}

/// Trait defining the interface for database clients.
///
/// Implementations acquire a fresh connection for each call and release it
/// before returning, on success and on failure alike. Parameters are bound
/// positionally to `?` placeholders.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Returns the backend this client talks to.
    fn backend(&self) -> DatabaseBackend;

    /// Runs a read statement and materializes every row.
    async fn fetch(&self, sql: &str, params: &[Value]) -> Result<QueryResult>;

    /// Runs a write statement and returns the number of affected rows.
    async fn execute(&self, sql: &str, params: &[Value]) -> Result<u64>;

    /// Opens a connection, pings the server, and closes it again.
    async fn ping(&self) -> Result<()>;
}
