//! Mock database clients for testing.
//!
//! `RecordingDatabaseClient` remembers every statement it receives so tests
//! can assert which store calls were (or were not) made. `FailingDatabaseClient`
//! rejects every call with a fixed error.

use super::{DatabaseBackend, DatabaseClient, QueryResult, Value};
use crate::error::{AtlasError, Result};
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

/// A statement received by the recording client.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub sql: String,
    pub params: Vec<Value>,
}

/// A mock database client that returns a canned result and records calls.
#[derive(Debug, Default)]
pub struct RecordingDatabaseClient {
    result: QueryResult,
    rows_affected: u64,
    delay: Option<Duration>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl RecordingDatabaseClient {
    /// Creates a client that returns empty results and one affected row.
    pub fn new() -> Self {
        Self {
            rows_affected: 1,
            ..Default::default()
        }
    }

    /// Returns the given result from every `fetch`.
    pub fn with_result(mut self, result: QueryResult) -> Self {
        self.result = result;
        self
    }

    /// Reports the given affected row count from every `execute`.
    pub fn with_rows_affected(mut self, rows: u64) -> Self {
        self.rows_affected = rows;
        self
    }

    /// Sleeps before answering, to exercise timeouts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Returns every call received so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Returns the number of calls received so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }

    async fn record(&self, sql: &str, params: &[Value]) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                sql: sql.to_string(),
                params: params.to_vec(),
            });
        }
    }
}

#[async_trait]
impl DatabaseClient for RecordingDatabaseClient {
    fn backend(&self) -> DatabaseBackend {
        DatabaseBackend::Sqlite
    }

    async fn fetch(&self, sql: &str, params: &[Value]) -> Result<QueryResult> {
        self.record(sql, params).await;
        Ok(self.result.clone())
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> Result<u64> {
        self.record(sql, params).await;
        Ok(self.rows_affected)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

/// A database client whose every call fails with the same error.
#[derive(Debug, Clone)]
pub struct FailingDatabaseClient {
    error: AtlasError,
}

impl FailingDatabaseClient {
    /// Creates a client that fails with the given error.
    pub fn new(error: AtlasError) -> Self {
        Self { error }
    }

    /// Creates a client that behaves like an unreachable server.
    pub fn unreachable() -> Self {
        Self::new(AtlasError::connection(
            "Cannot connect to localhost:3306. Check that the server is running.",
        ))
    }
}

#[async_trait]
impl DatabaseClient for FailingDatabaseClient {
    fn backend(&self) -> DatabaseBackend {
        DatabaseBackend::MySql
    }

    async fn fetch(&self, _sql: &str, _params: &[Value]) -> Result<QueryResult> {
        Err(self.error.clone())
    }

    async fn execute(&self, _sql: &str, _params: &[Value]) -> Result<u64> {
        Err(self.error.clone())
    }

    async fn ping(&self) -> Result<()> {
        Err(self.error.clone())
    }
}
