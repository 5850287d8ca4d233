//! Classified, time-bounded statement execution.
//!
//! `QueryExecutor` only runs reads and `MutationExecutor` only runs single
//! INSERT/UPDATE/DELETE statements. Both delegate connection handling to the
//! `DatabaseClient`, which opens and closes a connection per call.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::config::DEFAULT_TIMEOUT_SECS;
use crate::db::{DatabaseClient, QueryResult, Value};
use crate::error::{AtlasError, Result};
use crate::safety::classify_sql;

/// Runs read-only statements and returns materialized result sets.
pub struct QueryExecutor<'a> {
    db: &'a dyn DatabaseClient,
    timeout: Duration,
}

impl<'a> QueryExecutor<'a> {
    /// Creates a new query executor with the default timeout.
    pub fn new(db: &'a dyn DatabaseClient) -> Self {
        Self {
            db,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Overrides the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Runs a read statement with positional parameters.
    pub async fn run(&self, sql: &str, params: &[Value]) -> Result<QueryResult> {
        let classification = classify_sql(sql);
        if let Some(note) = &classification.warning {
            warn!("{note}: {}", first_line(sql));
        }
        if !classification.is_read() {
            return Err(AtlasError::query(format!(
                "Refusing to run {} statement as a query",
                classification.statement_type
            )));
        }

        let start = Instant::now();
        let result = tokio::time::timeout(self.timeout, self.db.fetch(sql, params))
            .await
            .map_err(|_| {
                AtlasError::query(format!(
                    "Query timed out after {}s",
                    self.timeout.as_secs_f64()
                ))
            })??;
        let elapsed = start.elapsed();

        debug!(
            "Query returned {} rows in {:?}: {}",
            result.row_count,
            elapsed,
            first_line(sql)
        );
        Ok(result.with_execution_time(elapsed))
    }
}

/// Runs row-modifying statements and reports affected rows.
pub struct MutationExecutor<'a> {
    db: &'a dyn DatabaseClient,
    timeout: Duration,
}

impl<'a> MutationExecutor<'a> {
    /// Creates a new mutation executor with the default timeout.
    pub fn new(db: &'a dyn DatabaseClient) -> Self {
        Self {
            db,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Overrides the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Runs an INSERT, UPDATE, or DELETE and returns the affected row count.
    pub async fn run(&self, sql: &str, params: &[Value]) -> Result<u64> {
        let classification = classify_sql(sql);
        if !classification.is_row_mutation() {
            return Err(AtlasError::mutation(format!(
                "Refusing to run {} statement as a mutation",
                classification.statement_type
            )));
        }

        let start = Instant::now();
        let affected = tokio::time::timeout(self.timeout, self.db.execute(sql, params))
            .await
            .map_err(|_| {
                AtlasError::mutation(format!(
                    "Statement timed out after {}s",
                    self.timeout.as_secs_f64()
                ))
            })??;

        debug!(
            "{} affected {} rows in {:?}",
            classification.statement_type,
            affected,
            start.elapsed()
        );
        Ok(affected)
    }

    /// Like [`run`](Self::run), but zero affected rows is an error.
    ///
    /// `description` names the target row in the error, e.g. "Startup 7".
    pub async fn run_expecting_rows(
        &self,
        sql: &str,
        params: &[Value],
        description: &str,
    ) -> Result<u64> {
        match self.run(sql, params).await? {
            0 => Err(AtlasError::mutation(format!(
                "{description} was not found or has changed since it was loaded"
            ))),
            n => Ok(n),
        }
    }
}

fn first_line(sql: &str) -> &str {
    sql.trim().lines().next().unwrap_or_default()
}
