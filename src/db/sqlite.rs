//! SQLite database client implementation.
//!
//! Used for local datasets and for the test suite. Foreign key enforcement is
//! switched on for every connection so referential integrity behaves like the
//! MySQL store.

use crate::config::ConnectionConfig;
use crate::db::errors::{format_store_error, is_connection_failure, map_connection_error};
use crate::db::{ColumnInfo, DatabaseBackend, DatabaseClient, QueryResult, Row, Value};
use crate::error::{AtlasError, Result};
use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use sqlx::query::Query;
use sqlx::sqlite::{
    Sqlite, SqliteArguments, SqliteConnectOptions, SqliteConnection, SqliteRow,
};
use sqlx::{
    Column as SqlxColumn, Connection, Executor, Row as SqlxRow, Statement, TypeInfo, ValueRef,
};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::debug;

type SqliteQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

/// How long a connection waits on a locked database file.
const BUSY_TIMEOUT_SECS: u64 = 5;

/// SQLite database client.
#[derive(Debug, Clone)]
pub struct SqliteClient {
    options: SqliteConnectOptions,
    config: ConnectionConfig,
}

impl SqliteClient {
    /// Creates a client for the database file named in the config.
    pub fn new(config: &ConnectionConfig) -> Result<Self> {
        let path = PathBuf::from(config.require_database()?);

        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(BUSY_TIMEOUT_SECS));

        Ok(Self {
            options,
            config: config.clone(),
        })
    }

    /// Opens a fresh connection. The caller is responsible for closing it.
    pub async fn acquire(&self) -> Result<SqliteConnection> {
        SqliteConnection::connect_with(&self.options)
            .await
            .map_err(|e| map_connection_error(&e, &self.config))
    }

    async fn release(conn: SqliteConnection) {
        if let Err(e) = conn.close().await {
            debug!("Error while closing SQLite connection: {e}");
        }
    }

    async fn describe_columns(conn: &mut SqliteConnection, sql: &str) -> Vec<ColumnInfo> {
        match conn.prepare(sql).await {
            Ok(statement) => statement
                .columns()
                .iter()
                .map(|col| ColumnInfo::new(col.name(), col.type_info().name()))
                .collect(),
            Err(e) => {
                debug!("Could not describe result columns: {e}");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl DatabaseClient for SqliteClient {
    fn backend(&self) -> DatabaseBackend {
        DatabaseBackend::Sqlite
    }

    async fn fetch(&self, sql: &str, params: &[Value]) -> Result<QueryResult> {
        let mut conn = self.acquire().await?;
        let start = Instant::now();

        let fetched = bind_all(sqlx::query(sql), params)
            .fetch_all(&mut conn)
            .await;
        let execution_time = start.elapsed();

        let outcome = match fetched {
            Ok(rows) => {
                let columns = match rows.first() {
                    Some(first) => first
                        .columns()
                        .iter()
                        .map(|col| ColumnInfo::new(col.name(), col.type_info().name()))
                        .collect(),
                    None => Self::describe_columns(&mut conn, sql).await,
                };
                let rows: Vec<Row> = rows.iter().map(convert_row).collect();
                Ok(QueryResult::with_data(columns, rows).with_execution_time(execution_time))
            }
            Err(e) if is_connection_failure(&e) => Err(map_connection_error(&e, &self.config)),
            Err(e) => Err(AtlasError::query(format_store_error(&e))),
        };

        Self::release(conn).await;
        outcome
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> Result<u64> {
        let mut conn = self.acquire().await?;

        let outcome = match bind_all(sqlx::query(sql), params).execute(&mut conn).await {
            Ok(done) => Ok(done.rows_affected()),
            Err(e) if is_connection_failure(&e) => Err(map_connection_error(&e, &self.config)),
            Err(e) => Err(AtlasError::mutation(format_store_error(&e))),
        };

        Self::release(conn).await;
        outcome
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.acquire().await?;
        let outcome = conn
            .ping()
            .await
            .map_err(|e| map_connection_error(&e, &self.config));
        Self::release(conn).await;
        outcome
    }
}

/// Binds every parameter positionally.
///
/// SQLite has no decimal or date storage class: decimals are bound as REAL
/// and dates as `YYYY-MM-DD` text.
fn bind_all<'q>(mut query: SqliteQuery<'q>, params: &[Value]) -> SqliteQuery<'q> {
    for param in params {
        query = match param.clone() {
            Value::Null => query.bind(None::<String>),
            Value::Bool(b) => query.bind(b),
            Value::Int(i) => query.bind(i),
            Value::Float(f) => query.bind(f),
            Value::Decimal(d) => match d.to_f64() {
                Some(f) => query.bind(f),
                None => query.bind(d.to_string()),
            },
            Value::Date(d) => query.bind(d.format("%Y-%m-%d").to_string()),
            Value::String(s) => query.bind(s),
            Value::Bytes(b) => query.bind(b),
        };
    }
    query
}

fn convert_row(row: &SqliteRow) -> Row {
    (0..row.columns().len())
        .map(|i| convert_value(row, i))
        .collect()
}

/// Converts a value using its runtime storage class.
fn convert_value(row: &SqliteRow, index: usize) -> Value {
    let storage_class = match row.try_get_raw(index) {
        Ok(raw) if raw.is_null() => return Value::Null,
        Ok(raw) => raw.type_info().name().to_string(),
        Err(_) => return Value::Null,
    };

    let value = match storage_class.as_str() {
        "INTEGER" => row.try_get::<i64, _>(index).ok().map(Value::Int),
        "REAL" => row.try_get::<f64, _>(index).ok().map(Value::Float),
        "BLOB" => row.try_get::<Vec<u8>, _>(index).ok().map(Value::Bytes),
        _ => row.try_get::<String, _>(index).ok().map(Value::String),
    };

    value.unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use tempfile::tempdir;

    fn client_at(path: &std::path::Path) -> SqliteClient {
        let config = ConnectionConfig {
            backend: DatabaseBackend::Sqlite,
            database: Some(path.display().to_string()),
            ..Default::default()
        };
        SqliteClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_values_survive_fresh_connections() {
        let dir = tempdir().unwrap();
        let client = client_at(&dir.path().join("atlas.db"));

        client
            .execute(
                "CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT, amount DECIMAL(15,2), day DATE)",
                &[],
            )
            .await
            .unwrap();
        let affected = client
            .execute(
                "INSERT INTO t (id, name, amount, day) VALUES (?, ?, ?, ?)",
                &[
                    Value::Int(1),
                    Value::from("Zepto"),
                    Value::Decimal(Decimal::from(2_500_000)),
                    Value::Date(chrono::NaiveDate::from_ymd_opt(2023, 8, 25).unwrap()),
                ],
            )
            .await
            .unwrap();
        assert_eq!(affected, 1);

        let result = client
            .fetch("SELECT id, name, amount, day FROM t WHERE id = ?", &[Value::Int(1)])
            .await
            .unwrap();

        assert_eq!(result.column_names(), vec!["id", "name", "amount", "day"]);
        assert_eq!(result.value(0, "name"), Some(&Value::from("Zepto")));
        assert_eq!(
            result.value(0, "amount").and_then(Value::as_decimal),
            Some(Decimal::from(2_500_000))
        );
        assert_eq!(
            result.value(0, "day").and_then(Value::as_date),
            chrono::NaiveDate::from_ymd_opt(2023, 8, 25)
        );
    }

    #[tokio::test]
    async fn test_empty_result_keeps_column_names() {
        let dir = tempdir().unwrap();
        let client = client_at(&dir.path().join("atlas.db"));
        client
            .execute("CREATE TABLE cities (City_ID INTEGER PRIMARY KEY, Name TEXT)", &[])
            .await
            .unwrap();

        let result = client
            .fetch("SELECT City_ID, Name FROM cities ORDER BY Name", &[])
            .await
            .unwrap();

        assert!(result.is_empty());
        assert_eq!(result.column_names(), vec!["City_ID", "Name"]);
    }

    #[tokio::test]
    async fn test_statement_errors_are_typed() {
        let dir = tempdir().unwrap();
        let client = client_at(&dir.path().join("atlas.db"));

        let err = client.fetch("SELECT * FROM missing_table", &[]).await.unwrap_err();
        assert!(matches!(err, AtlasError::Query(_)));

        let err = client
            .execute("INSERT INTO missing_table VALUES (1)", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, AtlasError::Mutation(_)));
    }

    #[tokio::test]
    async fn test_missing_directory_is_connection_error() {
        let client = client_at(std::path::Path::new("/nonexistent-dir/atlas.db"));
        let err = client.ping().await.unwrap_err();
        assert!(matches!(err, AtlasError::Connection(_)));
    }
}
