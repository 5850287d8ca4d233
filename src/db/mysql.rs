//! MySQL database client implementation.
//!
//! Provides the `MySqlClient` struct that implements the `DatabaseClient` trait
//! for MySQL databases using sqlx. Each call opens a dedicated connection.

use crate::config::ConnectionConfig;
use crate::db::errors::{format_store_error, is_connection_failure, map_connection_error};
use crate::db::{ColumnInfo, DatabaseBackend, DatabaseClient, QueryResult, Row, Value};
use crate::error::{AtlasError, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::mysql::{MySql, MySqlArguments, MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::query::Query;
use sqlx::{Column as SqlxColumn, Connection, Executor, Row as SqlxRow, Statement, TypeInfo};
use std::time::Instant;
use tracing::debug;

type MySqlQuery<'q> = Query<'q, MySql, MySqlArguments>;

/// MySQL database client.
#[derive(Debug, Clone)]
pub struct MySqlClient {
    options: MySqlConnectOptions,
    config: ConnectionConfig,
}

impl MySqlClient {
    /// Creates a client from connection settings without connecting.
    pub fn new(config: &ConnectionConfig) -> Result<Self> {
        let database = config.require_database()?;

        let mut options = MySqlConnectOptions::new()
            .host(config.host.as_deref().unwrap_or("localhost"))
            .port(config.effective_port())
            .database(database);
        if let Some(user) = &config.user {
            options = options.username(user);
        }
        if let Some(password) = &config.password {
            options = options.password(password);
        }

        Ok(Self {
            options,
            config: config.clone(),
        })
    }

    /// Opens a fresh connection. The caller is responsible for closing it.
    pub async fn acquire(&self) -> Result<MySqlConnection> {
        debug!("Opening MySQL connection to {}", self.config.display_string());
        MySqlConnection::connect_with(&self.options)
            .await
            .map_err(|e| map_connection_error(&e, &self.config))
    }

    async fn release(conn: MySqlConnection) {
        if let Err(e) = conn.close().await {
            debug!("Error while closing MySQL connection: {e}");
        }
    }

    /// Reads column metadata from a prepared statement, for empty results.
    async fn describe_columns(conn: &mut MySqlConnection, sql: &str) -> Vec<ColumnInfo> {
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
impl DatabaseClient for MySqlClient {
    fn backend(&self) -> DatabaseBackend {
        DatabaseBackend::MySql
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
                    Some(first) => column_info(first),
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
fn bind_all<'q>(mut query: MySqlQuery<'q>, params: &[Value]) -> MySqlQuery<'q> {
    for param in params {
        query = match param.clone() {
            Value::Null => query.bind(None::<String>),
            Value::Bool(b) => query.bind(b),
            Value::Int(i) => query.bind(i),
            Value::Float(f) => query.bind(f),
            Value::Decimal(d) => query.bind(d),
            Value::Date(d) => query.bind(d),
            Value::String(s) => query.bind(s),
            Value::Bytes(b) => query.bind(b),
        };
    }
    query
}

fn column_info(row: &MySqlRow) -> Vec<ColumnInfo> {
    row.columns()
        .iter()
        .map(|col| ColumnInfo::new(col.name(), col.type_info().name()))
        .collect()
}

/// Converts a sqlx MySqlRow to our Row type.
fn convert_row(row: &MySqlRow) -> Row {
    row.columns()
        .iter()
        .enumerate()
        .map(|(i, col)| convert_value(row, i, col.type_info().name()))
        .collect()
}

/// Converts a single column value from a MySqlRow to our Value type.
fn convert_value(row: &MySqlRow, index: usize, type_name: &str) -> Value {
    let type_name = type_name.to_uppercase();

    let value = match type_name.as_str() {
        "BOOLEAN" => decode::<bool>(row, index).map(Value::Bool),

        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => {
            decode::<i64>(row, index).map(Value::Int)
        }

        t if t.ends_with("UNSIGNED") => {
            decode::<u64>(row, index).map(|v| Value::Int(v as i64))
        }

        "DECIMAL" => decode::<Decimal>(row, index).map(Value::Decimal),

        "DOUBLE" => decode::<f64>(row, index).map(Value::Float),

        "FLOAT" => decode::<f32>(row, index).map(|v| Value::Float(v as f64)),

        "DATE" => decode::<chrono::NaiveDate>(row, index).map(Value::Date),

        "DATETIME" | "TIMESTAMP" => decode::<chrono::NaiveDateTime>(row, index)
            .map(|v| Value::String(v.format("%Y-%m-%d %H:%M:%S").to_string())),

        "BLOB" | "TINYBLOB" | "MEDIUMBLOB" | "LONGBLOB" | "BINARY" | "VARBINARY" => {
            decode::<Vec<u8>>(row, index).map(Value::Bytes)
        }

        // For all other types, try to get as string
        _ => decode::<String>(row, index).map(Value::String),
    };

    value.unwrap_or(Value::Null)
}

fn decode<'r, T>(row: &'r MySqlRow, index: usize) -> Option<T>
where
    T: sqlx::Decode<'r, MySql> + sqlx::Type<MySql>,
{
    row.try_get::<Option<T>, _>(index).ok().flatten()
}
