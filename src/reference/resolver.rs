//! Store-backed lookup loading.

use std::time::Duration;

use tracing::debug;

use super::{Lookup, LookupTable};
use crate::db::{DatabaseClient, Value};
use crate::error::Result;
use crate::query::QueryExecutor;

/// Loads lookups and reverse-resolves ids through the query executor.
pub struct ReferenceResolver<'a> {
    queries: QueryExecutor<'a>,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(db: &'a dyn DatabaseClient, timeout: Duration) -> Self {
        Self {
            queries: QueryExecutor::new(db).with_timeout(timeout),
        }
    }

    /// Loads every (id, name) pair of a lookup table, ordered by name.
    pub async fn load_lookup(&self, table: LookupTable) -> Result<Lookup> {
        let result = self.queries.run(&table.select_all_sql(), &[]).await?;
        debug!("Loaded {} options from {}", result.row_count, table);
        Lookup::from_result(table, &result)
    }

    /// Returns the current display name of `id`, or `None` if it does not
    /// exist.
    pub async fn id_to_name(&self, table: LookupTable, id: i64) -> Result<Option<String>> {
        let result = self
            .queries
            .run(&table.select_name_sql(), &[Value::Int(id)])
            .await?;
        Ok(result.scalar().and_then(|v| v.as_text()))
    }
}
