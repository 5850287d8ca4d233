//! Typed access to a single row of a result set.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::db::{QueryResult, Value};
use crate::error::{AtlasError, Result};

pub(crate) struct RecordRow<'r> {
    result: &'r QueryResult,
    index: usize,
}

impl<'r> RecordRow<'r> {
    /// The first row of a result, if any.
    pub fn first(result: &'r QueryResult) -> Option<Self> {
        (!result.is_empty()).then_some(Self { result, index: 0 })
    }

    fn get(&self, column: &str) -> Result<&'r Value> {
        self.result
            .value(self.index, column)
            .ok_or_else(|| AtlasError::query(format!("Column {column} missing from result")))
    }

    pub fn int(&self, column: &str) -> Result<i64> {
        self.opt_int(column)?
            .ok_or_else(|| AtlasError::query(format!("Column {column} is NULL")))
    }

    pub fn opt_int(&self, column: &str) -> Result<Option<i64>> {
        let value = self.get(column)?;
        if value.is_null() {
            return Ok(None);
        }
        value
            .as_i64()
            .map(Some)
            .ok_or_else(|| AtlasError::query(format!("Column {column} is not an integer")))
    }

    /// Text value; NULL reads as an empty string.
    pub fn text(&self, column: &str) -> Result<String> {
        Ok(self.get(column)?.as_text().unwrap_or_default())
    }

    pub fn opt_text(&self, column: &str) -> Result<Option<String>> {
        Ok(self.get(column)?.as_text())
    }

    pub fn opt_decimal(&self, column: &str) -> Result<Option<Decimal>> {
        let value = self.get(column)?;
        if value.is_null() {
            return Ok(None);
        }
        value
            .as_decimal()
            .map(Some)
            .ok_or_else(|| AtlasError::query(format!("Column {column} is not a number")))
    }

    pub fn opt_date(&self, column: &str) -> Result<Option<NaiveDate>> {
        let value = self.get(column)?;
        if value.is_null() {
            return Ok(None);
        }
        value
            .as_date()
            .map(Some)
            .ok_or_else(|| AtlasError::query(format!("Column {column} is not a date")))
    }
}
