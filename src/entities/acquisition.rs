//! Acquisition records.
//!
//! Acquisitions have no surrogate id; the primary key is (acquirer, target,
//! date). A row is addressed through an [`AcquisitionSelection`] that captures
//! every column as it was read, and updates and deletes only touch the row if
//! it still matches that capture.

use std::fmt;
use std::time::Duration;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use super::record::RecordRow;
use super::validation::{distinct_parties, non_negative_amount, require_id, require_reference};
use super::{display_opt, FormField, Store};
use crate::db::{DatabaseClient, QueryResult, Value};
use crate::error::{AtlasError, Result};
use crate::reference::{Choice, LookupTable};

const LIST_SQL: &str = "SELECT a.Acquirer_Startup_ID AS Acquirer_ID, s1.Name AS Acquirer, \
     a.Target_Startup_ID AS Target_ID, s2.Name AS Target, a.Date, a.Amount \
     FROM acquisitions a \
     JOIN startups s1 ON a.Acquirer_Startup_ID = s1.Startup_ID \
     JOIN startups s2 ON a.Target_Startup_ID = s2.Startup_ID \
     ORDER BY a.Acquirer_Startup_ID ASC, a.Target_Startup_ID ASC, a.Date ASC";

const SELECT_SQL: &str = "SELECT Acquirer_Startup_ID, Target_Startup_ID, Date, Amount \
     FROM acquisitions \
     WHERE Acquirer_Startup_ID = ? AND Target_Startup_ID = ? AND Date = ?";

const INSERT_SQL: &str = "INSERT INTO acquisitions (Acquirer_Startup_ID, Target_Startup_ID, Date, Amount) \
     VALUES (?, ?, ?, ?)";

// The trailing amount test matches NULL against NULL.
const UPDATE_SQL: &str = "UPDATE acquisitions \
     SET Acquirer_Startup_ID = ?, Target_Startup_ID = ?, Date = ?, Amount = ? \
     WHERE Acquirer_Startup_ID = ? AND Target_Startup_ID = ? AND Date = ? \
     AND (Amount = ? OR (Amount IS NULL AND ? IS NULL))";

const DELETE_SQL: &str = "DELETE FROM acquisitions \
     WHERE Acquirer_Startup_ID = ? AND Target_Startup_ID = ? AND Date = ? \
     AND (Amount = ? OR (Amount IS NULL AND ? IS NULL))";

/// An acquisition row exactly as it was read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AcquisitionSelection {
    pub acquirer_id: i64,
    pub target_id: i64,
    pub date: NaiveDate,
    pub amount: Option<Decimal>,
}

impl AcquisitionSelection {
    /// Parameters that match this row and nothing else.
    fn match_params(&self) -> [Value; 5] {
        [
            Value::Int(self.acquirer_id),
            Value::Int(self.target_id),
            Value::Date(self.date),
            Value::from(self.amount),
            Value::from(self.amount),
        ]
    }
}

impl fmt::Display for AcquisitionSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Acquisition {} → {} on {}",
            self.acquirer_id, self.target_id, self.date
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AcquisitionForm {
    /// Acquirer startup display name.
    pub acquirer: String,
    /// Target startup display name.
    pub target: String,
    pub date: Option<NaiveDate>,
    pub amount: Option<Decimal>,
}

impl AcquisitionForm {
    pub fn validate(&self) -> Result<()> {
        require_reference("Acquirer", &self.acquirer)?;
        require_reference("Target", &self.target)?;
        distinct_parties(&self.acquirer, &self.target)?;
        if self.date.is_none() {
            return Err(AtlasError::validation("Date is required"));
        }
        match &self.amount {
            Some(amount) => non_negative_amount(amount),
            None => Err(AtlasError::validation("Amount is required")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AcquisitionEditForm {
    pub selection: AcquisitionSelection,
    pub acquirer: Choice,
    pub target: Choice,
    pub date: NaiveDate,
    pub amount: Option<Decimal>,
}

impl AcquisitionEditForm {
    pub fn to_form(&self) -> AcquisitionForm {
        AcquisitionForm {
            acquirer: self.acquirer.stored_name().unwrap_or_default().to_string(),
            target: self.target.stored_name().unwrap_or_default().to_string(),
            date: Some(self.date),
            amount: self.amount,
        }
    }

    pub fn fields(&self) -> Vec<FormField> {
        vec![
            FormField::choice("Acquirer", &self.acquirer),
            FormField::choice("Target", &self.target),
            FormField::text("Date", self.date.to_string()),
            FormField::text("Amount (₹)", display_opt(&self.amount)),
        ]
    }
}

/// List/create/update/delete for the `acquisitions` table.
pub struct AcquisitionController<'a> {
    store: Store<'a>,
}

impl<'a> AcquisitionController<'a> {
    pub fn new(db: &'a dyn DatabaseClient, timeout: Duration) -> Self {
        Self {
            store: Store::new(db, timeout),
        }
    }

    /// All acquisitions, newest first.
    pub async fn list(&self) -> Result<QueryResult> {
        self.store.queries.run(LIST_SQL, &[]).await
    }

    pub async fn create(&self, form: &AcquisitionForm) -> Result<()> {
        form.validate()?;
        let (acquirer_id, target_id) = self.resolve_parties(form).await?;

        self.store
            .mutations
            .run(
                INSERT_SQL,
                &[
                    Value::Int(acquirer_id),
                    Value::Int(target_id),
                    Value::from(form.date),
                    Value::from(form.amount),
                ],
            )
            .await?;
        info!(
            "Created acquisition {} → {} ({} → {})",
            form.acquirer, form.target, acquirer_id, target_id
        );
        Ok(())
    }

    /// Reads the row with the given key and captures it for later writes.
    pub async fn select(
        &self,
        acquirer_id: i64,
        target_id: i64,
        date: NaiveDate,
    ) -> Result<AcquisitionSelection> {
        require_id("Acquirer", acquirer_id)?;
        require_id("Target", target_id)?;
        let result = self
            .store
            .queries
            .run(
                SELECT_SQL,
                &[
                    Value::Int(acquirer_id),
                    Value::Int(target_id),
                    Value::Date(date),
                ],
            )
            .await?;
        let row = RecordRow::first(&result).ok_or_else(|| {
            AtlasError::query(format!(
                "Acquisition {acquirer_id} → {target_id} on {date} not found"
            ))
        })?;

        Ok(AcquisitionSelection {
            acquirer_id: row.int("Acquirer_Startup_ID")?,
            target_id: row.int("Target_Startup_ID")?,
            date: row.opt_date("Date")?.unwrap_or(date),
            amount: row.opt_decimal("Amount")?,
        })
    }

    /// Builds the edit form from the captured row.
    pub async fn edit_form(&self, selection: &AcquisitionSelection) -> Result<AcquisitionEditForm> {
        let startups = self
            .store
            .references
            .load_lookup(LookupTable::Startup)
            .await?;

        Ok(AcquisitionEditForm {
            selection: selection.clone(),
            acquirer: startups.choice(Some(selection.acquirer_id)),
            target: startups.choice(Some(selection.target_id)),
            date: selection.date,
            amount: selection.amount,
        })
    }

    /// Rewrites the selected row, provided it has not changed since it was
    /// selected.
    pub async fn update(
        &self,
        selection: &AcquisitionSelection,
        form: &AcquisitionForm,
    ) -> Result<()> {
        form.validate()?;
        let (acquirer_id, target_id) = self.resolve_parties(form).await?;

        let mut params = vec![
            Value::Int(acquirer_id),
            Value::Int(target_id),
            Value::from(form.date),
            Value::from(form.amount),
        ];
        params.extend(selection.match_params());

        self.store
            .mutations
            .run_expecting_rows(UPDATE_SQL, &params, &selection.to_string())
            .await?;
        info!("Updated {}", selection);
        Ok(())
    }

    /// Deletes the selected row, provided it has not changed since it was
    /// selected.
    pub async fn delete(&self, selection: &AcquisitionSelection) -> Result<()> {
        self.store
            .mutations
            .run_expecting_rows(DELETE_SQL, &selection.match_params(), &selection.to_string())
            .await?;
        info!("Deleted {}", selection);
        Ok(())
    }

    async fn resolve_parties(&self, form: &AcquisitionForm) -> Result<(i64, i64)> {
        let startups = self
            .store
            .references
            .load_lookup(LookupTable::Startup)
            .await?;
        let acquirer_id = startups.id_for(form.acquirer.trim())?;
        let target_id = startups.id_for(form.target.trim())?;
        if acquirer_id == target_id {
            return Err(AtlasError::validation(
                "Cannot acquire itself: acquirer and target are the same startup",
            ));
        }
        Ok((acquirer_id, target_id))
    }
}
