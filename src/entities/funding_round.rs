//! Funding round records.

use std::time::Duration;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use super::record::RecordRow;
use super::validation::{non_negative_amount, require_id, require_reference};
use super::{display_opt, FormField, FundingStage, Store};
use crate::db::{DatabaseClient, QueryResult, Value};
use crate::error::{AtlasError, Result};
use crate::reference::{Choice, LookupTable};

const LIST_SQL: &str = "SELECT fr.Round_ID, s.Name AS Startup, fr.Date, fr.Amount, fr.Stage \
     FROM funding_rounds fr \
     JOIN startups s ON fr.Startup_ID = s.Startup_ID \
     ORDER BY fr.Round_ID ASC";

const LOAD_SQL: &str =
    "SELECT Round_ID, Startup_ID, Date, Amount, Stage FROM funding_rounds WHERE Round_ID = ?";

const INSERT_SQL: &str = "INSERT INTO funding_rounds (Round_ID, Startup_ID, Date, Amount, Stage) \
     VALUES (?, ?, ?, ?, ?)";

const UPDATE_SQL: &str = "UPDATE funding_rounds SET Date = ?, Amount = ?, Stage = ?, Startup_ID = ? \
     WHERE Round_ID = ?";

const DELETE_SQL: &str = "DELETE FROM funding_rounds WHERE Round_ID = ?";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FundingRoundForm {
    /// Startup display name.
    pub startup: String,
    pub date: Option<NaiveDate>,
    pub amount: Option<Decimal>,
    pub stage: FundingStage,
}

impl FundingRoundForm {
    pub fn validate(&self) -> Result<()> {
        require_reference("Startup", &self.startup)?;
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
pub struct FundingRoundEditForm {
    pub id: i64,
    pub startup: Choice,
    pub date: Option<NaiveDate>,
    pub amount: Option<Decimal>,
    pub stage: FundingStage,
}

impl FundingRoundEditForm {
    pub fn to_form(&self) -> FundingRoundForm {
        FundingRoundForm {
            startup: self.startup.stored_name().unwrap_or_default().to_string(),
            date: self.date,
            amount: self.amount,
            stage: self.stage,
        }
    }

    pub fn fields(&self) -> Vec<FormField> {
        let stages = Choice::from_labels(&FundingStage::LABELS, Some(self.stage.label()));
        vec![
            FormField::text("Round ID", self.id.to_string()),
            FormField::choice("Startup", &self.startup),
            FormField::text("Date", display_opt(&self.date)),
            FormField::text("Amount (₹)", display_opt(&self.amount)),
            FormField::choice("Stage", &stages),
        ]
    }
}

/// List/create/update/delete for the `funding_rounds` table.
pub struct FundingRoundController<'a> {
    store: Store<'a>,
}

impl<'a> FundingRoundController<'a> {
    pub fn new(db: &'a dyn DatabaseClient, timeout: Duration) -> Self {
        Self {
            store: Store::new(db, timeout),
        }
    }

    pub async fn list(&self) -> Result<QueryResult> {
        self.store.queries.run(LIST_SQL, &[]).await
    }

    pub async fn create(&self, id: i64, form: &FundingRoundForm) -> Result<()> {
        require_id("Round", id)?;
        form.validate()?;
        let startup_id = self.resolve_startup(&form.startup).await?;

        self.store
            .mutations
            .run(
                INSERT_SQL,
                &[
                    Value::Int(id),
                    Value::Int(startup_id),
                    Value::from(form.date),
                    Value::from(form.amount),
                    Value::from(form.stage.label()),
                ],
            )
            .await?;
        info!("Created funding round {} for {}", id, form.startup);
        Ok(())
    }

    pub async fn edit_form(&self, id: i64) -> Result<FundingRoundEditForm> {
        let result = self.store.queries.run(LOAD_SQL, &[Value::Int(id)]).await?;
        let row = RecordRow::first(&result)
            .ok_or_else(|| AtlasError::query(format!("Round {id} not found")))?;

        let stored_stage = row.opt_text("Stage")?;
        let stage = match stored_stage.as_deref().and_then(FundingStage::from_label) {
            Some(stage) => stage,
            None => {
                warn!(
                    "Round {} has unrecognized stage {:?}; defaulting to {}",
                    id,
                    stored_stage,
                    FundingStage::ALL[0]
                );
                FundingStage::ALL[0]
            }
        };
        let startups = self
            .store
            .references
            .load_lookup(LookupTable::Startup)
            .await?;

        Ok(FundingRoundEditForm {
            id,
            startup: startups.choice(row.opt_int("Startup_ID")?),
            date: row.opt_date("Date")?,
            amount: row.opt_decimal("Amount")?,
            stage,
        })
    }

    pub async fn update(&self, id: i64, form: &FundingRoundForm) -> Result<()> {
        require_id("Round", id)?;
        form.validate()?;
        let existing = self.store.queries.run(LOAD_SQL, &[Value::Int(id)]).await?;
        if existing.is_empty() {
            return Err(AtlasError::mutation(format!("Round {id} does not exist")));
        }
        let startup_id = self.resolve_startup(&form.startup).await?;

        self.store
            .mutations
            .run_expecting_rows(
                UPDATE_SQL,
                &[
                    Value::from(form.date),
                    Value::from(form.amount),
                    Value::from(form.stage.label()),
                    Value::Int(startup_id),
                    Value::Int(id),
                ],
                &format!("Round {id}"),
            )
            .await?;
        info!("Updated funding round {}", id);
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        require_id("Round", id)?;
        self.store
            .mutations
            .run_expecting_rows(DELETE_SQL, &[Value::Int(id)], &format!("Round {id}"))
            .await?;
        info!("Deleted funding round {}", id);
        Ok(())
    }

    async fn resolve_startup(&self, name: &str) -> Result<i64> {
        self.store
            .references
            .load_lookup(LookupTable::Startup)
            .await?
            .id_for(name)
    }
}
