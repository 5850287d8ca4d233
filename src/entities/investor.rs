//! Investor records.

use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};

use super::record::RecordRow;
use super::validation::{require_id, require_name, require_reference};
use super::{FormField, InvestorType, Store};
use crate::db::{DatabaseClient, QueryResult, Value};
use crate::error::{AtlasError, Result};
use crate::reference::{Choice, LookupTable};

const LIST_SQL: &str = "SELECT i.Investor_ID, i.Name, i.Type, c.Name AS Country \
     FROM investors i \
     LEFT JOIN countries c ON i.Country_ID = c.Country_ID \
     ORDER BY i.Investor_ID ASC";

const LOAD_SQL: &str = "SELECT Investor_ID, Name, Type, Country_ID FROM investors WHERE Investor_ID = ?";

const INSERT_SQL: &str =
    "INSERT INTO investors (Investor_ID, Name, Type, Country_ID) VALUES (?, ?, ?, ?)";

const UPDATE_SQL: &str =
    "UPDATE investors SET Name = ?, Type = ?, Country_ID = ? WHERE Investor_ID = ?";

const DELETE_SQL: &str = "DELETE FROM investors WHERE Investor_ID = ?";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvestorForm {
    pub name: String,
    pub investor_type: InvestorType,
    /// Country display name.
    pub country: String,
}

impl InvestorForm {
    pub fn validate(&self) -> Result<()> {
        require_name("Name", &self.name)?;
        require_reference("Country", &self.country)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvestorEditForm {
    pub id: i64,
    pub name: String,
    pub investor_type: InvestorType,
    pub country: Choice,
}

impl InvestorEditForm {
    pub fn to_form(&self) -> InvestorForm {
        InvestorForm {
            name: self.name.clone(),
            investor_type: self.investor_type,
            country: self.country.stored_name().unwrap_or_default().to_string(),
        }
    }

    pub fn fields(&self) -> Vec<FormField> {
        let types = Choice::from_labels(&InvestorType::LABELS, Some(self.investor_type.label()));
        vec![
            FormField::text("Investor ID", self.id.to_string()),
            FormField::text("Name", &self.name),
            FormField::choice("Type", &types),
            FormField::choice("Country", &self.country),
        ]
    }
}

/// List/create/update/delete for the `investors` table.
pub struct InvestorController<'a> {
    store: Store<'a>,
}

impl<'a> InvestorController<'a> {
    pub fn new(db: &'a dyn DatabaseClient, timeout: Duration) -> Self {
        Self {
            store: Store::new(db, timeout),
        }
    }

    pub async fn list(&self) -> Result<QueryResult> {
        self.store.queries.run(LIST_SQL, &[]).await
    }

    pub async fn create(&self, id: i64, form: &InvestorForm) -> Result<()> {
        require_id("Investor", id)?;
        form.validate()?;
        let country_id = self.resolve_country(&form.country).await?;

        self.store
            .mutations
            .run(
                INSERT_SQL,
                &[
                    Value::Int(id),
                    Value::from(form.name.trim()),
                    Value::from(form.investor_type.label()),
                    Value::Int(country_id),
                ],
            )
            .await?;
        info!("Created investor {} ({})", id, form.name.trim());
        Ok(())
    }

    /// Loads the stored row. An unrecognized stored type selects the first
    /// label.
    pub async fn edit_form(&self, id: i64) -> Result<InvestorEditForm> {
        let result = self.store.queries.run(LOAD_SQL, &[Value::Int(id)]).await?;
        let row = RecordRow::first(&result)
            .ok_or_else(|| AtlasError::query(format!("Investor {id} not found")))?;

        let stored_type = row.opt_text("Type")?;
        let investor_type = match stored_type.as_deref().and_then(InvestorType::from_label) {
            Some(t) => t,
            None => {
                warn!(
                    "Investor {} has unrecognized type {:?}; defaulting to {}",
                    id,
                    stored_type,
                    InvestorType::ALL[0]
                );
                InvestorType::ALL[0]
            }
        };
        let countries = self
            .store
            .references
            .load_lookup(LookupTable::Country)
            .await?;

        Ok(InvestorEditForm {
            id,
            name: row.text("Name")?,
            investor_type,
            country: countries.choice(row.opt_int("Country_ID")?),
        })
    }

    pub async fn update(&self, id: i64, form: &InvestorForm) -> Result<()> {
        require_id("Investor", id)?;
        form.validate()?;
        let existing = self.store.queries.run(LOAD_SQL, &[Value::Int(id)]).await?;
        if existing.is_empty() {
            return Err(AtlasError::mutation(format!("Investor {id} does not exist")));
        }
        let country_id = self.resolve_country(&form.country).await?;

        self.store
            .mutations
            .run_expecting_rows(
                UPDATE_SQL,
                &[
                    Value::from(form.name.trim()),
                    Value::from(form.investor_type.label()),
                    Value::Int(country_id),
                    Value::Int(id),
                ],
                &format!("Investor {id}"),
            )
            .await?;
        info!("Updated investor {}", id);
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        require_id("Investor", id)?;
        self.store
            .mutations
            .run_expecting_rows(DELETE_SQL, &[Value::Int(id)], &format!("Investor {id}"))
            .await?;
        info!("Deleted investor {}", id);
        Ok(())
    }

    async fn resolve_country(&self, name: &str) -> Result<i64> {
        self.store
            .references
            .load_lookup(LookupTable::Country)
            .await?
            .id_for(name)
    }
}
