//! Startup records.

use std::time::Duration;

use serde::Serialize;
use tracing::info;

use super::record::RecordRow;
use super::validation::{founded_year, require_id, require_name, require_reference};
use super::{display_opt, FormField, Store};
use crate::db::{DatabaseClient, QueryResult, Value};
use crate::error::{AtlasError, Result};
use crate::reference::{Choice, LookupTable};

const LIST_SQL: &str = "SELECT s.Startup_ID, s.Name, s.Founded_Year, c.Name AS City, i.Sector \
     FROM startups s \
     LEFT JOIN cities c ON s.City_ID = c.City_ID \
     LEFT JOIN industries i ON s.Industry_ID = i.Industry_ID \
     ORDER BY s.Startup_ID ASC";

const LOAD_SQL: &str = "SELECT Startup_ID, Name, Founded_Year, City_ID, Industry_ID \
     FROM startups WHERE Startup_ID = ?";

const INSERT_SQL: &str = "INSERT INTO startups (Startup_ID, Name, Founded_Year, City_ID, Industry_ID) \
     VALUES (?, ?, ?, ?, ?)";

const UPDATE_SQL: &str = "UPDATE startups SET Name = ?, Founded_Year = ?, City_ID = ?, Industry_ID = ? \
     WHERE Startup_ID = ?";

const DELETE_SQL: &str = "DELETE FROM startups WHERE Startup_ID = ?";

/// Submitted startup fields. City and industry are display names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartupForm {
    pub name: String,
    pub founded_year: Option<i32>,
    pub city: String,
    pub industry: String,
}

impl StartupForm {
    pub fn validate(&self) -> Result<()> {
        require_name("Name", &self.name)?;
        founded_year(self.founded_year)?;
        require_reference("City", &self.city)?;
        require_reference("Industry", &self.industry)
    }
}

/// A startup form pre-filled from the stored row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartupEditForm {
    pub id: i64,
    pub name: String,
    pub founded_year: Option<i32>,
    pub city: Choice,
    pub industry: Choice,
}

impl StartupEditForm {
    /// The form as it would be submitted without changes.
    pub fn to_form(&self) -> StartupForm {
        StartupForm {
            name: self.name.clone(),
            founded_year: self.founded_year,
            city: self.city.stored_name().unwrap_or_default().to_string(),
            industry: self.industry.stored_name().unwrap_or_default().to_string(),
        }
    }

    pub fn fields(&self) -> Vec<FormField> {
        vec![
            FormField::text("Startup ID", self.id.to_string()),
            FormField::text("Name", &self.name),
            FormField::text("Founded Year", display_opt(&self.founded_year)),
            FormField::choice("City", &self.city),
            FormField::choice("Industry", &self.industry),
        ]
    }
}

struct StartupRecord {
    name: String,
    founded_year: Option<i32>,
    city_id: Option<i64>,
    industry_id: Option<i64>,
}

impl StartupRecord {
    fn from_row(row: &RecordRow<'_>) -> Result<Self> {
        Ok(Self {
            name: row.text("Name")?,
            founded_year: row
                .opt_int("Founded_Year")?
                .and_then(|y| i32::try_from(y).ok()),
            city_id: row.opt_int("City_ID")?,
            industry_id: row.opt_int("Industry_ID")?,
        })
    }
}

/// List/create/update/delete for the `startups` table.
pub struct StartupController<'a> {
    store: Store<'a>,
}

impl<'a> StartupController<'a> {
    pub fn new(db: &'a dyn DatabaseClient, timeout: Duration) -> Self {
        Self {
            store: Store::new(db, timeout),
        }
    }

    /// All startups with city and sector names, by id.
    pub async fn list(&self) -> Result<QueryResult> {
        self.store.queries.run(LIST_SQL, &[]).await
    }

    pub async fn create(&self, id: i64, form: &StartupForm) -> Result<()> {
        require_id("Startup", id)?;
        form.validate()?;
        let (city_id, industry_id) = self.resolve(form).await?;

        self.store
            .mutations
            .run(
                INSERT_SQL,
                &[
                    Value::Int(id),
                    Value::from(form.name.trim()),
                    Value::from(form.founded_year),
                    Value::Int(city_id),
                    Value::Int(industry_id),
                ],
            )
            .await?;
        info!("Created startup {} ({})", id, form.name.trim());
        Ok(())
    }

    /// Loads the stored row and pre-selects its city and industry.
    pub async fn edit_form(&self, id: i64) -> Result<StartupEditForm> {
        let record = self
            .load(id)
            .await?
            .ok_or_else(|| AtlasError::query(format!("Startup {id} not found")))?;
        let cities = self.store.references.load_lookup(LookupTable::City).await?;
        let industries = self
            .store
            .references
            .load_lookup(LookupTable::Industry)
            .await?;

        Ok(StartupEditForm {
            id,
            name: record.name,
            founded_year: record.founded_year,
            city: cities.choice(record.city_id),
            industry: industries.choice(record.industry_id),
        })
    }

    /// Overwrites every field of an existing startup.
    pub async fn update(&self, id: i64, form: &StartupForm) -> Result<()> {
        require_id("Startup", id)?;
        form.validate()?;
        if self.load(id).await?.is_none() {
            return Err(AtlasError::mutation(format!("Startup {id} does not exist")));
        }
        let (city_id, industry_id) = self.resolve(form).await?;

        self.store
            .mutations
            .run_expecting_rows(
                UPDATE_SQL,
                &[
                    Value::from(form.name.trim()),
                    Value::from(form.founded_year),
                    Value::Int(city_id),
                    Value::Int(industry_id),
                    Value::Int(id),
                ],
                &format!("Startup {id}"),
            )
            .await?;
        info!("Updated startup {}", id);
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        require_id("Startup", id)?;
        self.store
            .mutations
            .run_expecting_rows(DELETE_SQL, &[Value::Int(id)], &format!("Startup {id}"))
            .await?;
        info!("Deleted startup {}", id);
        Ok(())
    }

    async fn load(&self, id: i64) -> Result<Option<StartupRecord>> {
        let result = self.store.queries.run(LOAD_SQL, &[Value::Int(id)]).await?;
        RecordRow::first(&result)
            .map(|row| StartupRecord::from_row(&row))
            .transpose()
    }

    async fn resolve(&self, form: &StartupForm) -> Result<(i64, i64)> {
        let cities = self.store.references.load_lookup(LookupTable::City).await?;
        let industries = self
            .store
            .references
            .load_lookup(LookupTable::Industry)
            .await?;
        Ok((cities.id_for(&form.city)?, industries.id_for(&form.industry)?))
    }
}
