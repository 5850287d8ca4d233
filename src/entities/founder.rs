//! Founder records.

use std::time::Duration;

use serde::Serialize;
use tracing::info;

use super::record::RecordRow;
use super::validation::{linkedin_url, require_id, require_name, require_reference};
use super::{FormField, Store};
use crate::db::{DatabaseClient, QueryResult, Value};
use crate::error::{AtlasError, Result};
use crate::reference::{Choice, LookupTable};

const LIST_SQL: &str = "SELECT f.Founder_ID, f.Name, s.Name AS Startup, f.Role, f.LinkedIn_URL \
     FROM founders f \
     LEFT JOIN startups s ON f.Startup_ID = s.Startup_ID \
     ORDER BY f.Founder_ID ASC";

const LOAD_SQL: &str =
    "SELECT Founder_ID, Name, Startup_ID, Role, LinkedIn_URL FROM founders WHERE Founder_ID = ?";

const INSERT_SQL: &str = "INSERT INTO founders (Founder_ID, Name, Startup_ID, Role, LinkedIn_URL) \
     VALUES (?, ?, ?, ?, ?)";

const UPDATE_SQL: &str = "UPDATE founders SET Name = ?, Role = ?, LinkedIn_URL = ?, Startup_ID = ? \
     WHERE Founder_ID = ?";

const DELETE_SQL: &str = "DELETE FROM founders WHERE Founder_ID = ?";

/// Blank role and URL are stored as NULL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FounderForm {
    pub name: String,
    /// Startup display name.
    pub startup: String,
    pub role: String,
    pub linkedin_url: String,
}

impl FounderForm {
    pub fn validate(&self) -> Result<()> {
        require_name("Name", &self.name)?;
        require_reference("Startup", &self.startup)?;
        linkedin_url(&self.linkedin_url)
    }

    fn params(&self) -> (Value, Value, Value) {
        (
            Value::from(self.name.trim()),
            optional_text(&self.role),
            optional_text(&self.linkedin_url),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FounderEditForm {
    pub id: i64,
    pub name: String,
    pub startup: Choice,
    pub role: String,
    pub linkedin_url: String,
}

impl FounderEditForm {
    pub fn to_form(&self) -> FounderForm {
        FounderForm {
            name: self.name.clone(),
            startup: self.startup.stored_name().unwrap_or_default().to_string(),
            role: self.role.clone(),
            linkedin_url: self.linkedin_url.clone(),
        }
    }

    pub fn fields(&self) -> Vec<FormField> {
        vec![
            FormField::text("Founder ID", self.id.to_string()),
            FormField::text("Name", &self.name),
            FormField::choice("Startup", &self.startup),
            FormField::text("Role", &self.role),
            FormField::text("LinkedIn URL", &self.linkedin_url),
        ]
    }
}

/// List/create/update/delete for the `founders` table.
pub struct FounderController<'a> {
    store: Store<'a>,
}

impl<'a> FounderController<'a> {
    pub fn new(db: &'a dyn DatabaseClient, timeout: Duration) -> Self {
        Self {
            store: Store::new(db, timeout),
        }
    }

    pub async fn list(&self) -> Result<QueryResult> {
        self.store.queries.run(LIST_SQL, &[]).await
    }

    pub async fn create(&self, id: i64, form: &FounderForm) -> Result<()> {
        require_id("Founder", id)?;
        form.validate()?;
        let startup_id = self.resolve_startup(&form.startup).await?;
        let (name, role, url) = form.params();

        self.store
            .mutations
            .run(
                INSERT_SQL,
                &[Value::Int(id), name, Value::Int(startup_id), role, url],
            )
            .await?;
        info!("Created founder {} ({})", id, form.name.trim());
        Ok(())
    }

    pub async fn edit_form(&self, id: i64) -> Result<FounderEditForm> {
        let result = self.store.queries.run(LOAD_SQL, &[Value::Int(id)]).await?;
        let row = RecordRow::first(&result)
            .ok_or_else(|| AtlasError::query(format!("Founder {id} not found")))?;
        let startups = self
            .store
            .references
            .load_lookup(LookupTable::Startup)
            .await?;

        Ok(FounderEditForm {
            id,
            name: row.text("Name")?,
            startup: startups.choice(row.opt_int("Startup_ID")?),
            role: row.text("Role")?,
            linkedin_url: row.text("LinkedIn_URL")?,
        })
    }

    pub async fn update(&self, id: i64, form: &FounderForm) -> Result<()> {
        require_id("Founder", id)?;
        form.validate()?;
        let existing = self.store.queries.run(LOAD_SQL, &[Value::Int(id)]).await?;
        if existing.is_empty() {
            return Err(AtlasError::mutation(format!("Founder {id} does not exist")));
        }
        let startup_id = self.resolve_startup(&form.startup).await?;
        let (name, role, url) = form.params();

        self.store
            .mutations
            .run_expecting_rows(
                UPDATE_SQL,
                &[name, role, url, Value::Int(startup_id), Value::Int(id)],
                &format!("Founder {id}"),
            )
            .await?;
        info!("Updated founder {}", id);
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        require_id("Founder", id)?;
        self.store
            .mutations
            .run_expecting_rows(DELETE_SQL, &[Value::Int(id)], &format!("Founder {id}"))
            .await?;
        info!("Deleted founder {}", id);
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

fn optional_text(value: &str) -> Value {
    match value.trim() {
        "" => Value::Null,
        trimmed => Value::from(trimmed),
    }
}
