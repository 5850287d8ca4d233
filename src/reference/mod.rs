//! Lookup tables and display-name resolution.
//!
//! Foreign-key fields are edited by display name (a city name, a sector, a
//! startup name). This module loads the "name → id" pairs for a lookup table
//! and maps between the two, flagging names that are not unique.

mod resolver;

pub use resolver::ReferenceResolver;

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use tracing::warn;

use crate::db::QueryResult;
use crate::error::{AtlasError, Result};

/// Tables whose rows are offered as dropdown options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LookupTable {
    City,
    Country,
    Industry,
    Startup,
}

impl LookupTable {
    pub fn table(&self) -> &'static str {
        match self {
            Self::City => "cities",
            Self::Country => "countries",
            Self::Industry => "industries",
            Self::Startup => "startups",
        }
    }

    pub fn id_column(&self) -> &'static str {
        match self {
            Self::City => "City_ID",
            Self::Country => "Country_ID",
            Self::Industry => "Industry_ID",
            Self::Startup => "Startup_ID",
        }
    }

    /// Column shown to the operator.
    pub fn name_column(&self) -> &'static str {
        match self {
            Self::Industry => "Sector",
            _ => "Name",
        }
    }

    /// Singular label used in messages, e.g. "city".
    pub fn label(&self) -> &'static str {
        match self {
            Self::City => "city",
            Self::Country => "country",
            Self::Industry => "industry",
            Self::Startup => "startup",
        }
    }

    /// Parses a table from user input ("city", "cities", ...).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "city" | "cities" => Some(Self::City),
            "country" | "countries" => Some(Self::Country),
            "industry" | "industries" | "sector" | "sectors" => Some(Self::Industry),
            "startup" | "startups" => Some(Self::Startup),
            _ => None,
        }
    }

    pub(crate) fn select_all_sql(&self) -> String {
        format!(
            "SELECT {id}, {name} FROM {table} ORDER BY {name} ASC",
            id = self.id_column(),
            name = self.name_column(),
            table = self.table()
        )
    }

    pub(crate) fn select_name_sql(&self) -> String {
        format!(
            "SELECT {name} FROM {table} WHERE {id} = ?",
            id = self.id_column(),
            name = self.name_column(),
            table = self.table()
        )
    }
}

impl fmt::Display for LookupTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.table())
    }
}

/// One dropdown option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupEntry {
    pub id: i64,
    pub name: String,
}

/// Display names of a lookup table in store order, with their ids.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lookup {
    table: LookupTable,
    entries: Vec<LookupEntry>,
}

impl Lookup {
    /// Builds a lookup from entries already in display order.
    pub fn new(table: LookupTable, entries: Vec<LookupEntry>) -> Self {
        let lookup = Self { table, entries };
        let duplicates = lookup.duplicate_names();
        if !duplicates.is_empty() {
            warn!(
                "Lookup {} has ambiguous display names: {}",
                table,
                duplicates.join(", ")
            );
        }
        lookup
    }

    /// Builds a lookup from a two-column (id, name) result set.
    pub fn from_result(table: LookupTable, result: &QueryResult) -> Result<Self> {
        let entries = result
            .rows
            .iter()
            .map(|row| {
                let id = row.first().and_then(|v| v.as_i64());
                let name = row.get(1).and_then(|v| v.as_text());
                match (id, name) {
                    (Some(id), Some(name)) => Ok(LookupEntry { id, name }),
                    _ => Err(AtlasError::query(format!(
                        "Malformed row in lookup table {table}"
                    ))),
                }
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(table, entries))
    }

    pub fn table(&self) -> LookupTable {
        self.table
    }

    pub fn entries(&self) -> &[LookupEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Display names in order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    /// Resolves a display name to its id.
    ///
    /// Unknown names and names shared by several rows are rejected.
    pub fn id_for(&self, name: &str) -> Result<i64> {
        if self.entries.is_empty() {
            return Err(AtlasError::validation(format!(
                "No {} options exist in {}",
                self.table.label(),
                self.table
            )));
        }
        let mut matches = self.entries.iter().filter(|e| e.name == name);
        match (matches.next(), matches.next()) {
            (Some(entry), None) => Ok(entry.id),
            (Some(_), Some(_)) => {
                warn!("Ambiguous {} name '{}'", self.table.label(), name);
                Err(AtlasError::validation(format!(
                    "{} '{}' is ambiguous: several rows in {} share this name",
                    capitalize(self.table.label()),
                    name,
                    self.table
                )))
            }
            (None, _) => Err(AtlasError::validation(format!(
                "Unknown {} '{}'",
                self.table.label(),
                name
            ))),
        }
    }

    /// Resolves an id to its display name.
    pub fn name_for(&self, id: i64) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.name.as_str())
    }

    /// Names that appear on more than one row.
    pub fn duplicate_names(&self) -> Vec<&str> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for entry in &self.entries {
            *counts.entry(entry.name.as_str()).or_default() += 1;
        }
        let mut duplicates: Vec<&str> = counts
            .into_iter()
            .filter(|(_, n)| *n > 1)
            .map(|(name, _)| name)
            .collect();
        duplicates.sort_unstable();
        duplicates
    }

    /// Builds a dropdown pre-selected on `current_id`.
    ///
    /// An id that is unset or no longer resolves selects the first option and
    /// leaves the choice unresolved.
    pub fn choice(&self, current_id: Option<i64>) -> Choice {
        let options: Vec<String> = self.entries.iter().map(|e| e.name.clone()).collect();
        let position = current_id.and_then(|id| self.entries.iter().position(|e| e.id == id));
        if let (Some(id), None) = (current_id, position) {
            warn!(
                "{} id {} no longer exists; defaulting to first option",
                capitalize(self.table.label()),
                id
            );
        }
        Choice {
            options,
            selected: position.unwrap_or(0),
            resolved: position.is_some(),
        }
    }
}

/// A dropdown: every option plus the selected index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub options: Vec<String>,
    pub selected: usize,
    /// Whether `selected` is the stored value rather than a fallback.
    pub resolved: bool,
}

impl Choice {
    /// Builds a choice over fixed labels, selecting `current` when it is one
    /// of them and the first label otherwise.
    pub fn from_labels(labels: &[&str], current: Option<&str>) -> Self {
        let position = current.and_then(|c| labels.iter().position(|l| *l == c));
        Self {
            options: labels.iter().map(|l| l.to_string()).collect(),
            selected: position.unwrap_or(0),
            resolved: position.is_some(),
        }
    }

    /// The selected option, or `None` when there are no options.
    pub fn selected_name(&self) -> Option<&str> {
        self.options.get(self.selected).map(String::as_str)
    }

    /// The selected option only when it is the stored value.
    ///
    /// Submitting a form must not turn a display fallback into a write.
    pub fn stored_name(&self) -> Option<&str> {
        if self.resolved {
            self.selected_name()
        } else {
            None
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
