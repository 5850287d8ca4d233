//! Entity CRUD controllers.
//!
//! One controller per entity table. Each composes the query executor, the
//! mutation executor, and the reference resolver to list rows, create rows,
//! load pre-filled edit forms, and update or delete by key. Forms carry
//! foreign keys as display names; the controllers resolve them to ids at
//! submit time.

pub mod acquisition;
mod enums;
pub mod founder;
pub mod funding_round;
pub mod investor;
mod record;
pub mod startup;
pub mod validation;

pub use acquisition::{
    AcquisitionController, AcquisitionEditForm, AcquisitionForm, AcquisitionSelection,
};
pub use enums::{FundingStage, InvestorType};
pub use founder::{FounderController, FounderEditForm, FounderForm};
pub use funding_round::{FundingRoundController, FundingRoundEditForm, FundingRoundForm};
pub use investor::{InvestorController, InvestorEditForm, InvestorForm};
pub use startup::{StartupController, StartupEditForm, StartupForm};

use std::time::Duration;

use serde::Serialize;

use crate::db::DatabaseClient;
use crate::query::{MutationExecutor, QueryExecutor};
use crate::reference::{Choice, ReferenceResolver};

/// The executors one controller call works with.
pub(crate) struct Store<'a> {
    pub queries: QueryExecutor<'a>,
    pub mutations: MutationExecutor<'a>,
    pub references: ReferenceResolver<'a>,
}

impl<'a> Store<'a> {
    pub fn new(db: &'a dyn DatabaseClient, timeout: Duration) -> Self {
        Self {
            queries: QueryExecutor::new(db).with_timeout(timeout),
            mutations: MutationExecutor::new(db).with_timeout(timeout),
            references: ReferenceResolver::new(db, timeout),
        }
    }
}

/// One labelled field of a pre-filled edit form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormField {
    pub label: &'static str,
    pub value: String,
    /// Dropdown options, for fields chosen from a list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl FormField {
    pub fn text(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
            options: None,
        }
    }

    pub fn choice(label: &'static str, choice: &Choice) -> Self {
        Self {
            label,
            value: choice.selected_name().unwrap_or_default().to_string(),
            options: Some(choice.options.clone()),
        }
    }
}

fn display_opt<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}
