//! Statement classification.
//!
//! Parses SQL and sorts each statement into reads, row mutations, and
//! everything else. The executors use this to keep reads and writes on their
//! own paths.

mod parser;

pub use parser::{classify_sql, SqlClassifier};

use std::fmt;

/// What a statement may do to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// SELECT, SHOW, EXPLAIN.
    Read,
    /// A single INSERT, UPDATE, or DELETE.
    RowMutation,
    /// Schema changes, batches, and anything unrecognized.
    Other,
}

/// The statement detected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementType {
    Select,
    Insert,
    Update,
    Delete,
    Explain,
    Show,
    Ddl,
    /// More than one statement; holds the first one that is not a read.
    Multiple(Box<StatementType>),
    Unknown,
}

impl StatementType {
    pub fn kind(&self) -> StatementKind {
        match self {
            Self::Select | Self::Explain | Self::Show => StatementKind::Read,
            Self::Insert | Self::Update | Self::Delete => StatementKind::RowMutation,
            Self::Ddl | Self::Multiple(_) | Self::Unknown => StatementKind::Other,
        }
    }
}

impl fmt::Display for StatementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Select => write!(f, "SELECT"),
            Self::Insert => write!(f, "INSERT"),
            Self::Update => write!(f, "UPDATE"),
            Self::Delete => write!(f, "DELETE"),
            Self::Explain => write!(f, "EXPLAIN"),
            Self::Show => write!(f, "SHOW"),
            Self::Ddl => write!(f, "DDL"),
            Self::Multiple(inner) => write!(f, "Multiple ({})", inner),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Result of classifying a SQL string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationResult {
    pub statement_type: StatementType,
    /// Set when the classification did not come from a full parse.
    pub warning: Option<String>,
}

impl ClassificationResult {
    pub fn new(statement_type: StatementType) -> Self {
        Self {
            statement_type,
            warning: None,
        }
    }

    pub fn with_warning(statement_type: StatementType, warning: impl Into<String>) -> Self {
        Self {
            statement_type,
            warning: Some(warning.into()),
        }
    }

    pub fn kind(&self) -> StatementKind {
        self.statement_type.kind()
    }

    /// Returns true if the statement only reads data.
    pub fn is_read(&self) -> bool {
        self.kind() == StatementKind::Read
    }

    /// Returns true for a single INSERT, UPDATE, or DELETE statement.
    pub fn is_row_mutation(&self) -> bool {
        self.kind() == StatementKind::RowMutation
    }
}
