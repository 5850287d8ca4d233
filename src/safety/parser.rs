//! SQL parsing and classification logic.
//!
//! Uses sqlparser-rs with the MySQL dialect. When a statement cannot be parsed
//! the classifier falls back to its leading keyword.

use sqlparser::ast::{Query, SetExpr, Statement, TableFactor, TableWithJoins};
use sqlparser::dialect::MySqlDialect;
use sqlparser::parser::Parser;
use tracing::debug;

use super::{ClassificationResult, StatementKind, StatementType};

/// SQL classifier that parses and classifies SQL statements.
#[derive(Debug)]
pub struct SqlClassifier {
    dialect: MySqlDialect,
}

impl SqlClassifier {
    pub fn new() -> Self {
        Self {
            dialect: MySqlDialect {},
        }
    }

    /// Classifies a SQL string.
    pub fn classify(&self, sql: &str) -> ClassificationResult {
        let statements = match Parser::parse_sql(&self.dialect, sql) {
            Ok(statements) => statements,
            Err(e) => {
                debug!("SQL parse failed ({e}); classifying by leading keyword");
                return classify_by_keyword(sql);
            }
        };

        match statements.as_slice() {
            [] => ClassificationResult::with_warning(StatementType::Unknown, "Empty SQL statement"),
            [single] => ClassificationResult::new(statement_type(single)),
            many => {
                let types: Vec<StatementType> = many.iter().map(statement_type).collect();
                let shown = types
                    .iter()
                    .find(|t| t.kind() != StatementKind::Read)
                    .or_else(|| types.first())
                    .cloned()
                    .unwrap_or(StatementType::Unknown);
                ClassificationResult::new(StatementType::Multiple(Box::new(shown)))
            }
        }
    }
}

/// Classifies SQL without keeping a classifier around.
pub fn classify_sql(sql: &str) -> ClassificationResult {
    SqlClassifier::new().classify(sql)
}

fn classify_by_keyword(sql: &str) -> ClassificationResult {
    let keyword = sql
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_uppercase();
    let batch = sql.trim().trim_end_matches(';').contains(';');

    let stmt_type = match keyword.as_str() {
        _ if batch => StatementType::Unknown,
        "SELECT" | "WITH" => StatementType::Select,
        "SHOW" | "DESCRIBE" => StatementType::Show,
        "INSERT" => StatementType::Insert,
        "UPDATE" => StatementType::Update,
        "DELETE" => StatementType::Delete,
        _ => StatementType::Unknown,
    };

    ClassificationResult::with_warning(stmt_type, "Classified without a full parse")
}

fn statement_type(statement: &Statement) -> StatementType {
    match statement {
        Statement::Query(query) if query_writes(query) => StatementType::Unknown,
        Statement::Query(_) => StatementType::Select,
        // EXPLAIN ANALYZE runs the statement it explains.
        Statement::Explain {
            analyze, statement, ..
        } => match (*analyze, statement_type(statement).kind()) {
            (false, _) | (true, StatementKind::Read) => StatementType::Explain,
            (true, _) => StatementType::Unknown,
        },
        Statement::ShowTables { .. }
        | Statement::ShowColumns { .. }
        | Statement::ShowVariable { .. }
        | Statement::ShowCreate { .. } => StatementType::Show,

        Statement::Insert(_) => StatementType::Insert,
        Statement::Update { .. } => StatementType::Update,
        Statement::Delete(_) => StatementType::Delete,

        Statement::CreateTable { .. }
        | Statement::CreateIndex { .. }
        | Statement::CreateView { .. }
        | Statement::AlterTable { .. }
        | Statement::Drop { .. }
        | Statement::Truncate { .. } => StatementType::Ddl,

        _ => StatementType::Unknown,
    }
}

/// True when a query embeds a write anywhere: a CTE, a set operand, or a
/// derived table.
fn query_writes(query: &Query) -> bool {
    let cte_writes = query
        .with
        .as_ref()
        .is_some_and(|with| with.cte_tables.iter().any(|cte| query_writes(&cte.query)));
    cte_writes || set_expr_writes(&query.body)
}

fn set_expr_writes(set_expr: &SetExpr) -> bool {
    match set_expr {
        SetExpr::Select(select) => select.from.iter().any(table_writes),
        SetExpr::Query(query) => query_writes(query),
        SetExpr::SetOperation { left, right, .. } => {
            set_expr_writes(left) || set_expr_writes(right)
        }
        SetExpr::Values(_) | SetExpr::Table(_) => false,
        // INSERT/UPDATE bodies and anything unrecognized.
        _ => true,
    }
}

fn table_writes(twj: &TableWithJoins) -> bool {
    factor_writes(&twj.relation) || twj.joins.iter().any(|join| factor_writes(&join.relation))
}

fn factor_writes(factor: &TableFactor) -> bool {
    match factor {
        TableFactor::Derived { subquery, .. } => query_writes(subquery),
        TableFactor::NestedJoin {
            table_with_joins, ..
        } => table_writes(table_with_joins),
        _ => false,
    }
}
