//! Transport-agnostic command output types.
//!
//! Handlers return these values; the CLI renders them as text (tables,
//! metrics, bar charts) or as JSON.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{json, Value as JsonValue};
use tabled::{builder::Builder, settings::Style};

use crate::dashboard::{CategoryBreakdown, ChartKind};
use crate::db::QueryResult;
use crate::entities::FormField;

/// Width of the longest bar in a text chart.
const BAR_WIDTH: usize = 40;

/// Output format selected on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Tables, metrics, and text bar charts.
    #[default]
    Text,
    /// One JSON document.
    Json,
}

/// Output from a command handler.
#[derive(Debug, Clone)]
pub enum CommandOutput {
    /// Informational message (success, status, etc.).
    Info(String),

    /// Section title.
    Heading(String),

    /// Rows read from the store.
    Records(QueryResult),

    /// Structured table data for display.
    Table {
        /// Column headers.
        headers: Vec<String>,
        /// Row data (each row is a vector of cell values).
        rows: Vec<Vec<String>>,
    },

    /// Labelled headline values.
    Metrics(Vec<(String, String)>),

    /// A category breakdown to draw.
    Chart(CategoryBreakdown),

    /// A pre-filled edit form.
    Form {
        title: String,
        fields: Vec<FormField>,
    },

    /// Multiple outputs (for commands that produce several sections).
    Multiple(Vec<CommandOutput>),
}

impl CommandOutput {
    /// Creates an info message.
    pub fn info(msg: impl Into<String>) -> Self {
        Self::Info(msg.into())
    }

    pub fn heading(title: impl Into<String>) -> Self {
        Self::Heading(title.into())
    }

    /// Creates a table output.
    pub fn table(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self::Table { headers, rows }
    }

    pub fn form(title: impl Into<String>, fields: Vec<FormField>) -> Self {
        Self::Form {
            title: title.into(),
            fields,
        }
    }

    /// Creates a multiple output from a vector.
    pub fn multiple(outputs: Vec<CommandOutput>) -> Self {
        Self::Multiple(outputs)
    }

    /// Renders the output in the requested format.
    pub fn render(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Text => self.render_text(),
            OutputFormat::Json => {
                serde_json::to_string_pretty(&self.to_json()).unwrap_or_else(|_| "null".into())
            }
        }
    }

    /// Renders the output for a terminal.
    pub fn render_text(&self) -> String {
        match self {
            Self::Info(msg) => msg.clone(),
            Self::Heading(title) => format!("\n{title}\n{}", "=".repeat(title.chars().count())),
            Self::Records(result) => {
                if result.columns.is_empty() {
                    return "(no rows)".to_string();
                }
                let headers = result.column_names().into_iter().map(String::from).collect();
                let mut text = render_table(headers, result.display_rows());
                if result.is_empty() {
                    text.push_str("\n(no rows)");
                }
                text
            }
            Self::Table { headers, rows } => render_table(headers.clone(), rows.clone()),
            Self::Metrics(metrics) => {
                let width = metrics
                    .iter()
                    .map(|(label, _)| label.chars().count())
                    .max()
                    .unwrap_or(0);
                metrics
                    .iter()
                    .map(|(label, value)| format!("{label:<width$}  {value}"))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            Self::Chart(breakdown) => render_chart(breakdown),
            Self::Form { title, fields } => {
                let rows = fields
                    .iter()
                    .map(|f| {
                        vec![
                            f.label.to_string(),
                            f.value.clone(),
                            f.options.as_ref().map(|o| o.join(", ")).unwrap_or_default(),
                        ]
                    })
                    .collect();
                format!(
                    "{title}\n{}",
                    render_table(
                        vec!["Field".into(), "Value".into(), "Options".into()],
                        rows
                    )
                )
            }
            Self::Multiple(outputs) => outputs
                .iter()
                .map(CommandOutput::render_text)
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// Converts the output to JSON.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Info(msg) => json!({ "message": msg }),
            Self::Heading(title) => json!({ "heading": title }),
            Self::Records(result) => JsonValue::Array(
                result
                    .to_json_rows()
                    .into_iter()
                    .map(JsonValue::Object)
                    .collect(),
            ),
            Self::Table { headers, rows } => JsonValue::Array(
                rows.iter()
                    .map(|row| {
                        JsonValue::Object(
                            headers
                                .iter()
                                .cloned()
                                .zip(row.iter().cloned().map(JsonValue::String))
                                .collect(),
                        )
                    })
                    .collect(),
            ),
            Self::Metrics(metrics) => JsonValue::Object(
                metrics
                    .iter()
                    .map(|(label, value)| (label.clone(), JsonValue::String(value.clone())))
                    .collect(),
            ),
            Self::Chart(breakdown) => serde_json::to_value(breakdown).unwrap_or(JsonValue::Null),
            Self::Form { title, fields } => json!({
                "title": title,
                "fields": serde_json::to_value(fields).unwrap_or(JsonValue::Null),
            }),
            Self::Multiple(outputs) => {
                JsonValue::Array(outputs.iter().map(CommandOutput::to_json).collect())
            }
        }
    }
}

fn render_table(headers: Vec<String>, rows: Vec<Vec<String>>) -> String {
    let mut builder = Builder::default();
    builder.push_record(headers);
    for row in rows {
        builder.push_record(row);
    }
    builder.build().with(Style::markdown()).to_string()
}

/// Draws a breakdown as horizontal bars. Pie charts also show each share.
fn render_chart(breakdown: &CategoryBreakdown) -> String {
    if breakdown.points.is_empty() {
        return format!("{}\n(no data)", breakdown.title);
    }

    let label_width = breakdown
        .points
        .iter()
        .map(|p| p.label.chars().count())
        .max()
        .unwrap_or(0);
    let max = breakdown
        .points
        .iter()
        .map(|p| p.value)
        .max()
        .unwrap_or_default();
    let total = breakdown.total();

    let mut lines = vec![breakdown.title.clone()];
    for point in &breakdown.points {
        let bar = "█".repeat(bar_length(point.value, max));
        let mut line = format!(
            "{:<label_width$}  {:<BAR_WIDTH$}  {}",
            point.label,
            bar,
            breakdown.unit.format(point.value)
        );
        if breakdown.chart == ChartKind::Pie && !total.is_zero() {
            let share = (point.value / total * Decimal::from(100)).round_dp(1);
            line.push_str(&format!(" ({share:.1}%)"));
        }
        lines.push(line);
    }
    lines.join("\n")
}

fn bar_length(value: Decimal, max: Decimal) -> usize {
    if max <= Decimal::ZERO || value <= Decimal::ZERO {
        return 0;
    }
    let ratio = (value / max).to_f64().unwrap_or(0.0);
    ((ratio * BAR_WIDTH as f64).round() as usize).clamp(1, BAR_WIDTH)
}
