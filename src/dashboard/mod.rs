//! Dashboard and analytics aggregates.
//!
//! Each aggregate is one fixed, complete query over the full tables. Results
//! are returned as tables plus category breakdowns ready for charting.

pub mod format;

pub use format::{format_crore, to_crore, CRORE};

use std::fmt;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::db::{DatabaseClient, QueryResult};
use crate::error::{AtlasError, Result};
use crate::query::QueryExecutor;

const COUNT_STARTUPS_SQL: &str = "SELECT COUNT(*) FROM startups";
const TOTAL_FUNDING_SQL: &str = "SELECT COALESCE(SUM(Amount), 0) FROM funding_rounds";
const COUNT_INVESTORS_SQL: &str = "SELECT COUNT(*) FROM investors";
const COUNT_ACQUISITIONS_SQL: &str = "SELECT COUNT(*) FROM acquisitions";

const RECENT_ROUNDS_SQL: &str = "SELECT s.Name AS Startup, fr.Date, fr.Amount, fr.Stage \
     FROM funding_rounds fr \
     JOIN startups s ON fr.Startup_ID = s.Startup_ID \
     ORDER BY fr.Date DESC, fr.Round_ID DESC \
     LIMIT 10";

const INDUSTRY_DISTRIBUTION_SQL: &str = "SELECT i.Sector, COUNT(s.Startup_ID) AS Count \
     FROM industries i \
     LEFT JOIN startups s ON i.Industry_ID = s.Industry_ID \
     GROUP BY i.Sector \
     ORDER BY Count DESC, i.Sector ASC";

const FUNDING_BY_STAGE_SQL: &str = "SELECT Stage, SUM(Amount) AS Total \
     FROM funding_rounds \
     GROUP BY Stage \
     ORDER BY Total DESC";

const INDUSTRY_REPORT_SQL: &str = "SELECT i.Sector, COUNT(DISTINCT s.Startup_ID) AS Startups, \
     COALESCE(SUM(fr.Amount), 0) AS Total_Funding \
     FROM industries i \
     LEFT JOIN startups s ON i.Industry_ID = s.Industry_ID \
     LEFT JOIN funding_rounds fr ON s.Startup_ID = fr.Startup_ID \
     GROUP BY i.Sector \
     ORDER BY Total_Funding DESC, i.Sector ASC";

const TOP_STARTUPS_SQL: &str = "SELECT s.Name, SUM(fr.Amount) AS Total_Funding, \
     COUNT(fr.Round_ID) AS Rounds \
     FROM startups s \
     LEFT JOIN funding_rounds fr ON s.Startup_ID = fr.Startup_ID \
     GROUP BY s.Startup_ID, s.Name \
     ORDER BY Total_Funding DESC \
     LIMIT 10";

const STAGES_REPORT_SQL: &str = "SELECT Stage, COUNT(*) AS Count, SUM(Amount) AS Total \
     FROM funding_rounds \
     GROUP BY Stage \
     ORDER BY Total DESC";

const CITIES_REPORT_SQL: &str = "SELECT c.Name AS City, COUNT(s.Startup_ID) AS Startups \
     FROM cities c \
     LEFT JOIN startups s ON c.City_ID = s.City_ID \
     GROUP BY c.Name \
     ORDER BY Startups DESC, c.Name ASC";

/// How a breakdown should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Pie,
}

/// What a breakdown's values measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricUnit {
    Count,
    /// Rupees, displayed in crore.
    Currency,
}

impl MetricUnit {
    /// Formats a value for display.
    pub fn format(&self, value: Decimal) -> String {
        match self {
            Self::Count => value.normalize().to_string(),
            Self::Currency => format_crore(value),
        }
    }
}

/// One slice or bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryPoint {
    pub label: String,
    pub value: Decimal,
}

/// A metric grouped by category (sector, stage, city, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryBreakdown {
    pub title: String,
    pub category: String,
    pub metric: String,
    pub unit: MetricUnit,
    pub chart: ChartKind,
    pub points: Vec<CategoryPoint>,
}

impl CategoryBreakdown {
    /// Reads the `category` and `metric` columns of a result set. NULL
    /// categories read as "(none)" and NULL metrics as zero.
    pub fn from_result(
        title: &str,
        result: &QueryResult,
        category: &str,
        metric: &str,
        unit: MetricUnit,
        chart: ChartKind,
    ) -> Result<Self> {
        let category_index = result
            .column_index(category)
            .ok_or_else(|| AtlasError::query(format!("Column {category} missing from result")))?;
        let metric_index = result
            .column_index(metric)
            .ok_or_else(|| AtlasError::query(format!("Column {metric} missing from result")))?;

        let points = result
            .rows
            .iter()
            .map(|row| CategoryPoint {
                label: row
                    .get(category_index)
                    .and_then(|v| v.as_text())
                    .unwrap_or_else(|| "(none)".to_string()),
                value: row
                    .get(metric_index)
                    .and_then(|v| v.as_decimal())
                    .unwrap_or_default(),
            })
            .collect();

        Ok(Self {
            title: title.to_string(),
            category: category.to_string(),
            metric: metric.to_string(),
            unit,
            chart,
            points,
        })
    }

    pub fn total(&self) -> Decimal {
        self.points.iter().map(|p| p.value).sum()
    }
}

/// Headline numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardMetrics {
    pub total_startups: i64,
    /// Sum of every funding round amount, in rupees.
    pub total_funding: Decimal,
    pub total_investors: i64,
    pub total_acquisitions: i64,
}

impl DashboardMetrics {
    pub fn total_funding_display(&self) -> String {
        format_crore(self.total_funding)
    }
}

/// Everything on the dashboard view.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub metrics: DashboardMetrics,
    pub recent_rounds: QueryResult,
    pub industry_distribution: CategoryBreakdown,
    pub funding_by_stage: CategoryBreakdown,
}

/// Reports on the analytics view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalyticsReport {
    Industry,
    TopStartups,
    Stages,
    Cities,
}

impl AnalyticsReport {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Industry => "Funding by Industry",
            Self::TopStartups => "Top 10 Funded Startups",
            Self::Stages => "Funding by Stage",
            Self::Cities => "Startups by City",
        }
    }

    fn sql(&self) -> &'static str {
        match self {
            Self::Industry => INDUSTRY_REPORT_SQL,
            Self::TopStartups => TOP_STARTUPS_SQL,
            Self::Stages => STAGES_REPORT_SQL,
            Self::Cities => CITIES_REPORT_SQL,
        }
    }

    /// (category column, metric column, unit, chart)
    fn chart_layout(&self) -> (&'static str, &'static str, MetricUnit, ChartKind) {
        match self {
            Self::Industry => ("Sector", "Total_Funding", MetricUnit::Currency, ChartKind::Bar),
            Self::TopStartups => ("Name", "Total_Funding", MetricUnit::Currency, ChartKind::Bar),
            Self::Stages => ("Stage", "Total", MetricUnit::Currency, ChartKind::Pie),
            Self::Cities => ("City", "Startups", MetricUnit::Count, ChartKind::Bar),
        }
    }
}

impl fmt::Display for AnalyticsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// A report's table and its chart.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub report: AnalyticsReport,
    pub table: QueryResult,
    pub chart: CategoryBreakdown,
}

/// Runs the fixed aggregate queries.
pub struct DashboardAggregator<'a> {
    queries: QueryExecutor<'a>,
}

impl<'a> DashboardAggregator<'a> {
    pub fn new(db: &'a dyn DatabaseClient, timeout: Duration) -> Self {
        Self {
            queries: QueryExecutor::new(db).with_timeout(timeout),
        }
    }

    pub async fn metrics(&self) -> Result<DashboardMetrics> {
        Ok(DashboardMetrics {
            total_startups: self.count(COUNT_STARTUPS_SQL).await?,
            total_funding: self.total_funding().await?,
            total_investors: self.count(COUNT_INVESTORS_SQL).await?,
            total_acquisitions: self.count(COUNT_ACQUISITIONS_SQL).await?,
        })
    }

    /// Sum of all funding round amounts, in rupees.
    pub async fn total_funding(&self) -> Result<Decimal> {
        let result = self.queries.run(TOTAL_FUNDING_SQL, &[]).await?;
        Ok(result
            .scalar()
            .and_then(|v| v.as_decimal())
            .unwrap_or_default())
    }

    /// The ten most recent funding rounds.
    pub async fn recent_rounds(&self) -> Result<QueryResult> {
        self.queries.run(RECENT_ROUNDS_SQL, &[]).await
    }

    /// Startup count per sector, including empty sectors.
    pub async fn industry_distribution(&self) -> Result<CategoryBreakdown> {
        let result = self.queries.run(INDUSTRY_DISTRIBUTION_SQL, &[]).await?;
        CategoryBreakdown::from_result(
            "Industry Distribution",
            &result,
            "Sector",
            "Count",
            MetricUnit::Count,
            ChartKind::Pie,
        )
    }

    pub async fn funding_by_stage(&self) -> Result<CategoryBreakdown> {
        let result = self.queries.run(FUNDING_BY_STAGE_SQL, &[]).await?;
        CategoryBreakdown::from_result(
            "Funding by Stage",
            &result,
            "Stage",
            "Total",
            MetricUnit::Currency,
            ChartKind::Pie,
        )
    }

    pub async fn dashboard(&self) -> Result<Dashboard> {
        let dashboard = Dashboard {
            metrics: self.metrics().await?,
            recent_rounds: self.recent_rounds().await?,
            industry_distribution: self.industry_distribution().await?,
            funding_by_stage: self.funding_by_stage().await?,
        };
        debug!(
            "Dashboard loaded: {} startups, {} total funding",
            dashboard.metrics.total_startups,
            dashboard.metrics.total_funding_display()
        );
        Ok(dashboard)
    }

    pub async fn report(&self, report: AnalyticsReport) -> Result<Report> {
        let table = self.queries.run(report.sql(), &[]).await?;
        let (category, metric, unit, chart) = report.chart_layout();
        let chart = CategoryBreakdown::from_result(report.title(), &table, category, metric, unit, chart)?;
        Ok(Report {
            report,
            table,
            chart,
        })
    }

    async fn count(&self, sql: &str) -> Result<i64> {
        let result = self.queries.run(sql, &[]).await?;
        result
            .scalar()
            .and_then(|v| v.as_i64())
            .ok_or_else(|| AtlasError::query(format!("Count query returned no value: {sql}")))
    }
}
