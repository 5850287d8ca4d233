//! Dashboard and analytics report handlers.

use super::CommandContext;
use crate::commands::output::CommandOutput;
use crate::dashboard::{AnalyticsReport, DashboardAggregator, DashboardMetrics};
use crate::error::Result;

/// Handle `dashboard`.
pub async fn handle_dashboard(ctx: &CommandContext<'_>) -> Result<CommandOutput> {
    let dashboard = DashboardAggregator::new(ctx.db, ctx.timeout)
        .dashboard()
        .await?;

    Ok(CommandOutput::multiple(vec![
        CommandOutput::heading("Startup Ecosystem Dashboard"),
        metrics_output(&dashboard.metrics),
        CommandOutput::heading("Recent Funding Rounds"),
        CommandOutput::Records(dashboard.recent_rounds),
        CommandOutput::heading("Industry Distribution"),
        CommandOutput::Chart(dashboard.industry_distribution),
        CommandOutput::heading("Funding by Stage"),
        CommandOutput::Chart(dashboard.funding_by_stage),
    ]))
}

/// Handle `analytics <report>`.
pub async fn handle_report(
    ctx: &CommandContext<'_>,
    report: AnalyticsReport,
) -> Result<CommandOutput> {
    let report = DashboardAggregator::new(ctx.db, ctx.timeout)
        .report(report)
        .await?;

    Ok(CommandOutput::multiple(vec![
        CommandOutput::heading(report.report.title()),
        CommandOutput::Records(report.table),
        CommandOutput::Chart(report.chart),
    ]))
}

fn metrics_output(metrics: &DashboardMetrics) -> CommandOutput {
    CommandOutput::Metrics(vec![
        ("Total Startups".to_string(), metrics.total_startups.to_string()),
        ("Total Funding".to_string(), metrics.total_funding_display()),
        ("Total Investors".to_string(), metrics.total_investors.to_string()),
        (
            "Total Acquisitions".to_string(),
            metrics.total_acquisitions.to_string(),
        ),
    ])
}
