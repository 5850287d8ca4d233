//! Dashboard aggregates and command output over the seeded store.

use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use startup_atlas::commands::router::{StartupCommand, StartupFields};
use startup_atlas::commands::{dispatch, Command, CommandContext, OutputFormat};
use startup_atlas::dashboard::{AnalyticsReport, DashboardAggregator};
use startup_atlas::db::Value;

use super::common::{empty_fixture, seeded_fixture, TIMEOUT};

#[tokio::test]
async fn test_metrics() {
    let fixture = seeded_fixture().await;
    let aggregator = DashboardAggregator::new(fixture.db(), TIMEOUT);

    let metrics = aggregator.metrics().await.unwrap();
    assert_eq!(metrics.total_startups, 3);
    assert_eq!(metrics.total_investors, 2);
    assert_eq!(metrics.total_acquisitions, 0);
    assert_eq!(metrics.total_funding, Decimal::from(100_000_000));
    assert_eq!(metrics.total_funding_display(), "₹10.0Cr");
}

#[tokio::test]
async fn test_empty_store_totals_zero() {
    let fixture = empty_fixture().await;
    let aggregator = DashboardAggregator::new(fixture.db(), TIMEOUT);

    let dashboard = aggregator.dashboard().await.unwrap();
    assert_eq!(dashboard.metrics.total_startups, 0);
    assert_eq!(dashboard.metrics.total_funding_display(), "₹0.0Cr");
    assert!(dashboard.recent_rounds.is_empty());
    assert!(dashboard.funding_by_stage.points.is_empty());
}

#[tokio::test]
async fn test_recent_rounds_newest_first() {
    let fixture = seeded_fixture().await;
    let aggregator = DashboardAggregator::new(fixture.db(), TIMEOUT);

    let rounds = aggregator.recent_rounds().await.unwrap();
    assert_eq!(rounds.row_count, 3);
    assert_eq!(
        rounds.column_values("Stage"),
        vec![
            &Value::from("Series B"),
            &Value::from("Series A"),
            &Value::from("Seed"),
        ]
    );
}

#[tokio::test]
async fn test_industry_distribution_includes_empty_sectors() {
    let fixture = seeded_fixture().await;
    fixture
        .execute_unchecked("INSERT INTO industries (Industry_ID, Sector) VALUES (4, 'AgriTech')")
        .await;
    let aggregator = DashboardAggregator::new(fixture.db(), TIMEOUT);

    let breakdown = aggregator.industry_distribution().await.unwrap();
    let labels: Vec<&str> = breakdown.points.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, vec!["EdTech", "Fintech", "Quick Commerce", "AgriTech"]);
    assert_eq!(breakdown.total(), Decimal::from(3));
}

#[tokio::test]
async fn test_reports() {
    let fixture = seeded_fixture().await;
    let aggregator = DashboardAggregator::new(fixture.db(), TIMEOUT);

    let top = aggregator.report(AnalyticsReport::TopStartups).await.unwrap();
    assert_eq!(top.chart.points[0].label, "Razorpay");
    assert_eq!(top.chart.points[0].value, Decimal::from(80_000_000));

    let stages = aggregator.report(AnalyticsReport::Stages).await.unwrap();
    assert_eq!(stages.chart.points[0].label, "Series B");
    assert_eq!(stages.chart.total(), Decimal::from(100_000_000));

    let cities = aggregator.report(AnalyticsReport::Cities).await.unwrap();
    assert_eq!(cities.chart.points[0].label, "Bangalore");
    assert_eq!(cities.chart.points[0].value, Decimal::from(2));
}

#[tokio::test]
async fn test_dashboard_command_renders() {
    let fixture = seeded_fixture().await;
    let ctx = CommandContext::new(fixture.db(), TIMEOUT);

    let output = dispatch(&Command::Dashboard, &ctx).await.unwrap();
    let text = output.render(OutputFormat::Text);
    assert!(text.contains("Total Funding"));
    assert!(text.contains("₹10.0Cr"));
    assert!(text.contains("Razorpay"));

    let json: serde_json::Value = serde_json::from_str(&output.render(OutputFormat::Json)).unwrap();
    assert!(json.is_array());
}

#[tokio::test]
async fn test_command_create_then_list() {
    let fixture = seeded_fixture().await;
    let ctx = CommandContext::new(fixture.db(), TIMEOUT);

    let create = Command::Startup(StartupCommand::Create {
        id: 4,
        fields: StartupFields {
            name: Some("Blinkit".to_string()),
            founded_year: Some(2013),
            city: Some("Mumbai".to_string()),
            industry: Some("Quick Commerce".to_string()),
        },
    });
    let output = dispatch(&create, &ctx).await.unwrap();
    assert_eq!(output.render_text(), "Created startup 4 (Blinkit)");

    let list = dispatch(&Command::Startup(StartupCommand::List), &ctx)
        .await
        .unwrap();
    let json = list.to_json();
    assert_eq!(json[3]["Name"], "Blinkit");
    assert_eq!(json[3]["City"], "Mumbai");
}
