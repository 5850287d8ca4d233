//! Funding round controller tests.

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use startup_atlas::db::Value;
use startup_atlas::entities::{FundingRoundController, FundingRoundForm, FundingStage};

use super::common::{seeded_fixture, TIMEOUT};

fn round(startup: &str, amount: i64) -> FundingRoundForm {
    FundingRoundForm {
        startup: startup.to_string(),
        date: NaiveDate::from_ymd_opt(2024, 7, 1),
        amount: Some(Decimal::from(amount)),
        stage: FundingStage::SeriesC,
    }
}

#[tokio::test]
async fn test_create_then_list() {
    let fixture = seeded_fixture().await;
    let controller = FundingRoundController::new(fixture.db(), TIMEOUT);

    controller.create(4, &round("Zepto", 200_000_000)).await.unwrap();

    let list = controller.list().await.unwrap();
    assert_eq!(list.row_count, 4);
    assert_eq!(list.value(3, "Startup"), Some(&Value::from("Zepto")));
    assert_eq!(list.value(3, "Stage"), Some(&Value::from("Series C")));
    assert_eq!(
        list.value(3, "Date").and_then(Value::as_date),
        NaiveDate::from_ymd_opt(2024, 7, 1)
    );
    assert_eq!(
        list.value(3, "Amount").and_then(Value::as_decimal),
        Some(Decimal::from(200_000_000))
    );
}

#[tokio::test]
async fn test_negative_amount_rejected() {
    let fixture = seeded_fixture().await;
    let controller = FundingRoundController::new(fixture.db(), TIMEOUT);

    let err = controller
        .create(4, &round("Zepto", -1))
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(controller.list().await.unwrap().row_count, 3);
}

#[tokio::test]
async fn test_edit_form_reads_stored_values() {
    let fixture = seeded_fixture().await;
    let controller = FundingRoundController::new(fixture.db(), TIMEOUT);

    let edit = controller.edit_form(3).await.unwrap();
    assert_eq!(edit.startup.selected_name(), Some("Razorpay"));
    assert_eq!(edit.date, NaiveDate::from_ymd_opt(2023, 3, 15));
    assert_eq!(edit.amount, Some(Decimal::from(75_000_000)));
    assert_eq!(edit.stage, FundingStage::SeriesB);
}

#[tokio::test]
async fn test_update_moves_round_to_other_startup() {
    let fixture = seeded_fixture().await;
    let controller = FundingRoundController::new(fixture.db(), TIMEOUT);

    let before = controller.list().await.unwrap();

    let mut form = controller.edit_form(1).await.unwrap().to_form();
    form.startup = "Unacademy".to_string();
    controller.update(1, &form).await.unwrap();

    let list = controller.list().await.unwrap();
    assert_eq!(list.value(0, "Startup"), Some(&Value::from("Unacademy")));
    assert_eq!(list.value(0, "Stage"), Some(&Value::from("Seed")));
    assert_eq!(list.rows[1], before.rows[1]);
    assert_eq!(list.rows[2], before.rows[2]);
}

#[tokio::test]
async fn test_delete_twice() {
    let fixture = seeded_fixture().await;
    let controller = FundingRoundController::new(fixture.db(), TIMEOUT);

    controller.delete(2).await.unwrap();
    let err = controller.delete(2).await.unwrap_err();
    assert!(err.is_mutation());
    assert!(err.message().contains("Round 2"), "unexpected error: {err}");

    let list = controller.list().await.unwrap();
    assert_eq!(list.column_values("Round_ID"), vec![&Value::Int(1), &Value::Int(3)]);
}
