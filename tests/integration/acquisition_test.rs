//! Acquisition controller tests.

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use startup_atlas::db::Value;
use startup_atlas::entities::{AcquisitionController, AcquisitionForm};

use super::common::{seeded_fixture, TIMEOUT};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn acquisition(acquirer: &str, target: &str, on: NaiveDate, amount: i64) -> AcquisitionForm {
    AcquisitionForm {
        acquirer: acquirer.to_string(),
        target: target.to_string(),
        date: Some(on),
        amount: Some(Decimal::from(amount)),
    }
}

#[tokio::test]
async fn test_create_then_list_in_key_order() {
    let fixture = seeded_fixture().await;
    let controller = AcquisitionController::new(fixture.db(), TIMEOUT);

    for (acquirer, target, on) in [
        ("Unacademy", "Razorpay", date(2024, 2, 1)),
        ("Razorpay", "Zepto", date(2020, 6, 30)),
        ("Razorpay", "Zepto", date(2019, 3, 12)),
    ] {
        controller
            .create(&acquisition(acquirer, target, on, 10_000_000))
            .await
            .unwrap();
    }

    let list = controller.list().await.unwrap();
    let keys: Vec<(Option<i64>, Option<i64>, Option<NaiveDate>)> = (0..list.row_count)
        .map(|row| {
            (
                list.value(row, "Acquirer_ID").and_then(Value::as_i64),
                list.value(row, "Target_ID").and_then(Value::as_i64),
                list.value(row, "Date").and_then(Value::as_date),
            )
        })
        .collect();
    assert_eq!(
        keys,
        vec![
            (Some(1), Some(2), Some(date(2019, 3, 12))),
            (Some(1), Some(2), Some(date(2020, 6, 30))),
            (Some(3), Some(1), Some(date(2024, 2, 1))),
        ]
    );
    assert_eq!(list.value(0, "Acquirer"), Some(&Value::from("Razorpay")));
    assert_eq!(list.value(2, "Target"), Some(&Value::from("Razorpay")));
}

#[tokio::test]
async fn test_self_acquisition_rejected() {
    let fixture = seeded_fixture().await;
    let controller = AcquisitionController::new(fixture.db(), TIMEOUT);

    let err = controller
        .create(&acquisition("Zepto", "Zepto", date(2023, 1, 1), 1))
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(controller.list().await.unwrap().row_count, 0);
}

#[tokio::test]
async fn test_update_and_delete_through_selection() {
    let fixture = seeded_fixture().await;
    let controller = AcquisitionController::new(fixture.db(), TIMEOUT);
    controller
        .create(&acquisition("Razorpay", "Unacademy", date(2021, 1, 5), 10_000_000))
        .await
        .unwrap();

    let selection = controller.select(1, 3, date(2021, 1, 5)).await.unwrap();
    assert_eq!(selection.amount, Some(Decimal::from(10_000_000)));

    let mut form = controller.edit_form(&selection).await.unwrap().to_form();
    assert_eq!(form.acquirer, "Razorpay");
    assert_eq!(form.target, "Unacademy");
    form.date = Some(date(2021, 2, 1));
    form.amount = Some(Decimal::from(12_000_000));
    controller.update(&selection, &form).await.unwrap();

    // The old key no longer matches anything.
    let err = controller.delete(&selection).await.unwrap_err();
    assert!(err.is_mutation());

    let moved = controller.select(1, 3, date(2021, 2, 1)).await.unwrap();
    assert_eq!(moved.amount, Some(Decimal::from(12_000_000)));
    controller.delete(&moved).await.unwrap();
    assert_eq!(controller.list().await.unwrap().row_count, 0);
}

#[tokio::test]
async fn test_stale_amount_blocks_update() {
    let fixture = seeded_fixture().await;
    let controller = AcquisitionController::new(fixture.db(), TIMEOUT);
    controller
        .create(&acquisition("Razorpay", "Unacademy", date(2021, 1, 5), 10_000_000))
        .await
        .unwrap();

    let selection = controller.select(1, 3, date(2021, 1, 5)).await.unwrap();
    fixture
        .execute_unchecked("UPDATE acquisitions SET Amount = 99 WHERE Acquirer_Startup_ID = 1")
        .await;

    let form = controller.edit_form(&selection).await.unwrap().to_form();
    let err = controller.update(&selection, &form).await.unwrap_err();
    assert!(err.is_mutation());
    assert!(err.message().contains("has changed since it was loaded"));
}

#[tokio::test]
async fn test_concurrent_duplicate_creates() {
    let fixture = seeded_fixture().await;
    let first = AcquisitionController::new(fixture.db(), TIMEOUT);
    let second = AcquisitionController::new(fixture.db(), TIMEOUT);
    let form = acquisition("Zepto", "Unacademy", date(2023, 8, 14), 40_000_000);

    let (a, b) = tokio::join!(first.create(&form), second.create(&form));

    let failures: Vec<_> = [a, b].into_iter().filter_map(|r| r.err()).collect();
    assert_eq!(failures.len(), 1);
    assert!(failures[0].is_mutation(), "unexpected error: {}", failures[0]);
    assert_eq!(first.list().await.unwrap().row_count, 1);
}

#[tokio::test]
async fn test_select_missing_row() {
    let fixture = seeded_fixture().await;
    let controller = AcquisitionController::new(fixture.db(), TIMEOUT);

    let err = controller.select(1, 2, date(2020, 1, 1)).await.unwrap_err();
    assert_eq!(err.category(), "Query Error");
}
