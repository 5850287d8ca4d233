//! Investor controller tests.

use pretty_assertions::assert_eq;
use startup_atlas::db::Value;
use startup_atlas::entities::{InvestorController, InvestorForm, InvestorType};

use super::common::{seeded_fixture, TIMEOUT};

#[tokio::test]
async fn test_create_stores_type_label() {
    let fixture = seeded_fixture().await;
    let controller = InvestorController::new(fixture.db(), TIMEOUT);

    let form = InvestorForm {
        name: "Tiger Global".to_string(),
        investor_type: InvestorType::PeFirm,
        country: "USA".to_string(),
    };
    controller.create(3, &form).await.unwrap();

    let list = controller.list().await.unwrap();
    assert_eq!(list.row_count, 3);
    assert_eq!(list.value(2, "Type"), Some(&Value::from("PE Firm")));
    assert_eq!(list.value(2, "Country"), Some(&Value::from("USA")));
}

#[tokio::test]
async fn test_edit_form_round_trip() {
    let fixture = seeded_fixture().await;
    let controller = InvestorController::new(fixture.db(), TIMEOUT);

    let edit = controller.edit_form(2).await.unwrap();
    assert_eq!(edit.name, "Kunal Shah");
    assert_eq!(edit.investor_type, InvestorType::Angel);
    assert_eq!(edit.country.selected_name(), Some("India"));

    let mut form = edit.to_form();
    form.investor_type = InvestorType::CorporateVc;
    controller.update(2, &form).await.unwrap();

    let edit = controller.edit_form(2).await.unwrap();
    assert_eq!(edit.investor_type, InvestorType::CorporateVc);
    assert_eq!(edit.country.selected_name(), Some("India"));
}

#[tokio::test]
async fn test_update_leaves_other_rows_unchanged() {
    let fixture = seeded_fixture().await;
    let controller = InvestorController::new(fixture.db(), TIMEOUT);
    let before = controller.list().await.unwrap();

    let form = InvestorForm {
        name: "Sequoia Capital India".to_string(),
        investor_type: InvestorType::VcFirm,
        country: "India".to_string(),
    };
    controller.update(1, &form).await.unwrap();

    let after = controller.list().await.unwrap();
    assert_eq!(after.row_count, 2);
    assert_eq!(after.value(0, "Name"), Some(&Value::from("Sequoia Capital India")));
    assert_eq!(after.value(0, "Type"), Some(&Value::from("VC Firm")));
    assert_eq!(after.value(0, "Country"), Some(&Value::from("India")));
    assert_eq!(after.rows[1], before.rows[1]);
}

#[tokio::test]
async fn test_unrecognized_stored_type_defaults_to_first_label() {
    let fixture = seeded_fixture().await;
    fixture
        .execute_unchecked(
            "INSERT INTO investors (Investor_ID, Name, Type, Country_ID) \
             VALUES (7, 'Family Office', 'Hedge Fund', 1)",
        )
        .await;
    let controller = InvestorController::new(fixture.db(), TIMEOUT);

    let edit = controller.edit_form(7).await.unwrap();
    assert_eq!(edit.investor_type, InvestorType::VcFirm);
}

#[tokio::test]
async fn test_delete_unreferenced_investor() {
    let fixture = seeded_fixture().await;
    let controller = InvestorController::new(fixture.db(), TIMEOUT);

    controller.delete(1).await.unwrap();
    let err = controller.delete(1).await.unwrap_err();
    assert!(err.is_mutation());
    assert_eq!(controller.list().await.unwrap().row_count, 1);
}
