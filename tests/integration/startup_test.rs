//! Startup controller tests.

use pretty_assertions::assert_eq;
use startup_atlas::commands::router::{StartupCommand, StartupFields};
use startup_atlas::commands::{dispatch, Command, CommandContext};
use startup_atlas::db::{DatabaseClient, Value};
use startup_atlas::entities::{StartupController, StartupForm};

use super::common::{seeded_fixture, Fixture, TIMEOUT};

fn zepto_like(name: &str) -> StartupForm {
    StartupForm {
        name: name.to_string(),
        founded_year: Some(2022),
        city: "Mumbai".to_string(),
        industry: "Quick Commerce".to_string(),
    }
}

#[tokio::test]
async fn test_create_then_list() {
    let fixture = seeded_fixture().await;
    let controller = StartupController::new(fixture.db(), TIMEOUT);

    controller.create(4, &zepto_like("Blinkit")).await.unwrap();

    let list = controller.list().await.unwrap();
    assert_eq!(list.row_count, 4);
    assert_eq!(list.value(3, "Startup_ID"), Some(&Value::Int(4)));
    assert_eq!(list.value(3, "Name"), Some(&Value::from("Blinkit")));
    assert_eq!(list.value(3, "City"), Some(&Value::from("Mumbai")));
    assert_eq!(list.value(3, "Sector"), Some(&Value::from("Quick Commerce")));
}

#[tokio::test]
async fn test_duplicate_id_is_mutation_error() {
    let fixture = seeded_fixture().await;
    let controller = StartupController::new(fixture.db(), TIMEOUT);

    let err = controller.create(1, &zepto_like("Blinkit")).await.unwrap_err();
    assert!(err.is_mutation(), "unexpected error: {err}");
    assert_eq!(controller.list().await.unwrap().row_count, 3);
}

#[tokio::test]
async fn test_update_leaves_other_rows_unchanged() {
    let fixture = seeded_fixture().await;
    let controller = StartupController::new(fixture.db(), TIMEOUT);
    let before = controller.list().await.unwrap();

    let mut form = controller.edit_form(2).await.unwrap().to_form();
    form.name = "Zepto Now".to_string();
    form.city = "Bangalore".to_string();
    controller.update(2, &form).await.unwrap();

    let after = controller.list().await.unwrap();
    assert_eq!(after.rows[0], before.rows[0]);
    assert_eq!(after.rows[2], before.rows[2]);
    assert_eq!(after.value(1, "Name"), Some(&Value::from("Zepto Now")));
    assert_eq!(after.value(1, "City"), Some(&Value::from("Bangalore")));
}

#[tokio::test]
async fn test_update_missing_row_is_mutation_error() {
    let fixture = seeded_fixture().await;
    let controller = StartupController::new(fixture.db(), TIMEOUT);

    let err = controller.update(99, &zepto_like("Ghost")).await.unwrap_err();
    assert!(err.is_mutation());
    assert_eq!(err.message(), "Startup 99 does not exist");
}

#[tokio::test]
async fn test_delete_twice() {
    let fixture = seeded_fixture().await;
    let controller = StartupController::new(fixture.db(), TIMEOUT);

    controller.create(4, &zepto_like("Blinkit")).await.unwrap();
    controller.delete(4).await.unwrap();

    let err = controller.delete(4).await.unwrap_err();
    assert!(err.is_mutation());
    assert!(err.message().contains("Startup 4"));
}

#[tokio::test]
async fn test_delete_referenced_startup_is_rejected() {
    let fixture = seeded_fixture().await;
    let controller = StartupController::new(fixture.db(), TIMEOUT);

    // Razorpay has funding rounds and a founder.
    let err = controller.delete(1).await.unwrap_err();
    assert!(err.is_mutation(), "unexpected error: {err}");
    assert_eq!(controller.list().await.unwrap().row_count, 3);
}

#[tokio::test]
async fn test_orphaned_city_selects_first_option() {
    let fixture = seeded_fixture().await;
    fixture
        .execute_unchecked(
            "INSERT INTO startups (Startup_ID, Name, Founded_Year, City_ID, Industry_ID) \
             VALUES (9, 'Orphan Labs', 2020, 42, 1)",
        )
        .await;
    let controller = StartupController::new(fixture.db(), TIMEOUT);

    let form = controller.edit_form(9).await.unwrap();
    // Cities are ordered by name.
    assert_eq!(form.city.options, vec!["Bangalore", "Mumbai"]);
    assert_eq!(form.city.selected_name(), Some("Bangalore"));
    assert_eq!(form.industry.selected_name(), Some("Fintech"));
}

async fn stored(fixture: &Fixture) -> Vec<Vec<Value>> {
    fixture
        .client
        .fetch(
            "SELECT Name, City_ID FROM startups WHERE Startup_ID = ?",
            &[Value::Int(9)],
        )
        .await
        .unwrap()
        .rows
}

#[tokio::test]
async fn test_name_only_update_keeps_missing_city() {
    let fixture = seeded_fixture().await;
    fixture
        .execute_unchecked(
            "INSERT INTO startups (Startup_ID, Name, Founded_Year, City_ID, Industry_ID) \
             VALUES (9, 'Cityless', 2020, NULL, 1)",
        )
        .await;
    let ctx = CommandContext::new(fixture.db(), TIMEOUT);
    let rename = |city: Option<&str>| {
        Command::Startup(StartupCommand::Update {
            id: 9,
            fields: StartupFields {
                name: Some("Renamed".to_string()),
                city: city.map(String::from),
                ..Default::default()
            },
        })
    };
    let err = dispatch(&rename(None), &ctx).await.unwrap_err();
    assert!(err.is_validation());
    assert_eq!(err.message(), "City is unset; pass --city");
    assert_eq!(
        stored(&fixture).await,
        vec![vec![Value::from("Cityless"), Value::Null]]
    );

    dispatch(&rename(Some("Mumbai")), &ctx).await.unwrap();
    assert_eq!(
        stored(&fixture).await,
        vec![vec![Value::from("Renamed"), Value::Int(1)]]
    );
}

#[tokio::test]
async fn test_unknown_city_is_validation_error() {
    let fixture = seeded_fixture().await;
    let controller = StartupController::new(fixture.db(), TIMEOUT);

    let mut form = zepto_like("Blinkit");
    form.city = "Atlantis".to_string();
    let err = controller.create(4, &form).await.unwrap_err();
    assert!(err.is_validation());
    assert_eq!(controller.list().await.unwrap().row_count, 3);
}

#[tokio::test]
async fn test_edit_form_missing_row() {
    let fixture = seeded_fixture().await;
    let controller = StartupController::new(fixture.db(), TIMEOUT);

    let err = controller.edit_form(404).await.unwrap_err();
    assert_eq!(err.category(), "Query Error");
}
