//! Founder controller tests.

use pretty_assertions::assert_eq;
use startup_atlas::db::Value;
use startup_atlas::entities::{FounderController, FounderForm};

use super::common::{seeded_fixture, TIMEOUT};

#[tokio::test]
async fn test_blank_optional_fields_stored_as_null() {
    let fixture = seeded_fixture().await;
    let controller = FounderController::new(fixture.db(), TIMEOUT);

    let form = FounderForm {
        name: "Gaurav Munjal".to_string(),
        startup: "Unacademy".to_string(),
        role: "  ".to_string(),
        linkedin_url: String::new(),
    };
    controller.create(3, &form).await.unwrap();

    let list = controller.list().await.unwrap();
    assert_eq!(list.row_count, 3);
    assert_eq!(list.value(2, "Role"), Some(&Value::Null));

    let edit = controller.edit_form(3).await.unwrap();
    assert_eq!(edit.role, "");
    assert_eq!(edit.linkedin_url, "");
    assert_eq!(edit.startup.selected_name(), Some("Unacademy"));
}

#[tokio::test]
async fn test_update_then_list() {
    let fixture = seeded_fixture().await;
    let controller = FounderController::new(fixture.db(), TIMEOUT);
    let before = controller.list().await.unwrap();

    let mut form = controller.edit_form(2).await.unwrap().to_form();
    form.role = "Co-founder & CEO".to_string();
    form.linkedin_url = "https://www.linkedin.com/in/aaditpalicha".to_string();
    controller.update(2, &form).await.unwrap();

    let after = controller.list().await.unwrap();
    assert_eq!(after.row_count, 2);
    assert_eq!(after.rows[0], before.rows[0]);
    assert_eq!(after.value(1, "Name"), Some(&Value::from("Aadit Palicha")));
    assert_eq!(after.value(1, "Startup"), Some(&Value::from("Zepto")));
    assert_eq!(after.value(1, "Role"), Some(&Value::from("Co-founder & CEO")));
    assert_eq!(
        after.value(1, "LinkedIn_URL"),
        Some(&Value::from("https://www.linkedin.com/in/aaditpalicha"))
    );
}

#[tokio::test]
async fn test_invalid_linkedin_url_rejected() {
    let fixture = seeded_fixture().await;
    let controller = FounderController::new(fixture.db(), TIMEOUT);

    let mut form = controller.edit_form(2).await.unwrap().to_form();
    form.linkedin_url = "linkedin/aadit".to_string();
    let err = controller.update(2, &form).await.unwrap_err();
    assert!(err.is_validation());

    let edit = controller.edit_form(2).await.unwrap();
    assert_eq!(edit.linkedin_url, "");
}

#[tokio::test]
async fn test_delete_twice() {
    let fixture = seeded_fixture().await;
    let controller = FounderController::new(fixture.db(), TIMEOUT);

    controller.delete(2).await.unwrap();
    let err = controller.delete(2).await.unwrap_err();
    assert!(err.is_mutation());
}
