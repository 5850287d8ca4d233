//! Lookup loading and name resolution against a real store.

use pretty_assertions::assert_eq;
use startup_atlas::reference::{LookupTable, ReferenceResolver};

use super::common::{empty_fixture, seeded_fixture, TIMEOUT};

#[tokio::test]
async fn test_city_names_round_trip() {
    let fixture = seeded_fixture().await;
    let resolver = ReferenceResolver::new(fixture.db(), TIMEOUT);

    let cities = resolver.load_lookup(LookupTable::City).await.unwrap();
    assert_eq!(cities.names(), vec!["Bangalore", "Mumbai"]);

    for name in ["Mumbai", "Bangalore"] {
        let id = cities.id_for(name).unwrap();
        let back = resolver.id_to_name(LookupTable::City, id).await.unwrap();
        assert_eq!(back.as_deref(), Some(name));
    }
}

#[tokio::test]
async fn test_industry_lookup_uses_sector() {
    let fixture = seeded_fixture().await;
    let resolver = ReferenceResolver::new(fixture.db(), TIMEOUT);

    let industries = resolver.load_lookup(LookupTable::Industry).await.unwrap();
    assert_eq!(industries.names(), vec!["EdTech", "Fintech", "Quick Commerce"]);
    assert_eq!(industries.id_for("Fintech").unwrap(), 1);
}

#[tokio::test]
async fn test_unknown_id_is_absent() {
    let fixture = seeded_fixture().await;
    let resolver = ReferenceResolver::new(fixture.db(), TIMEOUT);

    let name = resolver.id_to_name(LookupTable::Country, 77).await.unwrap();
    assert_eq!(name, None);
}

#[tokio::test]
async fn test_duplicate_names_are_ambiguous() {
    let fixture = seeded_fixture().await;
    fixture
        .execute_unchecked("INSERT INTO cities (City_ID, Name) VALUES (3, 'Mumbai')")
        .await;
    let resolver = ReferenceResolver::new(fixture.db(), TIMEOUT);

    let cities = resolver.load_lookup(LookupTable::City).await.unwrap();
    assert_eq!(cities.duplicate_names(), vec!["Mumbai"]);
    assert!(cities.id_for("Mumbai").unwrap_err().is_validation());
    assert_eq!(cities.id_for("Bangalore").unwrap(), 2);
}

#[tokio::test]
async fn test_empty_lookup() {
    let fixture = empty_fixture().await;
    let resolver = ReferenceResolver::new(fixture.db(), TIMEOUT);

    let countries = resolver.load_lookup(LookupTable::Country).await.unwrap();
    assert!(countries.is_empty());
    let err = countries.id_for("India").unwrap_err();
    assert_eq!(err.message(), "No country options exist in countries");
}
