use kapetayo_core::catalog::{self, CatalogError};
use kapetayo_core::model::PriceRange;

#[test]
fn builtin_catalog_loads_in_order() {
    let cafes = catalog::builtin().unwrap();
    assert_eq!(cafes.len(), 8);

    let ids: Vec<&str> = cafes.iter().map(|cafe| cafe.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3", "4", "5", "6", "7", "8"]);

    let riverside = catalog::find(&cafes, "5").unwrap();
    assert_eq!(riverside.name, "Riverside Beans");
    assert_eq!(riverside.price_range, PriceRange::Budget);
    assert!(riverside.student_friendly);
    assert_eq!(riverside.menu.len(), 4);
}

#[test]
fn parses_plain_json_with_missing_menu() {
    let raw = r#"[{
        "id": "x",
        "name": "Pop-up Stand",
        "address": "Marikina",
        "description": "",
        "priceRange": "$$$",
        "studentFriendly": false,
        "hours": "Weekends"
    }]"#;

    let cafes = catalog::parse(raw).unwrap();
    assert_eq!(cafes[0].price_range, PriceRange::Premium);
    assert!(cafes[0].menu.is_empty());
    assert!(cafes[0].tags.is_empty());
}

#[test]
fn rejects_duplicate_ids() {
    let raw = r#"[
        { id: "1", name: "A", address: "", description: "", priceRange: "$", studentFriendly: true, hours: "" },
        { id: "1", name: "B", address: "", description: "", priceRange: "$", studentFriendly: true, hours: "" },
    ]"#;

    match catalog::parse(raw) {
        Err(CatalogError::DuplicateId(id)) => assert_eq!(id, "1"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn rejects_blank_id_and_unknown_price() {
    let blank = r#"[{ id: " ", name: "A", address: "", description: "", priceRange: "$", studentFriendly: true, hours: "" }]"#;
    assert!(matches!(catalog::parse(blank), Err(CatalogError::EmptyId(0))));

    let bad_price = r#"[{ id: "1", name: "A", address: "", description: "", priceRange: "$$$$", studentFriendly: true, hours: "" }]"#;
    assert!(matches!(catalog::parse(bad_price), Err(CatalogError::Parse(_))));
}

#[test]
fn loads_catalog_file_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cafes.json");
    std::fs::write(
        &path,
        r#"[{"id":"a","name":"Solo","address":"Marikina","description":"","priceRange":"$","studentFriendly":true,"hours":"","tags":["Quiet"]}]"#,
    )
    .unwrap();

    let cafes = catalog::load_file(&path).unwrap();
    assert_eq!(cafes.len(), 1);
    assert!(cafes[0].has_tag("Quiet"));

    let missing = catalog::load_file(&dir.path().join("nope.json"));
    assert!(matches!(missing, Err(CatalogError::Io { .. })));
}
