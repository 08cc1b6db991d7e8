//! Integration tests for path resolution over realistic form documents.

use formwork_state::{get_value, parse_path, set_value, path, Path, Seg, StateError};
use serde_json::json;

fn registration_form() -> serde_json::Value {
    json!({
        "account": {
            "email": "ada@example.com",
            "password": ""
        },
        "guests": [
            {"name": "Ada", "dietary": ["vegetarian"]},
            {"name": "Grace", "dietary": []}
        ],
        "accepted_terms": false
    })
}

#[test]
fn reads_scalar_fields() {
    let doc = registration_form();
    assert_eq!(
        get_value(&doc, &parse_path("account.email")),
        Some(&json!("ada@example.com"))
    );
    assert_eq!(
        get_value(&doc, &parse_path("accepted_terms")),
        Some(&json!(false))
    );
}

#[test]
fn reads_through_arrays() {
    let doc = registration_form();
    assert_eq!(
        get_value(&doc, &parse_path("guests.1.name")),
        Some(&json!("Grace"))
    );
    assert_eq!(
        get_value(&doc, &parse_path("guests.0.dietary.0")),
        Some(&json!("vegetarian"))
    );
}

#[test]
fn missing_paths_read_as_none() {
    let doc = registration_form();
    assert_eq!(get_value(&doc, &parse_path("account.phone")), None);
    assert_eq!(get_value(&doc, &parse_path("guests.5.name")), None);
    assert_eq!(get_value(&doc, &parse_path("account.email.domain")), None);
}

#[test]
fn write_then_read_round_trips() {
    let mut doc = registration_form();
    let paths = [
        (parse_path("account.password"), json!("hunter2")),
        (parse_path("guests.1.name"), json!("Margaret")),
        (parse_path("guests.0.dietary.0"), json!("vegan")),
        (parse_path("accepted_terms"), json!(true)),
    ];

    for (path, value) in paths {
        set_value(&mut doc, &path, value.clone()).unwrap();
        assert_eq!(get_value(&doc, &path), Some(&value), "at {path}");
    }
}

#[test]
fn writes_create_missing_object_levels() {
    let mut doc = registration_form();
    set_value(&mut doc, &parse_path("billing.address.city"), json!("London")).unwrap();
    assert_eq!(doc["billing"]["address"]["city"], "London");
    // Existing fields untouched
    assert_eq!(doc["account"]["email"], "ada@example.com");
}

#[test]
fn writes_fault_on_bad_array_access() {
    let mut doc = registration_form();

    let err = set_value(&mut doc, &parse_path("guests.9.name"), json!("x")).unwrap_err();
    assert!(matches!(err, StateError::IndexOutOfBounds { index: 9, len: 2, .. }));

    let err = set_value(&mut doc, &parse_path("account.0"), json!("x")).unwrap_err();
    assert!(matches!(err, StateError::TypeMismatch { expected: "array", .. }));
}

#[test]
fn snapshots_survive_later_writes() {
    let mut doc = registration_form();
    let before = doc.clone();

    set_value(&mut doc, &parse_path("guests.0.name"), json!("Changed")).unwrap();
    set_value(&mut doc, &parse_path("account.email"), json!("new@example.com")).unwrap();

    assert_eq!(before, registration_form());
    assert_ne!(doc, before);
}

#[test]
fn typed_and_parsed_paths_agree() {
    let typed = path!("guests", 0, "name");
    let parsed = parse_path("guests.0.name");
    assert_eq!(typed, parsed);
    assert_eq!(typed.segments()[1], Seg::Index(0));

    let doc = registration_form();
    assert_eq!(get_value(&doc, &typed), get_value(&doc, &parsed));
}

#[test]
fn dotted_rendering_matches_map_keys() {
    let path = Path::root().key("guests").index(0).key("name");
    assert_eq!(path.to_dotted(), "guests.0.name");
}
