use super::*;
use serde_json::json;

#[test]
fn record_identity_prefers_server_object_id() {
    let record = Record::from_value(json!({"_id": "abc", "id": 4, "status": "Open"}))
        .expect("record");
    assert_eq!(record.id, RecordId::new("abc"));
}

#[test]
fn record_identity_falls_back_to_numeric_id() {
    let record = Record::from_value(json!({"id": 42})).expect("record");
    assert_eq!(record.id.as_str(), "42");
}

#[test]
fn record_without_identity_is_rejected() {
    assert_eq!(
        Record::from_value(json!({"_id": "  ", "status": "pending"})),
        Err(RecordShapeError::MissingIdentity)
    );
    assert_eq!(
        Record::from_value(json!(["not", "an", "object"])),
        Err(RecordShapeError::NotAnObject)
    );
}

#[test]
fn field_text_walks_nested_paths_and_degrades_to_empty() {
    let record = Record::from_value(json!({
        "_id": "v1",
        "property": {"building": "Sunrise Towers", "area": null},
        "distanceKm": 12.5,
        "videoTour": true,
    }))
    .expect("record");

    assert_eq!(record.field_text("property.building"), "Sunrise Towers");
    assert_eq!(record.field_text("property.area"), "");
    assert_eq!(record.field_text("property.colony"), "");
    assert_eq!(record.field_text("property"), "");
    assert_eq!(record.field_text("distanceKm"), "12.5");
    assert_eq!(record.field_text("videoTour"), "true");
    assert_eq!(record.field_text("missing.deeper"), "");
}

#[test]
fn status_vocabulary_recognizes_case_insensitively() {
    let vocab = RecordKind::OwnerPosting.statuses();
    assert_eq!(vocab.recognize("approved"), Some("Approved"));
    assert_eq!(vocab.recognize(" PENDING "), Some("Pending"));
    assert_eq!(vocab.recognize("archived"), None);
    assert_eq!(vocab.resolve(None), "Pending");
    assert_eq!(vocab.resolve(Some("archived")), "Pending");
}

#[test]
fn request_kinds_share_lowercase_vocabulary() {
    for kind in [
        RecordKind::VisitRequest,
        RecordKind::LocationRequest,
        RecordKind::MoveRequest,
    ] {
        let vocab = kind.statuses();
        assert_eq!(vocab.values(), &["pending", "completed", "cancelled"]);
        assert_eq!(vocab.default_status(), "pending");
    }
    assert_eq!(
        RecordKind::PropertyListing.statuses().values(),
        &["Open", "Closed"]
    );
}

#[test]
fn record_kind_parses_slugs_and_aliases() {
    for kind in RecordKind::ALL {
        assert_eq!(kind.slug().parse::<RecordKind>().expect("slug"), kind);
    }
    assert_eq!(
        "move_request".parse::<RecordKind>().expect("alias"),
        RecordKind::MoveRequest
    );
    assert!("tenants".parse::<RecordKind>().is_err());
}

#[test]
fn created_at_parses_rfc3339() {
    let record = Record::from_value(json!({"_id": "x", "createdAt": "2025-01-02T03:04:05.000Z"}))
        .expect("record");
    let created = record.created_at().expect("timestamp");
    assert_eq!(created.to_rfc3339(), "2025-01-02T03:04:05+00:00");

    let garbage = Record::from_value(json!({"_id": "y", "createdAt": "yesterday"})).expect("record");
    assert!(garbage.created_at().is_none());
}

#[test]
fn set_status_overwrites_only_status() {
    let mut record =
        Record::from_value(json!({"_id": "r", "status": "pending", "name": "Asha"})).expect("record");
    record.set_status("completed");
    assert_eq!(record.raw_status(), Some("completed"));
    assert_eq!(record.field_text("name"), "Asha");
}
