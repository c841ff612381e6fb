use super::*;
use serde_json::json;

#[test]
fn bare_and_wrapped_collections_normalize_identically() {
    let bare: CollectionResponse =
        serde_json::from_value(json!([{"_id": "a"}, {"_id": "b"}])).expect("bare");
    let wrapped: CollectionResponse =
        serde_json::from_value(json!({"success": true, "data": [{"_id": "a"}, {"_id": "b"}]}))
            .expect("wrapped");
    assert_eq!(bare.into_items(), wrapped.into_items());
}

#[test]
fn wrapper_without_data_reads_as_empty() {
    let missing: CollectionResponse = serde_json::from_value(json!({"message": "ok"})).expect("missing");
    assert!(missing.into_items().is_empty());
    let null: CollectionResponse = serde_json::from_value(json!({"data": null})).expect("null");
    assert!(null.into_items().is_empty());
}

#[test]
fn non_collection_payload_is_rejected() {
    assert!(serde_json::from_value::<CollectionResponse>(json!("nope")).is_err());
    assert!(serde_json::from_value::<CollectionResponse>(json!({"data": "nope"})).is_err());
}

#[test]
fn detail_response_unwraps_data() {
    let wrapped: DetailResponse =
        serde_json::from_value(json!({"data": {"moveId": "MV-1"}})).expect("wrapped");
    assert_eq!(wrapped.into_item(), json!({"moveId": "MV-1"}));
    let bare: DetailResponse = serde_json::from_value(json!({"moveId": "MV-2"})).expect("bare");
    assert_eq!(bare.into_item(), json!({"moveId": "MV-2"}));
}

#[test]
fn status_update_body_shape() {
    let body = serde_json::to_value(StatusUpdateRequest {
        status: "completed".into(),
    })
    .expect("serialize");
    assert_eq!(body, json!({"status": "completed"}));
}
