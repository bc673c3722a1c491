//! Tests for navstate-model types.

use navstate_model::{
    ListParams, Location, NavigationConfig, PageId, ParamPatch, PersistedBlob, QueryScalar,
    QueryValue, RoutePath,
};
use serde_json::json;

#[test]
fn blob_with_missing_fields_uses_defaults() {
    let blob = PersistedBlob::from_json(r#"{"navigationHistory": ["/a"]}"#).unwrap();
    assert!(blob.page_states.is_empty());
    assert_eq!(blob.navigation_source, None);
    assert_eq!(blob.navigation_history, vec![RoutePath::new("/a")]);
}

#[test]
fn blob_rejects_wrong_shapes() {
    assert!(PersistedBlob::from_json(r#"{"navigationHistory": "/a"}"#).is_err());
    assert!(PersistedBlob::from_json("{\"pageStates\":").is_err());
}

#[test]
fn snapshot_params_skip_unrepresentable_members() {
    let params = ListParams::from_snapshot(&json!({
        "page": 2,
        "searchTerm": "",
        "owner": null,
        "range": { "from": 1 },
        "status": ["open", null, true]
    }));
    assert_eq!(params.page(), Some(2));
    assert!(params.search_term().is_none());
    assert!(params.get("owner").is_none());
    assert!(params.get("range").is_none());
    assert_eq!(
        params.get("status"),
        Some(&QueryValue::List(vec![
            QueryScalar::Text("open".into()),
            QueryScalar::Bool(true),
        ]))
    );
}

#[test]
fn non_object_snapshot_is_empty() {
    assert!(ListParams::from_snapshot(&json!([1, 2])).is_empty());
    assert!(ListParams::from_snapshot(&json!("page=3")).is_empty());
}

#[test]
fn patch_from_json_treats_null_and_empty_as_removal() {
    let Some(map) = json!({ "page": 4, "searchTerm": "", "sortOption": null }).as_object().cloned()
    else {
        panic!("expected object");
    };
    let mut params: ListParams = [("searchTerm", "foo"), ("sortOption", "name")]
        .into_iter()
        .collect();
    params.apply(&ParamPatch::from_json_object(&map));
    assert_eq!(params.page(), Some(4));
    assert_eq!(params.len(), 1);
}

#[test]
fn numeric_text_coerces_like_a_number() {
    assert_eq!(QueryScalar::coerce("1e3").as_i64(), Some(1000));
    assert_eq!(QueryScalar::coerce("2.0").to_string(), "2");
    assert_eq!(QueryScalar::coerce(" 42 ").as_i64(), Some(42));
    assert_eq!(QueryScalar::coerce("1.5").to_string(), "1.5");
    assert_eq!(QueryScalar::coerce("   "), QueryScalar::Text("   ".into()));
    assert_eq!(QueryScalar::coerce("NaN"), QueryScalar::Text("NaN".into()));
    assert_eq!(QueryScalar::coerce("inf"), QueryScalar::Text("inf".into()));
    assert!(QueryScalar::coerce("1e300").as_i64().is_none());
}

#[test]
fn location_display_omits_empty_query() {
    assert_eq!(Location::parse("/a?").to_string(), "/a");
    assert_eq!(Location::parse("/a?x=1").to_string(), "/a?x=1");
}

#[test]
fn detail_page_ids_are_composed() {
    assert_eq!(PageId::detail("client-detail", "7").as_str(), "client-detail-7");
}

#[test]
fn config_honors_client_source_for_child_lists() {
    let config = NavigationConfig::default();
    for list in ["admin-trip-list", "admin-offer-list", "admin-reservation-list"] {
        let route = config.list_route(list).unwrap();
        assert_eq!(
            route.parent_for("client-details").map(|p| p.parent_list.as_str()),
            Some("admin-client-list")
        );
    }
    assert!(
        config
            .list_route("admin-partner-list")
            .unwrap()
            .parent_for("client-details")
            .is_none()
    );
}
