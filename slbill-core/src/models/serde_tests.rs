//! Serde tests for core types.
//!
//! These tests pin the wire shape of billing records: camelCase keys,
//! tolerated missing fields, and costs sent as either strings or numbers.

use serde_json::json;

use crate::{Amount, BillingResource, QueryFilters, ResourceField};

// ============================================================================
// BillingResource Serde Tests
// ============================================================================

#[test]
fn test_resource_deserialize_full_record() {
    let value = json!({
        "id": 123,
        "hostName": "iscsi01",
        "resourceType": "iSCSI SAN Storage",
        "cost": "45.50",
        "createDate": "2014-03-15"
    });

    let resource: BillingResource = serde_json::from_value(value).unwrap();

    assert_eq!(resource.id, Some(123));
    assert_eq!(resource.host_name.as_deref(), Some("iscsi01"));
    assert_eq!(resource.resource_type.as_deref(), Some("iSCSI SAN Storage"));
    assert_eq!(resource.cost, Some(Amount::Text("45.50".to_string())));
    assert_eq!(resource.create_date.as_deref(), Some("2014-03-15"));
}

#[test]
fn test_resource_deserialize_numeric_cost() {
    let resource: BillingResource =
        serde_json::from_value(json!({"id": 1, "cost": 45.5})).unwrap();

    assert_eq!(resource.cost, Some(Amount::Number(45.5)));
    assert_eq!(resource.field(ResourceField::Cost), "45.50");
}

#[test]
fn test_resource_deserialize_empty_object() {
    let resource: BillingResource = serde_json::from_value(json!({})).unwrap();

    assert_eq!(resource, BillingResource::default());
    for field in ResourceField::ALL {
        assert_eq!(resource.field(field), "", "{field} should be blank");
    }
}

#[test]
fn test_resource_ignores_unknown_keys() {
    let resource = BillingResource::from_value(json!({
        "id": 5,
        "recurringFee": "9.99",
        "categoryCode": "server"
    }))
    .unwrap();

    assert_eq!(resource.id, Some(5));
    assert!(resource.cost.is_none());
}

#[test]
fn test_resource_serialize_uses_api_keys() {
    let mut resource = BillingResource::new(9);
    resource.host_name = Some("web01".to_string());

    let value = serde_json::to_value(&resource).unwrap();

    for field in [ResourceField::Id, ResourceField::HostName] {
        assert!(value.get(field.key()).is_some(), "missing {field}");
    }
}

// ============================================================================
// QueryFilters Serde Tests
// ============================================================================

#[test]
fn test_filters_skip_unset_fields() {
    let filters = QueryFilters::new().with_group_by(Some("server"));
    let json = serde_json::to_string(&filters).unwrap();
    assert_eq!(json, r#"{"group_by":"server"}"#);
}

#[test]
fn test_filters_deserialize_partial() {
    let filters: QueryFilters = serde_json::from_str(r#"{"from_date":"2014-03-01"}"#).unwrap();
    assert_eq!(filters.from_date.as_deref(), Some("2014-03-01"));
    assert!(filters.to_date.is_none());
    assert!(filters.group_by.is_none());
}
