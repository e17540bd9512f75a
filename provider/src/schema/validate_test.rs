//! Unit tests for schema validation

use super::envelope::resource_schema;
use super::validate::{is_dns1123_label, is_dns1123_subdomain, is_qualified_name, validate};
use super::{Attribute, AttributeKind, Mode, Validator};
use crate::test_utils::{scalable_target_info, scalable_target_plan, sidecar_info, sidecar_plan, with};
use serde_json::json;

fn paths(diagnostics: &[crate::diagnostics::Diagnostic]) -> Vec<String> {
    diagnostics
        .iter()
        .filter_map(|d| d.attribute_path.as_ref().map(ToString::to_string))
        .collect()
}

#[test]
fn test_valid_plans_pass() {
    let schema = resource_schema(&sidecar_info());
    assert_eq!(validate(&schema.attributes, &sidecar_plan()), vec![]);

    let schema = resource_schema(&scalable_target_info());
    assert_eq!(validate(&schema.attributes, &scalable_target_plan()), vec![]);
}

#[test]
fn test_missing_required_attributes_reported_by_path() {
    let schema = resource_schema(&scalable_target_info());
    let plan = json!({
        "metadata": { "name": "t" },
        "spec": { "resource_id": "table/orders", "scalable_dimension": "x" }
    });
    let diagnostics = validate(&schema.attributes, &plan);
    assert_eq!(paths(&diagnostics), vec!["metadata.namespace", "spec.service_namespace"]);
    assert!(diagnostics.iter().all(|d| d.summary == "Missing required attribute"));
}

#[test]
fn test_unknown_and_mistyped_attributes() {
    let schema = resource_schema(&scalable_target_info());
    let mut plan = scalable_target_plan();
    plan["spec"]["max_capacity"] = json!("twenty");
    plan["spec"]["maxCapacity"] = json!(20);
    let diagnostics = validate(&schema.attributes, &plan);
    assert_eq!(paths(&diagnostics), vec!["spec.max_capacity", "spec.maxCapacity"]);
    assert_eq!(diagnostics[0].summary, "Incorrect attribute value type");
    assert_eq!(diagnostics[1].summary, "Unsupported attribute");
}

#[test]
fn test_enum_values_checked_inside_lists() {
    let schema = resource_schema(&sidecar_info());
    let mut plan = sidecar_plan();
    plan["spec"]["egress"][0]["capture_mode"] = json!("TPROXY");
    let diagnostics = validate(&schema.attributes, &plan);
    assert_eq!(paths(&diagnostics), vec!["spec.egress[0].capture_mode"]);
    assert!(diagnostics[0].detail.contains("IPTABLES"));
}

#[test]
fn test_envelope_validators() {
    let schema = resource_schema(&sidecar_info());
    let plan = with(
        &sidecar_plan(),
        json!({
            "metadata": {
                "name": "Not_Valid",
                "namespace": "default",
                "labels": { "bad key!": "x" }
            },
            "deletion_propagation": "Sometimes",
            "upsert_timeout": "soon",
            "wait_for_delete": { "timeout": "2m", "poll_interval": "1x" }
        }),
    );
    let diagnostics = validate(&schema.attributes, &plan);
    assert_eq!(
        paths(&diagnostics),
        vec![
            "metadata.name",
            "metadata.labels",
            "deletion_propagation",
            "upsert_timeout",
            "wait_for_delete.poll_interval",
        ]
    );
}

#[test]
fn test_zero_poll_intervals_rejected() {
    let schema = resource_schema(&sidecar_info());
    let plan = with(
        &sidecar_plan(),
        json!({
            "upsert_timeout": "0s",
            "poll_interval": "0s",
            "wait_for_delete": { "timeout": "0", "poll_interval": "0ms" }
        }),
    );
    let diagnostics = validate(&schema.attributes, &plan);
    assert_eq!(paths(&diagnostics), vec!["poll_interval", "wait_for_delete.poll_interval"]);
    assert!(diagnostics.iter().all(|d| d.detail.contains("greater than zero")));
}

#[test]
fn test_scalar_validators() {
    let attributes = vec![
        Attribute::new("replicas", AttributeKind::Int64, Mode::Optional)
            .validate(Validator::IntAtLeast(1))
            .validate(Validator::IntAtMost(10)),
        Attribute::new("ratio", AttributeKind::Float64, Mode::Optional).validate(Validator::FloatAtMost(1.0)),
        Attribute::new("code", AttributeKind::String, Mode::Optional)
            .validate(Validator::Regex("^[A-Z]{3}$".to_string()))
            .validate(Validator::LengthBetween { min: Some(3), max: Some(3) }),
        Attribute::new("hosts", AttributeKind::List(Box::new(AttributeKind::String)), Mode::Optional)
            .validate(Validator::ItemsBetween { min: Some(1), max: Some(2) }),
    ];

    let ok = json!({ "replicas": 3, "ratio": 0.5, "code": "ABC", "hosts": ["a"] });
    assert_eq!(validate(&attributes, &ok), vec![]);

    let bad = json!({ "replicas": 11, "ratio": 1.5, "code": "abcd", "hosts": [] });
    assert_eq!(paths(&validate(&attributes, &bad)), vec!["replicas", "ratio", "code", "code", "hosts"]);
}

#[test]
fn test_unsupported_patterns_are_skipped() {
    let attributes = vec![
        Attribute::new("name", AttributeKind::String, Mode::Optional)
            .validate(Validator::Regex("^(?!kube-).*$".to_string())),
    ];
    assert_eq!(validate(&attributes, &json!({ "name": "kube-system" })), vec![]);
}

#[test]
fn test_null_config_reports_required_attributes() {
    let schema = resource_schema(&sidecar_info());
    let diagnostics = validate(&schema.attributes, &serde_json::Value::Null);
    assert_eq!(paths(&diagnostics), vec!["metadata", "spec"]);
}

#[test]
fn test_name_helpers() {
    assert!(is_dns1123_label("istio-system"));
    assert!(!is_dns1123_label("istio.system"));
    assert!(!is_dns1123_label("-system"));
    assert!(!is_dns1123_label(&"a".repeat(64)));

    assert!(is_dns1123_subdomain("reviews.v1"));
    assert!(!is_dns1123_subdomain("Reviews"));
    assert!(!is_dns1123_subdomain("reviews..v1"));
    assert!(!is_dns1123_subdomain(""));

    assert!(is_qualified_name("app"));
    assert!(is_qualified_name("app.kubernetes.io/name"));
    assert!(is_qualified_name("Example_Key.1"));
    assert!(!is_qualified_name("app.kubernetes.io/"));
    assert!(!is_qualified_name("UPPER.io/name"));
    assert!(!is_qualified_name("a/b/c"));
}
