//! Unit tests for the CrdKind implementations

use crate::*;
use kube::CustomResourceExt;
use serde_json::json;

#[test]
fn test_api_resource_coordinates() {
    let ar = ScalableTarget::api_resource();
    assert_eq!(ar.group, "applicationautoscaling.services.k8s.aws");
    assert_eq!(ar.version, "v1alpha1");
    assert_eq!(ar.kind, "ScalableTarget");
    assert_eq!(ar.plural, "scalabletargets");
    assert_eq!(ar.api_version, "applicationautoscaling.services.k8s.aws/v1alpha1");

    let ar = VirtualService::api_resource();
    assert_eq!(ar.group, "networking.istio.io");
    assert_eq!(ar.plural, "virtualservices");

    let ar = APIcast::api_resource();
    assert_eq!(ar.kind, "APIcast");
    assert_eq!(ar.plural, "apicasts");
}

#[test]
fn test_all_kinds_are_namespaced() {
    assert!(ScalableTarget::namespaced());
    assert!(ScalingPolicy::namespaced());
    assert!(APIcast::namespaced());
    assert!(Sidecar::namespaced());
    assert!(VirtualService::namespaced());
}

#[test]
fn test_spec_schema_is_published() {
    let schema = ScalableTarget::spec_schema().expect("spec schema");
    assert!(schema.required, "spec is not optional on ScalableTarget");
    assert_eq!(schema.schema["type"], "object");

    let properties = schema.schema["properties"].as_object().expect("properties");
    assert!(properties.contains_key("resourceID"));
    assert!(properties.contains_key("roleARN"));
    assert!(properties.contains_key("suspendedState"));

    let required: Vec<&str> = schema.schema["required"]
        .as_array()
        .expect("required list")
        .iter()
        .filter_map(|v| v.as_str())
        .collect();
    assert!(required.contains(&"resourceID"));
    assert!(required.contains(&"scalableDimension"));
    assert!(!required.contains(&"roleARN"));
}

#[test]
fn test_scalable_target_uses_upstream_field_names() {
    let spec = ScalableTargetSpec {
        max_capacity: Some(10),
        min_capacity: Some(1),
        resource_id: "service/default/sample-webapp".to_string(),
        role_arn: Some("arn:aws:iam::123456789012:role/scaler".to_string()),
        scalable_dimension: "ecs:service:DesiredCount".to_string(),
        service_namespace: "ecs".to_string(),
        suspended_state: None,
    };

    let value = serde_json::to_value(&spec).expect("serialize");
    assert_eq!(value["resourceID"], "service/default/sample-webapp");
    assert_eq!(value["roleARN"], "arn:aws:iam::123456789012:role/scaler");
    assert_eq!(value["maxCapacity"], 10);
    assert!(value.get("suspendedState").is_none(), "None fields are omitted");

    let back: ScalableTargetSpec = serde_json::from_value(value).expect("deserialize");
    assert_eq!(back, spec);
}

#[test]
fn test_scaling_policy_round_trip() {
    let value = json!({
        "policyName": "cpu75",
        "policyType": "TargetTrackingScaling",
        "resourceID": "service/default/sample-webapp",
        "scalableDimension": "ecs:service:DesiredCount",
        "serviceNamespace": "ecs",
        "stepScalingPolicyConfiguration": {
            "adjustmentType": "PercentChangeInCapacity",
            "cooldown": 60,
            "stepAdjustments": [
                { "metricIntervalLowerBound": 0.0, "scalingAdjustment": 10 }
            ]
        },
        "targetTrackingScalingPolicyConfiguration": {
            "targetValue": 75.0,
            "predefinedMetricSpecification": {
                "predefinedMetricType": "ECSServiceAverageCPUUtilization"
            }
        }
    });

    let spec: ScalingPolicySpec = serde_json::from_value(value.clone()).expect("deserialize");
    assert_eq!(
        spec.step_scaling_policy_configuration
            .as_ref()
            .and_then(|c| c.adjustment_type),
        Some(AdjustmentType::PercentChangeInCapacity)
    );
    assert_eq!(serde_json::to_value(&spec).expect("serialize"), value);
}

#[test]
fn test_apicast_enums_serialize_lowercase() {
    let spec = APIcastSpec {
        configuration_load_mode: Some(ConfigurationLoadMode::Lazy),
        log_level: Some(LogLevel::Notice),
        management_api_scope: Some(ManagementApiScope::Status),
        open_ssl_peer_verification_enabled: Some(true),
        ..Default::default()
    };

    let value = serde_json::to_value(&spec).expect("serialize");
    assert_eq!(value["configurationLoadMode"], "lazy");
    assert_eq!(value["logLevel"], "notice");
    assert_eq!(value["managementAPIScope"], "status");
    assert_eq!(value["openSSLPeerVerificationEnabled"], true);
}

#[test]
fn test_virtual_service_match_keyword_field() {
    let value = json!({
        "hosts": ["reviews"],
        "http": [{
            "match": [{ "uri": { "prefix": "/v2" }, "ignoreUriCase": true }],
            "route": [{ "destination": { "host": "reviews", "subset": "v2" }, "weight": 100 }],
            "timeout": "10s"
        }],
        "tls": [{
            "match": [{ "sniHosts": ["login.bookinfo.com"], "port": 443 }],
            "route": [{ "destination": { "host": "login.prod.svc.cluster.local" } }]
        }]
    });

    let spec: VirtualServiceSpec = serde_json::from_value(value.clone()).expect("deserialize");
    let http = spec.http.as_ref().expect("http routes");
    let matches = http[0].r#match.as_ref().expect("matches");
    assert_eq!(matches[0].uri.as_ref().and_then(|m| m.prefix.as_deref()), Some("/v2"));
    assert_eq!(serde_json::to_value(&spec).expect("serialize"), value);
}

#[test]
fn test_sidecar_capture_mode_values() {
    let value = json!({
        "egress": [{ "hosts": ["./*", "istio-system/*"], "captureMode": "NONE" }],
        "outboundTrafficPolicy": { "mode": "REGISTRY_ONLY" }
    });

    let spec: SidecarSpec = serde_json::from_value(value.clone()).expect("deserialize");
    let egress = spec.egress.as_ref().expect("egress");
    assert_eq!(egress[0].capture_mode, Some(CaptureMode::None));
    assert_eq!(serde_json::to_value(&spec).expect("serialize"), value);
}

#[test]
fn test_from_spec_builds_named_object() {
    let sidecar = Sidecar::from_spec("default", SidecarSpec::default());
    assert_eq!(sidecar.metadata.name.as_deref(), Some("default"));
    assert!(sidecar.metadata.namespace.is_none());
    assert_eq!(CrdKind::spec(&sidecar), &SidecarSpec::default());

    let yaml = serde_yaml::to_string(&sidecar).expect("yaml");
    assert!(yaml.contains("apiVersion: networking.istio.io/v1beta1"));
    assert!(yaml.contains("kind: Sidecar"));
}
