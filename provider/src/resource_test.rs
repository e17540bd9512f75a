//! Unit tests for the resource adapter

#[cfg(test)]
mod tests {
    use crate::framework::Resource;
    use crate::resource::CrdResource;
    use crate::test_utils::*;
    use kube_dynamic::mock::Verb;
    use kube_dynamic::{DeletionPropagation, MockDynamicClient, ObjectRef};
    use serde_json::{json, Value};

    fn sidecar_resource(mock: &MockDynamicClient) -> CrdResource<crds::Sidecar> {
        CrdResource::new(sidecar_info(), mock_context(mock))
    }

    fn egress_ref() -> ObjectRef {
        ObjectRef::namespaced("default", "egress")
    }

    async fn created(mock: &MockDynamicClient) -> Value {
        sidecar_resource(mock).create(&sidecar_plan()).await.expect("create")
    }

    #[tokio::test]
    async fn test_create_applies_with_provider_defaults() {
        let mock = MockDynamicClient::new();
        let state = created(&mock).await;

        let applies = mock.applies();
        assert_eq!(applies.len(), 1);
        assert_eq!(applies[0].object, egress_ref());
        assert_eq!(applies[0].options.field_manager, "crd-provider");
        assert!(!applies[0].options.force_conflicts);
        assert!(applies[0].options.strict_validation);
        assert_eq!(applies[0].manifest["spec"]["egress"][0]["captureMode"], "IPTABLES");

        assert_eq!(state["id"], "default/egress");
        assert_eq!(state["kind"], "Sidecar");
        assert_eq!(state["metadata"]["generation"], 1);
        assert!(state["metadata"]["uid"].is_string());
        assert_eq!(state["spec"]["egress"][0]["port"]["number"], 8080);
    }

    #[tokio::test]
    async fn test_create_uses_plan_field_manager_and_force() {
        let mock = MockDynamicClient::new();
        let plan = with(&sidecar_plan(), json!({ "field_manager": "platform-team", "force_conflicts": true }));
        let state = sidecar_resource(&mock).create(&plan).await.expect("create");

        let options = &mock.applies()[0].options;
        assert_eq!(options.field_manager, "platform-team");
        assert!(options.force_conflicts);
        assert_eq!(state["field_manager"], "platform-team");
        assert_eq!(state["force_conflicts"], true);
    }

    #[tokio::test]
    async fn test_create_with_invalid_plan_never_applies() {
        let mock = MockDynamicClient::new();
        let mut plan = sidecar_plan();
        plan["metadata"]["name"] = json!("Invalid Name");
        plan["wait_for_upsert"] = json!([{ "jsonpath": "$.status[", "value": "x" }]);

        let diagnostics = sidecar_resource(&mock).create(&plan).await.expect_err("invalid plan");
        let paths: Vec<String> = diagnostics
            .iter()
            .filter_map(|d| d.attribute_path.as_ref().map(ToString::to_string))
            .collect();
        assert_eq!(paths, vec!["metadata.name", "wait_for_upsert[0].jsonpath"]);
        assert!(mock.applies().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_waits_for_conditions() {
        let mock = MockDynamicClient::new();
        mock.set_status_on_apply(json!({ "phase": "Ready", "observedGeneration": 1 }));
        let plan = with(
            &sidecar_plan(),
            json!({
                "wait_for_upsert": [
                    { "jsonpath": "{.status.phase}", "value": "Ready" },
                    { "jsonpath": ".status.observedGeneration", "value": "1" }
                ]
            }),
        );
        sidecar_resource(&mock).create(&plan).await.expect("create");
        // one wait check, one read back
        assert_eq!(mock.get_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_upsert_wait_times_out_after_timeout() {
        let mock = MockDynamicClient::new();
        mock.set_status_on_apply(json!({ "phase": "Pending" }));
        let plan = with(
            &sidecar_plan(),
            json!({ "wait_for_upsert": [{ "jsonpath": "$.status.phase", "value": "Ready" }] }),
        );

        let diagnostics = sidecar_resource(&mock).create(&plan).await.expect_err("timeout");
        assert_eq!(diagnostics[0].summary, "Timed out");
        assert!(diagnostics[0].detail.contains("30s"), "{}", diagnostics[0].detail);
        // checks at 0s, 5s, ..., 30s
        assert_eq!(mock.get_calls(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_upsert_timeout_checks_once() {
        let mock = MockDynamicClient::new();
        let plan = with(
            &sidecar_plan(),
            json!({
                "wait_for_upsert": [{ "jsonpath": "$.status.phase", "value": "Ready" }],
                "upsert_timeout": "0s"
            }),
        );
        let diagnostics = sidecar_resource(&mock).create(&plan).await.expect_err("timeout");
        assert_eq!(diagnostics[0].summary, "Timed out");
        assert_eq!(mock.get_calls(), 1);
    }

    #[tokio::test]
    async fn test_read_refreshes_and_clears_missing() {
        let mock = MockDynamicClient::new();
        let resource = sidecar_resource(&mock);
        let state = created(&mock).await;

        mock.set_status(&sidecar_info().resource, &egress_ref(), json!({ "phase": "Ready" }));
        let refreshed = resource.read(&state).await.expect("read").expect("still exists");
        assert_eq!(refreshed["id"], "default/egress");
        assert_eq!(refreshed["metadata"]["uid"], state["metadata"]["uid"]);

        resource.delete(&state).await.expect("delete");
        assert_eq!(resource.read(&state).await.expect("read"), None);
    }

    #[tokio::test]
    async fn test_update_reapplies_and_bumps_generation() {
        let mock = MockDynamicClient::new();
        let resource = sidecar_resource(&mock);
        let prior = created(&mock).await;

        let mut plan = prior.clone();
        plan["spec"]["egress"][0]["hosts"] = json!(["./*"]);
        let state = resource.update(&prior, &plan).await.expect("update");

        assert_eq!(mock.applies().len(), 2);
        assert_eq!(state["metadata"]["generation"], 2);
        assert_eq!(state["spec"]["egress"][0]["hosts"], json!(["./*"]));
        assert!(mock.applies()[1].manifest["metadata"].get("uid").is_none());
    }

    #[tokio::test]
    async fn test_update_rejects_rename() {
        let mock = MockDynamicClient::new();
        let resource = sidecar_resource(&mock);
        let prior = created(&mock).await;

        let mut plan = prior.clone();
        plan["metadata"]["namespace"] = json!("istio-system");
        let diagnostics = resource.update(&prior, &plan).await.expect_err("rename");
        assert_eq!(diagnostics[0].summary, "Attribute requires replacement");
        assert_eq!(
            diagnostics[0].attribute_path.as_ref().map(ToString::to_string).as_deref(),
            Some("metadata.namespace")
        );
        assert_eq!(mock.applies().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_passes_propagation_and_tolerates_missing() {
        let mock = MockDynamicClient::new();
        let resource = sidecar_resource(&mock);
        let state = with(&created(&mock).await, json!({ "deletion_propagation": "Foreground" }));

        resource.delete(&state).await.expect("delete");
        assert_eq!(mock.deletes()[0].propagation, Some(DeletionPropagation::Foreground));

        // already gone
        resource.delete(&state).await.expect("delete of missing object");
        assert_eq!(mock.deletes().len(), 2);
    }

    #[tokio::test]
    async fn test_spans_name_the_object() {
        let logs = CapturedLogs::default();
        let _guard = logs.install();
        let mock = MockDynamicClient::new();
        let state = created(&mock).await;
        sidecar_resource(&mock).delete(&state).await.expect("delete");

        let lines = logs.lines();
        for message in ["Applying Sidecar", "Deleting Sidecar"] {
            let line = lines
                .iter()
                .find(|l| l.contains(message))
                .unwrap_or_else(|| panic!("no {:?} line in {:?}", message, lines));
            assert!(line.contains("object=default/egress"), "{}", line);
            assert!(line.contains("type_name=k8s_networking_istio_io_sidecar_v1beta1"), "{}", line);
        }
    }

    #[tokio::test]
    async fn test_zero_poll_interval_never_polls() {
        let mock = MockDynamicClient::new();
        let plan = with(
            &sidecar_plan(),
            json!({
                "wait_for_upsert": [{ "jsonpath": ".status.phase", "value": "Ready" }],
                "upsert_timeout": "1s",
                "poll_interval": "0s"
            }),
        );
        let diagnostics = sidecar_resource(&mock).create(&plan).await.expect_err("zero interval");
        assert_eq!(diagnostics[0].summary, "Invalid attribute value");
        assert!(mock.applies().is_empty());
        assert_eq!(mock.get_calls(), 0);

        let resource = sidecar_resource(&mock);
        let state = with(
            &created(&mock).await,
            json!({ "wait_for_delete": { "poll_interval": "0s" } }),
        );
        let diagnostics = resource.delete(&state).await.expect_err("zero interval");
        assert_eq!(diagnostics[0].summary, "Invalid duration");
        assert!(mock.deletes().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_waits_until_gone() {
        let mock = MockDynamicClient::new();
        let resource = sidecar_resource(&mock);
        let state = with(
            &created(&mock).await,
            json!({ "wait_for_delete": { "timeout": "30s", "poll_interval": "5s" } }),
        );
        let before = mock.get_calls();
        mock.set_linger_reads(2);

        resource.delete(&state).await.expect("delete");
        assert_eq!(mock.get_calls() - before, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_wait_times_out() {
        let mock = MockDynamicClient::new();
        let resource = sidecar_resource(&mock);
        let state = with(
            &created(&mock).await,
            json!({ "wait_for_delete": { "timeout": "10s", "poll_interval": "4s" } }),
        );
        let before = mock.get_calls();
        mock.set_linger_reads(100);

        let diagnostics = resource.delete(&state).await.expect_err("timeout");
        assert!(diagnostics[0].detail.contains("be deleted"));
        assert!(diagnostics[0].detail.contains("10s"), "{}", diagnostics[0].detail);
        // checks at 0s, 4s, 8s, 10s
        assert_eq!(mock.get_calls() - before, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_delete_timeout_checks_once() {
        let mock = MockDynamicClient::new();
        let resource = sidecar_resource(&mock);
        let state = with(&created(&mock).await, json!({ "wait_for_delete": { "timeout": "0s" } }));
        let before = mock.get_calls();
        mock.set_linger_reads(1);

        assert!(resource.delete(&state).await.is_err());
        assert_eq!(mock.get_calls() - before, 1);
    }

    #[tokio::test]
    async fn test_import_by_id() {
        let mock = MockDynamicClient::new();
        let resource = sidecar_resource(&mock);
        created(&mock).await;

        let state = resource.import("default/egress").await.expect("import");
        assert_eq!(state["metadata"]["name"], "egress");
        assert_eq!(state["spec"]["egress"][0]["capture_mode"], "IPTABLES");
        assert!(state["field_manager"].is_null());

        let diagnostics = resource.import("egress").await.expect_err("malformed id");
        assert_eq!(diagnostics[0].summary, "Invalid import id");

        let diagnostics = resource.import("default/missing").await.expect_err("missing");
        assert_eq!(diagnostics[0].summary, "Object not found");
    }

    #[tokio::test]
    async fn test_cluster_errors_become_diagnostics() {
        let mock = MockDynamicClient::new();
        mock.fail_next(Verb::Apply, "admission webhook denied the request");
        let diagnostics = sidecar_resource(&mock).create(&sidecar_plan()).await.expect_err("apply fails");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].summary, "Kubernetes API request failed");
        assert!(diagnostics[0].detail.contains("admission webhook"));
    }

    #[tokio::test]
    async fn test_offline_provider_reports_error() {
        let resource: CrdResource<crds::Sidecar> = CrdResource::new(sidecar_info(), offline_context());
        let diagnostics = resource.create(&sidecar_plan()).await.expect_err("offline");
        assert_eq!(diagnostics[0].summary, "Provider is offline");
    }
}
