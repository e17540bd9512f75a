//! Unit tests for the data source and manifest data source adapters

#[cfg(test)]
mod tests {
    use crate::data_source::CrdDataSource;
    use crate::framework::DataSource;
    use crate::manifest::CrdManifest;
    use crate::test_utils::*;
    use kube_dynamic::{MockDynamicClient, ObjectRef};
    use serde_json::json;

    #[tokio::test]
    async fn test_data_source_reads_live_object() {
        let mock = MockDynamicClient::new();
        let info = sidecar_info();
        mock.insert(
            &info.resource,
            &ObjectRef::namespaced("istio-system", "default"),
            json!({
                "metadata": { "labels": { "team": "mesh" }, "uid": "42" },
                "spec": { "outboundTrafficPolicy": { "mode": "ALLOW_ANY" } }
            }),
        );

        let data_source = CrdDataSource::new(info, mock_context(&mock));
        let state = data_source
            .read(&json!({ "metadata": { "name": "default", "namespace": "istio-system" } }))
            .await
            .expect("read");

        assert_eq!(state["id"], "istio-system/default");
        assert_eq!(state["api_version"], "networking.istio.io/v1beta1");
        assert_eq!(state["metadata"]["labels"]["team"], "mesh");
        assert_eq!(state["metadata"]["uid"], "42");
        assert_eq!(state["spec"]["outbound_traffic_policy"]["mode"], "ALLOW_ANY");
        assert!(state["spec"]["egress"].is_null());
        assert!(mock.applies().is_empty());
    }

    #[tokio::test]
    async fn test_data_source_missing_object_is_an_error() {
        let mock = MockDynamicClient::new();
        let data_source = CrdDataSource::new(sidecar_info(), mock_context(&mock));
        let diagnostics = data_source
            .read(&json!({ "metadata": { "name": "absent", "namespace": "default" } }))
            .await
            .expect_err("missing");
        assert_eq!(diagnostics[0].summary, "Object not found");
    }

    #[tokio::test]
    async fn test_data_source_rejects_computed_only_config() {
        let mock = MockDynamicClient::new();
        let data_source = CrdDataSource::new(sidecar_info(), mock_context(&mock));
        let diagnostics = data_source.validate(&json!({ "metadata": { "namespace": "default" } }));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].summary, "Missing required attribute");
        assert_eq!(mock.get_calls(), 0);
    }

    #[tokio::test]
    async fn test_manifest_renders_yaml_without_cluster() {
        let manifest: CrdManifest<crds::ScalableTarget> = CrdManifest::new(scalable_target_info());
        assert_eq!(
            manifest.type_name(),
            "k8s_applicationautoscaling_services_k8s_aws_scalable_target_v1alpha1_manifest"
        );

        let state = manifest.read(&scalable_target_plan()).await.expect("render");
        assert_eq!(state["id"], "default/dynamodb-table");
        assert_eq!(state["spec"]["resource_id"], "table/orders");

        let yaml = state["yaml"].as_str().expect("yaml string");
        let rendered: serde_json::Value = serde_yaml::from_str(yaml).expect("valid yaml");
        assert_eq!(rendered["apiVersion"], "applicationautoscaling.services.k8s.aws/v1alpha1");
        assert_eq!(rendered["kind"], "ScalableTarget");
        assert_eq!(rendered["metadata"]["name"], "dynamodb-table");
        assert_eq!(rendered["spec"]["resourceID"], "table/orders");
        assert_eq!(rendered["spec"]["maxCapacity"], 20);
        assert_eq!(rendered["spec"]["roleARN"], "arn:aws:iam::123456789012:role/autoscaling");
        assert!(yaml.starts_with("apiVersion:"));
    }

    #[tokio::test]
    async fn test_manifest_reports_validation_errors() {
        let manifest: CrdManifest<crds::ScalableTarget> = CrdManifest::new(scalable_target_info());
        let mut config = scalable_target_plan();
        config["spec"]["min_capacity"] = json!("one");
        config["force_conflicts"] = json!(true);

        let diagnostics = manifest.read(&config).await.expect_err("invalid");
        let paths: Vec<String> = diagnostics
            .iter()
            .filter_map(|d| d.attribute_path.as_ref().map(ToString::to_string))
            .collect();
        assert_eq!(paths, vec!["spec.min_capacity", "force_conflicts"]);
    }
}
