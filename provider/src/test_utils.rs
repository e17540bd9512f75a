//! Test utilities for creating kind descriptions, contexts and plans

use crate::config::ProviderSettings;
use crate::kinds::KindInfo;
use crate::provider::ProviderContext;
use kube_dynamic::{DynamicClientTrait, MockDynamicClient};
use serde_json::{json, Value};
use std::io;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::subscriber::DefaultGuard;

/// Kind description of Sidecar
pub fn sidecar_info() -> Arc<KindInfo> {
    Arc::new(KindInfo::of::<crds::Sidecar>(None).expect("Sidecar kind info"))
}

/// Kind description of ScalableTarget
pub fn scalable_target_info() -> Arc<KindInfo> {
    Arc::new(KindInfo::of::<crds::ScalableTarget>(None).expect("ScalableTarget kind info"))
}

/// Provider context around a mock client with default settings
pub fn mock_context(mock: &MockDynamicClient) -> Arc<ProviderContext> {
    let client: Arc<dyn DynamicClientTrait> = Arc::new(mock.clone());
    Arc::new(ProviderContext::new(Some(client), ProviderSettings::default()))
}

/// Provider context without a cluster
pub fn offline_context() -> Arc<ProviderContext> {
    Arc::new(ProviderContext::new(None, ProviderSettings::default()))
}

/// Resource plan for a Sidecar `default/egress` with one egress listener
pub fn sidecar_plan() -> Value {
    json!({
        "metadata": {
            "name": "egress",
            "namespace": "default",
            "labels": { "app.kubernetes.io/managed-by": "crd-provider" }
        },
        "spec": {
            "egress": [{
                "hosts": ["./*", "istio-system/*"],
                "port": { "number": 8080, "protocol": "HTTP", "name": "http" },
                "capture_mode": "IPTABLES"
            }],
            "outbound_traffic_policy": { "mode": "REGISTRY_ONLY" }
        }
    })
}

/// Resource plan for a ScalableTarget `default/dynamodb-table`
pub fn scalable_target_plan() -> Value {
    json!({
        "metadata": { "name": "dynamodb-table", "namespace": "default" },
        "spec": {
            "max_capacity": 20,
            "min_capacity": 1,
            "resource_id": "table/orders",
            "role_arn": "arn:aws:iam::123456789012:role/autoscaling",
            "scalable_dimension": "dynamodb:table:WriteCapacityUnits",
            "service_namespace": "dynamodb"
        }
    })
}

/// Copy of `value` with `patch` merged in at the top level
pub fn with(value: &Value, patch: Value) -> Value {
    let mut out = value.clone();
    if let (Some(target), Value::Object(patch)) = (out.as_object_mut(), patch) {
        for (k, v) in patch {
            target.insert(k, v);
        }
    }
    out
}

/// Formatted log output collected on the current thread
#[derive(Debug, Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Route this thread's events here until the guard is dropped
    pub fn install(&self) -> DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Lines written so far
    pub fn lines(&self) -> Vec<String> {
        let bytes = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).lines().map(str::to_string).collect()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
