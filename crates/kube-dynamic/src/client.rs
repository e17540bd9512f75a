//! Kubernetes dynamic client
//!
//! Implements [`DynamicClientTrait`] on top of `kube::Api<DynamicObject>`,
//! addressing any resource by its [`ApiResource`] coordinates.

use crate::error::ClusterError;
use crate::models::{ApplyOptions, DeletionPropagation, ObjectRef};
use crate::dynamic_trait::DynamicClientTrait;
use kube::api::{Api, ApiResource, DeleteParams, DynamicObject, Patch};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use std::path::Path;
use tracing::{debug, info};

/// Dynamic client backed by a kube [`Client`]
#[derive(Clone)]
pub struct KubeDynamicClient {
    client: Client,
}

impl std::fmt::Debug for KubeDynamicClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeDynamicClient")
            .field("default_namespace", &self.client.default_namespace())
            .finish()
    }
}

impl KubeDynamicClient {
    /// Wrap an existing kube client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from a kubeconfig file and/or context
    ///
    /// # Arguments
    /// * `kubeconfig` - explicit kubeconfig path; falls back to `KUBECONFIG`,
    ///   `~/.kube/config` and in-cluster configuration when `None`
    /// * `context` - kubeconfig context to use instead of the current one
    pub async fn from_kubeconfig(kubeconfig: Option<&Path>, context: Option<&str>) -> Result<Self, ClusterError> {
        let options = KubeConfigOptions {
            context: context.map(str::to_string),
            ..KubeConfigOptions::default()
        };

        let config = match (kubeconfig, context) {
            (Some(path), _) => {
                debug!("Loading kubeconfig from {}", path.display());
                let kubeconfig = Kubeconfig::read_from(path)
                    .map_err(|e| ClusterError::Config(format!("reading {}: {}", path.display(), e)))?;
                Config::from_custom_kubeconfig(kubeconfig, &options)
                    .await
                    .map_err(|e| ClusterError::Config(e.to_string()))?
            }
            (None, Some(_)) => Config::from_kubeconfig(&options)
                .await
                .map_err(|e| ClusterError::Config(e.to_string()))?,
            (None, None) => Config::infer()
                .await
                .map_err(|e| ClusterError::Config(e.to_string()))?,
        };

        info!("Connecting to Kubernetes API at {}", config.cluster_url);
        let client = Client::try_from(config)?;
        Ok(Self::new(client))
    }

    /// Build an `Api<DynamicObject>` for the resource, scoped to a namespace if given
    fn api(&self, resource: &ApiResource, namespace: Option<&str>) -> Api<DynamicObject> {
        match namespace {
            Some(ns) => Api::namespaced_with(self.client.clone(), ns, resource),
            None => Api::all_with(self.client.clone(), resource),
        }
    }
}

/// Map a kube error, turning HTTP 404 into [`ClusterError::NotFound`]
fn map_kube_error(err: kube::Error, resource: &ApiResource, object: &ObjectRef) -> ClusterError {
    match err {
        kube::Error::Api(ref response) if response.code == 404 => {
            ClusterError::NotFound(format!("{} {}", resource.kind, object))
        }
        other => ClusterError::Kube(other),
    }
}

#[async_trait::async_trait]
impl DynamicClientTrait for KubeDynamicClient {
    async fn get(&self, resource: &ApiResource, object: &ObjectRef) -> Result<DynamicObject, ClusterError> {
        debug!("GET {} {}", resource.kind, object);
        self.api(resource, object.namespace.as_deref())
            .get(&object.name)
            .await
            .map_err(|e| map_kube_error(e, resource, object))
    }

    async fn apply(
        &self,
        resource: &ApiResource,
        object: &ObjectRef,
        manifest: &serde_json::Value,
        options: &ApplyOptions,
    ) -> Result<DynamicObject, ClusterError> {
        let params = options.patch_params();
        debug!(
            "APPLY {} {} (field manager: {}, force: {})",
            resource.kind, object, options.field_manager, options.force_conflicts
        );
        self.api(resource, object.namespace.as_deref())
            .patch(&object.name, &params, &Patch::Apply(manifest))
            .await
            .map_err(|e| map_kube_error(e, resource, object))
    }

    async fn delete(
        &self,
        resource: &ApiResource,
        object: &ObjectRef,
        propagation: Option<DeletionPropagation>,
    ) -> Result<(), ClusterError> {
        let params = propagation.map_or_else(DeleteParams::default, DeletionPropagation::delete_params);
        debug!("DELETE {} {}", resource.kind, object);
        self.api(resource, object.namespace.as_deref())
            .delete(&object.name, &params)
            .await
            .map(|_| ())
            .map_err(|e| map_kube_error(e, resource, object))
    }
}
