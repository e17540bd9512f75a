//! DynamicClient trait for mocking
//!
//! This trait abstracts the Kubernetes dynamic client so the provider
//! adapters can be unit tested without a cluster. The kube-backed
//! `KubeDynamicClient` implements it, tests use `MockDynamicClient`.

use crate::error::ClusterError;
use crate::models::{ApplyOptions, DeletionPropagation, ObjectRef};
use kube::api::{ApiResource, DynamicObject};

/// Schema-unaware object operations against the Kubernetes API
///
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait DynamicClientTrait: Send + Sync {
    /// Fetch a live object, `ClusterError::NotFound` when it does not exist
    async fn get(&self, resource: &ApiResource, object: &ObjectRef) -> Result<DynamicObject, ClusterError>;

    /// Server-side apply a full manifest and return the object as stored
    async fn apply(
        &self,
        resource: &ApiResource,
        object: &ObjectRef,
        manifest: &serde_json::Value,
        options: &ApplyOptions,
    ) -> Result<DynamicObject, ClusterError>;

    /// Request deletion of an object
    async fn delete(
        &self,
        resource: &ApiResource,
        object: &ObjectRef,
        propagation: Option<DeletionPropagation>,
    ) -> Result<(), ClusterError>;
}
