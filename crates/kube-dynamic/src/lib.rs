//! Kubernetes Dynamic Client
//!
//! A schema-unaware client for Kubernetes objects, addressed by
//! [`kube::api::ApiResource`] coordinates instead of compile-time types.
//!
//! # Example
//!
//! ```no_run
//! use kube_dynamic::{ApplyOptions, DynamicClientTrait, KubeDynamicClient, ObjectRef};
//! use kube::api::ApiResource;
//! use kube::core::GroupVersionKind;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = KubeDynamicClient::from_kubeconfig(None, None).await?;
//! let gvk = GroupVersionKind::gvk("networking.istio.io", "v1beta1", "Sidecar");
//! let resource = ApiResource::from_gvk(&gvk);
//!
//! let manifest = serde_json::json!({
//!     "apiVersion": "networking.istio.io/v1beta1",
//!     "kind": "Sidecar",
//!     "metadata": { "name": "default", "namespace": "istio-system" },
//!     "spec": { "egress": [{ "hosts": ["./*"] }] }
//! });
//! let object = ObjectRef::namespaced("istio-system", "default");
//! client.apply(&resource, &object, &manifest, &ApplyOptions::new("crd-provider")).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Get / Apply / Delete**: the three verbs the provider adapters need
//! - **Server-side apply**: field manager, force-conflicts, strict field validation
//! - **Mocking**: `MockDynamicClient` behind the `test-util` feature

pub mod client;
pub mod error;
pub mod models;
#[path = "trait.rs"]
pub mod dynamic_trait;
#[cfg(feature = "test-util")]
pub mod mock;

pub use client::KubeDynamicClient;
pub use error::ClusterError;
pub use models::*;
pub use dynamic_trait::DynamicClientTrait;
#[cfg(feature = "test-util")]
pub use mock::MockDynamicClient;
