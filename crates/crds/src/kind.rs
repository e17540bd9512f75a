//! Common surface shared by every CRD kind
//!
//! The provider never names a concrete kind. It works through [`CrdKind`],
//! which gives access to the typed spec and the OpenAPI v3 schema of the
//! kind's `spec` as published in its CRD. API resource coordinates come from
//! [`CustomResourceExt::api_resource`].

use kube::{CustomResourceExt, Resource};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Debug;
use thiserror::Error;

/// Errors raised while reading a kind's published schema
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The CRD could not be serialized to JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The CRD does not publish a schema for `spec`
    #[error("CRD {0} does not publish an OpenAPI v3 schema for spec")]
    MissingSpecSchema(String),
}

/// OpenAPI v3 schema of a kind's `spec`, extracted from its CRD
#[derive(Debug, Clone, PartialEq)]
pub struct SpecSchema {
    /// Structural schema of the `spec` property
    pub schema: Value,

    /// Whether `spec` is listed as required on the object
    pub required: bool,
}

/// A Kubernetes custom resource kind the provider can manage
pub trait CrdKind:
    Resource<DynamicType = ()>
    + CustomResourceExt
    + Serialize
    + DeserializeOwned
    + Clone
    + Debug
    + Send
    + Sync
    + 'static
{
    /// Typed desired state of the kind
    type Spec: Serialize + DeserializeOwned + Clone + Debug + Send + Sync + 'static;

    /// Borrow the typed spec
    fn spec(&self) -> &Self::Spec;

    /// Build an object with the given name and spec (no namespace, no status)
    fn from_spec(name: &str, spec: Self::Spec) -> Self;

    /// Whether objects of this kind live inside a namespace
    fn namespaced() -> bool {
        Self::crd().spec.scope == "Namespaced"
    }

    /// Extract the OpenAPI v3 schema of `spec` from the generated CRD
    fn spec_schema() -> Result<SpecSchema, SchemaError> {
        let crd = serde_json::to_value(Self::crd())?;
        let root = crd
            .pointer("/spec/versions/0/schema/openAPIV3Schema")
            .ok_or_else(|| SchemaError::MissingSpecSchema(Self::crd_name().to_string()))?;

        let schema = root
            .pointer("/properties/spec")
            .cloned()
            .ok_or_else(|| SchemaError::MissingSpecSchema(Self::crd_name().to_string()))?;

        let required = root
            .get("required")
            .and_then(Value::as_array)
            .is_some_and(|names| names.iter().any(|n| n == "spec"));

        Ok(SpecSchema { schema, required })
    }
}

/// Implement [`CrdKind`] for a type generated by `#[derive(CustomResource)]`
#[macro_export]
macro_rules! crd_kind {
    ($kind:ty, $spec:ty) => {
        impl $crate::CrdKind for $kind {
            type Spec = $spec;

            fn spec(&self) -> &Self::Spec {
                &self.spec
            }

            fn from_spec(name: &str, spec: Self::Spec) -> Self {
                <$kind>::new(name, spec)
            }
        }
    };
}
