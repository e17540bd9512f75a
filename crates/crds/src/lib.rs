//! CRD Provider Kinds
//!
//! Typed Kubernetes Custom Resource Definitions exposed by the CRD provider.
//! Each kind mirrors its upstream OpenAPI schema and implements [`CrdKind`].

pub mod kind;
pub mod applicationautoscaling;
pub mod apps_3scale;
pub mod networking_istio;

#[cfg(test)]
mod kind_test;

pub use kind::{CrdKind, SchemaError, SpecSchema};
pub use applicationautoscaling::*;
pub use apps_3scale::*;
pub use networking_istio::*;
