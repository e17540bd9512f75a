//! CRD Provider
//!
//! Exposes Kubernetes custom resource kinds to an infrastructure-as-code
//! host. Every supported kind gets three adapters:
//! - a resource (Create / Read / Update / Delete / Import) backed by
//!   server-side apply
//! - a data source reading a live object
//! - a manifest data source rendering the object as YAML without a cluster
//!
//! Attribute schemas are derived from each kind's CRD OpenAPI schema. Waits
//! poll JSONPath conditions on the live object.

pub mod config;
pub mod convert;
pub mod data_source;
pub mod diagnostics;
pub mod duration;
pub mod error;
pub mod framework;
pub mod host;
pub mod kinds;
pub mod manifest;
pub mod naming;
pub mod provider;
pub mod resource;
pub mod schema;
pub mod wait;

#[cfg(test)]
mod test_utils;
#[cfg(test)]
mod resource_test;
#[cfg(test)]
mod data_source_test;

pub use config::{ProviderConfig, ProviderSettings};
pub use diagnostics::{AttributePath, Diagnostic, Severity};
pub use error::ProviderError;
pub use framework::{DataSource, Resource};
pub use provider::Provider;
