//! Host-facing adapter traits
//!
//! The host drives resources through Create/Read/Update/Delete/Import and data
//! sources through Read. Values are attribute trees as JSON objects keyed by
//! attribute name. Failures are reported as diagnostics.

use crate::diagnostics::Diagnostic;
use crate::schema::Schema;
use async_trait::async_trait;
use serde_json::Value;

/// Result of a host operation
pub type HostResult<T> = Result<T, Vec<Diagnostic>>;

/// A managed resource type
#[async_trait]
pub trait Resource: Send + Sync {
    /// Type name the host addresses this resource by
    fn type_name(&self) -> &str;

    /// Attribute schema
    fn schema(&self) -> &Schema;

    /// Check a configuration without contacting the cluster
    fn validate(&self, config: &Value) -> Vec<Diagnostic>;

    /// Create the object described by `plan`, returning the new state
    async fn create(&self, plan: &Value) -> HostResult<Value>;

    /// Refresh `state` from the cluster, `None` when the object is gone
    async fn read(&self, state: &Value) -> HostResult<Option<Value>>;

    /// Move the object from `prior` state to `plan`, returning the new state
    async fn update(&self, prior: &Value, plan: &Value) -> HostResult<Value>;

    /// Delete the object recorded in `state`
    async fn delete(&self, state: &Value) -> HostResult<()>;

    /// Read an existing object into state by its id
    async fn import(&self, id: &str) -> HostResult<Value>;
}

/// A read-only data source type
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Type name the host addresses this data source by
    fn type_name(&self) -> &str;

    /// Attribute schema
    fn schema(&self) -> &Schema;

    /// Check a configuration without contacting the cluster
    fn validate(&self, config: &Value) -> Vec<Diagnostic>;

    /// Compute state for `config`
    async fn read(&self, config: &Value) -> HostResult<Value>;
}
