//! JSON-over-stdio host driver
//!
//! One request in, one response out. The request names the provider block,
//! the operation, the type and the operation's inputs. The response carries
//! the resulting state and any diagnostics.

use crate::config::ProviderConfig;
use crate::diagnostics::Diagnostic;
use crate::error::ProviderError;
use crate::naming::MANIFEST_SUFFIX;
use crate::provider::Provider;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument};

/// Operations a host can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Dump every schema
    Schemas,
    /// Validate `config` for a resource
    Validate,
    /// Validate `config` for a data source or manifest data source
    ValidateDataSource,
    /// Create a resource from `plan`
    Create,
    /// Refresh a resource's `state`
    Read,
    /// Update a resource from `state` (prior) to `plan`
    Update,
    /// Delete the resource recorded in `state`
    Delete,
    /// Import a resource by `id`
    Import,
    /// Read a data source for `config`
    ReadDataSource,
}

/// A single host request
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HostRequest {
    /// Provider block
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Requested operation
    pub operation: Operation,
    /// Resource or data source type name
    #[serde(default)]
    pub type_name: Option<String>,
    /// Configuration (validate, validate_data_source, read_data_source)
    #[serde(default)]
    pub config: Value,
    /// Planned state (create, update)
    #[serde(default)]
    pub plan: Value,
    /// Current or prior state (read, update, delete)
    #[serde(default)]
    pub state: Value,
    /// Import id
    #[serde(default)]
    pub id: Option<String>,
}

impl HostRequest {
    /// Whether serving the request needs a cluster connection
    pub fn needs_cluster(&self) -> bool {
        match self.operation {
            Operation::Schemas | Operation::Validate | Operation::ValidateDataSource => false,
            Operation::ReadDataSource => !self
                .type_name
                .as_deref()
                .is_some_and(|t| t.ends_with(MANIFEST_SUFFIX)),
            _ => true,
        }
    }

    fn type_name(&self) -> Result<&str, ProviderError> {
        self.type_name
            .as_deref()
            .ok_or_else(|| ProviderError::InvalidConfig("type_name is required".to_string()))
    }
}

/// Response written back to the host
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HostResponse {
    /// Resulting state, schemas for `schemas`, null when there is none
    pub state: Value,
    /// Problems encountered
    pub diagnostics: Vec<Diagnostic>,
}

impl HostResponse {
    fn ok(state: Value) -> Self {
        Self {
            state,
            diagnostics: Vec::new(),
        }
    }

    fn failed(diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            state: Value::Null,
            diagnostics,
        }
    }

    /// Whether any diagnostic is an error
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Configure the provider for the request and serve it
pub async fn serve(request: HostRequest) -> HostResponse {
    let mut config = request.provider.clone();
    if !request.needs_cluster() {
        config.offline = Some(true);
    }
    match Provider::configure(config).await {
        Ok(provider) => handle(&provider, &request).await,
        Err(e) => HostResponse::failed(e.into()),
    }
}

/// Serve a request with an already configured provider
#[instrument(skip(provider, request), fields(operation = ?request.operation, type_name = ?request.type_name))]
pub async fn handle(provider: &Provider, request: &HostRequest) -> HostResponse {
    info!("Handling request");
    match dispatch(provider, request).await {
        Ok(state) => HostResponse::ok(state),
        Err(diagnostics) => HostResponse::failed(diagnostics),
    }
}

fn validated(diagnostics: Vec<Diagnostic>) -> Result<Value, Vec<Diagnostic>> {
    if diagnostics.is_empty() {
        Ok(Value::Null)
    } else {
        Err(diagnostics)
    }
}

async fn dispatch(provider: &Provider, request: &HostRequest) -> Result<Value, Vec<Diagnostic>> {
    match request.operation {
        Operation::Schemas => Ok(serde_json::to_value(provider.schemas()).map_err(ProviderError::from)?),
        Operation::Validate => validated(provider.resource(request.type_name()?)?.validate(&request.config)),
        Operation::ValidateDataSource => {
            validated(provider.data_source(request.type_name()?)?.validate(&request.config))
        }
        Operation::Create => provider.resource(request.type_name()?)?.create(&request.plan).await,
        Operation::Read => Ok(provider
            .resource(request.type_name()?)?
            .read(&request.state)
            .await?
            .unwrap_or(Value::Null)),
        Operation::Update => {
            provider
                .resource(request.type_name()?)?
                .update(&request.state, &request.plan)
                .await
        }
        Operation::Delete => {
            provider.resource(request.type_name()?)?.delete(&request.state).await?;
            Ok(Value::Null)
        }
        Operation::Import => {
            let id = request
                .id
                .as_deref()
                .ok_or_else(|| ProviderError::InvalidConfig("id is required for import".to_string()))?;
            provider.resource(request.type_name()?)?.import(id).await
        }
        Operation::ReadDataSource => provider.data_source(request.type_name()?)?.read(&request.config).await,
    }
}
