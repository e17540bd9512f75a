//! Provider: settings, cluster client and the adapter registry

use crate::config::{ProviderConfig, ProviderSettings};
use crate::data_source::CrdDataSource;
use crate::error::ProviderError;
use crate::framework::{DataSource, Resource};
use crate::kinds::{register_all, KindInfo};
use crate::manifest::CrdManifest;
use crate::resource::CrdResource;
use crate::schema::Schema;
use crds::CrdKind;
use kube_dynamic::{ApplyOptions, DynamicClientTrait, KubeDynamicClient};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// State shared by every adapter: the cluster client and provider settings
pub struct ProviderContext {
    client: Option<Arc<dyn DynamicClientTrait>>,
    settings: ProviderSettings,
}

impl fmt::Debug for ProviderContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderContext")
            .field("online", &self.client.is_some())
            .field("settings", &self.settings)
            .finish()
    }
}

impl ProviderContext {
    /// Context around an existing client, `None` for offline use
    pub fn new(client: Option<Arc<dyn DynamicClientTrait>>, settings: ProviderSettings) -> Self {
        Self { client, settings }
    }

    /// Resolved provider settings
    pub fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    /// Cluster client, or an error naming the operation when offline
    pub fn client(&self, operation: &str) -> Result<&dyn DynamicClientTrait, ProviderError> {
        self.client
            .as_deref()
            .ok_or_else(|| ProviderError::Offline(operation.to_string()))
    }

    /// Apply options for a plan: its own field manager and force flag, or the
    /// provider defaults when unset
    pub fn apply_options(&self, plan: &Value) -> ApplyOptions {
        let field_manager = plan
            .get("field_manager")
            .and_then(Value::as_str)
            .unwrap_or(&self.settings.field_manager);
        let force = plan
            .get("force_conflicts")
            .and_then(Value::as_bool)
            .unwrap_or(self.settings.force_conflicts);
        ApplyOptions::new(field_manager).force_conflicts(force)
    }
}

/// Adapters collected while registering kinds
pub struct Registry {
    context: Arc<ProviderContext>,
    resources: Vec<Arc<dyn Resource>>,
    data_sources: Vec<Arc<dyn DataSource>>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("resources", &self.resources.len())
            .field("data_sources", &self.data_sources.len())
            .finish()
    }
}

impl Registry {
    /// Register the resource, data source and manifest data source of `K`
    pub fn register<K: CrdKind>(&mut self, kind_segment: Option<&str>) -> Result<(), ProviderError> {
        let info = Arc::new(KindInfo::of::<K>(kind_segment)?);
        self.resources
            .push(Arc::new(CrdResource::<K>::new(Arc::clone(&info), Arc::clone(&self.context))));
        self.data_sources
            .push(Arc::new(CrdDataSource::new(Arc::clone(&info), Arc::clone(&self.context))));
        self.data_sources.push(Arc::new(CrdManifest::<K>::new(info)));
        Ok(())
    }
}

/// Every schema the provider serves, keyed by type name
#[derive(Debug, Clone, Serialize)]
pub struct ProviderSchemas {
    /// Provider block
    pub provider: Schema,
    /// Resources
    pub resources: BTreeMap<String, Schema>,
    /// Data sources, manifest data sources included
    pub data_sources: BTreeMap<String, Schema>,
}

/// The configured provider
pub struct Provider {
    context: Arc<ProviderContext>,
    resources: Vec<Arc<dyn Resource>>,
    data_sources: Vec<Arc<dyn DataSource>>,
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider")
            .field("context", &self.context)
            .field("resources", &self.resources.len())
            .field("data_sources", &self.data_sources.len())
            .finish()
    }
}

impl Provider {
    /// Resolve `config` and connect to the cluster unless offline
    pub async fn configure(config: ProviderConfig) -> Result<Self, ProviderError> {
        let settings = config.resolve();
        let client: Option<Arc<dyn DynamicClientTrait>> = if settings.offline {
            info!("Provider is offline, only manifest data sources are available");
            None
        } else {
            let client: Arc<dyn DynamicClientTrait> = Arc::new(
                KubeDynamicClient::from_kubeconfig(settings.kubeconfig.as_deref(), settings.context.as_deref()).await?,
            );
            Some(client)
        };
        Self::with_client(client, settings)
    }

    /// Build the provider around an existing client
    pub fn with_client(
        client: Option<Arc<dyn DynamicClientTrait>>,
        settings: ProviderSettings,
    ) -> Result<Self, ProviderError> {
        let mut registry = Registry {
            context: Arc::new(ProviderContext::new(client, settings)),
            resources: Vec::new(),
            data_sources: Vec::new(),
        };
        register_all(&mut registry)?;
        info!(
            "Registered {} resources and {} data sources",
            registry.resources.len(),
            registry.data_sources.len()
        );
        Ok(Self {
            context: registry.context,
            resources: registry.resources,
            data_sources: registry.data_sources,
        })
    }

    /// Provider settings in effect
    pub fn settings(&self) -> &ProviderSettings {
        self.context.settings()
    }

    /// Every resource adapter
    pub fn resources(&self) -> &[Arc<dyn Resource>] {
        &self.resources
    }

    /// Every data source adapter, manifest data sources included
    pub fn data_sources(&self) -> &[Arc<dyn DataSource>] {
        &self.data_sources
    }

    /// Resource adapter by type name
    pub fn resource(&self, type_name: &str) -> Result<&dyn Resource, ProviderError> {
        self.resources
            .iter()
            .find(|r| r.type_name() == type_name)
            .map(|r| r.as_ref())
            .ok_or_else(|| ProviderError::UnknownType(type_name.to_string()))
    }

    /// Data source adapter by type name
    pub fn data_source(&self, type_name: &str) -> Result<&dyn DataSource, ProviderError> {
        self.data_sources
            .iter()
            .find(|d| d.type_name() == type_name)
            .map(|d| d.as_ref())
            .ok_or_else(|| ProviderError::UnknownType(type_name.to_string()))
    }

    /// Every schema the provider serves
    pub fn schemas(&self) -> ProviderSchemas {
        ProviderSchemas {
            provider: ProviderConfig::schema(),
            resources: self
                .resources
                .iter()
                .map(|r| (r.type_name().to_string(), r.schema().clone()))
                .collect(),
            data_sources: self
                .data_sources
                .iter()
                .map(|d| (d.type_name().to_string(), d.schema().clone()))
                .collect(),
        }
    }
}
