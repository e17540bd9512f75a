//! Provider configuration
//!
//! Settings come from the provider block of the host configuration, with
//! environment variables as fallbacks for unset values.

use crate::schema::{Attribute, AttributeKind, Mode, Schema, Validator};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Field manager used when neither the provider nor the resource names one
pub const DEFAULT_FIELD_MANAGER: &str = "crd-provider";

/// Environment fallback for `kubeconfig`
pub const ENV_KUBECONFIG: &str = "CRD_PROVIDER_KUBECONFIG";
/// Environment fallback for `context`
pub const ENV_CONTEXT: &str = "CRD_PROVIDER_CONTEXT";
/// Environment fallback for `field_manager`
pub const ENV_FIELD_MANAGER: &str = "CRD_PROVIDER_FIELD_MANAGER";

/// Provider block as written by the user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderConfig {
    /// Path to a kubeconfig file
    pub kubeconfig: Option<PathBuf>,
    /// Kubeconfig context to use
    pub context: Option<String>,
    /// Default field manager for server-side apply
    pub field_manager: Option<String>,
    /// Default for taking over conflicting fields on apply
    pub force_conflicts: Option<bool>,
    /// Skip building a cluster client (manifest data sources keep working)
    pub offline: Option<bool>,
}

/// Resolved provider settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    /// Kubeconfig path, `None` to infer (KUBECONFIG, default path, in-cluster)
    pub kubeconfig: Option<PathBuf>,
    /// Kubeconfig context, `None` for the current context
    pub context: Option<String>,
    /// Default field manager
    pub field_manager: String,
    /// Default force-conflicts flag
    pub force_conflicts: bool,
    /// Whether to run without a cluster client
    pub offline: bool,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        ProviderConfig::default().resolve_with(|_| None)
    }
}

impl ProviderConfig {
    /// Resolve against the process environment
    pub fn resolve(self) -> ProviderSettings {
        self.resolve_with(|name| env::var(name).ok())
    }

    /// Resolve against an arbitrary variable lookup
    pub fn resolve_with(self, lookup: impl Fn(&str) -> Option<String>) -> ProviderSettings {
        let lookup = |name: &str| lookup(name).filter(|v| !v.is_empty());
        ProviderSettings {
            kubeconfig: self.kubeconfig.or_else(|| lookup(ENV_KUBECONFIG).map(PathBuf::from)),
            context: self.context.or_else(|| lookup(ENV_CONTEXT)),
            field_manager: self
                .field_manager
                .or_else(|| lookup(ENV_FIELD_MANAGER))
                .unwrap_or_else(|| DEFAULT_FIELD_MANAGER.to_string()),
            force_conflicts: self.force_conflicts.unwrap_or(false),
            offline: self.offline.unwrap_or(false),
        }
    }

    /// Schema of the provider block
    pub fn schema() -> Schema {
        let string = |name: &str, description: &str| {
            Attribute::new(name, AttributeKind::String, Mode::Optional).describe(description)
        };
        let flag = |name: &str, description: &str| {
            Attribute::new(name, AttributeKind::Bool, Mode::Optional).describe(description)
        };
        Schema {
            description: "Kubernetes cluster connection and server-side apply defaults".to_string(),
            attributes: vec![
                string("kubeconfig", "Path to a kubeconfig file (env CRD_PROVIDER_KUBECONFIG)"),
                string("context", "Kubeconfig context to use (env CRD_PROVIDER_CONTEXT)"),
                string(
                    "field_manager",
                    "Default field manager for server-side apply (env CRD_PROVIDER_FIELD_MANAGER, default crd-provider)",
                )
                .validate(Validator::LengthBetween { min: Some(1), max: Some(128) }),
                flag("force_conflicts", "Default for taking over conflicting fields on apply (default false)"),
                flag("offline", "Run without a cluster; only manifest data sources work (default false)"),
            ],
        }
    }
}
