//! APIcast Custom Resource Definition
//!
//! Deploys a self-managed APIcast API gateway.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// APIcastSpec defines the desired state of an APIcast gateway
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[kube(group = "apps.3scale.net", version = "v1alpha1", kind = "APIcast", namespaced)]
#[serde(rename_all = "camelCase")]
pub struct APIcastSpec {
    /// Secret holding the 3scale admin portal endpoint and credentials
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_portal_credentials_ref: Option<LocalObjectReference>,

    /// Secret holding a static gateway configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedded_configuration_secret_ref: Option<LocalObjectReference>,

    /// Number of gateway replicas
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i64>,

    /// Gateway container image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Service account the gateway pods run as
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_account: Option<String>,

    /// Ingress exposure of the gateway
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exposed_host: Option<APIcastExposedHost>,

    /// 3scale environment the configuration is loaded from (`staging` or `production`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_environment: Option<String>,

    /// DNS resolver used by the gateway
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns_resolver_address: Option<String>,

    /// Service IDs the gateway loads; all services when empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled_services: Option<Vec<String>>,

    /// When the configuration is loaded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration_load_mode: Option<ConfigurationLoadMode>,

    /// Gateway log level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<LogLevel>,

    /// Whether path-based routing is enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_routing_enabled: Option<bool>,

    /// Whether response codes are reported to 3scale
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_codes_included: Option<bool>,

    /// Seconds the loaded configuration is cached
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_configuration_seconds: Option<i64>,

    /// Scope of the management API
    #[serde(rename = "managementAPIScope", default, skip_serializing_if = "Option::is_none")]
    pub management_api_scope: Option<ManagementApiScope>,

    /// Whether upstream TLS peers are verified
    #[serde(rename = "openSSLPeerVerificationEnabled", default, skip_serializing_if = "Option::is_none")]
    pub open_ssl_peer_verification_enabled: Option<bool>,

    /// Compute resources of the gateway container
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourceRequirements>,
}

/// Reference to an object in the same namespace
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
pub struct LocalObjectReference {
    /// Name of the referenced object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Ingress exposure of an APIcast gateway
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
pub struct APIcastExposedHost {
    /// Host name routed to the gateway
    pub host: String,

    /// TLS configuration of the ingress
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<Vec<IngressTls>>,
}

/// TLS settings of an ingress
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct IngressTls {
    /// Hosts included in the TLS certificate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosts: Option<Vec<String>>,

    /// Secret holding the TLS certificate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_name: Option<String>,
}

/// Configuration load mode of the gateway
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigurationLoadMode {
    /// Load once at boot
    Boot,
    /// Load on demand per request
    Lazy,
}

/// Gateway log level
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Notice,
    Warn,
    Error,
    Crit,
    Alert,
    Emerg,
}

/// Scope of the APIcast management API
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ManagementApiScope {
    Disabled,
    Status,
    Policies,
    Debug,
}

/// Compute resource limits and requests, quantities kept as strings
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
pub struct ResourceRequirements {
    /// Maximum resources allowed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limits: Option<BTreeMap<String, String>>,

    /// Minimum resources required
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requests: Option<BTreeMap<String, String>>,
}

crate::crd_kind!(APIcast, APIcastSpec);
