//! Sidecar Custom Resource Definition
//!
//! Describes the configuration of the sidecar proxy that mediates inbound and
//! outbound communication of the workload instances it is attached to.

use super::common::{Destination, Port, WorkloadSelector};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// SidecarSpec defines the desired state of a sidecar proxy configuration
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[kube(group = "networking.istio.io", version = "v1beta1", kind = "Sidecar", namespaced)]
#[serde(rename_all = "camelCase")]
pub struct SidecarSpec {
    /// Criteria used to select the workloads this configuration applies to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workload_selector: Option<WorkloadSelector>,

    /// Ingress listeners of the attached workload instances
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingress: Option<Vec<IstioIngressListener>>,

    /// Egress traffic allowed from the attached workload instances
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub egress: Option<Vec<IstioEgressListener>>,

    /// Handling of outbound traffic to unknown destinations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outbound_traffic_policy: Option<OutboundTrafficPolicy>,
}

/// How traffic is captured by the proxy
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CaptureMode {
    /// Default capture mode defined by the environment
    Default,
    /// Capture traffic using iptables redirection
    Iptables,
    /// No traffic capture
    None,
}

/// Listener for inbound traffic
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct IstioIngressListener {
    /// Port associated with the listener
    pub port: Port,

    /// IP or Unix domain socket the listener binds to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,

    /// How traffic to the listener is captured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capture_mode: Option<CaptureMode>,

    /// Loopback address or socket traffic is forwarded to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_endpoint: Option<String>,
}

/// Listener for outbound traffic
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct IstioEgressListener {
    /// Port associated with the listener
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<Port>,

    /// IP or Unix domain socket the listener binds to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,

    /// How traffic to the listener is captured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capture_mode: Option<CaptureMode>,

    /// Services exposed to the listener in `namespace/dnsName` format
    pub hosts: Vec<String>,
}

/// Outbound traffic policy of the sidecar
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct OutboundTrafficPolicy {
    /// Handling mode for unknown destinations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<OutboundTrafficMode>,

    /// Egress proxy traffic to unknown destinations is sent through
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub egress_proxy: Option<Destination>,
}

/// Outbound traffic mode
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutboundTrafficMode {
    /// Only allow traffic to registered services
    RegistryOnly,
    /// Allow traffic to any destination
    AllowAny,
}

crate::crd_kind!(Sidecar, SidecarSpec);
