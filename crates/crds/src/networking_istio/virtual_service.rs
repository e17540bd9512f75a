//! VirtualService Custom Resource Definition
//!
//! Configuration affecting traffic routing: a set of routing rules applied
//! when a host is addressed.

use super::common::{Destination, StringMatch};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// VirtualServiceSpec defines the desired state of a virtual service
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[kube(group = "networking.istio.io", version = "v1beta1", kind = "VirtualService", namespaced)]
#[serde(rename_all = "camelCase")]
pub struct VirtualServiceSpec {
    /// Destination hosts to which traffic is being sent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosts: Option<Vec<String>>,

    /// Gateways and sidecars that should apply these routes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateways: Option<Vec<String>>,

    /// Namespaces to which this virtual service is exported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_to: Option<Vec<String>>,

    /// Ordered list of route rules for HTTP traffic
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http: Option<Vec<HTTPRoute>>,

    /// Ordered list of route rules for opaque TCP traffic
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcp: Option<Vec<TCPRoute>>,

    /// Ordered list of route rules for non-terminated TLS and HTTPS traffic
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<Vec<TLSRoute>>,
}

/// Match conditions and actions for routing HTTP traffic
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct HTTPRoute {
    /// Name assigned to the route for debugging purposes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Match conditions to be satisfied for the rule to be activated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#match: Option<Vec<HTTPMatchRequest>>,

    /// Destinations traffic is forwarded to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<Vec<HTTPRouteDestination>>,

    /// HTTP 301 redirect
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<HTTPRedirect>,

    /// Rewrite of HTTP URIs and Authority headers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rewrite: Option<HTTPRewrite>,

    /// Timeout for HTTP requests (e.g. `10s`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,

    /// Retry policy for HTTP requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retries: Option<HTTPRetry>,

    /// Mirror traffic to another destination
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirror: Option<Destination>,

    /// Percentage of traffic mirrored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirror_percentage: Option<Percent>,
}

/// Match conditions of an HTTP route
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct HTTPMatchRequest {
    /// Name assigned to the match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// URI to match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<StringMatch>,

    /// URI scheme to match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<StringMatch>,

    /// HTTP method to match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<StringMatch>,

    /// HTTP Authority to match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authority: Option<StringMatch>,

    /// Header keys must be lowercase and use hyphen as the separator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, StringMatch>>,

    /// Port on the host being addressed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u32>,

    /// Source workload labels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_labels: Option<BTreeMap<String, String>>,

    /// Gateway names the rule is applied to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateways: Option<Vec<String>>,

    /// Query parameters to match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_params: Option<BTreeMap<String, StringMatch>>,

    /// Whether URI matching is case insensitive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_uri_case: Option<bool>,

    /// Headers that must be absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub without_headers: Option<BTreeMap<String, StringMatch>>,

    /// Source namespace constraining the applicability of the rule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_namespace: Option<String>,
}

/// A weighted HTTP destination
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
pub struct HTTPRouteDestination {
    /// Destination the request is forwarded to
    pub destination: Destination,

    /// Proportion of traffic forwarded to the destination
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<i32>,
}

/// HTTP redirect response
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct HTTPRedirect {
    /// Overwrite the path portion of the URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    /// Overwrite the authority/host portion of the URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authority: Option<String>,

    /// Port of the redirect
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u32>,

    /// Scheme of the redirect
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,

    /// HTTP status code of the redirect, 301 by default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_code: Option<u32>,
}

/// Rewrite applied before forwarding
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
pub struct HTTPRewrite {
    /// Rewrite the path (or the prefix) portion of the URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    /// Rewrite the Authority/Host header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authority: Option<String>,
}

/// Retry policy of an HTTP route
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct HTTPRetry {
    /// Number of retries for a request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attempts: Option<i32>,

    /// Timeout per attempt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_try_timeout: Option<String>,

    /// Conditions under which retry takes place
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_on: Option<String>,

    /// Whether retries should go to other localities
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_remote_localities: Option<bool>,
}

/// Percentage in the range [0.0, 100.0]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
pub struct Percent {
    /// Percentage value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

/// Match conditions and actions for routing TCP traffic
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
pub struct TCPRoute {
    /// Match conditions to be satisfied for the rule to be activated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#match: Option<Vec<L4MatchAttributes>>,

    /// Destinations the connection is forwarded to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<Vec<RouteDestination>>,
}

/// Match conditions and actions for routing unterminated TLS traffic
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
pub struct TLSRoute {
    /// Match conditions to be satisfied for the rule to be activated
    pub r#match: Vec<TLSMatchAttributes>,

    /// Destinations the connection is forwarded to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<Vec<RouteDestination>>,
}

/// L4 connection match attributes
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct L4MatchAttributes {
    /// IPv4 or IPv6 destination addresses with optional subnet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_subnets: Option<Vec<String>>,

    /// Port on the host being addressed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u32>,

    /// Source workload labels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_labels: Option<BTreeMap<String, String>>,

    /// Gateway names the rule is applied to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateways: Option<Vec<String>>,

    /// Source namespace constraining the applicability of the rule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_namespace: Option<String>,
}

/// TLS connection match attributes
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TLSMatchAttributes {
    /// SNI (server name indicator) to match on
    pub sni_hosts: Vec<String>,

    /// IPv4 or IPv6 destination addresses with optional subnet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_subnets: Option<Vec<String>>,

    /// Port on the host being addressed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u32>,

    /// Source workload labels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_labels: Option<BTreeMap<String, String>>,

    /// Gateway names the rule is applied to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateways: Option<Vec<String>>,

    /// Source namespace constraining the applicability of the rule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_namespace: Option<String>,
}

/// A weighted L4 destination
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
pub struct RouteDestination {
    /// Destination the connection is forwarded to
    pub destination: Destination,

    /// Proportion of traffic forwarded to the destination
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<i32>,
}

crate::crd_kind!(VirtualService, VirtualServiceSpec);
