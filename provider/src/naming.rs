//! Type and attribute naming
//!
//! Type names follow `k8s_<group>_<kind>_<version>`, with the group's dots and
//! dashes turned into underscores and the kind in snake_case. Attribute names
//! are the snake_case form of the Kubernetes field name.

/// Suffix of manifest data source type names
pub const MANIFEST_SUFFIX: &str = "_manifest";

/// snake_case form of a camelCase or PascalCase identifier
///
/// Acronym runs are kept together: `resourceID` becomes `resource_id` and
/// `HTTPRoute` becomes `http_route`. Dots and dashes become underscores.
pub fn snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c == '.' || c == '-' || c == '_' {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            continue;
        }
        if c.is_uppercase() && i > 0 && !out.ends_with('_') {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower) {
                out.push('_');
            }
        }
        out.extend(c.to_lowercase());
    }

    out
}

/// Resource and data source type name of a kind
///
/// `kind_segment` overrides the snake_case form of the kind for names whose
/// acronyms cannot be split mechanically.
pub fn type_name(group: &str, kind: &str, version: &str, kind_segment: Option<&str>) -> String {
    let group: String = group
        .chars()
        .map(|c| if c == '.' || c == '-' { '_' } else { c })
        .collect();
    let kind = kind_segment.map_or_else(|| snake_case(kind), str::to_string);
    format!("k8s_{}_{}_{}", group, kind, version)
}

/// Manifest data source type name of a kind
pub fn manifest_type_name(group: &str, kind: &str, version: &str, kind_segment: Option<&str>) -> String {
    format!("{}{}", type_name(group, kind, version, kind_segment), MANIFEST_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_case_camel_fields() {
        assert_eq!(snake_case("minCapacity"), "min_capacity");
        assert_eq!(snake_case("workloadSelector"), "workload_selector");
        assert_eq!(snake_case("match"), "match");
        assert_eq!(snake_case("sniHosts"), "sni_hosts");
    }

    #[test]
    fn test_snake_case_acronym_runs() {
        assert_eq!(snake_case("resourceID"), "resource_id");
        assert_eq!(snake_case("roleARN"), "role_arn");
        assert_eq!(snake_case("HTTPRoute"), "http_route");
        assert_eq!(snake_case("managementAPIScope"), "management_api_scope");
        assert_eq!(snake_case("openSSLPeerVerificationEnabled"), "open_ssl_peer_verification_enabled");
        assert_eq!(snake_case("VirtualService"), "virtual_service");
    }

    #[test]
    fn test_snake_case_separators_and_digits() {
        assert_eq!(snake_case("x-kubernetes-group"), "x_kubernetes_group");
        assert_eq!(snake_case("apps.3scale.net"), "apps_3scale_net");
        assert_eq!(snake_case("http2MaxRequests"), "http2_max_requests");
    }

    #[test]
    fn test_type_names() {
        assert_eq!(
            type_name("networking.istio.io", "VirtualService", "v1beta1", None),
            "k8s_networking_istio_io_virtual_service_v1beta1"
        );
        assert_eq!(
            type_name("applicationautoscaling.services.k8s.aws", "ScalableTarget", "v1alpha1", None),
            "k8s_applicationautoscaling_services_k8s_aws_scalable_target_v1alpha1"
        );
        assert_eq!(
            manifest_type_name("apps.3scale.net", "APIcast", "v1alpha1", Some("apicast")),
            "k8s_apps_3scale_net_apicast_v1alpha1_manifest"
        );
    }
}
