//! Supported kinds
//!
//! Each kind listed in [`supported_kinds!`] gets a resource, a data source and
//! a manifest data source. Adding a kind is one typed spec in the `crds`
//! crate plus one line here.

use crate::error::ProviderError;
use crate::naming::{manifest_type_name, type_name};
use crds::{CrdKind, SpecSchema};
use kube::api::ApiResource;
use kube_dynamic::ObjectRef;

/// Everything the adapters need to know about a kind, computed once
#[derive(Debug, Clone)]
pub struct KindInfo {
    /// Group/version/kind/plural coordinates
    pub resource: ApiResource,
    /// Whether objects live in a namespace
    pub namespaced: bool,
    /// OpenAPI schema of `spec`
    pub spec: SpecSchema,
    /// Resource and data source type name
    pub type_name: String,
    /// Manifest data source type name
    pub manifest_type_name: String,
}

impl KindInfo {
    /// Describe `K`, optionally overriding the kind segment of its type names
    pub fn of<K: CrdKind>(kind_segment: Option<&str>) -> Result<Self, ProviderError> {
        let resource = K::api_resource();
        Ok(Self {
            type_name: type_name(&resource.group, &resource.kind, &resource.version, kind_segment),
            manifest_type_name: manifest_type_name(&resource.group, &resource.kind, &resource.version, kind_segment),
            namespaced: K::namespaced(),
            spec: K::spec_schema()?,
            resource,
        })
    }

    /// Reference to an object of this kind
    pub fn object_ref(&self, namespace: Option<&str>, name: &str) -> ObjectRef {
        match namespace.filter(|_| self.namespaced) {
            Some(ns) => ObjectRef::namespaced(ns, name),
            None => ObjectRef::cluster(name),
        }
    }

    /// Parse an import id: `namespace/name`, or `name` for cluster-scoped kinds
    pub fn parse_id(&self, id: &str) -> Result<ObjectRef, ProviderError> {
        if self.namespaced {
            match id.split('/').collect::<Vec<_>>().as_slice() {
                [namespace, name] if !namespace.is_empty() && !name.is_empty() => {
                    Ok(ObjectRef::namespaced(*namespace, *name))
                }
                _ => Err(ProviderError::InvalidImportId {
                    id: id.to_string(),
                    expected: "<namespace>/<name>",
                }),
            }
        } else if id.is_empty() || id.contains('/') {
            Err(ProviderError::InvalidImportId {
                id: id.to_string(),
                expected: "<name>",
            })
        } else {
            Ok(ObjectRef::cluster(id))
        }
    }
}

/// Register the adapters of every listed kind
///
/// A kind whose name cannot be split into words mechanically is listed with
/// `as "<segment>"` to name its types explicitly.
macro_rules! supported_kinds {
    (@segment) => { None };
    (@segment $segment:literal) => { Some($segment) };
    ($($kind:ty $(as $segment:literal)?),* $(,)?) => {
        /// Register the adapters of every supported kind
        pub fn register_all(registry: &mut $crate::provider::Registry) -> Result<(), ProviderError> {
            $( registry.register::<$kind>(supported_kinds!(@segment $($segment)?))?; )*
            Ok(())
        }
    };
}

supported_kinds! {
    crds::ScalableTarget,
    crds::ScalingPolicy,
    crds::APIcast as "apicast",
    crds::Sidecar,
    crds::VirtualService,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sidecar() -> KindInfo {
        KindInfo::of::<crds::Sidecar>(None).expect("sidecar kind")
    }

    #[test]
    fn test_kind_info_type_names() {
        let info = sidecar();
        assert_eq!(info.type_name, "k8s_networking_istio_io_sidecar_v1beta1");
        assert_eq!(info.manifest_type_name, "k8s_networking_istio_io_sidecar_v1beta1_manifest");
        assert!(info.namespaced);
        assert_eq!(info.resource.plural, "sidecars");
    }

    #[test]
    fn test_parse_namespaced_id() {
        let info = sidecar();
        assert_eq!(
            info.parse_id("istio-system/default").expect("valid id"),
            ObjectRef::namespaced("istio-system", "default")
        );
        for bad in ["default", "a/b/c", "/name", "ns/", ""] {
            assert!(
                matches!(info.parse_id(bad), Err(ProviderError::InvalidImportId { .. })),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_object_ref_ignores_namespace_for_cluster_scope() {
        let mut info = sidecar();
        assert_eq!(info.object_ref(Some("ns"), "a"), ObjectRef::namespaced("ns", "a"));
        info.namespaced = false;
        assert_eq!(info.object_ref(Some("ns"), "a"), ObjectRef::cluster("a"));
        assert_eq!(info.parse_id("a").expect("cluster id"), ObjectRef::cluster("a"));
        assert!(info.parse_id("ns/a").is_err());
    }
}
