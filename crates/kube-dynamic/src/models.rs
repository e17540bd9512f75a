//! Request models shared by the dynamic client implementations

use kube::api::{DeleteParams, PatchParams, PropagationPolicy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Location of a single object: optional namespace plus name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectRef {
    /// Namespace of the object, `None` for cluster-scoped kinds
    pub namespace: Option<String>,
    /// Name of the object
    pub name: String,
}

impl ObjectRef {
    /// Reference an object inside a namespace
    pub fn namespaced(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            name: name.into(),
        }
    }

    /// Reference a cluster-scoped object
    pub fn cluster(name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            name: name.into(),
        }
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{}/{}", ns, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Garbage collection policy for dependents of a deleted object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeletionPropagation {
    /// Orphan dependents
    Orphan,
    /// Delete dependents in the background
    Background,
    /// Delete dependents before the owner disappears
    Foreground,
}

impl DeletionPropagation {
    /// Accepted spellings, as exposed to users
    pub const VALUES: [&'static str; 3] = ["Orphan", "Background", "Foreground"];

    /// Name as sent to the API server
    pub fn as_str(self) -> &'static str {
        match self {
            DeletionPropagation::Orphan => "Orphan",
            DeletionPropagation::Background => "Background",
            DeletionPropagation::Foreground => "Foreground",
        }
    }

    /// Delete parameters carrying this policy
    pub fn delete_params(self) -> DeleteParams {
        let policy = match self {
            DeletionPropagation::Orphan => PropagationPolicy::Orphan,
            DeletionPropagation::Background => PropagationPolicy::Background,
            DeletionPropagation::Foreground => PropagationPolicy::Foreground,
        };
        DeleteParams {
            propagation_policy: Some(policy),
            ..DeleteParams::default()
        }
    }
}

impl FromStr for DeletionPropagation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Orphan" => Ok(DeletionPropagation::Orphan),
            "Background" => Ok(DeletionPropagation::Background),
            "Foreground" => Ok(DeletionPropagation::Foreground),
            other => Err(format!(
                "unknown deletion propagation '{}', expected one of {}",
                other,
                Self::VALUES.join(", ")
            )),
        }
    }
}

/// Server-side apply settings for a single patch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyOptions {
    /// Field manager recorded as the owner of the applied fields
    pub field_manager: String,
    /// Take ownership of fields owned by other managers
    pub force_conflicts: bool,
    /// Reject unknown or duplicate fields instead of dropping them
    pub strict_validation: bool,
}

impl ApplyOptions {
    /// Apply with the given field manager, no forcing, strict validation
    pub fn new(field_manager: impl Into<String>) -> Self {
        Self {
            field_manager: field_manager.into(),
            force_conflicts: false,
            strict_validation: true,
        }
    }

    /// Set whether conflicts are forced
    #[must_use]
    pub fn force_conflicts(mut self, force: bool) -> Self {
        self.force_conflicts = force;
        self
    }

    /// Patch parameters for a server-side apply request
    pub fn patch_params(&self) -> PatchParams {
        let mut params = PatchParams::apply(&self.field_manager);
        if self.force_conflicts {
            params = params.force();
        }
        if self.strict_validation {
            params = params.validation_strict();
        }
        params
    }
}
