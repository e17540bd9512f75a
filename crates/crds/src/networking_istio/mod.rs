//! Istio networking CRDs
//!
//! Traffic management resources of the Istio service mesh:
//! - Sidecars (proxy ingress/egress scoping)
//! - Virtual Services (routing rules)

pub mod common;
pub mod sidecar;
pub mod virtual_service;

pub use common::*;
pub use sidecar::*;
pub use virtual_service::*;
