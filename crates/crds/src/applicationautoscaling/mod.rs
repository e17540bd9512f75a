//! Application Auto Scaling CRDs (AWS Controllers for Kubernetes)
//!
//! Resources for registering scalable targets and attaching scaling policies:
//! - Scalable Targets
//! - Scaling Policies

pub mod scalable_target;
pub mod scaling_policy;

pub use scalable_target::*;
pub use scaling_policy::*;

/// API group shared by all Application Auto Scaling kinds
pub const GROUP: &str = "applicationautoscaling.services.k8s.aws";
