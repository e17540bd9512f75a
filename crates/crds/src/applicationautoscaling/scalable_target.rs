//! ScalableTarget Custom Resource Definition
//!
//! Registers or updates a scalable target, the resource that Application
//! Auto Scaling can scale out and in.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// ScalableTargetSpec defines the desired state of a scalable target
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[kube(
    group = "applicationautoscaling.services.k8s.aws",
    version = "v1alpha1",
    kind = "ScalableTarget",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct ScalableTargetSpec {
    /// Maximum value to scale to in response to a scale-out activity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_capacity: Option<i64>,

    /// Minimum value to scale to in response to a scale-in activity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_capacity: Option<i64>,

    /// Identifier of the resource associated with the scalable target
    /// (e.g. `service/default/sample-webapp`)
    #[serde(rename = "resourceID")]
    pub resource_id: String,

    /// ARN of an IAM role that allows Application Auto Scaling to modify the target
    #[serde(rename = "roleARN", default, skip_serializing_if = "Option::is_none")]
    pub role_arn: Option<String>,

    /// Scalable dimension (e.g. `ecs:service:DesiredCount`)
    pub scalable_dimension: String,

    /// Namespace of the AWS service that provides the resource (e.g. `ecs`)
    pub service_namespace: String,

    /// Suspends or resumes scaling activities
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suspended_state: Option<SuspendedState>,
}

/// Which scaling activities are suspended for a scalable target
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SuspendedState {
    /// Whether scale in by a target tracking or step scaling policy is suspended
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic_scaling_in_suspended: Option<bool>,

    /// Whether scale out by a target tracking or step scaling policy is suspended
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic_scaling_out_suspended: Option<bool>,

    /// Whether scheduled scaling is suspended
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_scaling_suspended: Option<bool>,
}

crate::crd_kind!(ScalableTarget, ScalableTargetSpec);
