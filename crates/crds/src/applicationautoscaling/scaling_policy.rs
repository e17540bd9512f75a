//! ScalingPolicy Custom Resource Definition
//!
//! Creates or updates a scaling policy for an Application Auto Scaling
//! scalable target.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// ScalingPolicySpec defines the desired state of a scaling policy
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[kube(
    group = "applicationautoscaling.services.k8s.aws",
    version = "v1alpha1",
    kind = "ScalingPolicy",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct ScalingPolicySpec {
    /// Name of the scaling policy
    pub policy_name: String,

    /// Policy type (`TargetTrackingScaling` or `StepScaling`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_type: Option<String>,

    /// Identifier of the resource associated with the scaling policy
    #[serde(rename = "resourceID")]
    pub resource_id: String,

    /// Scalable dimension
    pub scalable_dimension: String,

    /// Namespace of the AWS service that provides the resource
    pub service_namespace: String,

    /// Step scaling policy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_scaling_policy_configuration: Option<StepScalingPolicyConfiguration>,

    /// Target tracking scaling policy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_tracking_scaling_policy_configuration: Option<TargetTrackingScalingPolicyConfiguration>,
}

/// Step scaling policy configuration
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct StepScalingPolicyConfiguration {
    /// How the scaling adjustment is interpreted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjustment_type: Option<AdjustmentType>,

    /// Time, in seconds, to wait for a previous scaling activity to take effect
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooldown: Option<i64>,

    /// Aggregation type for the CloudWatch metrics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_aggregation_type: Option<String>,

    /// Minimum value to scale by when the adjustment type is `PercentChangeInCapacity`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_adjustment_magnitude: Option<i64>,

    /// Step adjustments keyed on the breach size of the alarm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_adjustments: Option<Vec<StepAdjustment>>,
}

/// How a step scaling adjustment is applied
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub enum AdjustmentType {
    /// Add the adjustment to the current capacity
    ChangeInCapacity,
    /// Set the capacity to the adjustment value
    ExactCapacity,
    /// Add a percentage of the current capacity
    PercentChangeInCapacity,
}

/// A single step of a step scaling policy
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct StepAdjustment {
    /// Lower bound for the difference between the alarm threshold and the metric
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_interval_lower_bound: Option<f64>,

    /// Upper bound for the difference between the alarm threshold and the metric
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_interval_upper_bound: Option<f64>,

    /// Amount by which to scale
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaling_adjustment: Option<i64>,
}

/// Target tracking scaling policy configuration
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TargetTrackingScalingPolicyConfiguration {
    /// Custom CloudWatch metric
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customized_metric_specification: Option<CustomizedMetricSpecification>,

    /// Whether scale in by the policy is disabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_scale_in: Option<bool>,

    /// Predefined metric
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predefined_metric_specification: Option<PredefinedMetricSpecification>,

    /// Seconds after a scale-in activity completes before another can start
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_in_cooldown: Option<i64>,

    /// Seconds to wait for a previous scale-out activity to take effect
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_out_cooldown: Option<i64>,

    /// Target value for the metric
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_value: Option<f64>,
}

/// A CloudWatch metric used by a target tracking policy
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CustomizedMetricSpecification {
    /// Dimensions of the metric
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Vec<MetricDimension>>,

    /// Name of the metric
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_name: Option<String>,

    /// Namespace of the metric
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// Statistic of the metric
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistic: Option<String>,

    /// Unit of the metric
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// A name/value dimension of a CloudWatch metric
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
pub struct MetricDimension {
    /// Dimension name
    pub name: String,
    /// Dimension value
    pub value: String,
}

/// A predefined metric used by a target tracking policy
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PredefinedMetricSpecification {
    /// Metric type (e.g. `ECSServiceAverageCPUUtilization`)
    pub predefined_metric_type: String,

    /// Identifies the resource associated with the metric type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_label: Option<String>,
}

crate::crd_kind!(ScalingPolicy, ScalingPolicySpec);
