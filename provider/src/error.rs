//! Provider-specific error types.
//!
//! Every operation returns [`ProviderError`] internally. At the host boundary
//! errors are turned into [`Diagnostic`]s, see [`crate::diagnostics`].

use crate::diagnostics::{AttributePath, Diagnostic};
use kube_dynamic::ClusterError;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while serving a provider operation.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Kubernetes API error
    #[error("Kubernetes error: {0}")]
    Cluster(#[from] ClusterError),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML rendering error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A kind's CRD schema could not be read
    #[error("Schema error: {0}")]
    Schema(#[from] crds::SchemaError),

    /// Configuration or plan failed validation
    #[error("Validation failed with {} problem(s)", .0.len())]
    Validation(Vec<Diagnostic>),

    /// A value could not be converted between the attribute tree and Kubernetes JSON
    #[error("Invalid value at {path}: {message}")]
    InvalidAttribute {
        /// Location of the offending value
        path: AttributePath,
        /// What is wrong with it
        message: String,
    },

    /// Duration string could not be parsed
    #[error("Invalid duration {value:?}: {reason}")]
    InvalidDuration {
        /// Input as given
        value: String,
        /// Parser message
        reason: String,
    },

    /// JSONPath expression could not be evaluated
    #[error("Invalid JSONPath {expression:?}: {reason}")]
    InvalidJsonPath {
        /// Expression as given
        expression: String,
        /// Evaluator message
        reason: String,
    },

    /// Import identifier is malformed
    #[error("Invalid import id {id:?}: expected {expected}")]
    InvalidImportId {
        /// Identifier as given
        id: String,
        /// Accepted format
        expected: &'static str,
    },

    /// An attribute changed that can only be set on creation
    #[error("Changing {path} from {from:?} to {to:?} requires replacement")]
    RequiresReplacement {
        /// Changed attribute
        path: AttributePath,
        /// Value in prior state
        from: String,
        /// Value in plan
        to: String,
    },

    /// A wait did not finish before its timeout
    #[error("Timed out after {elapsed:?} waiting for {object} to {condition}")]
    Timeout {
        /// Object being waited on
        object: String,
        /// What was being waited for
        condition: &'static str,
        /// Time spent waiting
        elapsed: Duration,
    },

    /// The provider was configured without a cluster connection
    #[error("Provider is offline: {0} requires a Kubernetes cluster")]
    Offline(String),

    /// Requested type name is not served by this provider
    #[error("Unknown type: {0}")]
    UnknownType(String),

    /// Invalid provider configuration or request
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ProviderError {
    /// Whether the error wraps a Kubernetes NotFound
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProviderError::Cluster(e) if e.is_not_found())
    }
}
