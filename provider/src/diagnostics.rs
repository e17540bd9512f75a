//! User-facing diagnostics
//!
//! Every failure of a provider operation is reported to the host as a list of
//! [`Diagnostic`]s. Validation produces one diagnostic per offending attribute;
//! every other error produces exactly one.

use crate::error::ProviderError;
use serde::{Serialize, Serializer};
use std::fmt;

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The operation failed
    Error,
    /// The operation succeeded but something deserves attention
    Warning,
}

/// One step of an [`AttributePath`]
#[derive(Debug, Clone, PartialEq, Eq)]
enum PathStep {
    Attribute(String),
    Index(usize),
    Key(String),
}

/// Location of a value inside an attribute tree, e.g. `spec.http[0].route`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributePath(Vec<PathStep>);

impl AttributePath {
    /// Path of a top-level attribute
    pub fn root(name: &str) -> Self {
        Self(vec![PathStep::Attribute(name.to_string())])
    }

    /// Child attribute of an object
    #[must_use]
    pub fn attribute(&self, name: &str) -> Self {
        self.with(PathStep::Attribute(name.to_string()))
    }

    /// Element of a list
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        self.with(PathStep::Index(index))
    }

    /// Entry of a map
    #[must_use]
    pub fn key(&self, key: &str) -> Self {
        self.with(PathStep::Key(key.to_string()))
    }

    /// Whether the path points at the root of the tree
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn with(&self, step: PathStep) -> Self {
        let mut steps = self.0.clone();
        steps.push(step);
        Self(steps)
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.0.iter().enumerate() {
            match step {
                PathStep::Attribute(name) if i == 0 => write!(f, "{}", name)?,
                PathStep::Attribute(name) => write!(f, ".{}", name)?,
                PathStep::Index(index) => write!(f, "[{}]", index)?,
                PathStep::Key(key) => write!(f, "[{:?}]", key)?,
            }
        }
        Ok(())
    }
}

impl Serialize for AttributePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A problem reported to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Error or warning
    pub severity: Severity,
    /// Short description
    pub summary: String,
    /// Full description
    pub detail: String,
    /// Attribute the problem is about, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_path: Option<AttributePath>,
}

impl Diagnostic {
    /// Error diagnostic not tied to an attribute
    pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            summary: summary.into(),
            detail: detail.into(),
            attribute_path: None,
        }
    }

    /// Error diagnostic about one attribute
    pub fn attribute_error(path: AttributePath, summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            attribute_path: Some(path),
            ..Self::error(summary, detail)
        }
    }

    /// Whether the diagnostic fails the operation
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl From<ProviderError> for Vec<Diagnostic> {
    fn from(error: ProviderError) -> Self {
        let detail = error.to_string();
        match error {
            ProviderError::Validation(diagnostics) => diagnostics,
            ProviderError::InvalidAttribute { path, .. } => {
                vec![Diagnostic::attribute_error(path, "Invalid attribute value", detail)]
            }
            ProviderError::RequiresReplacement { path, .. } => {
                vec![Diagnostic::attribute_error(path, "Attribute requires replacement", detail)]
            }
            ProviderError::Cluster(e) if e.is_not_found() => vec![Diagnostic::error("Object not found", detail)],
            ProviderError::Cluster(_) => vec![Diagnostic::error("Kubernetes API request failed", detail)],
            ProviderError::Serialization(_) | ProviderError::Yaml(_) => {
                vec![Diagnostic::error("Unable to convert object", detail)]
            }
            ProviderError::Schema(_) => vec![Diagnostic::error("Unable to read CRD schema", detail)],
            ProviderError::InvalidDuration { .. } => vec![Diagnostic::error("Invalid duration", detail)],
            ProviderError::InvalidJsonPath { .. } => vec![Diagnostic::error("Invalid JSONPath expression", detail)],
            ProviderError::InvalidImportId { .. } => vec![Diagnostic::error("Invalid import id", detail)],
            ProviderError::Timeout { .. } => vec![Diagnostic::error("Timed out", detail)],
            ProviderError::Offline(_) => vec![Diagnostic::error("Provider is offline", detail)],
            ProviderError::UnknownType(_) => vec![Diagnostic::error("Unknown type", detail)],
            ProviderError::InvalidConfig(_) => vec![Diagnostic::error("Invalid configuration", detail)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_attribute_path_display() {
        let path = AttributePath::root("spec").attribute("http").index(0).attribute("route");
        assert_eq!(path.to_string(), "spec.http[0].route");

        let path = AttributePath::root("metadata").attribute("labels").key("app.kubernetes.io/name");
        assert_eq!(path.to_string(), "metadata.labels[\"app.kubernetes.io/name\"]");
    }

    #[test]
    fn test_validation_error_keeps_every_diagnostic() {
        let diagnostics = vec![
            Diagnostic::attribute_error(AttributePath::root("spec"), "Missing required attribute", "a"),
            Diagnostic::attribute_error(AttributePath::root("metadata"), "Missing required attribute", "b"),
        ];
        let converted: Vec<Diagnostic> = ProviderError::Validation(diagnostics.clone()).into();
        assert_eq!(converted, diagnostics);
    }

    #[test]
    fn test_timeout_error_names_object_and_elapsed_time() {
        let converted: Vec<Diagnostic> = ProviderError::Timeout {
            object: "default/reviews".to_string(),
            condition: "be deleted",
            elapsed: Duration::from_secs(30),
        }
        .into();
        assert_eq!(converted.len(), 1);
        assert!(converted[0].is_error());
        assert!(converted[0].detail.contains("default/reviews"));
        assert!(converted[0].detail.contains("30s"));
    }

    #[test]
    fn test_diagnostic_serializes_path_as_string() {
        let diagnostic = Diagnostic::attribute_error(AttributePath::root("metadata").attribute("name"), "Invalid", "x");
        let json = serde_json::to_value(&diagnostic).expect("serialize");
        assert_eq!(json["attribute_path"], "metadata.name");
        assert_eq!(json["severity"], "error");
    }
}
