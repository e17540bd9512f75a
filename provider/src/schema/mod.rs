//! Attribute schemas
//!
//! A [`Schema`] describes the attribute tree of one resource or data source.
//! Envelope attributes (`metadata`, waits, apply settings) are fixed, see
//! [`envelope`]. The `spec` subtree is derived from the kind's CRD OpenAPI
//! schema, see [`openapi`]. [`validate`] checks values against a schema.

pub mod envelope;
pub mod openapi;
pub mod validate;

#[cfg(test)]
mod validate_test;

use serde::Serialize;

/// Attribute tree of one resource, data source or the provider itself
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schema {
    /// Human readable description
    pub description: String,
    /// Top-level attributes
    pub attributes: Vec<Attribute>,
}

impl Schema {
    /// Top-level attribute by name
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        find(&self.attributes, name)
    }

    /// Nested attributes of a top-level object attribute
    pub fn nested(&self, name: &str) -> &[Attribute] {
        self.attribute(name).map_or(&[], |a| a.kind.nested())
    }
}

/// Attribute by name in a list of attributes
pub fn find<'a>(attributes: &'a [Attribute], name: &str) -> Option<&'a Attribute> {
    attributes.iter().find(|a| a.name == name)
}

/// Who sets an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Must be set in configuration
    Required,
    /// May be set in configuration
    Optional,
    /// Set by the provider only
    Computed,
    /// May be set in configuration, set by the provider otherwise
    OptionalComputed,
}

impl Mode {
    /// Whether configuration may set the attribute
    pub fn is_configurable(self) -> bool {
        !matches!(self, Mode::Computed)
    }
}

/// Value type of an attribute
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    /// UTF-8 string
    String,
    /// 64-bit signed integer
    Int64,
    /// 64-bit float
    Float64,
    /// Boolean
    Bool,
    /// Any JSON value (int-or-string, preserve-unknown-fields)
    Dynamic,
    /// List of scalar or dynamic values
    List(Box<AttributeKind>),
    /// Map from string keys to values
    Map(Box<AttributeKind>),
    /// Nested object
    Object(Vec<Attribute>),
    /// List of nested objects
    ListOfObjects(Vec<Attribute>),
}

impl AttributeKind {
    /// Nested attributes of object kinds, empty for everything else
    pub fn nested(&self) -> &[Attribute] {
        match self {
            AttributeKind::Object(attributes) | AttributeKind::ListOfObjects(attributes) => attributes,
            _ => &[],
        }
    }

    /// Short type name used in messages
    pub fn type_label(&self) -> &'static str {
        match self {
            AttributeKind::String => "string",
            AttributeKind::Int64 => "integer",
            AttributeKind::Float64 => "number",
            AttributeKind::Bool => "boolean",
            AttributeKind::Dynamic => "dynamic",
            AttributeKind::List(_) | AttributeKind::ListOfObjects(_) => "list",
            AttributeKind::Map(_) => "map",
            AttributeKind::Object(_) => "object",
        }
    }
}

/// Constraint checked on a configured value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Validator {
    /// Value must be one of the listed strings
    OneOf(Vec<String>),
    /// String must match the pattern
    Regex(String),
    /// String length bounds
    LengthBetween {
        /// Minimum length
        min: Option<u64>,
        /// Maximum length
        max: Option<u64>,
    },
    /// Integer lower bound
    IntAtLeast(i64),
    /// Integer upper bound
    IntAtMost(i64),
    /// Float lower bound
    FloatAtLeast(f64),
    /// Float upper bound
    FloatAtMost(f64),
    /// List length bounds
    ItemsBetween {
        /// Minimum number of items
        min: Option<u64>,
        /// Maximum number of items
        max: Option<u64>,
    },
    /// RFC 1123 DNS subdomain (object names)
    Dns1123Subdomain,
    /// RFC 1123 DNS label (namespaces)
    Dns1123Label,
    /// Map keys must be qualified names (labels, annotations)
    QualifiedNameKeys,
    /// String must parse as a duration
    Duration,
    /// String must parse as a duration longer than zero
    PositiveDuration,
}

/// One node of an attribute tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    /// Attribute name (snake_case)
    pub name: String,
    /// Field name in the Kubernetes object
    pub json_name: String,
    /// Human readable description
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Who sets the attribute
    pub mode: Mode,
    /// Whether the value is hidden from output
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub sensitive: bool,
    /// Value type
    pub kind: AttributeKind,
    /// Constraints on configured values
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub validators: Vec<Validator>,
}

impl Attribute {
    /// New attribute whose Kubernetes field name equals its name
    pub fn new(name: &str, kind: AttributeKind, mode: Mode) -> Self {
        Self::mapped(name, name, kind, mode)
    }

    /// New attribute with a distinct Kubernetes field name
    pub fn mapped(name: &str, json_name: &str, kind: AttributeKind, mode: Mode) -> Self {
        Self {
            name: name.to_string(),
            json_name: json_name.to_string(),
            description: String::new(),
            mode,
            sensitive: false,
            kind,
            validators: Vec::new(),
        }
    }

    /// Set the description
    #[must_use]
    pub fn describe(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Add a validator
    #[must_use]
    pub fn validate(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    /// Same attribute with every node below and including it made computed
    #[must_use]
    pub fn into_computed(mut self) -> Self {
        self.mode = Mode::Computed;
        self.validators.clear();
        self.kind = match self.kind {
            AttributeKind::Object(attributes) => {
                AttributeKind::Object(attributes.into_iter().map(Attribute::into_computed).collect())
            }
            AttributeKind::ListOfObjects(attributes) => {
                AttributeKind::ListOfObjects(attributes.into_iter().map(Attribute::into_computed).collect())
            }
            other => other,
        };
        self
    }
}
