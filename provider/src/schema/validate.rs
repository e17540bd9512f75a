//! Value validation against a schema
//!
//! Produces one [`Diagnostic`] per offending attribute. Nothing here talks to
//! the cluster, so validation also runs for offline providers.

use super::{Attribute, AttributeKind, Mode, Validator};
use crate::diagnostics::{AttributePath, Diagnostic};
use crate::duration::{parse_duration, parse_positive};
use serde_json::{Map, Value};
use tracing::debug;

const DNS1123_LABEL_MAX: usize = 63;
const DNS1123_SUBDOMAIN_MAX: usize = 253;
const QUALIFIED_NAME_MAX: usize = 63;

/// Validate a configuration or plan value against top-level attributes
pub fn validate(attributes: &[Attribute], value: &Value) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    match value {
        Value::Null => validate_object(attributes, &Map::new(), None, &mut diagnostics),
        Value::Object(object) => validate_object(attributes, object, None, &mut diagnostics),
        other => diagnostics.push(Diagnostic::error(
            "Invalid configuration",
            format!("Expected an object, got {}", json_type(other)),
        )),
    }
    diagnostics
}

fn child(parent: Option<&AttributePath>, name: &str) -> AttributePath {
    parent.map_or_else(|| AttributePath::root(name), |p| p.attribute(name))
}

fn validate_object(
    attributes: &[Attribute],
    object: &Map<String, Value>,
    parent: Option<&AttributePath>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    for attribute in attributes {
        let path = child(parent, &attribute.name);
        match object.get(&attribute.name) {
            None | Some(Value::Null) => {
                if attribute.mode == Mode::Required {
                    diagnostics.push(Diagnostic::attribute_error(
                        path.clone(),
                        "Missing required attribute",
                        format!("The attribute {} is required", path),
                    ));
                }
            }
            Some(value) => validate_value(attribute, value, &path, diagnostics),
        }
    }

    for name in object.keys() {
        if !attributes.iter().any(|a| &a.name == name) {
            let path = child(parent, name);
            diagnostics.push(Diagnostic::attribute_error(
                path.clone(),
                "Unsupported attribute",
                format!("An attribute named {} is not expected here", path),
            ));
        }
    }
}

fn validate_value(attribute: &Attribute, value: &Value, path: &AttributePath, diagnostics: &mut Vec<Diagnostic>) {
    if !validate_kind(&attribute.kind, value, path, diagnostics) {
        return;
    }
    for validator in &attribute.validators {
        if let Some(problem) = check(validator, value) {
            diagnostics.push(Diagnostic::attribute_error(
                path.clone(),
                "Invalid attribute value",
                format!("Attribute {} {}", path, problem),
            ));
        }
    }
}

/// Check the value's type, recursing into nested values. Returns whether the
/// value itself had the expected type.
fn validate_kind(kind: &AttributeKind, value: &Value, path: &AttributePath, diagnostics: &mut Vec<Diagnostic>) -> bool {
    let matches = match (kind, value) {
        (_, Value::Null) | (AttributeKind::Dynamic, _) => true,
        (AttributeKind::String, Value::String(_)) | (AttributeKind::Bool, Value::Bool(_)) => true,
        (AttributeKind::Int64, Value::Number(n)) => n.is_i64(),
        (AttributeKind::Float64, Value::Number(_)) => true,
        (AttributeKind::List(element), Value::Array(items)) => {
            for (i, item) in items.iter().enumerate() {
                validate_kind(element, item, &path.index(i), diagnostics);
            }
            true
        }
        (AttributeKind::Map(element), Value::Object(entries)) => {
            for (key, item) in entries {
                validate_kind(element, item, &path.key(key), diagnostics);
            }
            true
        }
        (AttributeKind::Object(attributes), Value::Object(object)) => {
            validate_object(attributes, object, Some(path), diagnostics);
            true
        }
        (AttributeKind::ListOfObjects(attributes), Value::Array(items)) => {
            for (i, item) in items.iter().enumerate() {
                let item_path = path.index(i);
                match item {
                    Value::Object(object) => validate_object(attributes, object, Some(&item_path), diagnostics),
                    other => diagnostics.push(type_mismatch(&item_path, "object", other)),
                }
            }
            true
        }
        _ => false,
    };

    if !matches {
        diagnostics.push(type_mismatch(path, kind.type_label(), value));
    }
    matches
}

fn type_mismatch(path: &AttributePath, expected: &str, value: &Value) -> Diagnostic {
    Diagnostic::attribute_error(
        path.clone(),
        "Incorrect attribute value type",
        format!("Attribute {} must be {}, got {}", path, expected, json_type(value)),
    )
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

/// Describe why `value` fails `validator`, or `None` when it passes
fn check(validator: &Validator, value: &Value) -> Option<String> {
    match (validator, value) {
        (Validator::OneOf(allowed), value) => {
            let text = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (!allowed.contains(&text)).then(|| format!("value must be one of: {}, got {:?}", allowed.join(", "), text))
        }
        (Validator::Regex(pattern), Value::String(s)) => match regex::Regex::new(pattern) {
            Ok(re) => (!re.is_match(s)).then(|| format!("must match pattern {:?}, got {:?}", pattern, s)),
            Err(e) => {
                debug!("Skipping unsupported pattern {:?}: {}", pattern, e);
                None
            }
        },
        (Validator::LengthBetween { min, max }, Value::String(s)) => {
            let len = s.chars().count() as u64;
            out_of_range(len, *min, *max).then(|| format!("string length must be {}, got {}", bounds(*min, *max), len))
        }
        (Validator::IntAtLeast(min), Value::Number(n)) => n
            .as_i64()
            .filter(|v| v < min)
            .map(|v| format!("value must be at least {}, got {}", min, v)),
        (Validator::IntAtMost(max), Value::Number(n)) => n
            .as_i64()
            .filter(|v| v > max)
            .map(|v| format!("value must be at most {}, got {}", max, v)),
        (Validator::FloatAtLeast(min), Value::Number(n)) => n
            .as_f64()
            .filter(|v| v < min)
            .map(|v| format!("value must be at least {}, got {}", min, v)),
        (Validator::FloatAtMost(max), Value::Number(n)) => n
            .as_f64()
            .filter(|v| v > max)
            .map(|v| format!("value must be at most {}, got {}", max, v)),
        (Validator::ItemsBetween { min, max }, Value::Array(items)) => {
            let len = items.len() as u64;
            out_of_range(len, *min, *max).then(|| format!("list must contain {} items, got {}", bounds(*min, *max), len))
        }
        (Validator::Dns1123Subdomain, Value::String(s)) => (!is_dns1123_subdomain(s)).then(|| {
            format!(
                "must be a lowercase RFC 1123 subdomain of at most {} characters, got {:?}",
                DNS1123_SUBDOMAIN_MAX, s
            )
        }),
        (Validator::Dns1123Label, Value::String(s)) => (!is_dns1123_label(s)).then(|| {
            format!(
                "must be a lowercase RFC 1123 label of at most {} characters, got {:?}",
                DNS1123_LABEL_MAX, s
            )
        }),
        (Validator::QualifiedNameKeys, Value::Object(entries)) => {
            let bad: Vec<&str> = entries
                .keys()
                .filter(|k| !is_qualified_name(k))
                .map(String::as_str)
                .collect();
            (!bad.is_empty()).then(|| format!("keys must be qualified names, got {:?}", bad))
        }
        (Validator::Duration, Value::String(s)) => parse_duration(s).err().map(|e| format!("is invalid: {}", e)),
        (Validator::PositiveDuration, Value::String(s)) => {
            parse_positive(s).err().map(|e| format!("is invalid: {}", e))
        }
        _ => None,
    }
}

fn out_of_range(len: u64, min: Option<u64>, max: Option<u64>) -> bool {
    min.is_some_and(|m| len < m) || max.is_some_and(|m| len > m)
}

fn bounds(min: Option<u64>, max: Option<u64>) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!("between {} and {}", min, max),
        (Some(min), None) => format!("at least {}", min),
        (None, Some(max)) => format!("at most {}", max),
        (None, None) => "any".to_string(),
    }
}

fn is_dns_segment(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    match (bytes.first(), bytes.last()) {
        (Some(first), Some(last)) => {
            first.is_ascii_alphanumeric()
                && last.is_ascii_alphanumeric()
                && bytes.iter().all(|b| b.is_ascii_digit() || b.is_ascii_lowercase() || *b == b'-')
        }
        _ => false,
    }
}

/// RFC 1123 label: lowercase alphanumerics and `-`, at most 63 characters
pub fn is_dns1123_label(value: &str) -> bool {
    value.len() <= DNS1123_LABEL_MAX && is_dns_segment(value)
}

/// RFC 1123 subdomain: dot-separated labels, at most 253 characters
pub fn is_dns1123_subdomain(value: &str) -> bool {
    value.len() <= DNS1123_SUBDOMAIN_MAX && value.split('.').all(is_dns_segment)
}

/// Qualified name as used for label and annotation keys: `[prefix/]name`
pub fn is_qualified_name(value: &str) -> bool {
    let name = match value.split_once('/') {
        Some((prefix, name)) => {
            if !is_dns1123_subdomain(prefix) {
                return false;
            }
            name
        }
        None => value,
    };

    let bytes = name.as_bytes();
    match (bytes.first(), bytes.last()) {
        (Some(first), Some(last)) => {
            name.len() <= QUALIFIED_NAME_MAX
                && first.is_ascii_alphanumeric()
                && last.is_ascii_alphanumeric()
                && bytes
                    .iter()
                    .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
        }
        _ => false,
    }
}
