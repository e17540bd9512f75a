//! Conversion between attribute trees and Kubernetes JSON
//!
//! Attribute trees are keyed by snake_case attribute names. Kubernetes JSON is
//! keyed by the field names recorded on each [`Attribute`].

use crate::diagnostics::AttributePath;
use crate::error::ProviderError;
use crate::kinds::KindInfo;
use crate::schema::{find, AttributeKind, Attribute, Mode, Schema};
use crds::CrdKind;
use kube_dynamic::ObjectRef;
use serde_json::{Map, Value};
use tracing::debug;

/// Kubernetes JSON for an attribute object
///
/// Keys are renamed to their Kubernetes field names, nulls and computed-only
/// attributes are dropped and dynamic strings holding a JSON object or array
/// are decoded.
pub fn to_kubernetes(attributes: &[Attribute], value: &Value, path: Option<&AttributePath>) -> Result<Value, ProviderError> {
    let Some(object) = value.as_object() else {
        return match value {
            Value::Null => Ok(Value::Null),
            _ => Err(invalid(path, "expected an object")),
        };
    };

    let mut out = Map::new();
    for attribute in attributes.iter().filter(|a| a.mode != Mode::Computed) {
        let Some(v) = object.get(&attribute.name).filter(|v| !v.is_null()) else {
            continue;
        };
        let child = path.map_or_else(|| AttributePath::root(&attribute.name), |p| p.attribute(&attribute.name));
        out.insert(attribute.json_name.clone(), kind_to_kubernetes(&attribute.kind, v, &child)?);
    }
    Ok(Value::Object(out))
}

fn kind_to_kubernetes(kind: &AttributeKind, value: &Value, path: &AttributePath) -> Result<Value, ProviderError> {
    match kind {
        AttributeKind::Object(attributes) => to_kubernetes(attributes, value, Some(path)),
        AttributeKind::ListOfObjects(attributes) => each_item(value, path, |item, item_path| {
            to_kubernetes(attributes, item, Some(item_path))
        }),
        AttributeKind::List(element) => {
            each_item(value, path, |item, item_path| kind_to_kubernetes(element, item, item_path))
        }
        AttributeKind::Map(element) => {
            let entries = value.as_object().ok_or_else(|| invalid(Some(path), "expected a map"))?;
            let mut out = Map::new();
            for (key, item) in entries.iter().filter(|(_, v)| !v.is_null()) {
                out.insert(key.clone(), kind_to_kubernetes(element, item, &path.key(key))?);
            }
            Ok(Value::Object(out))
        }
        AttributeKind::Dynamic => Ok(decode_dynamic(value)),
        AttributeKind::String | AttributeKind::Int64 | AttributeKind::Float64 | AttributeKind::Bool => Ok(value.clone()),
    }
}

fn each_item(
    value: &Value,
    path: &AttributePath,
    mut convert: impl FnMut(&Value, &AttributePath) -> Result<Value, ProviderError>,
) -> Result<Value, ProviderError> {
    let items = value.as_array().ok_or_else(|| invalid(Some(path), "expected a list"))?;
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| !item.is_null())
        .map(|(i, item)| convert(item, &path.index(i)))
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

/// Dynamic values may arrive JSON-encoded; decode objects and arrays only so
/// int-or-string values like `"80"` stay strings
fn decode_dynamic(value: &Value) -> Value {
    if let Value::String(s) = value {
        let trimmed = s.trim_start();
        if trimmed.starts_with('{') || trimmed.starts_with('[') {
            if let Ok(decoded) = serde_json::from_str::<Value>(s) {
                return decoded;
            }
            debug!("Keeping undecodable dynamic value as string");
        }
    }
    value.clone()
}

/// Attribute object for Kubernetes JSON
///
/// Every declared attribute is present in the result, null when the object
/// does not carry it. Fields the schema does not declare are dropped.
pub fn from_kubernetes(attributes: &[Attribute], value: &Value) -> Value {
    let object = value.as_object();
    let mut out = Map::new();
    for attribute in attributes {
        let converted = object
            .and_then(|o| o.get(&attribute.json_name))
            .map_or(Value::Null, |v| kind_from_kubernetes(&attribute.kind, v));
        out.insert(attribute.name.clone(), converted);
    }
    Value::Object(out)
}

fn kind_from_kubernetes(kind: &AttributeKind, value: &Value) -> Value {
    match (kind, value) {
        (_, Value::Null) => Value::Null,
        (AttributeKind::Object(attributes), Value::Object(_)) => from_kubernetes(attributes, value),
        (AttributeKind::ListOfObjects(attributes), Value::Array(items)) => {
            Value::Array(items.iter().map(|item| from_kubernetes(attributes, item)).collect())
        }
        (AttributeKind::List(element), Value::Array(items)) => {
            Value::Array(items.iter().map(|item| kind_from_kubernetes(element, item)).collect())
        }
        (AttributeKind::Map(element), Value::Object(entries)) => Value::Object(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), kind_from_kubernetes(element, v)))
                .collect(),
        ),
        _ => value.clone(),
    }
}

/// Serialize the spec JSON through a typed object of kind `K` named `name`
///
/// Values the typed spec cannot represent are rejected here, before anything
/// is sent. Numbers and enum spellings come out in their canonical form.
pub fn round_trip_spec<K: CrdKind>(name: &str, spec: &Value) -> Result<Value, ProviderError> {
    let typed: K::Spec = serde_json::from_value(spec.clone()).map_err(|e| ProviderError::InvalidAttribute {
        path: AttributePath::root("spec"),
        message: e.to_string(),
    })?;
    let object = K::from_spec(name, typed);
    Ok(serde_json::to_value(object.spec())?)
}

/// Full Kubernetes object described by a configuration value
///
/// Builds `apiVersion`, `kind`, `metadata` (name, namespace, labels,
/// annotations) and `spec`, with the spec passed through the typed round trip.
pub fn object_manifest<K: CrdKind>(
    info: &KindInfo,
    schema: &Schema,
    value: &Value,
) -> Result<(ObjectRef, Value), ProviderError> {
    let metadata_value = value.get("metadata").unwrap_or(&Value::Null);
    let metadata = to_kubernetes(schema.nested("metadata"), metadata_value, Some(&AttributePath::root("metadata")))?;

    let name = metadata
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid(Some(&AttributePath::root("metadata").attribute("name")), "name is required"))?;
    let namespace = metadata.get("namespace").and_then(Value::as_str);
    let object_ref = info.object_ref(namespace, name);

    let mut manifest = Map::new();
    manifest.insert("apiVersion".to_string(), Value::from(info.resource.api_version.clone()));
    manifest.insert("kind".to_string(), Value::from(info.resource.kind.clone()));
    manifest.insert("metadata".to_string(), metadata.clone());

    if let Some(spec_attribute) = schema.attribute("spec") {
        let spec_value = value.get("spec").unwrap_or(&Value::Null);
        let spec = kind_to_kubernetes_opt(spec_attribute, spec_value)?;
        if let Some(spec) = spec {
            manifest.insert("spec".to_string(), round_trip_spec::<K>(name, &spec)?);
        } else if info.spec.required {
            manifest.insert("spec".to_string(), round_trip_spec::<K>(name, &Value::Object(Map::new()))?);
        }
    }

    Ok((object_ref, Value::Object(manifest)))
}

fn kind_to_kubernetes_opt(attribute: &Attribute, value: &Value) -> Result<Option<Value>, ProviderError> {
    if value.is_null() {
        return Ok(None);
    }
    kind_to_kubernetes(&attribute.kind, value, &AttributePath::root(&attribute.name)).map(Some)
}

/// Attribute state for a live object
///
/// Every attribute the schema declares for the object is filled from the
/// live object. Provider-only attributes are copied from `config`, and `id`
/// is set from the object's location.
pub fn state_from_object(schema: &Schema, object_ref: &ObjectRef, live: &Value, config: &Value, keep: &[&str]) -> Value {
    let mut state = from_kubernetes(&schema.attributes, live);
    if let Value::Object(map) = &mut state {
        if find(&schema.attributes, "id").is_some() {
            map.insert("id".to_string(), Value::from(object_ref.to_string()));
        }
        for name in keep {
            if find(&schema.attributes, name).is_some() {
                map.insert((*name).to_string(), config.get(*name).cloned().unwrap_or(Value::Null));
            }
        }
    }
    state
}

fn invalid(path: Option<&AttributePath>, message: &str) -> ProviderError {
    ProviderError::InvalidAttribute {
        path: path.cloned().unwrap_or_default(),
        message: message.to_string(),
    }
}
