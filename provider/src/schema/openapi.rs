//! Attribute trees derived from CRD OpenAPI v3 schemas
//!
//! Walks the structural schema a CRD publishes for `spec` and produces the
//! matching [`Attribute`]s, including validators for enums, patterns and
//! numeric, length and item bounds.

use super::{Attribute, AttributeKind, Mode, Validator};
use crate::naming::snake_case;
use serde_json::{Map, Value};

/// Attributes of an object schema's `properties`, sorted by name
pub fn object_attributes(schema: &Value) -> Vec<Attribute> {
    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return Vec::new();
    };
    let required: Vec<&str> = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let mut attributes: Vec<Attribute> = properties
        .iter()
        .map(|(json_name, property)| property_attribute(json_name, property, required.contains(&json_name.as_str())))
        .collect();
    attributes.sort_by(|a, b| a.name.cmp(&b.name));
    attributes
}

/// Attribute for one property of an object schema
pub fn property_attribute(json_name: &str, property: &Value, required: bool) -> Attribute {
    let property = effective(property);
    let mode = if required { Mode::Required } else { Mode::Optional };
    let mut attribute = Attribute::mapped(&snake_case(json_name), json_name, kind_of(&property), mode);
    if let Some(description) = property.get("description").and_then(Value::as_str) {
        attribute.description = description.trim().to_string();
    }
    attribute.validators = validators_of(&property);
    attribute
}

/// Value type of a schema node
pub fn kind_of(schema: &Value) -> AttributeKind {
    let schema = effective(schema);
    if flag(&schema, "x-kubernetes-int-or-string") {
        return AttributeKind::Dynamic;
    }

    match schema_type(&schema) {
        Some("string") => AttributeKind::String,
        Some("integer") => AttributeKind::Int64,
        Some("number") => AttributeKind::Float64,
        Some("boolean") => AttributeKind::Bool,
        Some("array") => {
            let items = schema.get("items").map(effective).unwrap_or(Value::Null);
            if has_properties(&items) {
                AttributeKind::ListOfObjects(object_attributes(&items))
            } else if items.is_null() {
                AttributeKind::List(Box::new(AttributeKind::Dynamic))
            } else {
                AttributeKind::List(Box::new(kind_of(&items)))
            }
        }
        Some("object") | None => object_kind(&schema),
        Some(_) => AttributeKind::Dynamic,
    }
}

fn object_kind(schema: &Value) -> AttributeKind {
    if has_properties(schema) {
        return AttributeKind::Object(object_attributes(schema));
    }
    match schema.get("additionalProperties") {
        Some(Value::Object(values)) if !values.is_empty() => {
            AttributeKind::Map(Box::new(kind_of(&Value::Object(values.clone()))))
        }
        _ if schema_type(schema).is_none() && enum_values(schema).is_some() => AttributeKind::String,
        _ => AttributeKind::Dynamic,
    }
}

/// Validators carried by a schema node
pub fn validators_of(schema: &Value) -> Vec<Validator> {
    let schema = effective(schema);
    let mut validators = Vec::new();

    if let Some(values) = enum_values(&schema) {
        validators.push(Validator::OneOf(values));
    }
    if let Some(pattern) = schema.get("pattern").and_then(Value::as_str) {
        validators.push(Validator::Regex(pattern.to_string()));
    }

    let min_length = schema.get("minLength").and_then(Value::as_u64);
    let max_length = schema.get("maxLength").and_then(Value::as_u64);
    if min_length.is_some() || max_length.is_some() {
        validators.push(Validator::LengthBetween {
            min: min_length,
            max: max_length,
        });
    }

    match schema_type(&schema) {
        Some("integer") => {
            if let Some(min) = schema.get("minimum").and_then(Value::as_i64) {
                validators.push(Validator::IntAtLeast(min));
            }
            if let Some(max) = schema.get("maximum").and_then(Value::as_i64) {
                validators.push(Validator::IntAtMost(max));
            }
        }
        Some("number") => {
            if let Some(min) = schema.get("minimum").and_then(Value::as_f64) {
                validators.push(Validator::FloatAtLeast(min));
            }
            if let Some(max) = schema.get("maximum").and_then(Value::as_f64) {
                validators.push(Validator::FloatAtMost(max));
            }
        }
        _ => {}
    }

    let min_items = schema.get("minItems").and_then(Value::as_u64);
    let max_items = schema.get("maxItems").and_then(Value::as_u64);
    if min_items.is_some() || max_items.is_some() {
        validators.push(Validator::ItemsBetween {
            min: min_items,
            max: max_items,
        });
    }

    validators
}

/// Collapse `anyOf`/`oneOf`/`allOf` wrappers into the single schema they describe
///
/// Nullable unions keep their non-null branch. Unions of constants (documented
/// enum variants) become one string schema with an `enum` list.
fn effective(schema: &Value) -> Value {
    let Some(object) = schema.as_object() else {
        return Value::Null;
    };

    for keyword in ["allOf", "anyOf", "oneOf"] {
        let Some(branches) = object.get(keyword).and_then(Value::as_array) else {
            continue;
        };
        let non_null: Vec<&Value> = branches
            .iter()
            .filter(|b| !is_null_branch(b))
            .collect();

        let mut merged: Map<String, Value> = object.clone();
        merged.remove(keyword);

        if let [single] = non_null.as_slice() {
            if let Some(single) = single.as_object() {
                for (k, v) in single {
                    merged.entry(k.clone()).or_insert_with(|| v.clone());
                }
            }
            return effective(&Value::Object(merged));
        }

        let constants: Option<Vec<Vec<Value>>> = non_null
            .iter()
            .map(|b| {
                b.get("const")
                    .map(|c| vec![c.clone()])
                    .or_else(|| b.get("enum").and_then(Value::as_array).cloned())
            })
            .collect();
        if let Some(constants) = constants.map(|c| c.concat()).filter(|c| !c.is_empty()) {
            merged.entry("type".to_string()).or_insert_with(|| Value::from("string"));
            merged.insert("enum".to_string(), Value::Array(constants));
            return Value::Object(merged);
        }
    }

    schema.clone()
}

/// Declared type, skipping `null` in `["string", "null"]` style type lists
fn schema_type(schema: &Value) -> Option<&str> {
    match schema.get("type")? {
        Value::String(t) => Some(t.as_str()),
        Value::Array(types) => types.iter().filter_map(Value::as_str).find(|t| *t != "null"),
        _ => None,
    }
}

/// `{"type": "null"}`, `{"enum": [null]}` or `{"const": null}`
fn is_null_branch(branch: &Value) -> bool {
    branch.is_null()
        || branch.get("type").and_then(Value::as_str) == Some("null")
        || branch.get("const").is_some_and(Value::is_null)
        || branch
            .get("enum")
            .and_then(Value::as_array)
            .is_some_and(|values| values.iter().all(Value::is_null))
}

fn enum_values(schema: &Value) -> Option<Vec<String>> {
    let values = schema.get("enum").and_then(Value::as_array)?;
    Some(
        values
            .iter()
            .filter(|v| !v.is_null())
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
    )
}

fn has_properties(schema: &Value) -> bool {
    schema
        .get("properties")
        .and_then(Value::as_object)
        .is_some_and(|p| !p.is_empty())
}

fn flag(schema: &Value, name: &str) -> bool {
    schema.get(name).and_then(Value::as_bool).unwrap_or(false)
}
