//! Fixed attributes wrapped around every kind's `spec`

use super::openapi::property_attribute;
use super::{Attribute, AttributeKind, Mode, Schema, Validator};
use crate::kinds::KindInfo;
use kube_dynamic::DeletionPropagation;

/// Attributes that only steer the provider and never reach the cluster
pub const PROVIDER_ONLY: [&str; 7] = [
    "force_conflicts",
    "field_manager",
    "deletion_propagation",
    "wait_for_upsert",
    "upsert_timeout",
    "poll_interval",
    "wait_for_delete",
];

/// Which adapter a schema is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Surface {
    Resource,
    DataSource,
    Manifest,
}

fn string(name: &str, mode: Mode) -> Attribute {
    Attribute::new(name, AttributeKind::String, mode)
}

fn string_map(name: &str, mode: Mode) -> Attribute {
    Attribute::new(name, AttributeKind::Map(Box::new(AttributeKind::String)), mode)
}

fn duration(name: &str, description: &str) -> Attribute {
    string(name, Mode::Optional)
        .describe(description)
        .validate(Validator::Duration)
}

fn interval(name: &str, description: &str) -> Attribute {
    string(name, Mode::Optional)
        .describe(description)
        .validate(Validator::PositiveDuration)
}

fn metadata(info: &KindInfo, surface: Surface) -> Attribute {
    let settable = if surface == Surface::DataSource {
        Mode::Computed
    } else {
        Mode::Optional
    };

    let mut attributes = vec![
        string("name", Mode::Required)
            .describe("Unique name of the object within its namespace")
            .validate(Validator::Dns1123Subdomain),
    ];
    if info.namespaced {
        attributes.push(
            string("namespace", Mode::Required)
                .describe("Namespace the object lives in")
                .validate(Validator::Dns1123Label),
        );
    }

    let mut labels = string_map("labels", settable).describe("Key/value pairs used to organize and select objects");
    let mut annotations = string_map("annotations", settable).describe("Unstructured key/value data stored with the object");
    if settable != Mode::Computed {
        labels = labels.validate(Validator::QualifiedNameKeys);
        annotations = annotations.validate(Validator::QualifiedNameKeys);
    }
    attributes.push(labels);
    attributes.push(annotations);

    if surface != Surface::Manifest {
        attributes.push(string("uid", Mode::Computed).describe("Server-assigned unique identifier"));
        attributes.push(
            Attribute::new("generation", AttributeKind::Int64, Mode::Computed)
                .describe("Sequence number of the desired state"),
        );
        attributes.push(
            Attribute::mapped("resource_version", "resourceVersion", AttributeKind::String, Mode::Computed)
                .describe("Opaque version of the object used for optimistic concurrency"),
        );
    }

    Attribute::new("metadata", AttributeKind::Object(attributes), Mode::Required)
        .describe("Standard object metadata")
}

fn spec(info: &KindInfo, surface: Surface) -> Attribute {
    let mut attribute = property_attribute("spec", &info.spec.schema, info.spec.required);
    if attribute.description.is_empty() {
        attribute.description = format!("Desired state of the {}", info.resource.kind);
    }
    if surface == Surface::DataSource {
        attribute.into_computed()
    } else {
        attribute
    }
}

fn id() -> Attribute {
    string("id", Mode::Computed).describe("`namespace/name` of the object, or `name` when cluster-scoped")
}

fn type_meta() -> [Attribute; 2] {
    [
        Attribute::mapped("api_version", "apiVersion", AttributeKind::String, Mode::Computed)
            .describe("Versioned schema of this representation of the object"),
        string("kind", Mode::Computed).describe("Kind of the object"),
    ]
}

/// Schema of a kind's resource
pub fn resource_schema(info: &KindInfo) -> Schema {
    let mut attributes = vec![id()];
    attributes.extend(type_meta());
    attributes.push(metadata(info, Surface::Resource));
    attributes.push(spec(info, Surface::Resource));

    attributes.push(
        Attribute::new("force_conflicts", AttributeKind::Bool, Mode::Optional)
            .describe("Take ownership of fields managed by other field managers during apply"),
    );
    attributes.push(
        string("field_manager", Mode::Optional)
            .describe("Field manager name used for server-side apply")
            .validate(Validator::LengthBetween { min: Some(1), max: Some(128) }),
    );
    attributes.push(
        string("deletion_propagation", Mode::Optional)
            .describe("How dependents are garbage collected on delete")
            .validate(Validator::OneOf(
                DeletionPropagation::VALUES.iter().map(ToString::to_string).collect(),
            )),
    );

    attributes.push(
        Attribute::new(
            "wait_for_upsert",
            AttributeKind::ListOfObjects(vec![
                string("jsonpath", Mode::Required)
                    .describe("JSONPath expression evaluated against the live object")
                    .validate(Validator::LengthBetween { min: Some(1), max: None }),
                string("value", Mode::Required).describe("Value the expression must produce"),
            ]),
            Mode::Optional,
        )
        .describe("Conditions the object must meet after create or update"),
    );
    attributes.push(duration("upsert_timeout", "Maximum time to wait for `wait_for_upsert` (default 30s)"));
    attributes.push(interval("poll_interval", "Time between `wait_for_upsert` checks (default 5s)"));

    attributes.push(
        Attribute::new(
            "wait_for_delete",
            AttributeKind::Object(vec![
                duration("timeout", "Maximum time to wait for the object to disappear (default 30s)"),
                interval("poll_interval", "Time between checks (default 5s)"),
            ]),
            Mode::Optional,
        )
        .describe("Wait for the object to disappear after delete"),
    );

    Schema {
        description: format!("Manages a {} ({}) object", info.resource.kind, info.resource.api_version),
        attributes,
    }
}

/// Schema of a kind's data source
pub fn data_source_schema(info: &KindInfo) -> Schema {
    let mut attributes = vec![id()];
    attributes.extend(type_meta());
    attributes.push(metadata(info, Surface::DataSource));
    attributes.push(spec(info, Surface::DataSource));
    Schema {
        description: format!("Reads a {} ({}) object", info.resource.kind, info.resource.api_version),
        attributes,
    }
}

/// Schema of a kind's manifest data source
pub fn manifest_schema(info: &KindInfo) -> Schema {
    let attributes = vec![
        id(),
        metadata(info, Surface::Manifest),
        spec(info, Surface::Manifest),
        string("yaml", Mode::Computed).describe("The object rendered as YAML"),
    ];
    Schema {
        description: format!(
            "Renders a {} ({}) object as YAML without contacting a cluster",
            info.resource.kind, info.resource.api_version
        ),
        attributes,
    }
}
