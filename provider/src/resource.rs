//! Resource adapter shared by every kind
//!
//! Create and Update are one server-side apply of the whole object followed by
//! the optional upsert wait and a read back. Delete issues the delete and, if
//! requested, waits for the object to disappear.

use crate::convert::{object_manifest, state_from_object};
use crate::diagnostics::{AttributePath, Diagnostic};
use crate::duration::{parse_or, parse_positive_or};
use crate::error::ProviderError;
use crate::framework::{HostResult, Resource};
use crate::kinds::KindInfo;
use crate::provider::ProviderContext;
use crate::schema::envelope::{resource_schema, PROVIDER_ONLY};
use crate::schema::validate::validate;
use crate::schema::Schema;
use crate::wait::{
    validate_jsonpath, wait_for_delete, wait_for_upsert, WaitCondition, WaitSettings, DEFAULT_POLL_INTERVAL,
    DEFAULT_TIMEOUT,
};
use async_trait::async_trait;
use crds::CrdKind;
use kube_dynamic::{DeletionPropagation, ObjectRef};
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::field::{display, Empty};
use tracing::{info, instrument, warn, Span};

/// Resource adapter for kind `K`
pub struct CrdResource<K> {
    info: Arc<KindInfo>,
    schema: Schema,
    context: Arc<ProviderContext>,
    _kind: PhantomData<fn() -> K>,
}

impl<K> std::fmt::Debug for CrdResource<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrdResource").field("type_name", &self.info.type_name).finish()
    }
}

/// Read a string attribute at `pointer` (JSON pointer over attribute names)
fn str_at<'a>(value: &'a Value, pointer: &str) -> Option<&'a str> {
    value.pointer(pointer).and_then(Value::as_str)
}

/// Location of the object recorded in a state or plan
///
/// Falls back to the `id` attribute when metadata is not populated.
pub(crate) fn object_ref_of(info: &KindInfo, value: &Value) -> Result<ObjectRef, ProviderError> {
    match str_at(value, "/metadata/name") {
        Some(name) => Ok(info.object_ref(str_at(value, "/metadata/namespace"), name)),
        None => match str_at(value, "/id") {
            Some(id) => info.parse_id(id),
            None => Err(ProviderError::InvalidAttribute {
                path: AttributePath::root("metadata").attribute("name"),
                message: "name is required".to_string(),
            }),
        },
    }
}

/// Validate `value` and turn error diagnostics into an error
pub(crate) fn check(schema: &Schema, value: &Value, extra: Vec<Diagnostic>) -> Result<(), ProviderError> {
    let mut diagnostics = validate(&schema.attributes, value);
    diagnostics.extend(extra);
    if diagnostics.iter().any(Diagnostic::is_error) {
        Err(ProviderError::Validation(diagnostics))
    } else {
        Ok(())
    }
}

fn upsert_wait(plan: &Value) -> Result<(Vec<WaitCondition>, WaitSettings), ProviderError> {
    let conditions = match plan.get("wait_for_upsert") {
        Some(v) if !v.is_null() => serde_json::from_value(v.clone())?,
        _ => Vec::new(),
    };
    let settings = WaitSettings {
        timeout: parse_or(str_at(plan, "/upsert_timeout"), DEFAULT_TIMEOUT)?,
        poll_interval: parse_positive_or(str_at(plan, "/poll_interval"), DEFAULT_POLL_INTERVAL)?,
    };
    Ok((conditions, settings))
}

fn delete_wait(state: &Value) -> Result<Option<WaitSettings>, ProviderError> {
    match state.get("wait_for_delete") {
        Some(block) if !block.is_null() => Ok(Some(WaitSettings {
            timeout: parse_or(str_at(block, "/timeout"), DEFAULT_TIMEOUT)?,
            poll_interval: parse_positive_or(str_at(block, "/poll_interval"), DEFAULT_POLL_INTERVAL)?,
        })),
        _ => Ok(None),
    }
}

fn propagation(state: &Value) -> Result<Option<DeletionPropagation>, ProviderError> {
    str_at(state, "/deletion_propagation")
        .map(|p| {
            p.parse::<DeletionPropagation>().map_err(|message| ProviderError::InvalidAttribute {
                path: AttributePath::root("deletion_propagation"),
                message,
            })
        })
        .transpose()
}

/// JSONPath problems in `wait_for_upsert`, reported before anything is applied
fn jsonpath_diagnostics(config: &Value) -> Vec<Diagnostic> {
    let Some(conditions) = config.get("wait_for_upsert").and_then(Value::as_array) else {
        return Vec::new();
    };
    conditions
        .iter()
        .enumerate()
        .filter_map(|(i, condition)| {
            let expression = condition.get("jsonpath").and_then(Value::as_str)?;
            validate_jsonpath(expression).err().map(|e| {
                Diagnostic::attribute_error(
                    AttributePath::root("wait_for_upsert").index(i).attribute("jsonpath"),
                    "Invalid JSONPath expression",
                    e.to_string(),
                )
            })
        })
        .collect()
}

impl<K: CrdKind> CrdResource<K> {
    /// Adapter for `info`, talking to the cluster through `context`
    pub fn new(info: Arc<KindInfo>, context: Arc<ProviderContext>) -> Self {
        Self {
            schema: resource_schema(&info),
            info,
            context,
            _kind: PhantomData,
        }
    }

    #[instrument(skip(self, plan), fields(type_name = %self.info.type_name, object = Empty))]
    async fn upsert(&self, plan: &Value) -> Result<Value, ProviderError> {
        check(&self.schema, plan, jsonpath_diagnostics(plan))?;
        let (object_ref, manifest) = object_manifest::<K>(&self.info, &self.schema, plan)?;
        Span::current().record("object", display(&object_ref));
        let options = self.context.apply_options(plan);
        let (conditions, wait) = upsert_wait(plan)?;
        let client = self.context.client(&self.info.type_name)?;

        info!(
            "Applying {} {} (field manager {}, force {})",
            self.info.resource.kind, object_ref, options.field_manager, options.force_conflicts
        );
        client.apply(&self.info.resource, &object_ref, &manifest, &options).await?;
        wait_for_upsert(client, &self.info.resource, &object_ref, &conditions, wait).await?;

        let live = client.get(&self.info.resource, &object_ref).await?;
        Ok(state_from_object(
            &self.schema,
            &object_ref,
            &serde_json::to_value(&live)?,
            plan,
            &PROVIDER_ONLY,
        ))
    }

    #[instrument(skip(self, state), fields(type_name = %self.info.type_name, object = Empty))]
    async fn refresh(&self, state: &Value) -> Result<Option<Value>, ProviderError> {
        let object_ref = object_ref_of(&self.info, state)?;
        Span::current().record("object", display(&object_ref));
        let client = self.context.client(&self.info.type_name)?;
        match client.get(&self.info.resource, &object_ref).await {
            Ok(live) => Ok(Some(state_from_object(
                &self.schema,
                &object_ref,
                &serde_json::to_value(&live)?,
                state,
                &PROVIDER_ONLY,
            ))),
            Err(e) if e.is_not_found() => {
                warn!("{} {} no longer exists, removing from state", self.info.resource.kind, object_ref);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn replace_checked(&self, prior: &Value, plan: &Value) -> Result<Value, ProviderError> {
        for field in ["name", "namespace"] {
            let pointer = format!("/metadata/{}", field);
            if let (Some(from), Some(to)) = (str_at(prior, &pointer), str_at(plan, &pointer)) {
                if from != to {
                    return Err(ProviderError::RequiresReplacement {
                        path: AttributePath::root("metadata").attribute(field),
                        from: from.to_string(),
                        to: to.to_string(),
                    });
                }
            }
        }
        self.upsert(plan).await
    }

    #[instrument(skip(self, state), fields(type_name = %self.info.type_name, object = Empty))]
    async fn remove(&self, state: &Value) -> Result<(), ProviderError> {
        let object_ref = object_ref_of(&self.info, state)?;
        Span::current().record("object", display(&object_ref));
        let propagation = propagation(state)?;
        let wait = delete_wait(state)?;
        let client = self.context.client(&self.info.type_name)?;

        info!("Deleting {} {}", self.info.resource.kind, object_ref);
        match client.delete(&self.info.resource, &object_ref, propagation).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                warn!("{} {} was already deleted", self.info.resource.kind, object_ref);
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        }

        if let Some(wait) = wait {
            wait_for_delete(client, &self.info.resource, &object_ref, wait).await?;
        }
        Ok(())
    }

    #[instrument(skip(self), fields(type_name = %self.info.type_name, object = Empty))]
    async fn import_id(&self, id: &str) -> Result<Value, ProviderError> {
        let object_ref = self.info.parse_id(id)?;
        Span::current().record("object", display(&object_ref));
        let client = self.context.client(&self.info.type_name)?;
        let live = client.get(&self.info.resource, &object_ref).await?;
        info!("Imported {} {}", self.info.resource.kind, object_ref);
        Ok(state_from_object(
            &self.schema,
            &object_ref,
            &serde_json::to_value(&live)?,
            &Value::Null,
            &PROVIDER_ONLY,
        ))
    }
}

#[async_trait]
impl<K: CrdKind> Resource for CrdResource<K> {
    fn type_name(&self) -> &str {
        &self.info.type_name
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn validate(&self, config: &Value) -> Vec<Diagnostic> {
        let mut diagnostics = validate(&self.schema.attributes, config);
        diagnostics.extend(jsonpath_diagnostics(config));
        diagnostics
    }

    async fn create(&self, plan: &Value) -> HostResult<Value> {
        Ok(self.upsert(plan).await?)
    }

    async fn read(&self, state: &Value) -> HostResult<Option<Value>> {
        Ok(self.refresh(state).await?)
    }

    async fn update(&self, prior: &Value, plan: &Value) -> HostResult<Value> {
        Ok(self.replace_checked(prior, plan).await?)
    }

    async fn delete(&self, state: &Value) -> HostResult<()> {
        Ok(self.remove(state).await?)
    }

    async fn import(&self, id: &str) -> HostResult<Value> {
        Ok(self.import_id(id).await?)
    }
}
