//! Mock dynamic client for unit testing
//!
//! This module provides an in-memory implementation of `DynamicClientTrait`
//! that can be used in unit tests without requiring a running cluster.
//!
//! Besides storing objects, the mock records every apply and delete so tests
//! can assert on field managers and propagation policies, can keep deleted
//! objects visible for a number of reads (finalizers in flight), and can be
//! told to fail the next call of a given verb.

use crate::error::ClusterError;
use crate::models::{ApplyOptions, DeletionPropagation, ObjectRef};
use crate::dynamic_trait::DynamicClientTrait;
use kube::api::{ApiResource, DynamicObject};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Storage key: apiVersion, kind and object location
type ObjectKey = (String, String, ObjectRef);

/// Verbs the mock can be told to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    /// `get`
    Get,
    /// `apply`
    Apply,
    /// `delete`
    Delete,
}

/// A recorded server-side apply call
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedApply {
    /// Object the manifest was applied to
    pub object: ObjectRef,
    /// Full manifest as sent
    pub manifest: Value,
    /// Apply options as sent
    pub options: ApplyOptions,
}

/// A recorded delete call
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedDelete {
    /// Object the delete was issued for
    pub object: ObjectRef,
    /// Propagation policy as sent
    pub propagation: Option<DeletionPropagation>,
}

/// Mock dynamic client for testing
///
/// This mock stores objects in memory and can be configured to return
/// specific responses for testing different scenarios.
#[derive(Debug, Clone, Default)]
pub struct MockDynamicClient {
    objects: Arc<Mutex<HashMap<ObjectKey, Value>>>,
    // Remaining reads an object stays visible after its delete was accepted
    terminating: Arc<Mutex<HashMap<ObjectKey, u32>>>,
    linger_reads: Arc<Mutex<u32>>,
    // Status merged into every applied object, simulating a controller
    status_on_apply: Arc<Mutex<Option<Value>>>,
    failures: Arc<Mutex<HashMap<Verb, String>>>,
    applies: Arc<Mutex<Vec<RecordedApply>>>,
    deletes: Arc<Mutex<Vec<RecordedDelete>>>,
    get_calls: Arc<Mutex<usize>>,
    next_uid: Arc<Mutex<u64>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn key(resource: &ApiResource, object: &ObjectRef) -> ObjectKey {
    (resource.api_version.clone(), resource.kind.clone(), object.clone())
}

impl MockDynamicClient {
    /// Create a new, empty mock client
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object to the mock store (for test setup)
    ///
    /// The object is stored as given; `apiVersion`, `kind` and `metadata`
    /// are filled in from the resource and reference when missing.
    pub fn insert(&self, resource: &ApiResource, object: &ObjectRef, mut value: Value) {
        if let Value::Object(map) = &mut value {
            map.entry("apiVersion").or_insert_with(|| Value::from(resource.api_version.clone()));
            map.entry("kind").or_insert_with(|| Value::from(resource.kind.clone()));
            let metadata = map
                .entry("metadata")
                .or_insert_with(|| Value::Object(serde_json::Map::new()));
            if let Value::Object(metadata) = metadata {
                metadata.entry("name").or_insert_with(|| Value::from(object.name.clone()));
                if let Some(ns) = &object.namespace {
                    metadata.entry("namespace").or_insert_with(|| Value::from(ns.clone()));
                }
            }
        }
        lock(&self.objects).insert(key(resource, object), value);
    }

    /// Raw stored object, if present
    pub fn stored(&self, resource: &ApiResource, object: &ObjectRef) -> Option<Value> {
        lock(&self.objects).get(&key(resource, object)).cloned()
    }

    /// Replace the `status` of a stored object
    pub fn set_status(&self, resource: &ApiResource, object: &ObjectRef, status: Value) {
        if let Some(Value::Object(map)) = lock(&self.objects).get_mut(&key(resource, object)) {
            map.insert("status".to_string(), status);
        }
    }

    /// Merge `status` into every object applied from now on
    pub fn set_status_on_apply(&self, status: Value) {
        *lock(&self.status_on_apply) = Some(status);
    }

    /// Keep deleted objects visible for `reads` further `get` calls
    pub fn set_linger_reads(&self, reads: u32) {
        *lock(&self.linger_reads) = reads;
    }

    /// Fail the next call of `verb` with an invalid-request error
    pub fn fail_next(&self, verb: Verb, message: impl Into<String>) {
        lock(&self.failures).insert(verb, message.into());
    }

    /// Every apply received so far
    pub fn applies(&self) -> Vec<RecordedApply> {
        lock(&self.applies).clone()
    }

    /// Every delete received so far
    pub fn deletes(&self) -> Vec<RecordedDelete> {
        lock(&self.deletes).clone()
    }

    /// Number of `get` calls received so far
    pub fn get_calls(&self) -> usize {
        *lock(&self.get_calls)
    }

    fn take_failure(&self, verb: Verb) -> Result<(), ClusterError> {
        match lock(&self.failures).remove(&verb) {
            Some(message) => Err(ClusterError::InvalidRequest(message)),
            None => Ok(()),
        }
    }

    fn next_uid(&self) -> String {
        let mut id = lock(&self.next_uid);
        *id += 1;
        format!("00000000-0000-0000-0000-{:012}", *id)
    }
}

fn not_found(resource: &ApiResource, object: &ObjectRef) -> ClusterError {
    ClusterError::NotFound(format!("{} {}", resource.kind, object))
}

fn metadata_i64(value: &Value, field: &str) -> Option<i64> {
    value.pointer(&format!("/metadata/{}", field)).and_then(|v| match v {
        Value::String(s) => s.parse().ok(),
        other => other.as_i64(),
    })
}

#[async_trait::async_trait]
impl DynamicClientTrait for MockDynamicClient {
    async fn get(&self, resource: &ApiResource, object: &ObjectRef) -> Result<DynamicObject, ClusterError> {
        *lock(&self.get_calls) += 1;
        self.take_failure(Verb::Get)?;

        let k = key(resource, object);
        {
            let mut terminating = lock(&self.terminating);
            if let Some(remaining) = terminating.get_mut(&k) {
                if *remaining == 0 {
                    terminating.remove(&k);
                    lock(&self.objects).remove(&k);
                    return Err(not_found(resource, object));
                }
                *remaining -= 1;
            }
        }

        let value = lock(&self.objects)
            .get(&k)
            .cloned()
            .ok_or_else(|| not_found(resource, object))?;
        Ok(serde_json::from_value(value)?)
    }

    async fn apply(
        &self,
        resource: &ApiResource,
        object: &ObjectRef,
        manifest: &Value,
        options: &ApplyOptions,
    ) -> Result<DynamicObject, ClusterError> {
        self.take_failure(Verb::Apply)?;
        lock(&self.applies).push(RecordedApply {
            object: object.clone(),
            manifest: manifest.clone(),
            options: options.clone(),
        });

        let k = key(resource, object);
        let previous = lock(&self.objects).get(&k).cloned();

        let mut stored = manifest.clone();
        let uid = previous
            .as_ref()
            .and_then(|p| p.pointer("/metadata/uid").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| self.next_uid());
        let spec_changed = previous.as_ref().map(|p| p.get("spec")) != Some(manifest.get("spec"));
        let generation = previous.as_ref().and_then(|p| metadata_i64(p, "generation")).unwrap_or(0)
            + i64::from(spec_changed);
        let resource_version = previous
            .as_ref()
            .and_then(|p| metadata_i64(p, "resourceVersion"))
            .unwrap_or(0)
            + 1;

        if let Some(metadata) = stored.get_mut("metadata").and_then(Value::as_object_mut) {
            metadata.insert("uid".to_string(), Value::from(uid));
            metadata.insert("generation".to_string(), Value::from(generation));
            metadata.insert("resourceVersion".to_string(), Value::from(resource_version.to_string()));
        }
        let status = lock(&self.status_on_apply)
            .clone()
            .or_else(|| previous.as_ref().and_then(|p| p.get("status").cloned()));
        if let (Some(status), Some(map)) = (status, stored.as_object_mut()) {
            map.insert("status".to_string(), status);
        }

        lock(&self.objects).insert(k.clone(), stored.clone());
        lock(&self.terminating).remove(&k);
        Ok(serde_json::from_value(stored)?)
    }

    async fn delete(
        &self,
        resource: &ApiResource,
        object: &ObjectRef,
        propagation: Option<DeletionPropagation>,
    ) -> Result<(), ClusterError> {
        self.take_failure(Verb::Delete)?;
        lock(&self.deletes).push(RecordedDelete {
            object: object.clone(),
            propagation,
        });

        let k = key(resource, object);
        if !lock(&self.objects).contains_key(&k) {
            return Err(not_found(resource, object));
        }

        let linger = *lock(&self.linger_reads);
        if linger == 0 {
            lock(&self.objects).remove(&k);
        } else {
            lock(&self.terminating).entry(k).or_insert(linger);
        }
        Ok(())
    }
}
