//! Manifest data source adapter: renders an object as YAML offline

use crate::convert::object_manifest;
use crate::diagnostics::Diagnostic;
use crate::error::ProviderError;
use crate::framework::{DataSource, HostResult};
use crate::kinds::KindInfo;
use crate::resource::check;
use crate::schema::envelope::manifest_schema;
use crate::schema::validate::validate;
use crate::schema::Schema;
use async_trait::async_trait;
use crds::CrdKind;
use serde_json::{Map, Value};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::field::{display, Empty};
use tracing::{debug, instrument, Span};

/// Manifest data source adapter for kind `K`
pub struct CrdManifest<K> {
    info: Arc<KindInfo>,
    schema: Schema,
    _kind: PhantomData<fn() -> K>,
}

impl<K> std::fmt::Debug for CrdManifest<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrdManifest")
            .field("type_name", &self.info.manifest_type_name)
            .finish()
    }
}

impl<K: CrdKind> CrdManifest<K> {
    /// Adapter for `info`; no cluster access needed
    pub fn new(info: Arc<KindInfo>) -> Self {
        Self {
            schema: manifest_schema(&info),
            info,
            _kind: PhantomData,
        }
    }

    #[instrument(skip(self, config), fields(type_name = %self.info.manifest_type_name, object = Empty))]
    fn render(&self, config: &Value) -> Result<Value, ProviderError> {
        check(&self.schema, config, Vec::new())?;
        let (object_ref, manifest) = object_manifest::<K>(&self.info, &self.schema, config)?;
        Span::current().record("object", display(&object_ref));
        let yaml = serde_yaml::to_string(&manifest)?;
        debug!("Rendered {} {} ({} bytes)", self.info.resource.kind, object_ref, yaml.len());

        let mut state = Map::new();
        for attribute in &self.schema.attributes {
            state.insert(
                attribute.name.clone(),
                config.get(&attribute.name).cloned().unwrap_or(Value::Null),
            );
        }
        state.insert("id".to_string(), Value::from(object_ref.to_string()));
        state.insert("yaml".to_string(), Value::from(yaml));
        Ok(Value::Object(state))
    }
}

#[async_trait]
impl<K: CrdKind> DataSource for CrdManifest<K> {
    fn type_name(&self) -> &str {
        &self.info.manifest_type_name
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn validate(&self, config: &Value) -> Vec<Diagnostic> {
        validate(&self.schema.attributes, config)
    }

    async fn read(&self, config: &Value) -> HostResult<Value> {
        Ok(self.render(config)?)
    }
}
