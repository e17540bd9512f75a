//! Data source adapter: reads a live object into state

use crate::convert::state_from_object;
use crate::diagnostics::Diagnostic;
use crate::error::ProviderError;
use crate::framework::{DataSource, HostResult};
use crate::kinds::KindInfo;
use crate::provider::ProviderContext;
use crate::resource::{check, object_ref_of};
use crate::schema::envelope::data_source_schema;
use crate::schema::validate::validate;
use crate::schema::Schema;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::field::{display, Empty};
use tracing::{debug, instrument, Span};

/// Data source adapter for one kind
pub struct CrdDataSource {
    info: Arc<KindInfo>,
    schema: Schema,
    context: Arc<ProviderContext>,
}

impl std::fmt::Debug for CrdDataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrdDataSource").field("type_name", &self.info.type_name).finish()
    }
}

impl CrdDataSource {
    /// Adapter for `info`, talking to the cluster through `context`
    pub fn new(info: Arc<KindInfo>, context: Arc<ProviderContext>) -> Self {
        Self {
            schema: data_source_schema(&info),
            info,
            context,
        }
    }

    #[instrument(skip(self, config), fields(type_name = %self.info.type_name, object = Empty))]
    async fn lookup(&self, config: &Value) -> Result<Value, ProviderError> {
        check(&self.schema, config, Vec::new())?;
        let object_ref = object_ref_of(&self.info, config)?;
        Span::current().record("object", display(&object_ref));
        let client = self.context.client(&self.info.type_name)?;
        debug!("Reading {} {}", self.info.resource.kind, object_ref);
        let live = client.get(&self.info.resource, &object_ref).await?;
        Ok(state_from_object(
            &self.schema,
            &object_ref,
            &serde_json::to_value(&live)?,
            config,
            &[],
        ))
    }
}

#[async_trait]
impl DataSource for CrdDataSource {
    fn type_name(&self) -> &str {
        &self.info.type_name
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn validate(&self, config: &Value) -> Vec<Diagnostic> {
        validate(&self.schema.attributes, config)
    }

    async fn read(&self, config: &Value) -> HostResult<Value> {
        Ok(self.lookup(config).await?)
    }
}
