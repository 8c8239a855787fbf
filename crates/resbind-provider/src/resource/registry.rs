use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::{Map, Value};

use resbind_core::error::{ResBindError, Result};
use resbind_core::protocol::plugin::{
    ProviderSchema, ResourceSchema, ResourceState, PROTOCOL_VERSION,
};

/// Host-facing lifecycle of one resource type.
///
/// Attributes arrive untyped; each implementation converts them to its own
/// typed model before doing any remote work.
#[async_trait]
pub trait Resource: Send + Sync {
    fn type_name(&self) -> &'static str;
    fn schema(&self) -> ResourceSchema;

    async fn create(&self, config: &Map<String, Value>) -> Result<ResourceState>;
    async fn read(&self, state: ResourceState) -> Result<ResourceState>;
    async fn update(
        &self,
        prior: ResourceState,
        config: &Map<String, Value>,
    ) -> Result<ResourceState>;
    async fn delete(&self, state: ResourceState) -> Result<()>;
}

/// Registry of resource types, keyed by type name.
#[derive(Default)]
pub struct ResourceRegistry {
    resources: DashMap<&'static str, Arc<dyn Resource>>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self {
            resources: DashMap::new(),
        }
    }

    pub fn register(&self, res: Arc<dyn Resource>) {
        self.resources.insert(res.type_name(), res);
    }

    pub fn registered_types(&self) -> Vec<&'static str> {
        let mut out: Vec<&'static str> = self.resources.iter().map(|e| *e.key()).collect();
        out.sort_unstable();
        out
    }

    pub fn get(&self, type_name: &str) -> Result<Arc<dyn Resource>> {
        self.resources
            .get(type_name)
            .map(|e| e.value().clone())
            .ok_or_else(|| ResBindError::BadRequest(format!("unknown resource type: {type_name}")))
    }

    pub fn schema(&self) -> ProviderSchema {
        let mut resources: Vec<ResourceSchema> =
            self.resources.iter().map(|e| e.value().schema()).collect();
        resources.sort_by(|a, b| a.type_name.cmp(&b.type_name));
        ProviderSchema {
            version: PROTOCOL_VERSION,
            resources,
        }
    }
}
