//! `google_compute_resource_bind`: keeps one resource policy attached to one
//! instance.
//!
//! - create: attach, then assign a random id.
//! - read: no remote call, state returned as recorded.
//! - update: only when zone/instance/policy changed; detach previous, then
//!   attach new. A failed detach aborts before the attach.
//! - delete: detach.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use resbind_core::binding::{ATTRIBUTES, TRACKED_ATTRIBUTES};
use resbind_core::error::Result;
use resbind_core::protocol::plugin::{AttributeKind, AttributeSchema, ResourceSchema, ResourceState};
use resbind_core::{PolicyBinding, ResourceId};

use super::registry::Resource;
use crate::compute::PolicyClient;

pub const RESOURCE_TYPE: &str = "google_compute_resource_bind";

pub struct ResourceBind {
    client: Arc<dyn PolicyClient>,
    detach_before_attach: bool,
}

impl ResourceBind {
    pub fn new(client: Arc<dyn PolicyClient>) -> Self {
        Self {
            client,
            detach_before_attach: false,
        }
    }

    /// Clear the policy (ignoring failures) before attaching it on create.
    pub fn with_detach_before_attach(mut self, on: bool) -> Self {
        self.detach_before_attach = on;
        self
    }

    /// Attach and return a fresh id. No id is produced when the attach fails.
    pub async fn create_binding(&self, b: &PolicyBinding) -> Result<ResourceId> {
        if self.detach_before_attach {
            if let Err(e) = self.client.remove(b).await {
                tracing::warn!(
                    instance = %b.instance,
                    policy = %b.policy,
                    error = %e,
                    "pre-create detach failed, continuing"
                );
            }
        }

        self.client.add(b).await?;

        let id = ResourceId::generate();
        tracing::info!(
            %id,
            project = %b.project,
            zone = %b.zone,
            instance = %b.instance,
            policy = %b.policy,
            "binding created"
        );
        Ok(id)
    }

    /// Returns whether any remote call was made.
    pub async fn update_binding(
        &self,
        new: &PolicyBinding,
        previous: &PolicyBinding,
    ) -> Result<bool> {
        let changed = new.changed_from(previous);
        if changed.is_empty() {
            tracing::debug!(instance = %new.instance, "no tracked attribute changed, skipping");
            return Ok(false);
        }

        tracing::info!(?changed, from = %previous.policy, to = %new.policy, "rebinding");
        self.client.remove(previous).await?;
        self.client.add(new).await?;
        Ok(true)
    }

    pub async fn delete_binding(&self, b: &PolicyBinding) -> Result<()> {
        self.client.remove(b).await?;
        tracing::info!(
            project = %b.project,
            zone = %b.zone,
            instance = %b.instance,
            policy = %b.policy,
            "binding deleted"
        );
        Ok(())
    }
}

#[async_trait]
impl Resource for ResourceBind {
    fn type_name(&self) -> &'static str {
        RESOURCE_TYPE
    }

    fn schema(&self) -> ResourceSchema {
        ResourceSchema {
            type_name: RESOURCE_TYPE.to_string(),
            attributes: ATTRIBUTES
                .iter()
                .map(|name| AttributeSchema {
                    name: (*name).to_string(),
                    kind: AttributeKind::String,
                    required: true,
                    update_tracked: TRACKED_ATTRIBUTES.contains(name),
                })
                .collect(),
        }
    }

    async fn create(&self, config: &Map<String, Value>) -> Result<ResourceState> {
        let b = PolicyBinding::from_attributes(config)?;
        let id = self.create_binding(&b).await?;
        Ok(ResourceState {
            id,
            attributes: b.to_attributes(),
        })
    }

    // Out-of-band changes stay invisible until the next update or delete.
    async fn read(&self, state: ResourceState) -> Result<ResourceState> {
        Ok(state)
    }

    async fn update(
        &self,
        prior: ResourceState,
        config: &Map<String, Value>,
    ) -> Result<ResourceState> {
        let previous = PolicyBinding::from_attributes(&prior.attributes)?;
        let new = PolicyBinding::from_attributes(config)?;
        self.update_binding(&new, &previous).await?;
        Ok(ResourceState {
            id: prior.id,
            attributes: new.to_attributes(),
        })
    }

    async fn delete(&self, state: ResourceState) -> Result<()> {
        let b = PolicyBinding::from_attributes(&state.attributes)?;
        self.delete_binding(&b).await
    }
}
