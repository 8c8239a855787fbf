//! Shared application state for the provider.
//!
//! The compute client is constructed once here and injected into every
//! registered resource.

use std::sync::Arc;

use resbind_core::error::Result;

use crate::compute::{PolicyClient, RestPolicyClient};
use crate::config::ProviderConfig;
use crate::resource::{ResourceBind, ResourceRegistry};

#[derive(Clone)]
pub struct AppState {
    registry: Arc<ResourceRegistry>,
}

impl AppState {
    /// Build application state with the REST compute client.
    /// Returns Result so main can report client construction errors.
    pub fn new(cfg: &ProviderConfig) -> Result<Self> {
        let client = RestPolicyClient::new(&cfg.compute, &cfg.credentials)?;
        tracing::info!(
            endpoint = %cfg.compute.endpoint,
            static_token = cfg.credentials.access_token.is_some(),
            "compute client ready"
        );
        Ok(Self::with_client(cfg, Arc::new(client)))
    }

    /// Build application state around any `PolicyClient`.
    pub fn with_client(cfg: &ProviderConfig, client: Arc<dyn PolicyClient>) -> Self {
        let registry = ResourceRegistry::new();

        let bind = ResourceBind::new(client)
            .with_detach_before_attach(cfg.lifecycle.detach_before_attach);
        registry.register(Arc::new(bind));

        tracing::debug!(types = ?registry.registered_types(), "resources registered");

        Self {
            registry: Arc::new(registry),
        }
    }

    pub fn registry(&self) -> Arc<ResourceRegistry> {
        Arc::clone(&self.registry)
    }
}
