//! Provider config loader (strict parsing).

pub mod schema;

use std::fs;

use resbind_core::error::{ResBindError, Result};

pub use schema::{
    ComputeSection, CredentialsSection, LifecycleSection, ProviderConfig, ProviderSection,
};

pub fn load_from_file(path: &str) -> Result<ProviderConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| ResBindError::Internal(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ProviderConfig> {
    let cfg: ProviderConfig = serde_yaml::from_str(s)
        .map_err(|e| ResBindError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
