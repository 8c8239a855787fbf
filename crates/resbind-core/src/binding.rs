//! Typed policy binding.
//!
//! The host hands attributes over as an untyped bag; `from_attributes` is the
//! single place that bag is turned into a `PolicyBinding`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ResBindError, Result};

pub const ATTR_PROJECT: &str = "project";
pub const ATTR_ZONE: &str = "zone";
pub const ATTR_INSTANCE: &str = "instance";
pub const ATTR_POLICY: &str = "policy";

/// All attributes, in schema order.
pub const ATTRIBUTES: [&str; 4] = [ATTR_PROJECT, ATTR_ZONE, ATTR_INSTANCE, ATTR_POLICY];

/// Attributes whose change triggers a detach/attach on update.
pub const TRACKED_ATTRIBUTES: [&str; 3] = [ATTR_ZONE, ATTR_INSTANCE, ATTR_POLICY];

/// Desired association of one resource policy with one compute instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyBinding {
    pub project: String,
    pub zone: String,
    pub instance: String,
    pub policy: String,
}

impl PolicyBinding {
    pub fn new(
        project: impl Into<String>,
        zone: impl Into<String>,
        instance: impl Into<String>,
        policy: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            zone: zone.into(),
            instance: instance.into(),
            policy: policy.into(),
        }
    }

    /// Build from the host's attribute bag. All four attributes are required
    /// non-empty strings; anything else in the bag is rejected.
    pub fn from_attributes(attrs: &Map<String, Value>) -> Result<Self> {
        if let Some(unknown) = attrs.keys().find(|k| !ATTRIBUTES.contains(&k.as_str())) {
            return Err(ResBindError::BadRequest(format!(
                "unknown attribute: {unknown}"
            )));
        }

        let binding = Self {
            project: required_str(attrs, ATTR_PROJECT)?,
            zone: required_str(attrs, ATTR_ZONE)?,
            instance: required_str(attrs, ATTR_INSTANCE)?,
            policy: required_str(attrs, ATTR_POLICY)?,
        };
        Ok(binding)
    }

    pub fn to_attributes(&self) -> Map<String, Value> {
        let mut m = Map::with_capacity(ATTRIBUTES.len());
        m.insert(ATTR_PROJECT.into(), Value::String(self.project.clone()));
        m.insert(ATTR_ZONE.into(), Value::String(self.zone.clone()));
        m.insert(ATTR_INSTANCE.into(), Value::String(self.instance.clone()));
        m.insert(ATTR_POLICY.into(), Value::String(self.policy.clone()));
        m
    }

    /// Tracked attributes that differ from `previous`. `project` is not tracked.
    pub fn changed_from(&self, previous: &PolicyBinding) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.zone != previous.zone {
            out.push(ATTR_ZONE);
        }
        if self.instance != previous.instance {
            out.push(ATTR_INSTANCE);
        }
        if self.policy != previous.policy {
            out.push(ATTR_POLICY);
        }
        out
    }
}

fn required_str(attrs: &Map<String, Value>, key: &str) -> Result<String> {
    match attrs.get(key) {
        None | Some(Value::Null) => Err(ResBindError::BadRequest(format!(
            "missing required attribute: {key}"
        ))),
        Some(Value::String(s)) if s.trim().is_empty() => Err(ResBindError::BadRequest(format!(
            "attribute {key} must not be empty"
        ))),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(ResBindError::BadRequest(format!(
            "attribute {key} must be a string"
        ))),
    }
}
