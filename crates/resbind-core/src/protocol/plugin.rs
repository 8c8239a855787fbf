//! Host plugin envelope (JSON).
//!
//! Attributes travel as an untyped map so the envelope stays resource-agnostic;
//! each resource converts them to its typed form on entry.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ResBindError;
use crate::id::ResourceId;

/// Plugin protocol version reported in the schema and handshake line.
pub const PROTOCOL_VERSION: u32 = 1;

/// Recorded state of one managed object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceState {
    pub id: ResourceId,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateRequest {
    pub config: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReadRequest {
    pub state: ResourceState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateRequest {
    pub prior: ResourceState,
    pub config: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeleteRequest {
    pub state: ResourceState,
}

/// Successful lifecycle response. `state` is `None` after delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateResponse {
    pub state: Option<ResourceState>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

impl From<&ResBindError> for ErrorResponse {
    fn from(e: &ResBindError) -> Self {
        Self {
            error: ErrorBody {
                code: e.code().as_str().to_string(),
                message: e.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeKind {
    String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSchema {
    pub name: String,
    pub kind: AttributeKind,
    pub required: bool,
    /// A change to this attribute triggers an update call.
    pub update_tracked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSchema {
    pub type_name: String,
    pub attributes: Vec<AttributeSchema>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSchema {
    pub version: u32,
    pub resources: Vec<ResourceSchema>,
}
