//! Compute REST shapes (instances.addResourcePolicies / removeResourcePolicies,
//! zoneOperations.wait).

use serde::{Deserialize, Serialize};

/// Body of both `addResourcePolicies` and `removeResourcePolicies`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourcePoliciesRequest {
    pub resource_policies: Vec<String>,
}

impl ResourcePoliciesRequest {
    pub fn single(policy: &str) -> Self {
        Self {
            resource_policies: vec![policy.to_string()],
        }
    }
}

/// Lifecycle status of a zonal operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationStatus {
    Pending,
    Running,
    Done,
    #[serde(other)]
    Unknown,
}

/// Long-running operation handle as returned by the compute API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OperationStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<OperationError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_error_status_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_error_message: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OperationError {
    #[serde(default)]
    pub errors: Vec<OperationErrorItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OperationErrorItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Operation {
    pub fn is_done(&self) -> bool {
        self.status == Some(OperationStatus::Done)
    }

    /// Error text of a finished operation, `None` if it succeeded.
    pub fn failure(&self) -> Option<String> {
        let items: Vec<String> = self
            .error
            .iter()
            .flat_map(|e| e.errors.iter())
            .map(|item| match (&item.code, &item.message) {
                (Some(c), Some(m)) => format!("{c}: {m}"),
                (Some(c), None) => c.clone(),
                (None, Some(m)) => m.clone(),
                (None, None) => "unknown operation error".to_string(),
            })
            .collect();

        if !items.is_empty() {
            return Some(items.join("; "));
        }

        match self.http_error_status_code {
            Some(code) if code >= 400 => Some(format!(
                "HTTP {code}: {}",
                self.http_error_message.as_deref().unwrap_or("operation failed")
            )),
            _ => None,
        }
    }
}

/// Google API error envelope returned on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorEnvelope {
    pub error: ApiError,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

impl ApiErrorEnvelope {
    pub fn describe(&self) -> String {
        match &self.error.status {
            Some(s) => format!("{} ({s}): {}", self.error.code, self.error.message),
            None => format!("{}: {}", self.error.code, self.error.message),
        }
    }
}
