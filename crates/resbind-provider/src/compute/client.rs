use async_trait::async_trait;

use resbind_core::error::Result;
use resbind_core::PolicyBinding;

/// Attach/detach primitive against the compute control plane.
///
/// Implementations return only after the remote operation reached a terminal
/// state. They do not check whether the policy is already attached.
#[async_trait]
pub trait PolicyClient: Send + Sync {
    async fn add(&self, binding: &PolicyBinding) -> Result<()>;
    async fn remove(&self, binding: &PolicyBinding) -> Result<()>;
}

/// The two mutating instance methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyAction {
    Add,
    Remove,
}

impl PolicyAction {
    /// REST custom-method name.
    pub fn method(self) -> &'static str {
        match self {
            PolicyAction::Add => "addResourcePolicies",
            PolicyAction::Remove => "removeResourcePolicies",
        }
    }
}
