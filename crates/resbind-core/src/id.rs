//! Opaque identifiers.
//!
//! `ResourceId` exists only because the host requires every managed object to
//! carry one; it is never used to look up remote state. `RequestId` is the
//! per-request dedup token sent with each mutating compute call.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Host-visible identifier assigned when a binding is created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    /// Fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ResourceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Request-dedup token. A new one per submitted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_distinct_and_non_empty() {
        let a = ResourceId::generate();
        let b = ResourceId::generate();
        assert!(!a.as_str().is_empty());
        assert_ne!(a, b);
    }

    #[test]
    fn request_id_renders_hyphenated() {
        let r = RequestId::generate().to_string();
        assert_eq!(r.len(), 36);
        assert_eq!(r.matches('-').count(), 4);
    }
}
