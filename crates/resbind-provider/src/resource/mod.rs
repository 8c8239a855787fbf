//! Lifecycle adapter.
//!
//! Re-exports the `Resource` trait, its registry, and the single resource
//! type this provider serves.

pub mod bind;
pub mod registry;

pub use bind::{ResourceBind, RESOURCE_TYPE};
pub use registry::{Resource, ResourceRegistry};
