//! Wire shapes.
//!
//! - `compute`: request bodies and the long-running `Operation` resource of the
//!   compute REST API.
//! - `plugin`: the JSON envelope exchanged with the host framework.
//!
//! Decoding never panics: unknown operation states map to a catch-all variant
//! and malformed host bodies are rejected by serde before reaching the adapter.

pub mod compute;
pub mod plugin;
