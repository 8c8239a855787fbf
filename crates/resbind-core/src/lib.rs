//! resbind core: binding model, identifiers, wire shapes, and error types.
//!
//! This crate defines the data contracts shared by the provider, its tests, and
//! any host-side tooling: the typed `PolicyBinding`, the compute REST request
//! and operation shapes, and the host plugin envelope. It carries no transport
//! or runtime dependencies.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Malformed host input surfaces as `ResBindError::BadRequest` instead of
//! crashing the plugin process.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod binding;
pub mod error;
pub mod id;
pub mod protocol;

pub use binding::PolicyBinding;
pub use error::{ErrorCode, ResBindError, Result};
pub use id::{RequestId, ResourceId};
