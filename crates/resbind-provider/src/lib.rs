//! resbind provider library entry.
//!
//! This crate wires the config loader, compute client, lifecycle adapter, and
//! plugin HTTP surface into the provider process. It is consumed by the binary
//! (`main.rs`) and by integration tests.

pub mod app_state;
pub mod compute;
pub mod config;
pub mod resource;
pub mod router;
pub mod shutdown;
pub mod transport;
