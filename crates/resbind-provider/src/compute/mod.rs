//! Remote policy client.
//!
//! `PolicyClient` is the seam the lifecycle adapter depends on; the REST
//! implementation talks to the compute API and is built once at startup.

pub mod auth;
pub mod client;
pub mod rest;

pub use client::{PolicyAction, PolicyClient};
pub use rest::RestPolicyClient;
