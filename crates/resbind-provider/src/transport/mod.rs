//! Transport layer (host plugin surface over HTTP).
//!
//! Exposes the schema and lifecycle handlers mounted by the router.

pub mod plugin;
