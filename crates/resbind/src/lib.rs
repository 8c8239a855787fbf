//! Top-level facade crate for resbind.
//!
//! Re-exports the core model and the provider library so users can depend on a single crate.

pub mod core {
    pub use resbind_core::*;
}

pub mod provider {
    pub use resbind_provider::*;
}
