//! # fraudnet Scoring
//!
//! Fuses graph and detector signals into ranked suspicious accounts and
//! cycle-based fraud rings.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod engine;
pub mod types;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::engine::*;
    pub use crate::types::*;
}

pub use engine::ScoringEngine;
pub use types::{FraudRing, PatternTag, ScoringInput, ScoringOutput, SuspiciousAccount};

/// Register the scoring kernel with a registry.
pub fn register_all(
    registry: &fraudnet_core::registry::KernelRegistry,
) -> fraudnet_core::error::Result<()> {
    tracing::info!("Registering scoring kernels");
    registry.register_from(ScoringEngine::new)?;
    Ok(())
}
