//! # fraudnet Core
//!
//! Shared abstractions for the fraudnet analysis kernels.
//!
//! This crate provides:
//! - Transaction and account types
//! - Domain and kernel metadata definitions
//! - The `AnalysisKernel` / `BatchKernel` traits
//! - A kernel registry
//! - Detection configuration and logging setup

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod domain;
pub mod error;
pub mod kernel;
pub mod logging;
pub mod registry;
pub mod traits;
pub mod transaction;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{DetectionConfig, DetectionConfigBuilder};
    pub use crate::domain::Domain;
    pub use crate::error::{FraudError, Result};
    pub use crate::kernel::KernelMetadata;
    pub use crate::logging::{LogConfig, LogLevel};
    pub use crate::registry::{KernelRegistry, RegistryStats};
    pub use crate::traits::{AnalysisKernel, BatchKernel};
    pub use crate::transaction::{AccountId, Transaction};
}
