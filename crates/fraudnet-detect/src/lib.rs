//! # fraudnet Pattern Detection
//!
//! Behavioral detectors that work directly on the transaction batch.
//!
//! ## Kernels
//! - `SmurfingDetector` - fan-in aggregators and fan-out dispersers
//! - `ShellAccountDetector` - low-activity pass-through accounts
//! - `VelocityDetector` - bursts of outgoing transfers
//! - `AmountAnomalyDetector` - z-score outliers on amounts

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod anomaly;
pub mod shell;
pub mod smurfing;
pub mod types;
pub mod velocity;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::anomaly::*;
    pub use crate::shell::*;
    pub use crate::smurfing::*;
    pub use crate::types::*;
    pub use crate::velocity::*;
}

pub use anomaly::AmountAnomalyDetector;
pub use shell::ShellAccountDetector;
pub use smurfing::SmurfingDetector;
pub use types::{FanPass, SmurfingResult};
pub use velocity::VelocityDetector;

/// Register all pattern detection kernels with a registry.
pub fn register_all(
    registry: &fraudnet_core::registry::KernelRegistry,
) -> fraudnet_core::error::Result<()> {
    tracing::info!("Registering pattern detection kernels");

    registry.register_from(SmurfingDetector::new)?;
    registry.register_from(ShellAccountDetector::new)?;
    registry.register_from(VelocityDetector::new)?;
    registry.register_from(AmountAnomalyDetector::new)?;

    tracing::info!("Registered 4 pattern detection kernels");
    Ok(())
}
