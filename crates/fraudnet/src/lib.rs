//! # fraudnet
//!
//! Fraud ring detection over batches of financial transactions.
//!
//! A batch is turned into a weighted transaction graph and per-account flow
//! metrics, scanned by graph-structural kernels (cycles, PageRank) and
//! behavioral detectors (fan-in/fan-out smurfing, shell accounts, velocity
//! bursts, amount outliers), and the signals are fused into a ranked list of
//! suspicious accounts plus cycle-based fraud rings.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fraudnet::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     LogConfig::production()
//!         .with_domain_level(Domain::Scoring, LogLevel::Debug)
//!         .init()?;
//!
//!     let analyzer = FraudAnalyzer::with_config(DetectionConfig::from_env());
//!     let report = analyzer.execute(AnalysisRequest::new(load_batch()?)).await?;
//!
//!     for entry in &report.suspicious_accounts {
//!         println!("{} {:.1} {:?}", entry.account_id, entry.suspicion_score, entry.detected_patterns);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Domain Organization
//!
//! | Domain | Kernels | Crate |
//! |--------|---------|-------|
//! | GraphAnalytics | 4 | `fraudnet-graph` |
//! | PatternDetection | 4 | `fraudnet-detect` |
//! | Scoring | 1 | `fraudnet-scoring` |
//! | Pipeline | 1 | `fraudnet` |

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod pipeline;
pub mod report;

pub use fraudnet_core as core;
pub use fraudnet_detect as detect;
pub use fraudnet_graph as graph;
pub use fraudnet_scoring as scoring;

pub use pipeline::FraudAnalyzer;
pub use report::{AnalysisReport, AnalysisRequest, AnalysisSummary};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use fraudnet_core::prelude::*;
    pub use fraudnet_scoring::types::{FraudRing, PatternTag, SuspiciousAccount};

    pub use crate::pipeline::FraudAnalyzer;
    pub use crate::report::{AnalysisReport, AnalysisRequest, AnalysisSummary};
}

/// Version information.
pub mod version {
    /// Crate version.
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
}

/// Kernel catalog providing an overview of all available kernels.
pub mod catalog {
    use fraudnet_core::domain::Domain;

    /// Domain information.
    #[derive(Debug, Clone)]
    pub struct DomainInfo {
        /// Domain enum value.
        pub domain: Domain,
        /// Human-readable name.
        pub name: &'static str,
        /// Description.
        pub description: &'static str,
        /// Number of kernels.
        pub kernel_count: usize,
    }

    /// Get all domain information.
    pub fn domains() -> Vec<DomainInfo> {
        vec![
            DomainInfo {
                domain: Domain::GraphAnalytics,
                name: "Graph Analytics",
                description: "Graph construction, flow metrics, cycle enumeration, PageRank",
                kernel_count: 4,
            },
            DomainInfo {
                domain: Domain::PatternDetection,
                name: "Pattern Detection",
                description: "Fan-in/fan-out smurfing, shell accounts, velocity, amount anomalies",
                kernel_count: 4,
            },
            DomainInfo {
                domain: Domain::Scoring,
                name: "Scoring",
                description: "Fraud ring construction and suspicion score fusion",
                kernel_count: 1,
            },
            DomainInfo {
                domain: Domain::Pipeline,
                name: "Pipeline",
                description: "End-to-end batch analysis",
                kernel_count: 1,
            },
        ]
    }

    /// Get total kernel count across all domains.
    pub fn total_kernel_count() -> usize {
        domains().iter().map(|d| d.kernel_count).sum()
    }
}

/// Register every kernel into a registry.
///
/// # Errors
///
/// Returns an error if any kernel registration fails.
pub fn register_all(
    registry: &fraudnet_core::registry::KernelRegistry,
) -> fraudnet_core::error::Result<()> {
    fraudnet_graph::register_all(registry)?;
    fraudnet_detect::register_all(registry)?;
    fraudnet_scoring::register_all(registry)?;
    registry.register_from(FraudAnalyzer::new)?;
    Ok(())
}
