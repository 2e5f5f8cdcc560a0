//! # fraudnet Graph Analytics
//!
//! Graph-structural kernels over a transaction batch.
//!
//! ## Kernels
//! - `GraphBuilder` - weighted directed graph, parallel edges merged
//! - `FlowAggregator` - per-account incoming/outgoing totals and counts
//! - `CycleDetector` - length-bounded simple cycle enumeration
//! - `PageRank` - weighted centrality via power iteration

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builder;
pub mod centrality;
pub mod cycles;
pub mod flow;

// Common graph types
pub mod types;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::builder::*;
    pub use crate::centrality::*;
    pub use crate::cycles::*;
    pub use crate::flow::*;
    pub use crate::types::*;
}

pub use builder::GraphBuilder;
pub use centrality::PageRank;
pub use cycles::CycleDetector;
pub use flow::FlowAggregator;
pub use types::{CentralityResult, Cycle, FlowMap, FlowMetrics, GraphEdge, TransactionGraph};

/// Register all graph kernels with a registry.
pub fn register_all(
    registry: &fraudnet_core::registry::KernelRegistry,
) -> fraudnet_core::error::Result<()> {
    tracing::info!("Registering graph analytics kernels");

    registry.register_from(GraphBuilder::new)?;
    registry.register_from(FlowAggregator::new)?;
    registry.register_from(CycleDetector::new)?;
    registry.register_from(PageRank::new)?;

    tracing::info!("Registered 4 graph analytics kernels");
    Ok(())
}
