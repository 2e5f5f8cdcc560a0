//! Kernel registry.
//!
//! The registry records the metadata of every kernel a crate provides so that
//! callers can discover what the engine runs. Each domain crate exposes a
//! `register_all` function that fills a registry.

use crate::domain::Domain;
use crate::error::{FraudError, Result};
use crate::kernel::KernelMetadata;
use crate::traits::AnalysisKernel;
use hashbrown::HashMap;
use std::sync::RwLock;
use tracing::debug;

/// Registry statistics.
#[derive(Debug, Clone, Default)]
pub struct RegistryStats {
    /// Total number of registered kernels.
    pub total: usize,
    /// Kernels by domain.
    pub by_domain: HashMap<Domain, usize>,
}

/// Central registry for kernel metadata.
#[derive(Debug, Default)]
pub struct KernelRegistry {
    kernels: RwLock<HashMap<String, KernelMetadata>>,
}

impl KernelRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register kernel metadata. Duplicate ids are rejected.
    pub fn register_metadata(&self, metadata: KernelMetadata) -> Result<()> {
        let mut kernels = self
            .kernels
            .write()
            .map_err(|_| FraudError::internal("kernel registry lock poisoned"))?;

        if kernels.contains_key(&metadata.id) {
            return Err(FraudError::KernelAlreadyRegistered(metadata.id));
        }

        debug!(kernel_id = %metadata.id, domain = %metadata.domain, "Registering kernel");
        kernels.insert(metadata.id.clone(), metadata);
        Ok(())
    }

    /// Register the metadata of a kernel built by `factory`.
    pub fn register_from<K, F>(&self, factory: F) -> Result<()>
    where
        K: AnalysisKernel,
        F: FnOnce() -> K,
    {
        self.register_metadata(factory().metadata().clone())
    }

    /// Get kernel metadata by ID.
    pub fn get(&self, id: &str) -> Result<KernelMetadata> {
        let kernels = self
            .kernels
            .read()
            .map_err(|_| FraudError::internal("kernel registry lock poisoned"))?;
        kernels.get(id).cloned().ok_or_else(|| FraudError::not_found(id))
    }

    /// Check if a kernel exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.kernels
            .read()
            .map(|kernels| kernels.contains_key(id))
            .unwrap_or(false)
    }

    /// All kernel IDs, sorted.
    #[must_use]
    pub fn all_kernel_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .kernels
            .read()
            .map(|kernels| kernels.keys().cloned().collect())
            .unwrap_or_default();
        ids.sort();
        ids
    }

    /// Kernels of a domain, sorted by id.
    #[must_use]
    pub fn by_domain(&self, domain: Domain) -> Vec<KernelMetadata> {
        let mut result: Vec<KernelMetadata> = self
            .kernels
            .read()
            .map(|kernels| {
                kernels
                    .values()
                    .filter(|m| m.domain == domain)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        result.sort_by(|a, b| a.id.cmp(&b.id));
        result
    }

    /// Get registry statistics.
    #[must_use]
    pub fn stats(&self) -> RegistryStats {
        let Ok(kernels) = self.kernels.read() else {
            return RegistryStats::default();
        };

        let mut by_domain: HashMap<Domain, usize> = HashMap::new();
        for metadata in kernels.values() {
            *by_domain.entry(metadata.domain).or_default() += 1;
        }

        RegistryStats {
            total: kernels.len(),
            by_domain,
        }
    }

    /// Total number of registered kernels.
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.kernels.read().map(|k| k.len()).unwrap_or(0)
    }
}
