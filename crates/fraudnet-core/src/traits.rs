//! Core kernel traits.
//!
//! - `AnalysisKernel`: base trait for every kernel
//! - `BatchKernel`: async request/response boundary for kernels that accept
//!   caller-supplied input

use crate::error::Result;
use crate::kernel::KernelMetadata;
use async_trait::async_trait;
use std::fmt::Debug;

/// Base trait for all analysis kernels.
pub trait AnalysisKernel: Send + Sync + Debug {
    /// Returns the kernel metadata.
    fn metadata(&self) -> &KernelMetadata;

    /// Validate kernel configuration.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Returns the kernel ID.
    fn id(&self) -> &str {
        &self.metadata().id
    }
}

/// Trait for batch kernels.
///
/// # Type Parameters
///
/// - `I`: Input type
/// - `O`: Output type
#[async_trait]
pub trait BatchKernel<I, O>: AnalysisKernel
where
    I: Send + Sync,
    O: Send + Sync,
{
    /// Execute the kernel with the given input.
    async fn execute(&self, input: I) -> Result<O>;

    /// Validate the input before execution.
    ///
    /// Override to provide custom input validation.
    fn validate_input(&self, _input: &I) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Domain;
    use crate::error::FraudError;

    #[derive(Debug)]
    struct Doubler {
        metadata: KernelMetadata,
    }

    impl AnalysisKernel for Doubler {
        fn metadata(&self) -> &KernelMetadata {
            &self.metadata
        }
    }

    #[async_trait]
    impl BatchKernel<i64, i64> for Doubler {
        async fn execute(&self, input: i64) -> Result<i64> {
            self.validate_input(&input)?;
            Ok(input * 2)
        }

        fn validate_input(&self, input: &i64) -> Result<()> {
            if *input < 0 {
                return Err(FraudError::validation("negative input"));
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_batch_kernel_execute() {
        let kernel = Doubler {
            metadata: KernelMetadata::batch("pipeline/doubler", Domain::Pipeline),
        };

        assert_eq!(kernel.id(), "pipeline/doubler");
        assert_eq!(kernel.execute(21).await.unwrap(), 42);
        assert!(kernel.execute(-1).await.is_err());
    }
}
