//! Transaction records consumed by every kernel.

use crate::error::{FraudError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque account identifier.
pub type AccountId = String;

/// A validated money transfer between two accounts.
///
/// Records are immutable input: kernels only ever borrow them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Sending account.
    pub sender_id: AccountId,
    /// Receiving account.
    pub receiver_id: AccountId,
    /// Transferred amount (non-negative).
    pub amount: f64,
    /// Instant the transfer happened.
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction.
    pub fn new(
        sender_id: impl Into<AccountId>,
        receiver_id: impl Into<AccountId>,
        amount: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            sender_id: sender_id.into(),
            receiver_id: receiver_id.into(),
            amount,
            timestamp,
        }
    }

    /// Check the record against the input contract of the engine.
    pub fn validate(&self) -> Result<()> {
        if self.sender_id.is_empty() || self.receiver_id.is_empty() {
            return Err(FraudError::validation("account id must not be empty"));
        }
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(FraudError::validation(format!(
                "amount must be a finite non-negative number, got {} ({} -> {})",
                self.amount, self.sender_id, self.receiver_id
            )));
        }
        Ok(())
    }
}

/// Validate every record of a batch, failing on the first bad one.
pub fn validate_batch(transactions: &[Transaction]) -> Result<()> {
    transactions.iter().try_for_each(Transaction::validate)
}
