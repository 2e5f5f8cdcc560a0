//! Detector result types.

use fraudnet_core::transaction::AccountId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Fan-in / fan-out smurfing result.
///
/// The two sets are independent: an account may be an aggregator, a
/// disperser, both, or neither.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmurfingResult {
    /// Aggregators: accounts receiving from many distinct senders.
    pub fan_in: BTreeSet<AccountId>,
    /// Dispersers: accounts sending to many distinct receivers.
    pub fan_out: BTreeSet<AccountId>,
}

impl SmurfingResult {
    /// Returns true if no account was flagged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fan_in.is_empty() && self.fan_out.is_empty()
    }

    /// Returns true if the account is a fan-in aggregator.
    #[must_use]
    pub fn is_fan_in(&self, account: &str) -> bool {
        self.fan_in.contains(account)
    }

    /// Returns true if the account is a fan-out disperser.
    #[must_use]
    pub fn is_fan_out(&self, account: &str) -> bool {
        self.fan_out.contains(account)
    }
}

/// Which pass of a fan detector flagged an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanPass {
    /// Distinct counterparties over the whole batch.
    Global,
    /// Distinct counterparties inside a rolling time window.
    Temporal,
}
