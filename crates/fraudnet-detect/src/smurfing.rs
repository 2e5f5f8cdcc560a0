//! Fan-in / fan-out smurfing detection kernel.
//!
//! Structuring rings either funnel many small deposits into one aggregator
//! (fan-in) or spray one account's funds across many receivers (fan-out).
//! Both directions are checked twice: once over the whole batch and once
//! inside a rolling time window, so that patterns spread thinly over a long
//! batch and patterns concentrated in a short burst are both caught.

use crate::types::{FanPass, SmurfingResult};
use chrono::{DateTime, Duration, Utc};
use fraudnet_core::{
    domain::Domain,
    kernel::KernelMetadata,
    traits::AnalysisKernel,
    transaction::{AccountId, Transaction},
};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tracing::debug;

/// Default distinct-counterparty threshold.
pub const DEFAULT_FAN_THRESHOLD: usize = 10;

/// Default rolling window.
pub fn default_time_window() -> Duration {
    Duration::hours(72)
}

/// One side of a transfer as seen from the account being evaluated.
pub type Event<'a> = (DateTime<Utc>, &'a str);

/// Smurfing (fan-in / fan-out) detection kernel.
#[derive(Debug, Clone)]
pub struct SmurfingDetector {
    metadata: KernelMetadata,
}

impl Default for SmurfingDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl SmurfingDetector {
    /// Create a new smurfing detection kernel.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: KernelMetadata::batch("detect/smurfing", Domain::PatternDetection)
                .with_description("Global and rolling-window fan-in / fan-out detection"),
        }
    }

    /// Detect fan-in aggregators and fan-out dispersers.
    ///
    /// # Arguments
    /// * `transactions` - Batch to analyze
    /// * `fan_threshold` - Distinct counterparties needed to flag an account
    /// * `time_window` - Width of the rolling window for the temporal pass
    pub fn compute(
        transactions: &[Transaction],
        fan_threshold: usize,
        time_window: Duration,
    ) -> SmurfingResult {
        let mut incoming: BTreeMap<&str, Vec<Event<'_>>> = BTreeMap::new();
        let mut outgoing: BTreeMap<&str, Vec<Event<'_>>> = BTreeMap::new();

        for tx in transactions {
            incoming
                .entry(tx.receiver_id.as_str())
                .or_default()
                .push((tx.timestamp, tx.sender_id.as_str()));
            outgoing
                .entry(tx.sender_id.as_str())
                .or_default()
                .push((tx.timestamp, tx.receiver_id.as_str()));
        }

        let fan_in = Self::flag_accounts(incoming, fan_threshold, time_window, "fan_in");
        let fan_out = Self::flag_accounts(outgoing, fan_threshold, time_window, "fan_out");

        SmurfingResult { fan_in, fan_out }
    }

    fn flag_accounts(
        groups: BTreeMap<&str, Vec<Event<'_>>>,
        threshold: usize,
        window: Duration,
        direction: &str,
    ) -> BTreeSet<AccountId> {
        let mut flagged = BTreeSet::new();
        let (mut global, mut temporal) = (0usize, 0usize);

        for (account, mut events) in groups {
            match Self::classify(&mut events, threshold, window) {
                Some(FanPass::Global) => global += 1,
                Some(FanPass::Temporal) => temporal += 1,
                None => continue,
            }
            flagged.insert(account.to_string());
        }

        debug!(direction, global, temporal, "Smurfing pass complete");
        flagged
    }

    /// Run the global pass, then the temporal pass for accounts the global
    /// pass did not flag.
    fn classify(events: &mut [Event<'_>], threshold: usize, window: Duration) -> Option<FanPass> {
        if Self::distinct_counterparties(events) >= threshold {
            Some(FanPass::Global)
        } else if Self::window_reaches_threshold(events, threshold, window) {
            Some(FanPass::Temporal)
        } else {
            None
        }
    }

    /// Number of distinct counterparties over the whole batch.
    pub fn distinct_counterparties(events: &[Event<'_>]) -> usize {
        events
            .iter()
            .map(|(_, counterparty)| *counterparty)
            .collect::<HashSet<_>>()
            .len()
    }

    /// Slide a `window`-wide window over the events in timestamp order and
    /// report whether the distinct counterparties inside it ever reach
    /// `threshold`. The window at each event covers every event no more than
    /// `window` before it, the event itself included. Scanning stops at the
    /// first hit.
    pub fn window_reaches_threshold(
        events: &mut [Event<'_>],
        threshold: usize,
        window: Duration,
    ) -> bool {
        events.sort_by_key(|(timestamp, _)| *timestamp);

        let mut in_window: HashMap<&str, usize> = HashMap::new();
        let mut left = 0;

        for right in 0..events.len() {
            let (now, counterparty) = events[right];
            *in_window.entry(counterparty).or_insert(0) += 1;

            while left < right && now - events[left].0 > window {
                let evicted = events[left].1;
                if let Some(count) = in_window.get_mut(evicted) {
                    *count -= 1;
                    if *count == 0 {
                        in_window.remove(evicted);
                    }
                }
                left += 1;
            }

            if in_window.len() >= threshold {
                return true;
            }
        }

        false
    }
}

impl AnalysisKernel for SmurfingDetector {
    fn metadata(&self) -> &KernelMetadata {
        &self.metadata
    }
}
