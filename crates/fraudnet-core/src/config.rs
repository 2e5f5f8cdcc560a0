//! Detection configuration.
//!
//! Every detector threshold is independently overridable. Configuration can be
//! built programmatically, loaded from a TOML/JSON file, or overridden from
//! `FRAUDNET_*` environment variables.
//!
//! # Example
//!
//! ```rust,ignore
//! use fraudnet_core::config::DetectionConfig;
//!
//! let config = DetectionConfig::builder()
//!     .fan_threshold(5)
//!     .velocity_window_hours(24)
//!     .build()?;
//! ```

use crate::error::{FraudError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const HOUR: u64 = 3600;

/// Thresholds for every detector and for the centrality computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Shortest cycle reported by the cycle detector.
    pub cycle_min_length: usize,
    /// Longest cycle reported by the cycle detector.
    pub cycle_max_length: usize,
    /// Distinct counterparties needed to flag fan-in / fan-out.
    pub fan_threshold: usize,
    /// Rolling window for temporal fan-in / fan-out.
    #[serde(with = "duration_secs")]
    pub fan_time_window: Duration,
    /// Maximum total transactions for a shell account.
    pub shell_max_transactions: usize,
    /// Rolling window for velocity bursts.
    #[serde(with = "duration_secs")]
    pub velocity_window: Duration,
    /// Transactions within the window needed to flag a burst.
    pub velocity_threshold: usize,
    /// One-sided z-score threshold for amount anomalies.
    pub z_threshold: f64,
    /// PageRank damping factor.
    pub pagerank_damping: f64,
    /// PageRank iteration cap.
    pub pagerank_max_iterations: u32,
    /// PageRank per-node convergence tolerance.
    pub pagerank_tolerance: f64,
    /// Run independent kernels as concurrent tasks on the async path.
    pub parallel: bool,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            cycle_min_length: 3,
            cycle_max_length: 5,
            fan_threshold: 10,
            fan_time_window: Duration::from_secs(72 * HOUR),
            shell_max_transactions: 3,
            velocity_window: Duration::from_secs(72 * HOUR),
            velocity_threshold: 4,
            z_threshold: 2.0,
            pagerank_damping: 0.85,
            pagerank_max_iterations: 100,
            pagerank_tolerance: 1.0e-6,
            parallel: false,
        }
    }
}

impl DetectionConfig {
    /// Tighter thresholds for high-risk portfolios.
    pub fn strict() -> Self {
        Self {
            cycle_max_length: 6,
            fan_threshold: 5,
            shell_max_transactions: 4,
            velocity_threshold: 3,
            z_threshold: 1.5,
            ..Self::default()
        }
    }

    /// Create a builder starting from the defaults.
    pub fn builder() -> DetectionConfigBuilder {
        DetectionConfigBuilder::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Unset or malformed variables keep their default value.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup (`FRAUDNET_*` keys).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        fn parse<T: std::str::FromStr>(value: Option<String>, current: T) -> T {
            value.and_then(|v| v.trim().parse().ok()).unwrap_or(current)
        }

        config.cycle_min_length = parse(lookup("FRAUDNET_CYCLE_MIN_LENGTH"), config.cycle_min_length);
        config.cycle_max_length = parse(lookup("FRAUDNET_CYCLE_MAX_LENGTH"), config.cycle_max_length);
        config.fan_threshold = parse(lookup("FRAUDNET_FAN_THRESHOLD"), config.fan_threshold);
        config.fan_time_window =
            parse_hours(lookup("FRAUDNET_FAN_WINDOW_HOURS")).unwrap_or(config.fan_time_window);
        config.shell_max_transactions = parse(
            lookup("FRAUDNET_SHELL_MAX_TRANSACTIONS"),
            config.shell_max_transactions,
        );
        config.velocity_window =
            parse_hours(lookup("FRAUDNET_VELOCITY_WINDOW_HOURS")).unwrap_or(config.velocity_window);
        config.velocity_threshold =
            parse(lookup("FRAUDNET_VELOCITY_THRESHOLD"), config.velocity_threshold);
        config.z_threshold = parse(lookup("FRAUDNET_Z_THRESHOLD"), config.z_threshold);
        config.pagerank_damping = parse(lookup("FRAUDNET_PAGERANK_DAMPING"), config.pagerank_damping);
        config.pagerank_max_iterations = parse(
            lookup("FRAUDNET_PAGERANK_MAX_ITERATIONS"),
            config.pagerank_max_iterations,
        );
        config.pagerank_tolerance =
            parse(lookup("FRAUDNET_PAGERANK_TOLERANCE"), config.pagerank_tolerance);
        config.parallel = parse(lookup("FRAUDNET_PARALLEL"), config.parallel);

        config
    }

    /// Load configuration from a TOML or JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| FraudError::config(format!("Failed to read config: {}", e)))?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");
        let config: Self = match ext {
            "json" => serde_json::from_str(&contents)
                .map_err(|e| FraudError::config(format!("Failed to parse config: {}", e)))?,
            "toml" => toml::from_str(&contents)
                .map_err(|e| FraudError::config(format!("Failed to parse config: {}", e)))?,
            other => {
                return Err(FraudError::config(format!(
                    "Unsupported config format: {}",
                    other
                )))
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| FraudError::config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.cycle_min_length == 0 {
            return Err(FraudError::config("cycle_min_length must be > 0"));
        }
        if self.cycle_min_length > self.cycle_max_length {
            return Err(FraudError::config(format!(
                "cycle_min_length ({}) must not exceed cycle_max_length ({})",
                self.cycle_min_length, self.cycle_max_length
            )));
        }
        if self.fan_threshold == 0 {
            return Err(FraudError::config("fan_threshold must be > 0"));
        }
        if self.velocity_threshold == 0 {
            return Err(FraudError::config("velocity_threshold must be > 0"));
        }
        if self.fan_time_window.is_zero() || self.velocity_window.is_zero() {
            return Err(FraudError::config("time windows must be > 0"));
        }
        if !self.z_threshold.is_finite() || self.z_threshold < 0.0 {
            return Err(FraudError::config("z_threshold must be finite and >= 0"));
        }
        if !(self.pagerank_damping > 0.0 && self.pagerank_damping < 1.0) {
            return Err(FraudError::config("pagerank_damping must be in (0, 1)"));
        }
        if self.pagerank_max_iterations == 0 {
            return Err(FraudError::config("pagerank_max_iterations must be > 0"));
        }
        if !(self.pagerank_tolerance > 0.0) {
            return Err(FraudError::config("pagerank_tolerance must be > 0"));
        }
        Ok(())
    }

    /// Fan window as a timestamp delta.
    pub fn fan_window_delta(&self) -> chrono::Duration {
        to_delta(self.fan_time_window)
    }

    /// Velocity window as a timestamp delta.
    pub fn velocity_window_delta(&self) -> chrono::Duration {
        to_delta(self.velocity_window)
    }
}

/// Whole hours from an override value; `None` if malformed or too large.
fn parse_hours(value: Option<String>) -> Option<Duration> {
    let hours: u64 = value?.trim().parse().ok()?;
    hours.checked_mul(HOUR).map(Duration::from_secs)
}

fn hours_saturating(hours: u64) -> Duration {
    Duration::from_secs(hours.saturating_mul(HOUR))
}

fn to_delta(duration: Duration) -> chrono::Duration {
    chrono::Duration::from_std(duration).unwrap_or(chrono::Duration::MAX)
}

/// Configuration builder.
#[derive(Debug, Default)]
pub struct DetectionConfigBuilder {
    config: DetectionConfig,
}

impl DetectionConfigBuilder {
    /// Start from the strict preset.
    pub fn strict() -> Self {
        Self {
            config: DetectionConfig::strict(),
        }
    }

    /// Set the cycle length window.
    pub fn cycle_length(mut self, min: usize, max: usize) -> Self {
        self.config.cycle_min_length = min;
        self.config.cycle_max_length = max;
        self
    }

    /// Set the fan-in / fan-out threshold.
    pub fn fan_threshold(mut self, threshold: usize) -> Self {
        self.config.fan_threshold = threshold;
        self
    }

    /// Set the temporal fan window in hours.
    pub fn fan_window_hours(mut self, hours: u64) -> Self {
        self.config.fan_time_window = hours_saturating(hours);
        self
    }

    /// Set the shell account transaction cap.
    pub fn shell_max_transactions(mut self, max: usize) -> Self {
        self.config.shell_max_transactions = max;
        self
    }

    /// Set the velocity window in hours.
    pub fn velocity_window_hours(mut self, hours: u64) -> Self {
        self.config.velocity_window = hours_saturating(hours);
        self
    }

    /// Set the velocity window.
    pub fn velocity_window(mut self, window: Duration) -> Self {
        self.config.velocity_window = window;
        self
    }

    /// Set the velocity burst threshold.
    pub fn velocity_threshold(mut self, threshold: usize) -> Self {
        self.config.velocity_threshold = threshold;
        self
    }

    /// Set the amount anomaly z-score threshold.
    pub fn z_threshold(mut self, z: f64) -> Self {
        self.config.z_threshold = z;
        self
    }

    /// Set PageRank parameters.
    pub fn pagerank(mut self, damping: f64, max_iterations: u32, tolerance: f64) -> Self {
        self.config.pagerank_damping = damping;
        self.config.pagerank_max_iterations = max_iterations;
        self.config.pagerank_tolerance = tolerance;
        self
    }

    /// Run independent kernels concurrently on the async path.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> Result<DetectionConfig> {
        self.config.validate()?;
        Ok(self.config)
    }

    /// Build without validation.
    pub fn build_unchecked(self) -> DetectionConfig {
        self.config
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
