//! Subscriber setup for the analysis kernels.
//!
//! Every kernel crate logs under its own target (`fraudnet_graph`,
//! `fraudnet_detect`, ...), one per [`Domain`]. `LogConfig` turns a base level
//! plus per-domain overrides into a single `EnvFilter` directive string, so
//! that e.g. detector hit counts can be traced without drowning in graph
//! stage output.
//!
//! ```rust,ignore
//! use fraudnet_core::{domain::Domain, logging::{LogConfig, LogLevel}};
//!
//! LogConfig::production()
//!     .with_domain_level(Domain::PatternDetection, LogLevel::Debug)
//!     .init()?;
//! ```

use crate::domain::Domain;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Verbosity of a log target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Per-step internals (PageRank iterations, window scans).
    Trace,
    /// Per-stage hit counts.
    Debug,
    /// Batch start and finish.
    #[default]
    Info,
    /// Skipped accounts and non-convergence.
    Warn,
    /// Errors only.
    Error,
}

impl LogLevel {
    /// Directive spelling understood by `EnvFilter`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let level = s.trim().to_ascii_lowercase();
        [
            LogLevel::Trace,
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Warn,
            LogLevel::Error,
        ]
        .into_iter()
        .find(|candidate| candidate.as_str() == level)
        .or_else(|| (level == "warning").then_some(LogLevel::Warn))
        .ok_or_else(|| format!("unknown log level: {}", s))
    }
}

/// `tracing` target the kernels of a domain log under.
#[must_use]
pub const fn domain_target(domain: Domain) -> &'static str {
    match domain {
        Domain::GraphAnalytics => "fraudnet_graph",
        Domain::PatternDetection => "fraudnet_detect",
        Domain::Scoring => "fraudnet_scoring",
        Domain::Pipeline => "fraudnet",
    }
}

/// Subscriber configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Level for every target without an override.
    pub level: LogLevel,
    /// Overrides for individual analysis domains.
    pub domain_levels: HashMap<Domain, LogLevel>,
    /// Emit JSON lines instead of human-readable text.
    pub structured: bool,
    /// Attach file and line to every event.
    pub include_location: bool,
    /// Attach the emitting thread id; useful with the parallel pipeline.
    pub include_thread_ids: bool,
}

impl LogConfig {
    /// Verbose text output with source locations.
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: LogLevel::Debug,
            include_location: true,
            ..Self::default()
        }
    }

    /// JSON output with thread ids; the graph stage is kept at `warn` since
    /// it only reports non-convergence worth reading.
    #[must_use]
    pub fn production() -> Self {
        Self {
            structured: true,
            include_thread_ids: true,
            ..Self::default()
        }
        .with_domain_level(Domain::GraphAnalytics, LogLevel::Warn)
    }

    /// Set the base level.
    #[must_use]
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Override the level of one domain's kernels.
    #[must_use]
    pub fn with_domain_level(mut self, domain: Domain, level: LogLevel) -> Self {
        self.domain_levels.insert(domain, level);
        self
    }

    /// `EnvFilter` directives: the base level followed by one
    /// `target=level` entry per overridden domain, in [`Domain::ALL`] order.
    #[must_use]
    pub fn filter_directives(&self) -> String {
        Domain::ALL
            .iter()
            .filter_map(|domain| {
                self.domain_levels
                    .get(domain)
                    .map(|level| format!("{}={}", domain_target(*domain), level))
            })
            .fold(self.level.to_string(), |mut directives, entry| {
                directives.push(',');
                directives.push_str(&entry);
                directives
            })
    }

    /// Install the global subscriber.
    ///
    /// `RUST_LOG`, when set, replaces the configured directives. A second
    /// call keeps the subscriber installed by the first.
    pub fn init(&self) -> crate::error::Result<()> {
        use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

        let filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::try_new(self.filter_directives()).map_err(|e| {
                crate::error::FraudError::config(format!("invalid log directives: {}", e))
            })?,
        };

        let text = (!self.structured).then(|| {
            fmt::layer()
                .with_thread_ids(self.include_thread_ids)
                .with_file(self.include_location)
                .with_line_number(self.include_location)
        });
        let json = self.structured.then(|| {
            fmt::layer()
                .json()
                .with_thread_ids(self.include_thread_ids)
                .with_file(self.include_location)
                .with_line_number(self.include_location)
        });

        // Already-installed subscriber is not an error.
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(text)
            .with(json)
            .try_init();

        Ok(())
    }
}
