//! Configuration for the todo demo.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::types::TodoFilter;
use serde::{Deserialize, Serialize};
use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Mock backend behaviour
    pub api: MockApiConfig,
    /// Seed the mock backend with sample todos
    pub seed_sample_data: bool,
    /// Filter applied to the final listing
    pub filter: TodoFilter,
    /// Log level (trace, debug, info, warn, error), used when `RUST_LOG` is unset
    pub log_level: String,
}

/// Simulated latency and failure injection of the in-memory backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockApiConfig {
    /// Base latency of every call in milliseconds
    pub latency_ms: u64,
    /// Probability in `[0, 1]` that a call rejects
    pub failure_rate: f64,
}

impl MockApiConfig {
    /// No latency and no failures
    #[must_use]
    pub const fn instant() -> Self {
        Self {
            latency_ms: 0,
            failure_rate: 0.0,
        }
    }

    /// Returns a copy with the given failure rate, clamped to `[0, 1]`
    #[must_use]
    pub fn with_failure_rate(mut self, failure_rate: f64) -> Self {
        self.failure_rate = clamp_rate(failure_rate);
        self
    }

    /// Returns a copy with the given base latency
    #[must_use]
    pub const fn with_latency_ms(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }
}

impl Default for MockApiConfig {
    fn default() -> Self {
        Self {
            latency_ms: 300,
            failure_rate: 0.0,
        }
    }
}

/// NaN counts as 0
pub(crate) fn clamp_rate(rate: f64) -> f64 {
    if rate.is_nan() { 0.0 } else { rate.clamp(0.0, 1.0) }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable variables fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = MockApiConfig::default();

        Self {
            api: MockApiConfig {
                latency_ms: lookup("TODO_API_LATENCY_MS")
                    .and_then(|s| s.trim().parse().ok())
                    .unwrap_or(defaults.latency_ms),
                failure_rate: clamp_rate(
                    lookup("TODO_API_FAILURE_RATE")
                        .and_then(|s| s.trim().parse().ok())
                        .unwrap_or(defaults.failure_rate),
                ),
            },
            seed_sample_data: lookup("TODO_SEED_SAMPLE_DATA")
                .and_then(|s| parse_bool(&s))
                .unwrap_or(true),
            filter: lookup("TODO_FILTER")
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            log_level: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
