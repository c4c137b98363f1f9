//! Log Bloom service configuration and validation
//!
//! The filter itself has no tunables: width, bits per element and the digest
//! prefix are fixed constants. Configuration covers the service around it.
//!
//! # Example
//!
//! ```ignore
//! use log_bloom::domain::LogBloomConfigBuilder;
//!
//! let config = LogBloomConfigBuilder::new()
//!     .cache_capacity(512)
//!     .provider_timeout_ms(5_000)
//!     .build()
//!     .expect("Valid config");
//! ```

use std::num::NonZeroUsize;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::FilterError;

/// Upper bound accepted for `max_query_addresses`
pub const MAX_QUERY_ADDRESSES_LIMIT: usize = 10_000;

/// An event carries at most four indexed topics
pub const MAX_TOPIC_POSITIONS: usize = 4;

/// Log Bloom service configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogBloomConfig {
    /// Block filters kept in the LRU cache
    pub cache_capacity: usize,
    /// Deadline for one block log provider call
    pub provider_timeout_ms: u64,
    /// Addresses accepted in one query
    pub max_query_addresses: usize,
    /// Topic positions accepted in one query
    pub max_topic_positions: usize,
    /// Alternatives accepted per topic position
    pub max_topic_alternatives: usize,
}

impl Default for LogBloomConfig {
    fn default() -> Self {
        Self {
            cache_capacity: 256,
            provider_timeout_ms: 30_000,
            max_query_addresses: 1_000,
            max_topic_positions: MAX_TOPIC_POSITIONS,
            max_topic_alternatives: 1_000,
        }
    }
}

impl LogBloomConfig {
    /// Load and validate a configuration from JSON; missing fields use defaults
    pub fn from_json(json: &str) -> Result<Self, FilterError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| FilterError::InvalidParameters(format!("config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), FilterError> {
        if self.cache_capacity == 0 {
            return Err(FilterError::InvalidParameters(
                "cache_capacity cannot be 0".to_string(),
            ));
        }

        if self.provider_timeout_ms == 0 {
            return Err(FilterError::InvalidParameters(
                "provider_timeout_ms cannot be 0".to_string(),
            ));
        }

        if self.max_query_addresses == 0 || self.max_query_addresses > MAX_QUERY_ADDRESSES_LIMIT {
            return Err(FilterError::InvalidParameters(format!(
                "max_query_addresses must be between 1 and {}",
                MAX_QUERY_ADDRESSES_LIMIT
            )));
        }

        if self.max_topic_positions == 0 || self.max_topic_positions > MAX_TOPIC_POSITIONS {
            return Err(FilterError::InvalidParameters(format!(
                "max_topic_positions must be between 1 and {}",
                MAX_TOPIC_POSITIONS
            )));
        }

        if self.max_topic_alternatives == 0 {
            return Err(FilterError::InvalidParameters(
                "max_topic_alternatives cannot be 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_millis(self.provider_timeout_ms)
    }

    /// Cache capacity, clamped to at least one entry
    pub fn cache_size(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.cache_capacity).unwrap_or(NonZeroUsize::MIN)
    }

    /// Builder-style method to set the cache capacity
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Builder-style method to set the provider timeout
    pub fn with_provider_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.provider_timeout_ms = timeout_ms;
        self
    }
}

/// Builder for LogBloomConfig with validation
#[derive(Default)]
pub struct LogBloomConfigBuilder {
    cache_capacity: Option<usize>,
    provider_timeout_ms: Option<u64>,
    max_query_addresses: Option<usize>,
    max_topic_positions: Option<usize>,
    max_topic_alternatives: Option<usize>,
}

impl LogBloomConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of block filters kept in memory
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = Some(capacity);
        self
    }

    /// Set the provider deadline in milliseconds
    pub fn provider_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.provider_timeout_ms = Some(timeout_ms);
        self
    }

    /// Set the maximum number of addresses per query
    pub fn max_query_addresses(mut self, max: usize) -> Self {
        self.max_query_addresses = Some(max);
        self
    }

    /// Set the maximum number of topic positions per query (1-4)
    pub fn max_topic_positions(mut self, max: usize) -> Self {
        self.max_topic_positions = Some(max);
        self
    }

    /// Set the maximum number of alternatives per topic position
    pub fn max_topic_alternatives(mut self, max: usize) -> Self {
        self.max_topic_alternatives = Some(max);
        self
    }

    /// Build the LogBloomConfig, validating all parameters
    pub fn build(self) -> Result<LogBloomConfig, FilterError> {
        let config = self.build_unchecked();
        config.validate()?;
        Ok(config)
    }

    /// Build without validation (for internal use only)
    pub fn build_unchecked(self) -> LogBloomConfig {
        let defaults = LogBloomConfig::default();

        LogBloomConfig {
            cache_capacity: self.cache_capacity.unwrap_or(defaults.cache_capacity),
            provider_timeout_ms: self
                .provider_timeout_ms
                .unwrap_or(defaults.provider_timeout_ms),
            max_query_addresses: self
                .max_query_addresses
                .unwrap_or(defaults.max_query_addresses),
            max_topic_positions: self
                .max_topic_positions
                .unwrap_or(defaults.max_topic_positions),
            max_topic_alternatives: self
                .max_topic_alternatives
                .unwrap_or(defaults.max_topic_alternatives),
        }
    }
}
