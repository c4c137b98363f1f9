//! Metrics hooks for log Bloom operations
//!
//! Counts filters built, elements hashed, cache efficiency and query
//! outcomes.
//!
//! ## Usage
//!
//! ```ignore
//! use log_bloom::metrics::{Metrics, MetricsRecorder};
//!
//! let metrics = Metrics::new();
//!
//! let start = std::time::Instant::now();
//! let bloom = create_block_bloom(&infos, &Keccak256Hasher);
//! metrics.record_block_built(start.elapsed(), elements, bloom.is_some());
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Metrics collector for log Bloom operations
///
/// Thread-safe counters for monitoring filter construction and queries.
#[derive(Default)]
pub struct Metrics {
    /// Block filters built
    pub blooms_built: AtomicU64,
    /// Blocks aggregated without any contract activity
    pub blocks_without_activity: AtomicU64,
    /// Addresses and topics hashed into block filters
    pub elements_hashed: AtomicU64,
    /// Block filter cache hits
    pub cache_hits: AtomicU64,
    /// Block filter cache misses
    pub cache_misses: AtomicU64,
    /// Block queries evaluated
    pub queries_evaluated: AtomicU64,
    /// Block queries that may match
    pub queries_matched: AtomicU64,
    /// Cumulative aggregation time in nanoseconds
    pub build_time_ns: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one block aggregation
    ///
    /// # Arguments
    /// * `duration` - Time taken to aggregate the block
    /// * `elements` - Addresses and topics hashed
    /// * `produced` - Whether a filter came out (false for no activity)
    pub fn record_block_built(&self, duration: Duration, elements: usize, produced: bool) {
        if produced {
            self.blooms_built.fetch_add(1, Ordering::Relaxed);
        } else {
            self.blocks_without_activity.fetch_add(1, Ordering::Relaxed);
        }
        self.elements_hashed
            .fetch_add(elements as u64, Ordering::Relaxed);
        self.build_time_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
    }

    pub fn record_cache_lookup(&self, hit: bool) {
        if hit {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.cache_misses.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a block query and whether the block may match
    pub fn record_query(&self, matched: bool) {
        self.queries_evaluated.fetch_add(1, Ordering::Relaxed);
        if matched {
            self.queries_matched.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            blooms_built: self.blooms_built.load(Ordering::Relaxed),
            blocks_without_activity: self.blocks_without_activity.load(Ordering::Relaxed),
            elements_hashed: self.elements_hashed.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            queries_evaluated: self.queries_evaluated.load(Ordering::Relaxed),
            queries_matched: self.queries_matched.load(Ordering::Relaxed),
            avg_build_ns: self.avg_build_time_ns(),
        }
    }

    /// Average aggregation time over all blocks, with or without activity
    pub fn avg_build_time_ns(&self) -> u64 {
        let total = self.build_time_ns.load(Ordering::Relaxed);
        let count = self.blooms_built.load(Ordering::Relaxed)
            + self.blocks_without_activity.load(Ordering::Relaxed);
        if count > 0 {
            total / count
        } else {
            0
        }
    }

    /// Fraction of cache lookups served from memory
    pub fn cache_hit_rate(&self) -> f64 {
        let hits = self.cache_hits.load(Ordering::Relaxed);
        let total = hits + self.cache_misses.load(Ordering::Relaxed);
        if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        }
    }

    /// Observed match rate of block queries
    ///
    /// Includes both true and false positives.
    pub fn observed_match_rate(&self) -> f64 {
        let total = self.queries_evaluated.load(Ordering::Relaxed);
        let matched = self.queries_matched.load(Ordering::Relaxed);
        if total > 0 {
            matched as f64 / total as f64
        } else {
            0.0
        }
    }

    /// Reset all counters
    pub fn reset(&self) {
        self.blooms_built.store(0, Ordering::Relaxed);
        self.blocks_without_activity.store(0, Ordering::Relaxed);
        self.elements_hashed.store(0, Ordering::Relaxed);
        self.cache_hits.store(0, Ordering::Relaxed);
        self.cache_misses.store(0, Ordering::Relaxed);
        self.queries_evaluated.store(0, Ordering::Relaxed);
        self.queries_matched.store(0, Ordering::Relaxed);
        self.build_time_ns.store(0, Ordering::Relaxed);
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub blooms_built: u64,
    pub blocks_without_activity: u64,
    pub elements_hashed: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub queries_evaluated: u64,
    pub queries_matched: u64,
    pub avg_build_ns: u64,
}

/// Trait for custom metrics recording implementations
///
/// Implement this trait to forward to Prometheus, StatsD or OpenTelemetry.
pub trait MetricsRecorder: Send + Sync {
    fn record_block_built(&self, duration: Duration, elements: usize, produced: bool);

    fn record_cache_lookup(&self, hit: bool);

    fn record_query(&self, matched: bool);
}

/// No-op metrics recorder for when metrics are disabled
#[derive(Default)]
pub struct NoOpMetrics;

impl MetricsRecorder for NoOpMetrics {
    fn record_block_built(&self, _: Duration, _: usize, _: bool) {}
    fn record_cache_lookup(&self, _: bool) {}
    fn record_query(&self, _: bool) {}
}

impl MetricsRecorder for Metrics {
    fn record_block_built(&self, duration: Duration, elements: usize, produced: bool) {
        Metrics::record_block_built(self, duration, elements, produced);
    }

    fn record_cache_lookup(&self, hit: bool) {
        Metrics::record_cache_lookup(self, hit);
    }

    fn record_query(&self, matched: bool) {
        Metrics::record_query(self, matched);
    }
}
