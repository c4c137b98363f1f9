//! Log Bloom Service
//!
//! Orchestrates block aggregation, caching and query evaluation on top of an
//! injected block log provider.

use async_trait::async_trait;
use lru::LruCache;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::domain::{
    create_block_bloom, CompiledQuery, Keccak256Hasher, LogBloom, LogBloomConfig, LogHasher,
    LogQuery, TransactionLogInfo,
};
use crate::error::{DataError, FilterError};
use crate::metrics::{MetricsRecorder, NoOpMetrics};
use crate::ports::{BlockLogProvider, LogBloomApi};

/// Log Bloom Service implementation
///
/// Implements the `LogBloomApi` port using injected dependencies. Block
/// filters, including the absence of one, are cached per height.
pub struct LogBloomService<P: BlockLogProvider, H: LogHasher = Keccak256Hasher> {
    /// Block log provider (driven port)
    provider: Arc<P>,
    /// Digest applied to addresses and topics
    hasher: H,
    config: LogBloomConfig,
    /// Recently built block filters by height
    cache: Mutex<LruCache<u64, Option<LogBloom>>>,
    metrics: Arc<dyn MetricsRecorder>,
}

impl<P: BlockLogProvider> LogBloomService<P> {
    /// Create a service with Keccak-256 and the default configuration
    pub fn new(provider: Arc<P>) -> Self {
        Self::assemble(provider, Keccak256Hasher, LogBloomConfig::default())
    }

    /// Create with a custom configuration
    pub fn with_config(provider: Arc<P>, config: LogBloomConfig) -> Result<Self, FilterError> {
        Self::with_hasher(provider, Keccak256Hasher, config)
    }
}

impl<P: BlockLogProvider, H: LogHasher> LogBloomService<P, H> {
    /// Create with a custom digest function and configuration
    pub fn with_hasher(
        provider: Arc<P>,
        hasher: H,
        config: LogBloomConfig,
    ) -> Result<Self, FilterError> {
        config.validate()?;
        Ok(Self::assemble(provider, hasher, config))
    }

    fn assemble(provider: Arc<P>, hasher: H, config: LogBloomConfig) -> Self {
        let cache = Mutex::new(LruCache::new(config.cache_size()));
        Self {
            provider,
            hasher,
            config,
            cache,
            metrics: Arc::new(NoOpMetrics),
        }
    }

    /// Report to a metrics recorder instead of discarding measurements
    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsRecorder>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn config(&self) -> &LogBloomConfig {
        &self.config
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Forget the cached filter of a block, e.g. after a reorg
    pub async fn invalidate(&self, block_height: u64) -> bool {
        let removed = self.cache.lock().await.pop(&block_height).is_some();
        if removed {
            debug!(block_height = block_height, "Invalidated cached block filter");
        }
        removed
    }

    /// Number of blocks currently cached
    pub async fn cached_blocks(&self) -> usize {
        self.cache.lock().await.len()
    }

    async fn fetch_transaction_infos(
        &self,
        block_height: u64,
    ) -> Result<Vec<TransactionLogInfo>, DataError> {
        let deadline = self.config.provider_timeout();
        match timeout(deadline, self.provider.get_transaction_infos(block_height)).await {
            Ok(Ok(infos)) => Ok(infos),
            Ok(Err(e)) => {
                warn!(block_height = block_height, error = %e, "Block log provider failed");
                Err(e)
            }
            Err(_) => {
                warn!(
                    block_height = block_height,
                    timeout_ms = self.config.provider_timeout_ms,
                    "Block log provider timed out"
                );
                Err(DataError::Timeout)
            }
        }
    }
}

#[async_trait]
impl<P, H> LogBloomApi for LogBloomService<P, H>
where
    P: BlockLogProvider + 'static,
    H: LogHasher + 'static,
{
    fn build_block_bloom(&self, infos: &[TransactionLogInfo]) -> Option<LogBloom> {
        let start = Instant::now();
        let bloom = create_block_bloom(infos, &self.hasher);
        let elements = infos.iter().map(TransactionLogInfo::element_count).sum();

        self.metrics
            .record_block_built(start.elapsed(), elements, bloom.is_some());
        bloom
    }

    async fn block_bloom(&self, block_height: u64) -> Result<Option<LogBloom>, FilterError> {
        let cached = self.cache.lock().await.get(&block_height).cloned();
        self.metrics.record_cache_lookup(cached.is_some());
        if let Some(bloom) = cached {
            debug!(block_height = block_height, "Cache hit for block filter");
            return Ok(bloom);
        }

        let infos = self.fetch_transaction_infos(block_height).await?;
        let bloom = self.build_block_bloom(&infos);
        debug!(
            block_height = block_height,
            transactions = infos.len(),
            bits_set = bloom.as_ref().map_or(0, LogBloom::count_ones),
            "Built block filter"
        );

        self.cache.lock().await.put(block_height, bloom.clone());
        Ok(bloom)
    }

    fn compile_query(&self, query: &LogQuery) -> Result<CompiledQuery, FilterError> {
        let compiled = query.compile(&self.config, &self.hasher)?;
        debug!(
            addresses = query.addresses.len(),
            topic_positions = query.topics.len(),
            rows = compiled.row_count(),
            "Compiled log query"
        );
        Ok(compiled)
    }

    async fn block_might_match(
        &self,
        block_height: u64,
        query: &CompiledQuery,
    ) -> Result<bool, FilterError> {
        let matched = if query.is_wildcard() {
            true
        } else {
            let bloom = self.block_bloom(block_height).await?;
            query.matches_block(bloom.as_ref())
        };

        self.metrics.record_query(matched);
        Ok(matched)
    }
}
