//! Inbound Ports (Driving Ports)
//!
//! The API that callers (block producers, RPC handlers, light clients) use
//! to build and query block log filters.

use async_trait::async_trait;

use crate::domain::{CompiledQuery, LogBloom, LogQuery, TransactionLogInfo};
use crate::error::FilterError;

/// Primary log Bloom API (Driving Port)
#[async_trait]
pub trait LogBloomApi: Send + Sync {
    /// Aggregate a block's transaction log infos into one filter
    ///
    /// `None` when no transaction has a contract address.
    fn build_block_bloom(&self, infos: &[TransactionLogInfo]) -> Option<LogBloom>;

    /// Filter of the block at `block_height`, fetched through the provider
    /// unless cached
    async fn block_bloom(&self, block_height: u64) -> Result<Option<LogBloom>, FilterError>;

    /// Validate a query and hash its elements
    fn compile_query(&self, query: &LogQuery) -> Result<CompiledQuery, FilterError>;

    /// Whether the block at `block_height` may hold logs matching `query`
    ///
    /// False positives are possible, false negatives are not.
    async fn block_might_match(
        &self,
        block_height: u64,
        query: &CompiledQuery,
    ) -> Result<bool, FilterError>;
}
