//! Block-level log Bloom filter
//!
//! Folds the contract address and every log topic of a block's transactions
//! into one [`LogBloom`]. Transactions without a contract address contribute
//! nothing, not even their logs.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::hasher::LogHasher;
use super::log_bloom::LogBloom;
use crate::error::FilterError;

/// One event log emitted by a transaction
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Address that emitted the log
    pub address: Vec<u8>,
    /// Indexed topics, in emission order
    pub topics: Vec<Vec<u8>>,
    /// Unindexed payload, never folded into the filter
    pub data: Vec<u8>,
}

impl LogEntry {
    pub fn new(address: impl Into<Vec<u8>>, topics: Vec<Vec<u8>>) -> Self {
        Self {
            address: address.into(),
            topics,
            data: Vec::new(),
        }
    }
}

/// Execution result of one transaction as seen by the filter
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionLogInfo {
    /// Called or created contract; empty for plain transfers
    pub contract_address: Vec<u8>,
    /// Logs emitted during execution
    pub logs: Vec<LogEntry>,
}

impl TransactionLogInfo {
    pub fn new(contract_address: impl Into<Vec<u8>>, logs: Vec<LogEntry>) -> Self {
        Self {
            contract_address: contract_address.into(),
            logs,
        }
    }

    /// Whether this transaction contributes to the block filter
    pub fn has_contract(&self) -> bool {
        !self.contract_address.is_empty()
    }

    /// Addresses and topics this transaction folds into the block filter
    pub fn element_count(&self) -> usize {
        if !self.has_contract() {
            return 0;
        }
        1 + self.logs.iter().map(|log| log.topics.len()).sum::<usize>()
    }
}

/// Aggregate filter for one block
///
/// Returns `None` when no transaction carries a contract address, so callers
/// can tell "no loggable activity" apart from an (improbable) all-zero filter.
pub fn create_block_bloom<H: LogHasher + ?Sized>(
    infos: &[TransactionLogInfo],
    hasher: &H,
) -> Option<LogBloom> {
    let mut block_bloom: Option<LogBloom> = None;

    for info in infos.iter().filter(|info| info.has_contract()) {
        let bloom = block_bloom.get_or_insert_with(LogBloom::empty);

        bloom.union_with(&LogBloom::from_hash(&hasher.hash(&info.contract_address)));
        trace!(address = %hex::encode(&info.contract_address), "Folded contract address");

        for log in &info.logs {
            for topic in &log.topics {
                bloom.union_with(&LogBloom::from_hash(&hasher.hash(topic)));
            }
        }
    }

    block_bloom
}

/// Log filter of a block, as stored alongside its header
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockBloom {
    /// Height of the block
    pub block_height: u64,
    /// Aggregate filter of the block's logs
    pub bloom: LogBloom,
    /// Transactions that carried a contract address
    pub contributing_transactions: u32,
}

impl BlockBloom {
    /// Build the filter record for a block, or `None` without contract activity
    pub fn build<H: LogHasher + ?Sized>(
        block_height: u64,
        infos: &[TransactionLogInfo],
        hasher: &H,
    ) -> Option<Self> {
        let bloom = create_block_bloom(infos, hasher)?;
        let contributing = infos.iter().filter(|info| info.has_contract()).count();

        Some(Self {
            block_height,
            bloom,
            contributing_transactions: u32::try_from(contributing).unwrap_or(u32::MAX),
        })
    }

    /// Check if an address might have emitted or received logs in this block
    pub fn might_contain_address<H: LogHasher + ?Sized>(&self, address: &[u8], hasher: &H) -> bool {
        self.bloom.might_contain(address, hasher)
    }

    /// Check if a topic might appear in this block's logs
    pub fn might_contain_topic<H: LogHasher + ?Sized>(&self, topic: &[u8], hasher: &H) -> bool {
        self.bloom.might_contain(topic, hasher)
    }

    /// Encode for embedding in a larger record
    pub fn to_bytes(&self) -> Result<Vec<u8>, FilterError> {
        bincode::serialize(self).map_err(|e| FilterError::SerializationError(e.to_string()))
    }

    /// Decode a record produced by [`BlockBloom::to_bytes`]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FilterError> {
        bincode::deserialize(bytes).map_err(|e| FilterError::SerializationError(e.to_string()))
    }
}
