//! Outbound Ports (Driven Ports)
//!
//! Dependencies the log Bloom service needs from the node: the execution
//! results of each block.

use async_trait::async_trait;

use crate::domain::TransactionLogInfo;
use crate::error::DataError;

/// Block log provider (Driven Port)
///
/// Returns only what the filter reads: per transaction, the contract
/// address and the emitted logs, in block order.
#[async_trait]
pub trait BlockLogProvider: Send + Sync {
    /// Get the transaction log infos of a block
    async fn get_transaction_infos(
        &self,
        block_height: u64,
    ) -> Result<Vec<TransactionLogInfo>, DataError>;
}
