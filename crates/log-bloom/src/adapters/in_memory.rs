//! In-memory block log provider
//!
//! Holds transaction log infos keyed by block height. Used by embedders that
//! already have execution results at hand, and by tests.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::TransactionLogInfo;
use crate::error::DataError;
use crate::ports::BlockLogProvider;

/// Block log provider backed by a map of block height to log infos
#[derive(Default)]
pub struct InMemoryLogProvider {
    blocks: RwLock<HashMap<u64, Vec<TransactionLogInfo>>>,
}

impl InMemoryLogProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store (or replace) the log infos of a block
    pub async fn insert_block(&self, block_height: u64, infos: Vec<TransactionLogInfo>) {
        let mut blocks = self.blocks.write().await;
        if blocks.insert(block_height, infos).is_some() {
            debug!(block_height = block_height, "Replaced block log infos");
        }
    }

    /// Drop a block, returning its log infos if it was stored
    pub async fn remove_block(&self, block_height: u64) -> Option<Vec<TransactionLogInfo>> {
        self.blocks.write().await.remove(&block_height)
    }

    pub async fn block_count(&self) -> usize {
        self.blocks.read().await.len()
    }
}

#[async_trait]
impl BlockLogProvider for InMemoryLogProvider {
    async fn get_transaction_infos(
        &self,
        block_height: u64,
    ) -> Result<Vec<TransactionLogInfo>, DataError> {
        let blocks = self.blocks.read().await;
        blocks
            .get(&block_height)
            .cloned()
            .ok_or(DataError::BlockNotFound {
                height: block_height,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_block_returns_not_found() {
        let provider = InMemoryLogProvider::new();

        let result = provider.get_transaction_infos(100).await;
        assert_eq!(result, Err(DataError::BlockNotFound { height: 100 }));
    }

    #[tokio::test]
    async fn test_insert_and_fetch_block() {
        let provider = InMemoryLogProvider::new();
        let infos = vec![TransactionLogInfo::new([0x41; 21], vec![])];

        provider.insert_block(7, infos.clone()).await;

        assert_eq!(provider.get_transaction_infos(7).await.unwrap(), infos);
        assert_eq!(provider.block_count().await, 1);
    }

    #[tokio::test]
    async fn test_insert_replaces_and_remove_drops() {
        let provider = InMemoryLogProvider::new();
        provider.insert_block(1, vec![]).await;
        provider
            .insert_block(1, vec![TransactionLogInfo::default()])
            .await;

        assert_eq!(provider.get_transaction_infos(1).await.unwrap().len(), 1);
        assert!(provider.remove_block(1).await.is_some());
        assert!(provider.get_transaction_infos(1).await.is_err());
        assert_eq!(provider.block_count().await, 0);
    }
}
