//! # log-bloom
//!
//! Fixed-width 2048-bit Bloom filters summarising which contract addresses
//! and event topics appear in a block's transaction logs.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): Pure business logic, no I/O
//!   - `LogBloom`: 256-byte filter, union and superset test
//!   - `create_block_bloom` / `BlockBloom`: per-block aggregation
//!   - `LogQuery` / `CompiledQuery`: address and topic queries
//!   - `LogBloomConfig`: Configuration with validation
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `LogBloomApi`: Driving port (inbound API)
//!   - `BlockLogProvider`: Driven port (block execution results)
//!
//! - **Service Layer** (`service/`): Orchestration
//!   - `LogBloomService`: Implements `LogBloomApi` with an LRU cache
//!
//! - **Adapters Layer** (`adapters/`): External connections
//!   - `InMemoryLogProvider`: Serves log infos from memory
//!
//! ## Invariants
//!
//! - **INVARIANT-1**: A filter is always exactly 256 bytes
//! - **INVARIANT-2**: No false negatives - an accrued element always matches
//! - **INVARIANT-3**: Union only sets bits; it is commutative and idempotent
//!
//! ## Usage Example
//!
//! ```ignore
//! use log_bloom::{create_block_bloom, Keccak256Hasher, LogEntry, TransactionLogInfo};
//!
//! let infos = vec![TransactionLogInfo::new(
//!     contract_address,
//!     vec![LogEntry::new(contract_address, vec![transfer_topic])],
//! )];
//!
//! let bloom = create_block_bloom(&infos, &Keccak256Hasher).expect("contract activity");
//! assert!(bloom.might_contain(&contract_address, &Keccak256Hasher));
//! println!("{}", bloom); // 512 hex characters
//! ```
//!
//! ## Wiring
//!
//! ```ignore
//! use log_bloom::{InMemoryLogProvider, LogBloomApi, LogBloomService, LogQuery, Metrics};
//! use std::sync::Arc;
//!
//! let provider = Arc::new(InMemoryLogProvider::new());
//! provider.insert_block(100, infos).await;
//!
//! let service = LogBloomService::new(provider).with_metrics(Arc::new(Metrics::new()));
//! let query = service.compile_query(&LogQuery::new().with_address(contract_address))?;
//! let maybe = service.block_might_match(100, &query).await?;
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

// Re-exports for convenience
pub use domain::{
    create_block_bloom, keccak256, BlockBloom, CompiledQuery, Keccak256Hasher, LogBloom,
    LogBloomConfig, LogBloomConfigBuilder, LogEntry, LogHasher, LogQuery, TransactionLogInfo,
    BLOOM_BIT_SIZE, BLOOM_BYTE_SIZE,
};
pub use error::{BloomError, DataError, FilterError};
pub use metrics::{Metrics, MetricsRecorder, MetricsSnapshot, NoOpMetrics};
pub use ports::{BlockLogProvider, LogBloomApi};
pub use service::LogBloomService;

pub use adapters::InMemoryLogProvider;
