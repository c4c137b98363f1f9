//! Domain Layer - Pure business logic
//!
//! This layer contains:
//! - Fixed-width log Bloom filter
//! - Digest-to-bit-position mapping
//! - Digest function seam (Keccak-256 by default)
//! - Block aggregation
//! - Log queries
//! - Configuration
//!
//! RULES:
//! - No I/O operations
//! - No async code
//! - Pure functions where possible

pub mod bit_positions;
pub mod block_bloom;
pub mod config;
pub mod hasher;
pub mod log_bloom;
pub mod query;

pub use bit_positions::{
    bit_positions, low_bits_mask, BITS_PER_ELEMENT, BLOOM_BIT_SIZE, BLOOM_BYTE_SIZE,
    DIGEST_PREFIX_LEN, LOW_BITS_MASK,
};
pub use block_bloom::{create_block_bloom, BlockBloom, LogEntry, TransactionLogInfo};
pub use config::{LogBloomConfig, LogBloomConfigBuilder, MAX_TOPIC_POSITIONS};
pub use hasher::{keccak256, Hash, Keccak256Hasher, LogHasher};
pub use log_bloom::LogBloom;
pub use query::{CompiledQuery, LogQuery};
