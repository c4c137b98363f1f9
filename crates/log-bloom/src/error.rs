//! Error types for the log Bloom filter crate

use thiserror::Error;

/// Errors raised by the filter itself
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BloomError {
    #[error("Input data length {actual} is not equal to Bloom size {expected}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("Digest too short: {actual} bytes, need at least {required}")]
    InputTooShort { actual: usize, required: usize },

    #[error("Invalid hex encoding: {0}")]
    InvalidHex(String),
}

/// Errors that can occur in the log Bloom service
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("Bloom error: {0}")]
    Bloom(#[from] BloomError),

    #[error("Data provider error: {0}")]
    DataError(#[from] DataError),

    #[error("Invalid filter parameters: {0}")]
    InvalidParameters(String),

    #[error("Too many query addresses: {count} > {max}")]
    TooManyAddresses { count: usize, max: usize },

    #[error("Too many topic positions: {count} > {max}")]
    TooManyTopicPositions { count: usize, max: usize },

    #[error("Too many alternatives for topic {position}: {count} > {max}")]
    TooManyTopicAlternatives {
        position: usize,
        count: usize,
        max: usize,
    },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Errors from block log providers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    #[error("Block not found: {height}")]
    BlockNotFound { height: u64 },

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Timeout")]
    Timeout,

    #[error("Query error: {0}")]
    QueryError(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}
