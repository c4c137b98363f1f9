//! Log queries evaluated against a block filter
//!
//! A query lists contract addresses and, per topic position, the topics
//! accepted there. Matching is the filter-level approximation: every
//! constrained row must have at least one element the block filter may
//! contain. Topic positions cannot be checked against a Bloom filter, only
//! membership, so a positive match still requires scanning the block's logs.

use serde::{Deserialize, Serialize};

use super::config::LogBloomConfig;
use super::hasher::LogHasher;
use super::log_bloom::LogBloom;
use crate::error::FilterError;

/// Addresses and topics a client is interested in
///
/// An empty address list or an empty topic position is a wildcard.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogQuery {
    /// Any of these contract addresses
    pub addresses: Vec<Vec<u8>>,
    /// Per topic position, any of these topics
    pub topics: Vec<Vec<Vec<u8>>>,
}

impl LogQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept logs of one more contract address
    pub fn with_address(mut self, address: impl Into<Vec<u8>>) -> Self {
        self.addresses.push(address.into());
        self
    }

    /// Append a topic position accepting any of `alternatives`
    pub fn with_topic_position(mut self, alternatives: Vec<Vec<u8>>) -> Self {
        self.topics.push(alternatives);
        self
    }

    /// True when no row constrains anything
    pub fn is_wildcard(&self) -> bool {
        self.addresses.is_empty() && self.topics.iter().all(Vec::is_empty)
    }

    /// Check the query against configured limits
    pub fn validate(&self, config: &LogBloomConfig) -> Result<(), FilterError> {
        if self.addresses.len() > config.max_query_addresses {
            return Err(FilterError::TooManyAddresses {
                count: self.addresses.len(),
                max: config.max_query_addresses,
            });
        }

        if self.topics.len() > config.max_topic_positions {
            return Err(FilterError::TooManyTopicPositions {
                count: self.topics.len(),
                max: config.max_topic_positions,
            });
        }

        for (position, alternatives) in self.topics.iter().enumerate() {
            if alternatives.len() > config.max_topic_alternatives {
                return Err(FilterError::TooManyTopicAlternatives {
                    position,
                    count: alternatives.len(),
                    max: config.max_topic_alternatives,
                });
            }
        }

        Ok(())
    }

    /// Hash every element once into single-element filters
    pub fn compile<H: LogHasher + ?Sized>(
        &self,
        config: &LogBloomConfig,
        hasher: &H,
    ) -> Result<CompiledQuery, FilterError> {
        self.validate(config)?;

        let to_row = |elements: &[Vec<u8>]| -> Vec<LogBloom> {
            elements
                .iter()
                .map(|element| LogBloom::from_hash(&hasher.hash(element)))
                .collect()
        };

        let rows = std::iter::once(to_row(&self.addresses))
            .chain(self.topics.iter().map(|alternatives| to_row(alternatives)))
            .filter(|row| !row.is_empty())
            .collect();

        Ok(CompiledQuery { rows })
    }
}

/// Query reduced to rows of single-element filters
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompiledQuery {
    rows: Vec<Vec<LogBloom>>,
}

impl CompiledQuery {
    /// Whether a block with this filter may hold matching logs
    pub fn matches(&self, block_bloom: &LogBloom) -> bool {
        self.rows
            .iter()
            .all(|row| row.iter().any(|element| block_bloom.is_superset_of(element)))
    }

    /// Whether a block, possibly without any filter, may hold matching logs
    ///
    /// A block without contract activity only matches a wildcard query.
    pub fn matches_block(&self, block_bloom: Option<&LogBloom>) -> bool {
        match block_bloom {
            Some(bloom) => self.matches(bloom),
            None => self.is_wildcard(),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of constrained rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}
