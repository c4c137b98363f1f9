//! Digest function used to turn addresses and topics into filter elements

use sha3::{Digest, Keccak256};

/// 256-bit digest
pub type Hash = [u8; 32];

/// Hashes an address or topic before it is mapped onto filter bits
///
/// Implementations must be deterministic. The filter reads only the first
/// six bytes of the output, so its false positive rate depends on those bytes
/// being uniformly distributed.
pub trait LogHasher: Send + Sync {
    /// Digest arbitrary bytes
    fn hash(&self, data: &[u8]) -> Hash;
}

/// Keccak-256, the digest existing block filters were built with
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Keccak256Hasher;

impl LogHasher for Keccak256Hasher {
    fn hash(&self, data: &[u8]) -> Hash {
        keccak256(data)
    }
}

impl<H: LogHasher + ?Sized> LogHasher for &H {
    fn hash(&self, data: &[u8]) -> Hash {
        (**self).hash(data)
    }
}

/// One-shot Keccak-256
pub fn keccak256(data: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}
