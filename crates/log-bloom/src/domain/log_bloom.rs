//! Fixed-width log Bloom filter
//!
//! A 2048-bit (256-byte) filter recording which contract addresses and event
//! topics appeared in a block's logs. Each element sets up to three bits
//! derived from its digest (see [`super::bit_positions`]).
//!
//! INVARIANTS:
//! - The buffer is always exactly [`BLOOM_BYTE_SIZE`] bytes.
//! - Bits are only ever set, never cleared: union is monotonic,
//!   commutative, associative and idempotent.
//! - No false negatives: after `accrue(x)`, `might_contain(x)` is true.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

use bitvec::prelude::*;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use super::bit_positions::{
    bit_positions, prefix_positions, storage_index, BITS_PER_ELEMENT, BLOOM_BIT_SIZE,
    BLOOM_BYTE_SIZE, DIGEST_PREFIX_LEN,
};
use super::hasher::{Hash, LogHasher};
use crate::error::BloomError;

/// 2048-bit Bloom filter over log addresses and topics
///
/// A plain value type: two filters with the same bits are equal and
/// interchangeable. Serialized form is the raw 256-byte buffer; the textual
/// form is 512 lowercase hex characters.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct LogBloom {
    bits: [u8; BLOOM_BYTE_SIZE],
}

impl LogBloom {
    /// Filter with every bit cleared
    pub const fn empty() -> Self {
        Self {
            bits: [0u8; BLOOM_BYTE_SIZE],
        }
    }

    /// Copy a 256-byte buffer into a new filter
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BloomError> {
        let bits: [u8; BLOOM_BYTE_SIZE] =
            bytes.try_into().map_err(|_| BloomError::SizeMismatch {
                expected: BLOOM_BYTE_SIZE,
                actual: bytes.len(),
            })?;
        Ok(Self { bits })
    }

    /// Filter for a single element, given the element's digest
    ///
    /// Only the first six bytes of `digest` are read. The caller hashes the
    /// raw address or topic beforehand.
    pub fn create(digest: &[u8]) -> Result<Self, BloomError> {
        let positions = bit_positions(digest)?;
        Ok(Self::with_positions(positions))
    }

    /// Filter for a single element from a full 32-byte digest
    pub fn from_hash(hash: &Hash) -> Self {
        let prefix: [u8; DIGEST_PREFIX_LEN] = std::array::from_fn(|i| hash[i]);
        Self::with_positions(prefix_positions(&prefix))
    }

    fn with_positions(positions: [usize; BITS_PER_ELEMENT]) -> Self {
        let mut bloom = Self::empty();
        let view = bloom.bits.view_bits_mut::<Lsb0>();
        for position in positions {
            view.set(storage_index(position), true);
        }
        bloom
    }

    /// OR `other` into this filter
    pub fn union_with(&mut self, other: &LogBloom) {
        for (s, o) in self.bits.iter_mut().zip(other.bits.iter()) {
            *s |= *o;
        }
    }

    /// New filter holding the bits of both inputs
    pub fn union(&self, other: &LogBloom) -> LogBloom {
        let mut result = self.clone();
        result.union_with(other);
        result
    }

    /// True iff every bit set in `other` is also set here
    ///
    /// Equivalent to `self == self.union(other)`, computed without building
    /// the union.
    pub fn is_superset_of(&self, other: &LogBloom) -> bool {
        self.bits
            .iter()
            .zip(other.bits.iter())
            .all(|(s, o)| (*s | *o) == *s)
    }

    /// Hash `data` and fold it into the filter
    pub fn accrue<H: LogHasher + ?Sized>(&mut self, data: &[u8], hasher: &H) {
        let element = Self::from_hash(&hasher.hash(data));
        self.union_with(&element);
    }

    /// Whether `data` may have been folded into the filter
    ///
    /// False positives are possible, false negatives are not.
    pub fn might_contain<H: LogHasher + ?Sized>(&self, data: &[u8], hasher: &H) -> bool {
        self.is_superset_of(&Self::from_hash(&hasher.hash(data)))
    }

    /// Lowercase hex of the 256-byte buffer
    pub fn to_hex(&self) -> String {
        hex::encode(self.bits)
    }

    /// Underlying buffer, in serialized byte order
    pub fn as_bytes(&self) -> &[u8; BLOOM_BYTE_SIZE] {
        &self.bits
    }

    pub fn into_bytes(self) -> [u8; BLOOM_BYTE_SIZE] {
        self.bits
    }

    /// Number of bits set
    pub fn count_ones(&self) -> usize {
        self.bits.view_bits::<Lsb0>().count_ones()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|b| *b == 0)
    }

    /// Whether bit `position` is set; positions past the filter are never set
    pub fn contains_position(&self, position: usize) -> bool {
        position < BLOOM_BIT_SIZE && self.bits.view_bits::<Lsb0>()[storage_index(position)]
    }

    /// Set bit positions in ascending order
    pub fn positions(&self) -> Vec<usize> {
        let mut positions: Vec<usize> = self
            .bits
            .view_bits::<Lsb0>()
            .iter_ones()
            .map(storage_index)
            .collect();
        positions.sort_unstable();
        positions
    }
}

impl Default for LogBloom {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for LogBloom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LogBloom").field(&self.to_hex()).finish()
    }
}

impl fmt::Display for LogBloom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for LogBloom {
    type Err = BloomError;

    /// Parse 512 hex characters, with or without a `0x` prefix
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(digits).map_err(|e| BloomError::InvalidHex(e.to_string()))?;
        Self::from_bytes(&bytes)
    }
}

impl From<[u8; BLOOM_BYTE_SIZE]> for LogBloom {
    fn from(bits: [u8; BLOOM_BYTE_SIZE]) -> Self {
        Self { bits }
    }
}

impl From<LogBloom> for [u8; BLOOM_BYTE_SIZE] {
    fn from(bloom: LogBloom) -> Self {
        bloom.bits
    }
}

impl TryFrom<&[u8]> for LogBloom {
    type Error = BloomError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_bytes(bytes)
    }
}

impl TryFrom<Vec<u8>> for LogBloom {
    type Error = BloomError;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        Self::from_bytes(&bytes)
    }
}

impl AsRef<[u8]> for LogBloom {
    fn as_ref(&self) -> &[u8] {
        &self.bits
    }
}

impl BitOr for &LogBloom {
    type Output = LogBloom;

    fn bitor(self, rhs: &LogBloom) -> LogBloom {
        self.union(rhs)
    }
}

impl BitOrAssign<&LogBloom> for LogBloom {
    fn bitor_assign(&mut self, rhs: &LogBloom) {
        self.union_with(rhs);
    }
}

/// Hex string for human-readable formats, raw bytes otherwise
impl Serialize for LogBloom {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_hex())
        } else {
            serializer.serialize_bytes(&self.bits)
        }
    }
}

impl<'de> Deserialize<'de> for LogBloom {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            let text = String::deserialize(deserializer)?;
            text.parse().map_err(de::Error::custom)
        } else {
            let bytes = Vec::<u8>::deserialize(deserializer)?;
            Self::from_bytes(&bytes).map_err(de::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::hasher::{keccak256, Keccak256Hasher};

    fn bloom_with(elements: &[&[u8]]) -> LogBloom {
        let mut bloom = LogBloom::empty();
        for element in elements {
            bloom.accrue(element, &Keccak256Hasher);
        }
        bloom
    }

    #[test]
    fn test_empty_filter_has_no_bits() {
        let bloom = LogBloom::empty();

        assert!(bloom.is_empty());
        assert_eq!(bloom.count_ones(), 0);
        assert_eq!(bloom.as_bytes(), &[0u8; 256]);
        assert_eq!(bloom, LogBloom::default());
    }

    #[test]
    fn test_from_bytes_keeps_buffer() {
        let mut buf = [0u8; 256];
        for (i, b) in buf.iter_mut().enumerate() {
            *b = (i * 7) as u8;
        }

        let bloom = LogBloom::from_bytes(&buf).unwrap();
        assert_eq!(bloom.as_bytes(), &buf);
        assert_eq!(bloom.into_bytes(), buf);
    }

    #[test]
    fn test_from_bytes_rejects_wrong_length() {
        for len in [0usize, 1, 32, 255, 257, 512] {
            let result = LogBloom::from_bytes(&vec![0u8; len]);
            assert_eq!(
                result,
                Err(BloomError::SizeMismatch {
                    expected: 256,
                    actual: len
                }),
                "buffer of {} bytes must be rejected",
                len
            );
        }
        assert!(LogBloom::try_from(vec![0u8; 100]).is_err());
    }

    #[test]
    fn test_create_zero_digest_sets_bit_zero() {
        let bloom = LogBloom::create(&[0u8; 32]).unwrap();

        assert_eq!(bloom.count_ones(), 1);
        assert_eq!(bloom.positions(), vec![0]);
        // Position 0 is the lowest bit of the last byte
        assert_eq!(bloom.as_bytes()[255], 0x01);
        assert!(bloom.as_bytes()[..255].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_create_sets_three_positions() {
        let bloom = LogBloom::create(&[0x01, 0x02, 0x03, 0x04, 0x05, 0x06]).unwrap();

        assert_eq!(bloom.positions(), vec![0x0102, 0x0304, 0x0506]);
        assert!(bloom.contains_position(0x0102));
        assert!(!bloom.contains_position(0x0103));
        assert!(!bloom.contains_position(BLOOM_BIT_SIZE));

        // 0x0102 = 258 -> byte 255 - 32 = 223, bit 2
        assert_eq!(bloom.as_bytes()[223], 0b0000_0100);
    }

    #[test]
    fn test_create_highest_position() {
        let bloom = LogBloom::create(&[0xFF; 6]).unwrap();

        assert_eq!(bloom.positions(), vec![2047]);
        assert_eq!(bloom.as_bytes()[0], 0x80);
    }

    #[test]
    fn test_create_rejects_short_digest() {
        let result = LogBloom::create(&[0x01, 0x02, 0x03, 0x04, 0x05]);
        assert_eq!(
            result,
            Err(BloomError::InputTooShort {
                actual: 5,
                required: 6
            })
        );
    }

    #[test]
    fn test_from_hash_matches_create() {
        let hash = keccak256(b"Transfer(address,address,uint256)");
        assert_eq!(LogBloom::from_hash(&hash), LogBloom::create(&hash).unwrap());
    }

    #[test]
    fn test_union_sets_bits_of_both() {
        let a = LogBloom::create(&[0x00, 0x01, 0x00, 0x01, 0x00, 0x01]).unwrap();
        let b = LogBloom::create(&[0x00, 0x02, 0x00, 0x02, 0x00, 0x02]).unwrap();

        let union = a.union(&b);
        assert_eq!(union.positions(), vec![1, 2]);
        assert_eq!(union, &a | &b);
        assert_eq!(union, b.union(&a), "union must be commutative");
        assert_eq!(union.union(&union), union, "union must be idempotent");
    }

    #[test]
    fn test_union_with_mutates_in_place() {
        let mut a = LogBloom::create(&[0u8; 6]).unwrap();
        let b = LogBloom::create(&[0x07, 0xFF, 0x07, 0xFF, 0x07, 0xFF]).unwrap();

        a |= &b;
        assert_eq!(a.positions(), vec![0, 2047]);

        a.union_with(&LogBloom::empty());
        assert_eq!(a.positions(), vec![0, 2047], "union never clears bits");
    }

    #[test]
    fn test_superset_of_union_members() {
        let a = bloom_with(&[b"address_A"]);
        let b = bloom_with(&[b"topic_B"]);
        let union = a.union(&b);

        assert!(union.is_superset_of(&a));
        assert!(union.is_superset_of(&b));
        assert!(union.is_superset_of(&LogBloom::empty()));
        assert!(union.is_superset_of(&union));
        assert!(!LogBloom::empty().is_superset_of(&union));
    }

    #[test]
    fn test_superset_matches_union_equality() {
        let a = bloom_with(&[b"one", b"two"]);
        let b = bloom_with(&[b"three"]);

        assert_eq!(a.is_superset_of(&b), a == a.union(&b));
        assert_eq!(b.is_superset_of(&a), b == b.union(&a));
    }

    #[test]
    fn test_superset_does_not_mutate_inputs() {
        let a = bloom_with(&[b"one"]);
        let b = bloom_with(&[b"two"]);
        let (a_before, b_before) = (a.clone(), b.clone());

        let _ = a.is_superset_of(&b);

        assert_eq!(a, a_before);
        assert_eq!(b, b_before);
    }

    #[test]
    fn test_accrue_has_no_false_negatives() {
        let elements: Vec<String> = (0..200).map(|i| format!("topic_{:04x}", i)).collect();
        let mut bloom = LogBloom::empty();

        for element in &elements {
            bloom.accrue(element.as_bytes(), &Keccak256Hasher);
        }

        for element in &elements {
            assert!(
                bloom.might_contain(element.as_bytes(), &Keccak256Hasher),
                "False negative for {}",
                element
            );
        }
    }

    #[test]
    fn test_known_address_and_topic_vector() {
        // Filter bytes for one address and one topic, identical to the
        // Ethereum logsBloom layout
        let expected: LogBloom = "00000000000000000000000000000000000000001000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000002020000000000000000000000000000000000000000000008000000001000000000000000000000000000000000000000000000000000001000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000".parse().unwrap();
        let address = hex::decode("ef2d6d194084c2de36e0dabfce45d046b37d1106").unwrap();
        let topic =
            hex::decode("02c69be41d0b7e40352fc85be1cd65eb03d40ef8427a0ca4596b1ead9a00e9fc")
                .unwrap();

        let mut bloom = LogBloom::empty();
        assert!(!bloom.might_contain(&address, &Keccak256Hasher));

        bloom.accrue(&address, &Keccak256Hasher);
        assert!(bloom.might_contain(&address, &Keccak256Hasher));
        assert!(!bloom.might_contain(&topic, &Keccak256Hasher));

        bloom.accrue(&topic, &Keccak256Hasher);
        assert_eq!(bloom, expected);
        assert_eq!(bloom.positions(), vec![804, 1020, 1059, 1241, 1249, 1884]);
    }

    #[test]
    fn test_hex_form() {
        let bloom = LogBloom::create(&[0x07, 0xFF, 0x00, 0x00, 0x00, 0x00]).unwrap();
        let hex = bloom.to_hex();

        assert_eq!(hex.len(), 512);
        assert!(hex.starts_with("80"));
        assert!(hex.ends_with("01"));
        assert_eq!(hex, hex.to_lowercase());
        assert_eq!(bloom.to_string(), hex);
    }

    #[test]
    fn test_parse_hex_with_prefix() {
        let bloom = bloom_with(&[b"contract"]);
        let prefixed = format!("0x{}", bloom.to_hex());

        assert_eq!(prefixed.parse::<LogBloom>().unwrap(), bloom);
        assert_eq!(bloom.to_hex().parse::<LogBloom>().unwrap(), bloom);
    }

    #[test]
    fn test_parse_rejects_bad_hex() {
        assert!(matches!(
            "zz".repeat(256).parse::<LogBloom>(),
            Err(BloomError::InvalidHex(_))
        ));
        assert!(matches!(
            "00".repeat(255).parse::<LogBloom>(),
            Err(BloomError::SizeMismatch { actual: 255, .. })
        ));
    }

    #[test]
    fn test_json_uses_hex_string() {
        let bloom = bloom_with(&[b"contract"]);

        let json = serde_json::to_string(&bloom).unwrap();
        assert_eq!(json, format!("\"{}\"", bloom.to_hex()));

        let restored: LogBloom = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, bloom);
    }

    #[test]
    fn test_bincode_uses_raw_bytes() {
        let bloom = bloom_with(&[b"contract", b"topic"]);

        let bytes = bincode::serialize(&bloom).unwrap();
        // u64 length prefix followed by the buffer
        assert_eq!(bytes.len(), 8 + 256);
        assert_eq!(&bytes[8..], bloom.as_bytes());

        let restored: LogBloom = bincode::deserialize(&bytes).unwrap();
        assert_eq!(restored, bloom);
    }

    #[test]
    fn test_json_rejects_wrong_length() {
        let result: Result<LogBloom, _> = serde_json::from_str("\"00ff\"");
        assert!(result.is_err());
    }
}
