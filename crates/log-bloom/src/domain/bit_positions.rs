//! Digest-to-bit-position mapping
//!
//! Every element sets up to three bits. The positions come from three
//! disjoint byte pairs at the front of the element's digest; the high byte of
//! each pair is masked down to its low bits so the 11-bit result always falls
//! inside the 2048-bit filter.
//!
//! This mapping must stay bit-for-bit compatible with filters already stored
//! in block headers.

use crate::error::BloomError;

/// Filter width in bits
pub const BLOOM_BIT_SIZE: usize = 2048;

/// Filter width in bytes
pub const BLOOM_BYTE_SIZE: usize = BLOOM_BIT_SIZE / 8;

/// Number of bit positions derived from one digest
pub const BITS_PER_ELEMENT: usize = 3;

/// Number of leading digest bytes read per element
pub const DIGEST_PREFIX_LEN: usize = BITS_PER_ELEMENT * 2;

/// Mask for the high byte of each pair (0b111 for a 2048-bit filter)
pub const LOW_BITS_MASK: u8 = low_bits_mask(BLOOM_BIT_SIZE);

const _: () = assert!(BLOOM_BIT_SIZE.is_power_of_two());
const _: () = assert!(((LOW_BITS_MASK as usize) << 8 | 0xFF) == BLOOM_BIT_SIZE - 1);

/// Low-bit mask for a filter of `bit_size` bits
///
/// 512 -> 0b1, 1024 -> 0b11, 2048 -> 0b111, 4096 -> 0b1111
///
/// Only meaningful for widths between 512 and 65536 bits.
pub const fn low_bits_mask(bit_size: usize) -> u8 {
    let bit_length = usize::BITS - bit_size.leading_zeros();
    (0xFF_u32 >> (16 + 1 - bit_length)) as u8
}

/// Compute the bit positions of one element from its digest
///
/// Reads only the first [`DIGEST_PREFIX_LEN`] bytes. Shorter input is
/// rejected instead of being read past its end.
pub fn bit_positions(digest: &[u8]) -> Result<[usize; BITS_PER_ELEMENT], BloomError> {
    let prefix = digest
        .first_chunk::<DIGEST_PREFIX_LEN>()
        .ok_or(BloomError::InputTooShort {
            actual: digest.len(),
            required: DIGEST_PREFIX_LEN,
        })?;
    Ok(prefix_positions(prefix))
}

/// Bit positions for a digest prefix of known length
pub fn prefix_positions(prefix: &[u8; DIGEST_PREFIX_LEN]) -> [usize; BITS_PER_ELEMENT] {
    let mut positions = [0usize; BITS_PER_ELEMENT];
    for (position, pair) in positions.iter_mut().zip(prefix.chunks_exact(2)) {
        *position = (usize::from(pair[0] & LOW_BITS_MASK) << 8) | usize::from(pair[1]);
    }
    positions
}

/// Map a filter bit position onto the LSB-first index of the byte buffer
///
/// Position 0 is the lowest bit of the last byte. The mapping is its own
/// inverse, so it also turns a buffer index back into a position.
pub const fn storage_index(position: usize) -> usize {
    (BLOOM_BYTE_SIZE - 1 - position / 8) * 8 + position % 8
}
