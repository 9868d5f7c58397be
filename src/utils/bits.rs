// src/utils/bits.rs

//! Conversions between byte payloads and the MSB-first decision sequences fed
//! to the coder. Decisions are stored one per `u8` (`0` or `1`).

use bitvec::prelude::*;

/// Expands `bytes` into one decision per bit, most significant bit first.
pub fn bits_from_bytes(bytes: &[u8]) -> Vec<u8> {
    bytes
        .view_bits::<Msb0>()
        .iter()
        .by_vals()
        .map(u8::from)
        .collect()
}

/// Packs decisions back into bytes, most significant bit first.
///
/// A trailing partial byte is zero padded on the right. Any non-zero value
/// counts as a `1` decision.
pub fn bytes_from_bits(bits: &[u8]) -> Vec<u8> {
    let mut packed: BitVec<u8, Msb0> = BitVec::with_capacity(bits.len());
    packed.extend(bits.iter().map(|&b| b != 0));
    packed.set_uninitialized(false);
    packed.into_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_msb_first_expansion() {
        assert_eq!(bits_from_bytes(&[0x80, 0x01]), vec![
            1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1
        ]);
        assert!(bits_from_bytes(&[]).is_empty());
    }

    #[test]
    fn test_partial_byte_is_padded() {
        assert_eq!(bytes_from_bits(&[1, 0, 1]), vec![0xA0]);
        assert_eq!(bytes_from_bits(&[1, 1, 1, 1, 1, 1, 1, 1, 1]), vec![0xFF, 0x80]);
    }

    #[test]
    fn test_pack_unpack() {
        let data = [0x00, 0x02, 0x51, 0xC0, 0xFF];
        assert_eq!(bytes_from_bits(&bits_from_bytes(&data)), data);
    }
}
