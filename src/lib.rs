//! # QM Coder
//!
//! A Rust implementation of the QM-coder, the adaptive binary arithmetic
//! entropy coder used by arithmetic-coded JPEG (ISO/IEC 10918-1 Annex D) and
//! JBIG.
//!
//! This library is organized into two modules:
//! - `utils`: error handling and bit packing helpers
//! - `encode`: the probability state table, encoder and decoder
//!
//! ```
//! use qm_coder::{decode_exact, encode};
//!
//! let bits: [u8; 8] = [0, 1, 1, 0, 0, 0, 1, 0];
//! let coded = encode(&bits).unwrap();
//! assert_eq!(decode_exact(&coded, bits.len()).unwrap(), bits);
//! ```

// Re-export commonly used types at the crate root
pub use utils::error::{QmError, Result};

pub mod utils {
    pub mod bits;
    pub mod error;
}

pub mod encode {
    pub mod qm;

    pub use qm::*;
}

// Public API exports
pub use encode::qm::{
    CodingContext, EOI_MARKER, EndOfData, QmDecoder, QmEncoder, decode, decode_exact, encode,
    encode_batch,
};
pub use utils::bits::{bits_from_bytes, bytes_from_bits};

/// Encodes every bit of `data`, most significant bit first, and appends the
/// EOI marker. This is the layout of the reference self-test vectors.
pub fn encode_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = QmEncoder::new();
    encoder.encode_bits(&bits_from_bytes(data))?;
    encoder.finish_with_marker()
}

/// Decodes an entropy-coded segment (without its marker) back into bytes,
/// grouping decisions MSB first. A trailing partial byte is zero padded.
pub fn decode_bytes(data: &[u8]) -> Result<Vec<u8>> {
    Ok(bytes_from_bits(&decode(data)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker() {
        assert_eq!(EOI_MARKER.to_be_bytes(), [0xFF, 0xD9]);
    }

    #[test]
    fn test_encode_bytes_of_nothing() {
        assert_eq!(encode_bytes(&[]).unwrap(), vec![0xFF, 0xD9]);
        assert!(decode_bytes(&[]).unwrap().is_empty());
    }
}
