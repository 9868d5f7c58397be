// src/encode/qm/mod.rs

//! QM-coder: the adaptive binary arithmetic coder of JPEG (ISO/IEC 10918-1
//! Annex D) and JBIG.

pub mod context;
pub mod decoder;
pub mod encoder;
pub mod table;

pub use context::CodingContext;
pub use decoder::{EndOfData, QmDecoder};
pub use encoder::{EOI_MARKER, QmEncoder};

use crate::utils::error::Result;
use log::debug;

/// Encodes a sequence of decisions (`0`/`1` values) with a single context.
///
/// The result is the flushed stream without the EOI marker.
pub fn encode(bits: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = QmEncoder::new();
    encoder.encode_bits(bits)?;
    encoder.finish()
}

/// Decodes decisions until the stream is exhausted.
///
/// The tail of the result may hold a few padding decisions the encoder never
/// saw, and decisions whose bytes were trimmed by the encoder flush are lost;
/// use [`decode_exact`] when the decision count is known.
pub fn decode(data: &[u8]) -> Result<Vec<u8>> {
    let decoder = QmDecoder::new(data)?;
    decoder.collect()
}

/// Decodes exactly `count` decisions, treating the data as followed by
/// zero bytes.
pub fn decode_exact(data: &[u8], count: usize) -> Result<Vec<u8>> {
    let mut decoder = QmDecoder::with_end_of_data(data, EndOfData::ZeroFill)?;
    let mut bits = Vec::with_capacity(count);
    while bits.len() < count {
        match decoder.decode_bit()? {
            Some(bit) => bits.push(bit),
            None => break,
        }
    }
    Ok(bits)
}

/// Encodes independent decision streams, one output per input.
#[cfg(feature = "rayon")]
pub fn encode_batch(streams: &[Vec<u8>]) -> Vec<Result<Vec<u8>>> {
    use rayon::prelude::*;

    debug!("Encoding {} QM streams in parallel", streams.len());
    streams.par_iter().map(|bits| encode(bits)).collect()
}

/// Encodes independent decision streams, one output per input.
#[cfg(not(feature = "rayon"))]
pub fn encode_batch(streams: &[Vec<u8>]) -> Vec<Result<Vec<u8>>> {
    debug!("Encoding {} QM streams", streams.len());
    streams.iter().map(|bits| encode(bits)).collect()
}
