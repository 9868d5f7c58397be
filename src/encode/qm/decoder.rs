// src/encode/qm/decoder.rs

//! QM-coder arithmetic decoder, the mirror image of [`QmEncoder`].
//!
//! Entropy coded data carries no bit count. In the default
//! [`EndOfData::Exhaust`] mode the decoder shifts the last input byte all the
//! way through the code register and then reports the stream as exhausted.
//!
//! [`QmEncoder`]: super::encoder::QmEncoder

use super::context::CodingContext;
use crate::utils::error::{QmError, Result};
use log::{debug, warn};
#[cfg(feature = "qm-trace")]
use log::trace;

/// What the decoder does once every input byte has been read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EndOfData {
    /// Report exhaustion once the last byte has left the code register.
    #[default]
    Exhaust,
    /// Keep feeding `0x00` bytes; the caller decides when to stop.
    ZeroFill,
}

/// Arithmetic decoder over a borrowed entropy-coded segment.
pub struct QmDecoder<'a> {
    data: &'a [u8],
    offset: usize,
    a: u16,
    c: u16,
    pending: u8, // Input bits not yet shifted into c, MSB first
    ct: u32,     // Bits available: 16 in c plus those left in `pending`
    context: CodingContext,
    end_of_data: EndOfData,
    exhausted: bool,
    marker: Option<(usize, u8)>,
}

impl<'a> QmDecoder<'a> {
    /// Creates a decoder that reports exhaustion at the end of `data`.
    pub fn new(data: &'a [u8]) -> Result<Self> {
        Self::with_end_of_data(data, EndOfData::Exhaust)
    }

    /// Creates a decoder and primes the code register with the first two
    /// bytes of `data`.
    ///
    /// Fails if a marker sits in the first bytes of the segment.
    pub fn with_end_of_data(data: &'a [u8], end_of_data: EndOfData) -> Result<Self> {
        let mut decoder = Self {
            data,
            offset: 0,
            a: 0,
            c: 0,
            pending: 0,
            ct: 0,
            context: CodingContext::new(),
            end_of_data,
            exhausted: data.is_empty() && end_of_data == EndOfData::Exhaust,
            marker: None,
        };

        decoder.byte_in()?;
        decoder.c = u16::from(decoder.pending) << 8;
        decoder.byte_in()?;
        decoder.c |= u16::from(decoder.pending);
        decoder.pending = 0;

        debug!(
            "QM decoder initialized over {} bytes ({:?})",
            data.len(),
            end_of_data
        );
        Ok(decoder)
    }

    /// Decodes one decision with the decoder's own context.
    ///
    /// Returns `Ok(None)` once the stream is exhausted; that is the normal
    /// end of an entropy-coded segment.
    pub fn decode_bit(&mut self) -> Result<Option<u8>> {
        let mut ctx = self.context;
        let result = self.decode_bit_in(&mut ctx);
        self.context = ctx;
        result
    }

    /// Decodes one decision against a caller-owned context.
    pub fn decode_bit_in(&mut self, ctx: &mut CodingContext) -> Result<Option<u8>> {
        if let Some((offset, marker)) = self.marker {
            return Err(QmError::MalformedStuffing { offset, marker });
        }
        if self.exhausted {
            return Ok(None);
        }

        let qe = ctx.qe();
        self.a = self.a.wrapping_sub(qe);

        let bit = if self.c < self.a {
            if self.a >= 0x8000 {
                return Ok(Some(ctx.mps()));
            }
            self.cond_mps_exchange(ctx, qe)
        } else {
            self.cond_lps_exchange(ctx, qe)
        };

        #[cfg(feature = "qm-trace")]
        trace!(
            "decode d={} mps={} s={} a={:04X} c={:04X} ct={}",
            bit,
            ctx.mps(),
            ctx.state_index(),
            self.a,
            self.c,
            self.ct
        );

        if self.renormalize()? {
            Ok(Some(bit))
        } else {
            Ok(None)
        }
    }

    fn cond_mps_exchange(&mut self, ctx: &mut CodingContext, qe: u16) -> u8 {
        if self.a < qe {
            let bit = ctx.lps();
            ctx.on_lps();
            bit
        } else {
            let bit = ctx.mps();
            ctx.on_mps();
            bit
        }
    }

    fn cond_lps_exchange(&mut self, ctx: &mut CodingContext, qe: u16) -> u8 {
        self.c -= self.a;
        let bit = if self.a < qe {
            let bit = ctx.mps();
            ctx.on_mps();
            bit
        } else {
            let bit = ctx.lps();
            ctx.on_lps();
            bit
        };
        self.a = qe;
        bit
    }

    /// Returns `false` once the input is used up.
    fn renormalize(&mut self) -> Result<bool> {
        while self.a < 0x8000 {
            if self.ct == 16 {
                self.byte_in()?;
            }
            self.a <<= 1;
            self.c = (self.c << 1) | u16::from(self.pending >> 7);
            self.pending <<= 1;
            if self.ct == 0 {
                self.exhausted = true;
                debug!("QM decoder exhausted at offset {}", self.offset);
                return Ok(false);
            }
            self.ct -= 1;
        }
        Ok(true)
    }

    /// Reads the next data byte, dropping the `0x00` stuffed after `0xFF`.
    fn byte_in(&mut self) -> Result<()> {
        let Some(&byte) = self.data.get(self.offset) else {
            self.pending = 0;
            if self.end_of_data == EndOfData::ZeroFill {
                self.ct += 8;
            }
            return Ok(());
        };

        let mut advance = 1;
        if byte == 0xFF {
            if let Some(&next) = self.data.get(self.offset + 1) {
                if next != 0x00 {
                    warn!(
                        "QM decoder hit marker 0xFF{:02X} at offset {}",
                        next, self.offset
                    );
                    self.marker = Some((self.offset, next));
                    return Err(QmError::MalformedStuffing {
                        offset: self.offset,
                        marker: next,
                    });
                }
                advance = 2;
            }
        }

        self.offset += advance;
        self.pending = byte;
        self.ct += 8;
        Ok(())
    }

    /// Number of input bytes consumed, stuff bytes included. On a marker this
    /// is the offset of its `0xFF`.
    pub fn position(&self) -> usize {
        self.offset
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn end_of_data(&self) -> EndOfData {
        self.end_of_data
    }

    /// The decoder's own context.
    pub fn context(&self) -> CodingContext {
        self.context
    }

    pub fn a(&self) -> u16 {
        self.a
    }

    pub fn c(&self) -> u16 {
        self.c
    }

    pub fn ct(&self) -> u32 {
        self.ct
    }
}

impl Iterator for QmDecoder<'_> {
    type Item = Result<u8>;

    /// Yields decisions until exhaustion or the first error.
    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        match self.decode_bit() {
            Ok(Some(bit)) => Some(Ok(bit)),
            Ok(None) => None,
            Err(e) => {
                self.exhausted = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decoder_primes_two_bytes() {
        let dec = QmDecoder::new(&[0x65, 0x5B, 0x51]).unwrap();
        assert_eq!(dec.c(), 0x655B);
        assert_eq!(dec.a(), 0);
        assert_eq!(dec.ct(), 16);
        assert_eq!(dec.position(), 2);
    }

    #[test]
    fn test_stuff_byte_is_dropped() {
        let dec = QmDecoder::new(&[0xFF, 0x00, 0x12]).unwrap();
        assert_eq!(dec.c(), 0xFF12);
        assert_eq!(dec.position(), 3);
    }

    #[test]
    fn test_marker_in_first_bytes() {
        let err = QmDecoder::new(&[0xFF, 0xD9]).err().unwrap();
        assert!(matches!(
            err,
            QmError::MalformedStuffing {
                offset: 0,
                marker: 0xD9
            }
        ));
    }

    #[test]
    fn test_lone_trailing_ff_is_data() {
        let dec = QmDecoder::new(&[0x12, 0xFF]).unwrap();
        assert_eq!(dec.c(), 0x12FF);
    }

    #[test]
    fn test_empty_input_is_exhausted() {
        let mut dec = QmDecoder::new(&[]).unwrap();
        assert_eq!(dec.decode_bit().unwrap(), None);
        assert_eq!(dec.decode_bit().unwrap(), None);
        assert_eq!(dec.next().map(|r| r.is_ok()), None);
    }

    #[test]
    fn test_zero_fill_never_exhausts() {
        let mut dec = QmDecoder::with_end_of_data(&[], EndOfData::ZeroFill).unwrap();
        for _ in 0..1000 {
            assert!(dec.decode_bit().unwrap().is_some());
            assert!(dec.a() >= 0x8000);
            assert!(dec.context().state_index() <= 112);
        }
        assert!(!dec.is_exhausted());
    }

    #[test]
    fn test_exhaustion_is_sticky() {
        let mut dec = QmDecoder::new(&[0x50]).unwrap();
        let mut count = 0;
        while dec.decode_bit().unwrap().is_some() {
            count += 1;
            assert!(count < 10_000);
        }
        assert!(dec.is_exhausted());
        assert_eq!(dec.decode_bit().unwrap(), None);
    }

    #[test]
    fn test_marker_error_is_sticky() {
        // Enough data that the decoder has to reach the marker
        let mut dec = QmDecoder::new(&[0x65, 0x5B, 0x51, 0xFF, 0xD9]).unwrap();
        let err = loop {
            match dec.decode_bit() {
                Ok(Some(_)) => continue,
                Ok(None) => panic!("stream ended before the marker"),
                Err(e) => break e,
            }
        };
        assert!(matches!(
            err,
            QmError::MalformedStuffing {
                offset: 3,
                marker: 0xD9
            }
        ));
        assert_eq!(dec.position(), 3);
        assert!(dec.decode_bit().is_err());
    }
}
