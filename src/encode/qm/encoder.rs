// src/encode/qm/encoder.rs

//! QM-coder arithmetic encoder (ISO/IEC 10918-1 Annex D).
//!
//! The encoder keeps the whole coded stream in memory: a carry out of the
//! code register has to increment a byte that was already emitted, so output
//! can only be handed to the caller once coding is finished.

use super::context::CodingContext;
use crate::utils::error::{QmError, Result};
use byteorder::{BigEndian, WriteBytesExt};
use log::debug;
#[cfg(feature = "qm-trace")]
use log::trace;
use std::io::Write;

/// JPEG End-Of-Image marker, conventionally written after the flushed stream.
pub const EOI_MARKER: u16 = 0xFFD9;

/// Arithmetic encoder for a binary decision stream.
pub struct QmEncoder {
    a: u32,  // Interval register, one bit wider than 16 to start at 0x10000
    c: u32,  // Code register; bit 27 receives the carry out of the next byte
    ct: u32, // Shifts left before the next byte_out
    st: usize, // Stacked 0xFF bytes waiting on a possible carry
    context: CodingContext,
    output: Vec<u8>,
    limit: Option<usize>,
    finished: bool,
}

impl Default for QmEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl QmEncoder {
    /// Creates an encoder with an unbounded output buffer.
    pub fn new() -> Self {
        Self {
            a: 0x10000,
            c: 0,
            ct: 11,
            st: 0,
            context: CodingContext::new(),
            output: Vec::new(),
            limit: None,
            finished: false,
        }
    }

    /// Creates an encoder that fails with [`QmError::CapacityExceeded`]
    /// instead of growing its output past `limit` bytes.
    pub fn with_capacity_limit(limit: usize) -> Self {
        Self {
            output: Vec::with_capacity(limit.min(4096)),
            limit: Some(limit),
            ..Self::new()
        }
    }

    /// Codes one decision using the encoder's own context. Any non-zero
    /// `bit` is coded as `1`.
    pub fn encode_bit(&mut self, bit: u8) -> Result<()> {
        let mut ctx = self.context;
        let result = self.encode_bit_in(&mut ctx, bit);
        self.context = ctx;
        result
    }

    /// Codes one decision against a caller-owned context.
    pub fn encode_bit_in(&mut self, ctx: &mut CodingContext, bit: u8) -> Result<()> {
        if self.finished {
            return Err(QmError::Finished);
        }

        #[cfg(feature = "qm-trace")]
        trace!(
            "encode d={} mps={} s={} qe={:04X} a={:04X} c={:08X} ct={} st={}",
            (bit != 0) as u8,
            ctx.mps(),
            ctx.state_index(),
            ctx.qe(),
            self.a & 0xFFFF,
            self.c,
            self.ct,
            self.st
        );

        if u8::from(bit != 0) == ctx.mps() {
            self.code_mps(ctx)
        } else {
            self.code_lps(ctx)
        }
    }

    /// Codes a whole sequence of decisions with the encoder's own context.
    pub fn encode_bits(&mut self, bits: &[u8]) -> Result<()> {
        for &bit in bits {
            self.encode_bit(bit)?;
        }
        Ok(())
    }

    fn code_mps(&mut self, ctx: &mut CodingContext) -> Result<()> {
        let qe = u32::from(ctx.qe());
        self.a -= qe;
        if self.a >= 0x8000 {
            return Ok(());
        }

        // Conditional exchange: the LPS sub-interval is now the larger one
        if self.a < qe {
            self.c += self.a;
            self.a = qe;
        }
        ctx.on_mps();
        self.renormalize()
    }

    fn code_lps(&mut self, ctx: &mut CodingContext) -> Result<()> {
        let qe = u32::from(ctx.qe());
        self.a -= qe;
        if self.a >= qe {
            self.c += self.a;
            self.a = qe;
        }
        ctx.on_lps();
        self.renormalize()
    }

    fn renormalize(&mut self) -> Result<()> {
        while self.a < 0x8000 {
            self.a <<= 1;
            self.c <<= 1;
            self.ct -= 1;
            if self.ct == 0 {
                self.byte_out()?;
                self.ct = 8;
            }
        }
        Ok(())
    }

    fn push(&mut self, byte: u8) -> Result<()> {
        if let Some(limit) = self.limit {
            if self.output.len() >= limit {
                return Err(QmError::CapacityExceeded { limit });
            }
        }
        self.output.push(byte);
        Ok(())
    }

    fn byte_out(&mut self) -> Result<()> {
        let t = self.c >> 19;
        if t > 0xFF {
            // Carry into the last emitted byte. The first byte can never see
            // a carry since c + a never exceeds the initial interval.
            if let Some(last) = self.output.last_mut() {
                *last = last.wrapping_add(1);
                if *last == 0xFF {
                    self.push(0x00)?;
                }
            }
            // Stacked 0xFF bytes rolled over to 0x00
            while self.st > 0 {
                self.push(0x00)?;
                self.st -= 1;
            }
            self.push((t & 0xFF) as u8)?;
        } else if t == 0xFF {
            self.st += 1;
        } else {
            while self.st > 0 {
                self.push(0xFF)?;
                self.push(0x00)?;
                self.st -= 1;
            }
            self.push(t as u8)?;
        }
        self.c &= 0x7FFFF;
        Ok(())
    }

    /// Terminates the code stream. Further calls are no-ops; further
    /// `encode_bit` calls fail with [`QmError::Finished`].
    pub fn flush(&mut self) -> Result<()> {
        if self.finished {
            return Ok(());
        }

        // Pick the value in [c, c + a) with the most trailing zero bits
        let mut t = (self.c + self.a - 1) & 0xFFFF_0000;
        if t < self.c {
            t += 0x8000;
        }
        self.c = t << self.ct;
        self.byte_out()?;
        self.c <<= 8;
        self.byte_out()?;

        // Trailing zero bytes are implied by the decoder
        while self.output.last() == Some(&0x00) {
            self.output.pop();
        }
        if self.output.last() == Some(&0xFF) {
            self.push(0x00)?;
        }

        self.finished = true;
        debug!("QM encoder flushed {} bytes", self.output.len());
        Ok(())
    }

    /// Flushes and returns the coded stream without a trailing marker.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        self.flush()?;
        Ok(std::mem::take(&mut self.output))
    }

    /// Flushes and returns the coded stream followed by the EOI marker.
    pub fn finish_with_marker(mut self) -> Result<Vec<u8>> {
        self.flush()?;
        let mut output = std::mem::take(&mut self.output);
        output.write_u16::<BigEndian>(EOI_MARKER)?;
        Ok(output)
    }

    /// Flushes and writes the coded stream to `writer`, optionally followed
    /// by the EOI marker. Returns the number of bytes written.
    pub fn write_to<W: Write>(mut self, writer: &mut W, with_marker: bool) -> Result<usize> {
        self.flush()?;
        writer.write_all(&self.output)?;
        let mut written = self.output.len();
        if with_marker {
            writer.write_u16::<BigEndian>(EOI_MARKER)?;
            written += 2;
        }
        writer.flush()?;
        Ok(written)
    }

    /// Bytes emitted so far. Bytes still subject to a carry are not included
    /// until [`flush`](Self::flush).
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// The encoder's own context.
    pub fn context(&self) -> CodingContext {
        self.context
    }

    pub fn a(&self) -> u32 {
        self.a
    }

    pub fn c(&self) -> u32 {
        self.c
    }

    pub fn ct(&self) -> u32 {
        self.ct
    }
}
