// src/encode/qm/context.rs

//! Adaptive state of one binary decision stream.

use super::table;

/// Probability state and current MPS of one decision stream.
///
/// A fresh context starts in state 0 with MPS `0`, which is how both the
/// encoder and the decoder begin, so an encoder and a decoder driven with the
/// same sequence of contexts stay in lock step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CodingContext {
    index: u8,
    mps: u8,
}

impl CodingContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context in a given state, e.g. to resume a stream.
    /// Out-of-range indices are clamped to the last state.
    pub fn with_state(index: u8, mps: u8) -> Self {
        Self {
            index: index.min(table::MAX_STATE_INDEX),
            mps: mps & 1,
        }
    }

    /// Current index into the state table.
    pub fn state_index(&self) -> u8 {
        self.index
    }

    /// Bit value currently considered most probable.
    pub fn mps(&self) -> u8 {
        self.mps
    }

    #[inline]
    pub(crate) fn lps(&self) -> u8 {
        self.mps ^ 1
    }

    #[inline]
    pub(crate) fn qe(&self) -> u16 {
        table::qe(self.index)
    }

    /// Adapts after an MPS was coded.
    #[inline]
    pub(crate) fn on_mps(&mut self) {
        self.index = table::next_on_mps(self.index);
    }

    /// Adapts after an LPS was coded, flipping the MPS when the state says so.
    #[inline]
    pub(crate) fn on_lps(&mut self) {
        if table::switch_mps(self.index) {
            self.mps ^= 1;
        }
        self.index = table::next_on_lps(self.index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lps_in_state_zero_flips_mps() {
        let mut ctx = CodingContext::new();
        assert_eq!(ctx.lps(), 1);
        ctx.on_lps();
        assert_eq!(ctx.mps(), 1);
        assert_eq!(ctx.state_index(), 1);
    }

    #[test]
    fn test_mps_run_saturates() {
        let mut ctx = CodingContext::new();
        for _ in 0..64 {
            ctx.on_mps();
        }
        assert_eq!(ctx.state_index(), 13);
        assert_eq!(ctx.qe(), 0x0001);
        assert_eq!(ctx.mps(), 0);
    }

    #[test]
    fn test_with_state_clamps() {
        let ctx = CodingContext::with_state(200, 3);
        assert_eq!(ctx.state_index(), 112);
        assert_eq!(ctx.mps(), 1);
    }
}
