// src/encode/qm/table.rs

//! Probability estimation state machine of the QM-coder (ISO/IEC 10918-1
//! Table D.3). The same 113 states drive both JPEG and JBIG arithmetic
//! coding, so the values must match the standard bit for bit.

/// One probability-estimation state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct State {
    /// LPS sub-interval width estimate
    pub qe: u16,
    /// Next state if the coded symbol was the **LPS**
    pub nlps: u8,
    /// Next state if the coded symbol was the **MPS**
    pub nmps: u8,
    /// If set, toggle the current MPS after coding an LPS
    pub switch: bool,
}

/// Number of states in the table.
pub const STATE_COUNT: usize = 113;

/// Largest valid state index.
pub const MAX_STATE_INDEX: u8 = (STATE_COUNT - 1) as u8;

#[rustfmt::skip]
macro_rules! s { ( $qe:expr , $nlps:expr , $nmps:expr , $sw:expr ) =>
    { State { qe: $qe, nlps: $nlps, nmps: $nmps, switch: $sw != 0 } } }

/// Table D.3: `s!(Qe, Next_Index_LPS, Next_Index_MPS, Switch_MPS)`
#[rustfmt::skip]
pub static QM_STATE_TABLE: [State; STATE_COUNT] = [
    /*  0*/ s!(0x5A1D,   1,   1, 1),
    /*  1*/ s!(0x2586,  14,   2, 0),
    /*  2*/ s!(0x1114,  16,   3, 0),
    /*  3*/ s!(0x080B,  18,   4, 0),
    /*  4*/ s!(0x03D8,  20,   5, 0),
    /*  5*/ s!(0x01DA,  23,   6, 0),
    /*  6*/ s!(0x00E5,  25,   7, 0),
    /*  7*/ s!(0x006F,  28,   8, 0),
    /*  8*/ s!(0x0036,  30,   9, 0),
    /*  9*/ s!(0x001A,  33,  10, 0),
    /* 10*/ s!(0x000D,  35,  11, 0),
    /* 11*/ s!(0x0006,   9,  12, 0),
    /* 12*/ s!(0x0003,  10,  13, 0),
    /* 13*/ s!(0x0001,  12,  13, 0),
    /* 14*/ s!(0x5A7F,  15,  15, 1),
    /* 15*/ s!(0x3F25,  36,  16, 0),
    /* 16*/ s!(0x2CF2,  38,  17, 0),
    /* 17*/ s!(0x207C,  39,  18, 0),
    /* 18*/ s!(0x17B9,  40,  19, 0),
    /* 19*/ s!(0x1182,  42,  20, 0),
    /* 20*/ s!(0x0CEF,  43,  21, 0),
    /* 21*/ s!(0x09A1,  45,  22, 0),
    /* 22*/ s!(0x072F,  46,  23, 0),
    /* 23*/ s!(0x055C,  48,  24, 0),
    /* 24*/ s!(0x0406,  49,  25, 0),
    /* 25*/ s!(0x0303,  51,  26, 0),
    /* 26*/ s!(0x0240,  52,  27, 0),
    /* 27*/ s!(0x01B1,  54,  28, 0),
    /* 28*/ s!(0x0144,  56,  29, 0),
    /* 29*/ s!(0x00F5,  57,  30, 0),
    /* 30*/ s!(0x00B7,  59,  31, 0),
    /* 31*/ s!(0x008A,  60,  32, 0),
    /* 32*/ s!(0x0068,  62,  33, 0),
    /* 33*/ s!(0x004E,  63,  34, 0),
    /* 34*/ s!(0x003B,  32,  35, 0),
    /* 35*/ s!(0x002C,  33,   9, 0),
    /* 36*/ s!(0x5AE1,  37,  37, 1),
    /* 37*/ s!(0x484C,  64,  38, 0),
    /* 38*/ s!(0x3A0D,  65,  39, 0),
    /* 39*/ s!(0x2EF1,  67,  40, 0),
    /* 40*/ s!(0x261F,  68,  41, 0),
    /* 41*/ s!(0x1F33,  69,  42, 0),
    /* 42*/ s!(0x19A8,  70,  43, 0),
    /* 43*/ s!(0x1518,  72,  44, 0),
    /* 44*/ s!(0x1177,  73,  45, 0),
    /* 45*/ s!(0x0E74,  74,  46, 0),
    /* 46*/ s!(0x0BFB,  75,  47, 0),
    /* 47*/ s!(0x09F8,  77,  48, 0),
    /* 48*/ s!(0x0861,  78,  49, 0),
    /* 49*/ s!(0x0706,  79,  50, 0),
    /* 50*/ s!(0x05CD,  48,  51, 0),
    /* 51*/ s!(0x04DE,  50,  52, 0),
    /* 52*/ s!(0x040F,  50,  53, 0),
    /* 53*/ s!(0x0363,  51,  54, 0),
    /* 54*/ s!(0x02D4,  52,  55, 0),
    /* 55*/ s!(0x025C,  53,  56, 0),
    /* 56*/ s!(0x01F8,  54,  57, 0),
    /* 57*/ s!(0x01A4,  55,  58, 0),
    /* 58*/ s!(0x0160,  56,  59, 0),
    /* 59*/ s!(0x0125,  57,  60, 0),
    /* 60*/ s!(0x00F6,  58,  61, 0),
    /* 61*/ s!(0x00CB,  59,  62, 0),
    /* 62*/ s!(0x00AB,  61,  63, 0),
    /* 63*/ s!(0x008F,  61,  32, 0),
    /* 64*/ s!(0x5B12,  65,  65, 1),
    /* 65*/ s!(0x4D04,  80,  66, 0),
    /* 66*/ s!(0x412C,  81,  67, 0),
    /* 67*/ s!(0x37D8,  82,  68, 0),
    /* 68*/ s!(0x2FE8,  83,  69, 0),
    /* 69*/ s!(0x293C,  84,  70, 0),
    /* 70*/ s!(0x2379,  86,  71, 0),
    /* 71*/ s!(0x1EDF,  87,  72, 0),
    /* 72*/ s!(0x1AA9,  87,  73, 0),
    /* 73*/ s!(0x174E,  72,  74, 0),
    /* 74*/ s!(0x1424,  72,  75, 0),
    /* 75*/ s!(0x119C,  74,  76, 0),
    /* 76*/ s!(0x0F6B,  74,  77, 0),
    /* 77*/ s!(0x0D51,  75,  78, 0),
    /* 78*/ s!(0x0BB6,  77,  79, 0),
    /* 79*/ s!(0x0A40,  77,  48, 0),
    /* 80*/ s!(0x5832,  80,  81, 1),
    /* 81*/ s!(0x4D1C,  88,  82, 0),
    /* 82*/ s!(0x438E,  89,  83, 0),
    /* 83*/ s!(0x3BDD,  90,  84, 0),
    /* 84*/ s!(0x34EE,  91,  85, 0),
    /* 85*/ s!(0x2EAE,  92,  86, 0),
    /* 86*/ s!(0x299A,  93,  87, 0),
    /* 87*/ s!(0x2516,  86,  71, 0),
    /* 88*/ s!(0x5570,  88,  89, 1),
    /* 89*/ s!(0x4CA9,  95,  90, 0),
    /* 90*/ s!(0x44D9,  96,  91, 0),
    /* 91*/ s!(0x3E22,  97,  92, 0),
    /* 92*/ s!(0x3824,  99,  93, 0),
    /* 93*/ s!(0x32B4,  99,  94, 0),
    /* 94*/ s!(0x2E17,  93,  86, 0),
    /* 95*/ s!(0x56A8,  95,  96, 1),
    /* 96*/ s!(0x4F46, 101,  97, 0),
    /* 97*/ s!(0x47E5, 102,  98, 0),
    /* 98*/ s!(0x41CF, 103,  99, 0),
    /* 99*/ s!(0x3C3D, 104, 100, 0),
    /*100*/ s!(0x375E,  99,  93, 0),
    /*101*/ s!(0x5231, 105, 102, 0),
    /*102*/ s!(0x4C0F, 106, 103, 0),
    /*103*/ s!(0x4639, 107, 104, 0),
    /*104*/ s!(0x415E, 103,  99, 0),
    /*105*/ s!(0x5627, 105, 106, 1),
    /*106*/ s!(0x50E7, 108, 107, 0),
    /*107*/ s!(0x4B85, 109, 103, 0),
    /*108*/ s!(0x5597, 110, 109, 0),
    /*109*/ s!(0x504F, 111, 107, 0),
    /*110*/ s!(0x5A10, 110, 111, 1),
    /*111*/ s!(0x5522, 112, 109, 0),
    /*112*/ s!(0x59EB, 112, 111, 1),
];

#[inline]
fn state(index: u8) -> &'static State {
    &QM_STATE_TABLE[index as usize]
}

/// LPS probability estimate for `index`.
#[inline]
pub fn qe(index: u8) -> u16 {
    state(index).qe
}

/// Whether coding an LPS in `index` flips the MPS.
#[inline]
pub fn switch_mps(index: u8) -> bool {
    state(index).switch
}

#[inline]
pub fn next_on_lps(index: u8) -> u8 {
    state(index).nlps
}

#[inline]
pub fn next_on_mps(index: u8) -> u8 {
    state(index).nmps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions_stay_in_table() {
        for (i, entry) in QM_STATE_TABLE.iter().enumerate() {
            assert!(entry.nlps <= MAX_STATE_INDEX, "state {} nlps out of range", i);
            assert!(entry.nmps <= MAX_STATE_INDEX, "state {} nmps out of range", i);
            assert!(entry.qe > 0 && entry.qe < 0x8000, "state {} qe {:#06x}", i, entry.qe);
        }
    }

    #[test]
    fn test_table_d3_spot_values() {
        assert_eq!(qe(0), 0x5A1D);
        assert_eq!(next_on_lps(0), 1);
        assert_eq!(next_on_mps(0), 1);
        assert!(switch_mps(0));

        assert_eq!(qe(13), 0x0001);
        assert_eq!(next_on_mps(13), 13);

        assert_eq!(qe(35), 0x002C);
        assert_eq!(next_on_mps(35), 9);

        assert_eq!(qe(112), 0x59EB);
        assert_eq!(next_on_lps(112), 112);
        assert_eq!(next_on_mps(112), 111);
        assert!(switch_mps(112));
    }

    #[test]
    fn test_switch_states() {
        let switching: Vec<usize> = QM_STATE_TABLE
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.switch)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(switching, vec![0, 14, 36, 64, 80, 88, 95, 105, 110, 112]);
    }
}
