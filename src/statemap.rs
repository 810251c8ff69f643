use crate::state_table::nex;

// State Map -------------------------------------------------------------------------------------------------------------------- State Map

/// A StateMap maps a bit history state (0-255) to a probability that the
/// next bit is 1. After each mapping, the entry used for the previous
/// prediction is nudged toward the observed bit, so adaptation lags one
/// call behind. Entries are 16 bits; p(cx) returns the high 12.
///
/// Each entry starts at the Krichevsky-Trofimov estimate for the state's
/// counts, (n1+1)/(n0+n1+2), with a 64x boost of the surviving count when
/// the other is zero.
#[derive(Clone)]
pub struct StateMap {
    cxt:  usize,    // Context of last prediction
    t:    Vec<u16>, // 256 states -> probability * 64K
}
impl StateMap {
    pub fn new() -> StateMap {
        let mut t = vec![0u16; 256];
        for (i, ti) in t.iter_mut().enumerate() {
            let mut n0 = nex(i as u8, 2) as u32;
            let mut n1 = nex(i as u8, 3) as u32;
            if n0 == 0 { n1 *= 64; }
            if n1 == 0 { n0 *= 64; }
            *ti = (65_536 * (n1 + 1) / (n0 + n1 + 2)) as u16;
        }
        StateMap {
            cxt: 0,
            t,
        }
    }

    /// Train the previous context on bit y, then map state cx to a
    /// probability (0-4095).
    pub fn p(&mut self, y: i32, cx: usize) -> i32 {
        assert!(cx < self.t.len());
        let prev = self.t[self.cxt] as i32;
        self.t[self.cxt] = (prev + (((y << 16) - prev + 128) >> 8)) as u16;
        self.cxt = cx;
        (self.t[cx] >> 4) as i32
    }
}
impl Default for StateMap {
    fn default() -> StateMap {
        StateMap::new()
    }
}
// ----------------------------------------------------------------------------------------------------------------------------------------
