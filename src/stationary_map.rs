use std::rc::Rc;

use crate::{
    context::Context,
    logistic::Stretch,
    mixer::Mixer,
};

// Small Stationary Context Map -------------------------------------------------------------------- Small Stationary Context Map

/// A direct-indexed table of 16-bit probabilities, one per (context, c0)
/// pair. m is the size in bytes, a power of 2; contexts should be below
/// m/512 (high bits are discarded). The probability under the previous
/// pointer is trained toward each observed bit at the given rate.
pub struct SmallStationaryContextMap {
    t:    Vec<u16>,
    cxt:  usize,
    cp:   usize,
    s:    Rc<Stretch>,
}
impl SmallStationaryContextMap {
    pub fn new(m: usize, s: Rc<Stretch>) -> SmallStationaryContextMap {
        assert!((m / 2).is_power_of_two());
        SmallStationaryContextMap {
            t:    vec![32_768; m / 2],
            cxt:  0,
            cp:   0,
            s,
        }
    }

    pub fn set(&mut self, cx: u32) {
        self.cxt = (cx as usize).wrapping_mul(256) & (self.t.len() - 256);
    }

    pub fn mix(&mut self, m: &mut Mixer, ctx: &Context, rate: i32) {
        let prev = self.t[self.cp] as i32;
        self.t[self.cp] = (prev + (((ctx.y << 16) - prev + (1 << (rate - 1))) >> rate)) as u16;
        self.cp = self.cxt + ctx.c0 as usize;
        m.add(self.s.get((self.t[self.cp] >> 4) as i32));
    }
}
// ----------------------------------------------------------------------------------------------------------------------------------------
