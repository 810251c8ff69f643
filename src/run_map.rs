use std::rc::Rc;

use crate::{
    context::Context,
    hash_table::Bh,
    ilog::Ilog,
    mixer::Mixer,
};

// Run Context Map ---------------------------------------------------------------------------------------------- Run Context Map

/// Maps a context to the next byte and a repeat count: per context the
/// payload is {count, byte}, with count saturating at 255. m is the size
/// in bytes, a power of 2. The context should be a hash.
pub struct RunContextMap {
    t:     Bh<4>,
    cp:    usize, // Payload offset of the current context
    ilog:  Rc<Ilog>,
}
impl RunContextMap {
    pub fn new(m: usize, ilog: Rc<Ilog>) -> RunContextMap {
        let mut t = Bh::new(m / 4);
        let cp = t.get(0);
        RunContextMap {
            t,
            cp,
            ilog,
        }
    }

    /// Update the run for the old context, then select the new one.
    /// Called once per whole byte.
    pub fn set(&mut self, cx: u32, ctx: &Context) {
        if self.t[self.cp] == 0 || self.t[self.cp + 1] != ctx.buf(1) as u8 {
            self.t[self.cp] = 1;
            self.t[self.cp + 1] = ctx.buf(1) as u8;
        }
        else if self.t[self.cp] < 255 {
            self.t[self.cp] += 1;
        }
        self.cp = self.t.get(cx);
    }

    /// Predict the next bit: if the remembered byte is still consistent
    /// with the partial byte c0, predict its next bit with confidence
    /// rising in the run length, else stay neutral.
    pub fn p(&self, ctx: &Context) -> i32 {
        let b = self.t[self.cp + 1] as i32;
        if (b + 256) >> (8 - ctx.bpos) == ctx.c0 {
            let sgn = ((b >> (7 - ctx.bpos)) & 1) * 2 - 1;
            sgn * self.ilog.get(self.t[self.cp] as u16 + 1) * 8
        }
        else {
            0
        }
    }

    /// Push the prediction; returns whether a run is active.
    pub fn mix(&mut self, m: &mut Mixer, ctx: &Context) -> bool {
        m.add(self.p(ctx));
        self.t[self.cp] != 0
    }
}
// ----------------------------------------------------------------------------------------------------------------------------------------
