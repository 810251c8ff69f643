use std::cmp::min;
use std::rc::Rc;

use crate::{
    context::Context,
    ilog::Ilog,
    logistic::Stretch,
    mixer::Mixer,
    stationary_map::SmallStationaryContextMap,
};

// Match Model ---------------------------------------------------------------------------------------------------- Match Model

/// Longest allowed match.
const MAX_LEN: usize = 65_534;

/// Finds the most recent occurrence of the current high-order context and
/// predicts the bits that followed it, with confidence growing in the
/// match length. A hash of the last bytes indexes a position table; once
/// a match is found it is extended byte by byte until a bit mismatches.
///
/// This model is not part of the default ensemble; like PicModel it plugs
/// into any Mixer-driven loop that wants it.
pub struct MatchModel {
    t:       Vec<u32>, // Context hash -> last position
    h:       usize,    // Rolling context hash
    ptr:     u32,      // Points to the next byte of the match, if any
    len:     usize,    // Length of match, or 0
    result:  usize,
    scm:     SmallStationaryContextMap,
    ilog:    Rc<Ilog>,
}
impl MatchModel {
    /// n = entries in the position table, a power of 2.
    pub fn new(n: usize, st: Rc<Stretch>, ilog: Rc<Ilog>) -> MatchModel {
        assert!(n.is_power_of_two());
        MatchModel {
            t:       vec![0; n],
            h:       0,
            ptr:     0,
            len:     0,
            result:  0,
            scm:     SmallStationaryContextMap::new(0x20000, st),
            ilog,
        }
    }

    /// Update the match and push predictions; returns the match length.
    pub fn mix(&mut self, m: &mut Mixer, ctx: &Context) -> usize {
        if ctx.bpos == 0 {
            self.h = self.h.wrapping_mul(997 * 8)
                .wrapping_add(ctx.buf(1) as usize + 1) & (self.t.len() - 1);
            if self.len > 0 {
                self.len += 1;
                self.ptr = self.ptr.wrapping_add(1);
            }
            else { // find a match
                self.ptr = self.t[self.h];
                if self.ptr != 0 && ctx.pos.wrapping_sub(self.ptr) < ctx.buf.len() as u32 {
                    while self.len < MAX_LEN
                    && ctx.buf(self.len as u32 + 1)
                       == ctx.buf.get(self.ptr.wrapping_sub(self.len as u32 + 1)) as i32 {
                        self.len += 1;
                    }
                }
            }
            self.t[self.h] = ctx.pos;
            self.result = self.len;
            self.scm.set(ctx.pos);
        }

        // predict
        if self.len > MAX_LEN {
            self.len = MAX_LEN;
        }
        let mut sgn = 0;
        if self.len > 0
        && ctx.buf(1) == ctx.buf.get(self.ptr.wrapping_sub(1)) as i32
        && ctx.c0 == (ctx.buf.get(self.ptr) as i32 + 256) >> (8 - ctx.bpos) {
            sgn = if (ctx.buf.get(self.ptr) as i32 >> (7 - ctx.bpos)) & 1 != 0 { 1 } else { -1 };
        }
        else {
            self.len = 0;
        }
        m.add(sgn * 4 * self.ilog.get(self.len as u16));
        m.add(sgn * 64 * min(self.len, 32) as i32);
        self.scm.mix(m, ctx, 7);
        self.result
    }

    pub fn len(&self) -> usize {
        self.len
    }
}
// ----------------------------------------------------------------------------------------------------------------------------------------
