use std::rc::Rc;

use crate::{
    context::Context,
    logistic::Stretch,
    mixer::Mixer,
    state_table::next_state,
    statemap::StateMap,
};

// Pic Model -------------------------------------------------------------------------------------------------------- Pic Model

/// Models a 1728 by 2376 2-color CCITT bitmap image, left to right scan,
/// MSB first (216 bytes per row). Three contexts are built from the pixels
/// surrounding the predicted one, using rolling registers over the current
/// row and the three rows above (215, 431 and 647 bytes back).
///
/// This is the template for a specialized model: it owns its rolling
/// context, its state table and its StateMaps, trains on each observed
/// bit, and contributes stretched predictions to the Mixer.
pub struct PicModel {
    r0:   u32, // Last 4 rows, bit 8 is over the current pixel
    r1:   u32,
    r2:   u32,
    r3:   u32,
    t:    Vec<u8>,     // cxt -> state
    cxt:  [usize; 3],
    sm:   Vec<StateMap>,
    st:   Rc<Stretch>,
}
impl PicModel {
    pub fn new(st: Rc<Stretch>) -> PicModel {
        PicModel {
            r0:   0,
            r1:   0,
            r2:   0,
            r3:   0,
            t:    vec![0; 0x10200],
            cxt:  [0; 3],
            sm:   vec![StateMap::new(); 3],
            st,
        }
    }

    pub fn mix(&mut self, m: &mut Mixer, ctx: &Context) {
        // update the model
        for i in 0..3 {
            self.t[self.cxt[i]] = next_state(self.t[self.cxt[i]], ctx.y);
        }

        // update the contexts (pixels surrounding the predicted one)
        self.r0 = self.r0.wrapping_mul(2).wrapping_add(ctx.y as u32);
        self.r1 = self.r1.wrapping_mul(2).wrapping_add(((ctx.buf(215) >> (7 - ctx.bpos)) & 1) as u32);
        self.r2 = self.r2.wrapping_mul(2).wrapping_add(((ctx.buf(431) >> (7 - ctx.bpos)) & 1) as u32);
        self.r3 = self.r3.wrapping_mul(2).wrapping_add(((ctx.buf(647) >> (7 - ctx.bpos)) & 1) as u32);
        self.cxt[0] = ((self.r0 & 0x7) | (self.r1 >> 4 & 0x38) | (self.r2 >> 3 & 0xc0)) as usize;
        self.cxt[1] = 0x100 + ((self.r0 & 1) | (self.r1 >> 4 & 0x3e) | (self.r2 >> 2 & 0x40) | (self.r3 >> 1 & 0x80)) as usize;
        self.cxt[2] = 0x200 + ((self.r0 & 0x3f) ^ (self.r1 & 0x3ffe) ^ (self.r2 << 2 & 0x7f00) ^ (self.r3 << 5 & 0xf800)) as usize;

        // predict
        for i in 0..3 {
            let s = self.t[self.cxt[i]];
            let p = self.sm[i].p(ctx.y, s as usize);
            m.add(self.st.get(p));
        }
    }
}
// ----------------------------------------------------------------------------------------------------------------------------------------
