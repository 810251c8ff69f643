use std::cmp::min;
use std::rc::Rc;

use crate::{
    context::Context,
    context_map::ContextMap,
    ilog::Ilog,
    logistic::Stretch,
    mixer::Mixer,
    run_map::RunContextMap,
};

// Context Model ------------------------------------------------------------------------------------------------ Context Model

/// Block type tag carried by the driver framing ahead of each stream.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Filetype {
    Default,
    Jpeg,
    Exe,
    Text,
}
impl From<u8> for Filetype {
    fn from(byte: u8) -> Filetype {
        match byte {
            1 => Filetype::Jpeg,
            2 => Filetype::Exe,
            3 => Filetype::Text,
            _ => Filetype::Default,
        }
    }
}

/// Combines the context models with a Mixer: an all-orders ContextMap of 9
/// contexts, run models for orders 7, 9 and 10, and seven mixer context
/// selections over the recent bytes, the match of the last two bytes, the
/// model order and the bit position.
///
/// The stream is expected to be framed with a 1-byte filetype tag and a
/// 4-byte big-endian length; both are read back out of the byte queue via
/// a countdown, so the framing stays in the driver and out of the core.
pub struct ContextModel {
    cm:        ContextMap,
    rcm7:      RunContextMap,
    rcm9:      RunContextMap,
    rcm10:     RunContextMap,
    m:         Mixer,
    cxt:       [u32; 16],   // Order 0-11 context hashes
    filetype:  Filetype,
    size:      i32,         // Bytes remaining in block
}
impl ContextModel {
    pub fn new(mem: usize, st: Rc<Stretch>, ilog: Rc<Ilog>) -> ContextModel {
        ContextModel {
            cm:        ContextMap::new(mem * 32, 9, st.clone(), ilog.clone()),
            rcm7:      RunContextMap::new(mem, ilog.clone()),
            rcm9:      RunContextMap::new(mem, ilog.clone()),
            rcm10:     RunContextMap::new(mem, ilog),
            m:         Mixer::new(800, 3088, 7, 128, st),
            cxt:       [0; 16],
            filetype:  Filetype::Default,
            size:      0,
        }
    }

    /// Train on the last bit and predict the next one.
    pub fn p(&mut self, ctx: &Context) -> i32 {
        // Parse filetype and size from the framing
        if ctx.bpos == 0 {
            self.size -= 1;
            if self.size == -1 {
                self.filetype = Filetype::from(ctx.buf(1) as u8);
            }
            if self.size == -5 {
                self.size = ((ctx.buf(4) as u32) << 24 | (ctx.buf(3) as u32) << 16
                           | (ctx.buf(2) as u32) << 8  |  ctx.buf(1) as u32) as i32;
                if self.filetype == Filetype::Exe {
                    self.size += 8;
                }
            }
        }

        self.m.update(ctx.y);
        self.m.add(256);

        if ctx.bpos == 0 {
            for i in (1..16).rev() { // update order 0-11 context hashes
                self.cxt[i] = self.cxt[i-1].wrapping_mul(257)
                    .wrapping_add((ctx.c4 & 255) + 1);
            }
            for i in 0..7 {
                self.cm.set(self.cxt[i]);
            }
            self.rcm7.set(self.cxt[7], ctx);
            self.cm.set(self.cxt[8]);
            self.rcm9.set(self.cxt[10], ctx);
            self.rcm10.set(self.cxt[12], ctx);
            self.cm.set(self.cxt[14]);
        }
        let mut order = self.cm.mix(&mut self.m, ctx);

        self.rcm7.mix(&mut self.m, ctx);
        self.rcm9.mix(&mut self.m, ctx);
        self.rcm10.mix(&mut self.m, ctx);

        order -= 2;
        if order < 0 {
            order = 0;
        }

        let c1 = ctx.buf(1);
        let c2 = ctx.buf(2);
        let c3 = ctx.buf(3);

        self.m.set((c1 + 8) as usize, 264);
        self.m.set(ctx.c0 as usize, 256);
        self.m.set((order
            + 8 * ((ctx.c4 >> 5) & 7) as i32
            + 64 * (c1 == c2) as i32
            + 128 * (self.filetype == Filetype::Exe) as i32) as usize, 256);
        self.m.set(c2 as usize, 256);
        self.m.set(c3 as usize, 256);

        // Bit position tag
        let c = if ctx.bpos != 0 {
            let mut c = ctx.c0 << (8 - ctx.bpos);
            if ctx.bpos == 1 {
                c += c3 / 2;
            }
            min(ctx.bpos, 5) * 256 + c1 / 32 + 8 * (c2 / 32) + (c & 192)
        }
        else {
            c3 / 128 + ((ctx.c4 >> 31) as i32) * 2 + 4 * (c2 / 64) + (c1 & 240)
        };
        self.m.set(c as usize, 1536);

        self.m.p(ctx.y)
    }
}
// ----------------------------------------------------------------------------------------------------------------------------------------
