use std::rc::Rc;

use crate::{
    context::Context,
    ilog::Ilog,
    logistic::Stretch,
    mixer::Mixer,
    random::Random,
    state_table::nex,
    statemap::StateMap,
};

// Context Map ---------------------------------------------------------------------------------------------------- Context Map

/// Push predictions derived from bit history state s to the mixer, using
/// sm to map s to a probability. Five features per context: the raw logit,
/// the centered probability, directional confidence, and the two
/// asymmetric supports. Returns 1 if the state carries any history.
pub fn mix2(m: &mut Mixer, s: u8, sm: &mut StateMap, y: i32, st: &Stretch) -> i32 {
    let p1 = sm.p(y, s as usize);
    let n0 = -((nex(s, 2) == 0) as i32);
    let n1 = -((nex(s, 3) == 0) as i32);
    let stp = st.get(p1) >> 2;
    m.add(stp);
    let p1 = p1 >> 4;
    let p0 = 255 - p1;
    m.add(p1 - p0);
    m.add(stp * (n1 - n0));
    m.add((p1 & n0) - (p0 & n1));
    m.add((p1 & n1) - (p0 & n0));
    (s > 0) as i32
}

/// Hash bucket, 64 bytes, aligned to a cache line. Contains a hash chain
/// of 7 elements (a 16-bit checksum each plus 7 bit history states) and a
/// queue of the last 2 elements accessed, packed into the low and high
/// nibble of `last`.
///
/// bh[e][0] holds the first-bit history and doubles as the replacement
/// priority (0 = empty); bh[e][1..3] the second bit, bh[e][3..7] the
/// third. For the bucket selected on a byte boundary, bh[e][3] and
/// bh[e][4] are repurposed as a run model: a count-and-flag byte
/// (count*2, +1 once a second byte value has been seen) and the byte.
#[repr(C, align(64))]
struct Entry {
    chk:   [u16; 7],   // Element checksums
    last:  u8,         // Last 2 accesses (0-6) in low, high nibble
    bh:    [[u8; 7]; 7], // Element, bit context -> bit history state
}
impl Entry {
    fn new() -> Entry {
        Entry {
            chk:   [0; 7],
            last:  0,
            bh:    [[0; 7]; 7],
        }
    }

    /// Find the element matching checksum ch. If none matches, replace the
    /// lowest priority element outside the access queue and empty the
    /// queue, so that consecutive misses favor LFU replacement.
    fn get(&mut self, ch: u16) -> usize {
        if self.chk[(self.last & 15) as usize] == ch {
            return (self.last & 15) as usize;
        }
        let mut b = 0xffff;
        let mut bi = 0;
        for i in 0..7 {
            if self.chk[i] == ch {
                self.last = self.last << 4 | i as u8;
                return i;
            }
            let pri = self.bh[i][0] as i32;
            if (self.last & 15) as usize != i && (self.last >> 4) as usize != i && pri < b {
                b = pri;
                bi = i;
            }
        }
        self.last = 0xf0 | bi as u8;
        self.chk[bi] = ch;
        self.bh[bi] = [0; 7];
        bi
    }
}

/// Element address within the bucket table.
type Loc = (usize, usize); // (bucket, element)

/// A ContextMap maps up to C whole-byte contexts to bit histories and
/// mixes their predictions. Buckets are selected by contexts ending after
/// 0, 2 or 5 bits of the current byte, so each modeled byte costs 3 main
/// memory accesses per context with everything else in cache. Each
/// context also carries the built-in run model predicting a repeat of the
/// last byte seen in the same context.
///
/// Per byte: call set(cx) up to C times before the first bit, then mix(m)
/// for every bit. Bit histories for bits 2-7 of a byte seen for the first
/// time are deferred until the context repeats, flagged by a run count
/// of 2.
pub struct ContextMap {
    c:     usize,              // Max number of contexts
    t:     Vec<Entry>,         // Bit histories for bits 0-1, 2-4, 5-7
    cp:    Vec<Option<(Loc, usize)>>, // Current bit history per context
    cp0:   Vec<Loc>,           // First element of the current byte context
    cxt:   Vec<u32>,           // C whole byte contexts (permuted)
    runp:  Vec<Loc>,           // Element holding the run model bytes
    sm:    Vec<StateMap>,      // C maps of state -> p
    cn:    usize,              // Next context to set by set()
    rnd:   Random,
    st:    Rc<Stretch>,
    ilog:  Rc<Ilog>,
}
impl ContextMap {
    /// m = memory in bytes, a power of 2; c = number of contexts.
    pub fn new(m: usize, c: usize, st: Rc<Stretch>, ilog: Rc<Ilog>) -> ContextMap {
        assert!(m >= 64 && m.is_power_of_two());
        let mut t = Vec::with_capacity(m >> 6);
        for _ in 0..m >> 6 {
            t.push(Entry::new());
        }
        ContextMap {
            c,
            t,
            cp:    vec![Some(((0, 0), 0)); c],
            cp0:   vec![(0, 0); c],
            cxt:   vec![0; c],
            runp:  vec![(0, 0); c],
            sm:    vec![StateMap::new(); c],
            cn:    0,
            rnd:   Random::new(),
            st,
            ilog,
        }
    }

    /// Set the next whole byte context to cx. The context is permuted, not
    /// hashed, to spread the distribution of non-hashed input.
    pub fn set(&mut self, cx: u32) {
        let i = self.cn;
        self.cn += 1;
        assert!(i < self.c);
        let cx = cx.wrapping_mul(987_654_323).wrapping_add(i as u32);
        let cx = cx << 16 | cx >> 16;
        self.cxt[i] = cx.wrapping_mul(123_456_791).wrapping_add(i as u32);
    }

    /// Update the model with bit y and predict the next bit to mixer m.
    /// Returns the number of contexts with live histories.
    pub fn mix(&mut self, m: &mut Mixer, ctx: &Context) -> i32 {
        let cc = ctx.c0;
        let bp = ctx.bpos;
        let c1 = ctx.buf(1);
        let y1 = ctx.y;
        let mask = self.t.len() - 1;
        let mut result = 0;

        for i in 0..self.cn {
            // Transition the current history, stochastically slowing
            // saturation of near-deterministic states
            if let Some(((b, e), o)) = self.cp[i] {
                let mut ns = nex(self.t[b].bh[e][o], y1 as usize) as i32;
                if ns >= 204 && self.rnd.next().wrapping_shl(((452 - ns) >> 3) as u32) != 0 {
                    ns -= 4;
                }
                self.t[b].bh[e][o] = ns as u8;
            }

            // Update context pointers
            let (rb, re) = self.runp[i];
            if bp > 1 && self.t[rb].bh[re][3] == 0 {
                self.cp[i] = None;
            }
            else if bp == 1 || bp == 3 || bp == 6 {
                self.cp[i] = Some((self.cp0[i], 1 + (cc & 1) as usize));
            }
            else if bp == 4 || bp == 7 {
                self.cp[i] = Some((self.cp0[i], 3 + (cc & 3) as usize));
            }
            else { // bpos = 0, 2 or 5: select a new bucket
                let chk = (self.cxt[i] >> 16) as u16;
                let bkt = self.cxt[i].wrapping_add(cc as u32) as usize & mask;
                let elem = self.t[bkt].get(chk);
                self.cp0[i] = (bkt, elem);
                self.cp[i] = Some(((bkt, elem), 0));

                if bp == 0 {
                    // A run count of 2 flags histories for bits 2-7 of
                    // the previous byte as pending; rebuild them now
                    if self.t[bkt].bh[elem][3] == 2 {
                        let c = self.t[bkt].bh[elem][4] as i32 + 256;
                        let b1 = self.cxt[i].wrapping_add((c >> 6) as u32) as usize & mask;
                        let e1 = self.t[b1].get(chk);
                        let p = &mut self.t[b1].bh[e1];
                        p[0] = 1 + ((c >> 5) & 1) as u8;
                        p[1 + ((c >> 5) & 1) as usize] = 1 + ((c >> 4) & 1) as u8;
                        p[3 + ((c >> 4) & 3) as usize] = 1 + ((c >> 3) & 1) as u8;
                        let b2 = self.cxt[i].wrapping_add((c >> 3) as u32) as usize & mask;
                        let e2 = self.t[b2].get(chk);
                        let p = &mut self.t[b2].bh[e2];
                        p[0] = 1 + ((c >> 2) & 1) as u8;
                        p[1 + ((c >> 2) & 1) as usize] = 1 + ((c >> 1) & 1) as u8;
                        p[3 + ((c >> 1) & 3) as usize] = 1 + (c & 1) as u8;
                        self.t[bkt].bh[elem][6] = 0;
                    }

                    // Update the run of the previous byte context
                    let (rb, re) = self.runp[i];
                    let count = self.t[rb].bh[re][3];
                    if count == 0 { // new context
                        self.t[rb].bh[re][3] = 2;
                        self.t[rb].bh[re][4] = c1 as u8;
                    }
                    else if self.t[rb].bh[re][4] != c1 as u8 { // different byte
                        self.t[rb].bh[re][3] = 1;
                        self.t[rb].bh[re][4] = c1 as u8;
                    }
                    else if count < 254 { // same byte
                        self.t[rb].bh[re][3] = count + 2;
                    }
                    else if count == 255 {
                        self.t[rb].bh[re][3] = 128;
                    }
                    self.runp[i] = (bkt, elem);
                }
            }

            // Predict from the last byte seen in this context
            let (rb, re) = self.runp[i];
            let rc = self.t[rb].bh[re][3] as i32;
            let rbyte = self.t[rb].bh[re][4] as i32;
            if (rbyte + 256) >> (8 - bp) == cc {
                let sgn = ((rbyte >> (7 - bp)) & 1) * 2 - 1; // + for 1, - for 0
                m.add(sgn * (self.ilog.get(rc as u16 + 1) << (2 + (!rc & 1))));
            }
            else {
                m.add(0);
            }

            // Predict from the bit history
            let s = self.cp[i].map_or(0, |((b, e), o)| self.t[b].bh[e][o]);
            result += mix2(m, s, &mut self.sm[i], y1, &self.st);
        }
        if bp == 7 {
            self.cn = 0;
        }
        result
    }
}
// ----------------------------------------------------------------------------------------------------------------------------------------
