use std::iter::repeat;
use std::rc::Rc;

use crate::logistic::{Stretch, squash};

// Adaptive Probability Map -------------------------------------------------------------------------------- Adaptive Probability Map

/// An APM maps an existing probability and a context into a new, refined
/// probability. Also known as Secondary Symbol Estimation (SSE). Each of
/// the n contexts owns 33 bins spanning the stretched probability domain;
/// a prediction is interpolated between the two nearest bins, and after
/// the bit is seen those two bins are pulled toward the outcome.
///
/// Uses 66*n bytes of memory. Context 0 is initialized to the identity
/// mapping and contexts 1..n copy it.
pub struct Apm {
    index:     usize,       // Bin pair used for last prediction
    num_cxts:  usize,       // Number of possible contexts
    t:         Vec<u16>,    // [n][33]: p, context -> p
    s:         Rc<Stretch>,
}
impl Apm {
    pub fn new(n: usize, s: Rc<Stretch>) -> Apm {
        Apm {
            index:     0,
            num_cxts:  n,
            t:         repeat( // Identity mapping, one copy per context
                       (0..33).map(|i| (squash((i - 16) * 128) * 16) as u16)
                       .collect::<Vec<u16>>().into_iter() )
                       .take(n)
                       .flatten()
                       .collect::<Vec<u16>>(),
            s,
        }
    }

    /// Refine pr (0-4095) in context cxt, training the previously used
    /// bin pair on bit y first. rate controls the learning rate
    /// (smaller = faster).
    pub fn p(&mut self, y: i32, rate: i32, pr: i32, cxt: u32) -> i32 {
        assert!(pr >= 0 && pr < 4096);
        assert!((cxt as usize) < self.num_cxts);
        assert!(rate > 0 && rate < 32);
        self.update(y, rate);

        let pr = self.s.get(pr); // -2047 to 2047
        let i_w = pr & 127;      // Interpolation weight (33 points)
        self.index = (((pr + 2048) >> 7) + (cxt as i32) * 33) as usize;

        let l = self.t[self.index] as i32;
        let u = self.t[self.index + 1] as i32;
        (l * (128 - i_w) + u * i_w) >> 11
    }

    fn update(&mut self, y: i32, rate: i32) {
        assert!(y == 0 || y == 1);

        // Target: (y<<16) less a bias that keeps the entry from pinning
        let g = (y << 16) + (y << rate) - y - y;

        let l = self.t[self.index] as i32;
        let u = self.t[self.index + 1] as i32;
        self.t[self.index]     = (l + ((g - l) >> rate)) as u16;
        self.t[self.index + 1] = (u + ((g - u) >> rate)) as u16;
    }
}
// ----------------------------------------------------------------------------------------------------------------------------------------
