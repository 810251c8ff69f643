use std::rc::Rc;

use crate::{
    apm::Apm,
    config::Config,
    context::Context,
    context_model::ContextModel,
    hash_table::{hash2, hash3},
    ilog::Ilog,
    logistic::Stretch,
};

// Predictor -------------------------------------------------------------------------------------------------------- Predictor

/// The top of the ensemble: owns the shared bit/byte context, the context
/// model, and a cascade of seven APMs refining its output.
///
/// The caller alternates p() and update(bit): p() is the 12-bit
/// probability that the next bit is 1, and update(bit) folds the realized
/// bit into every model. The APM cascade corrects local miscalibration
/// the linear mixer cannot: the context model output is refined once
/// under the partial byte, then two rounds of three order-1/2/3 keyed
/// APMs are averaged and blended.
pub struct Predictor {
    ctx:  Context,
    cm:   ContextModel,
    a:    Apm,
    a1:   Apm,
    a2:   Apm,
    a3:   Apm,
    a4:   Apm,
    a5:   Apm,
    a6:   Apm,
    pr:   i32, // Prediction
}
impl Predictor {
    pub fn new() -> Predictor {
        Predictor::with_config(Config::new())
    }

    pub fn with_config(cfg: Config) -> Predictor {
        let st = Rc::new(Stretch::new());
        let ilog = Rc::new(Ilog::new());
        Predictor {
            ctx:  Context::new(),
            cm:   ContextModel::new(cfg.mem, st.clone(), ilog),
            a:    Apm::new(256, st.clone()),
            a1:   Apm::new(0x10000, st.clone()),
            a2:   Apm::new(0x10000, st.clone()),
            a3:   Apm::new(0x10000, st.clone()),
            a4:   Apm::new(0x10000, st.clone()),
            a5:   Apm::new(0x10000, st.clone()),
            a6:   Apm::new(0x10000, st),
            pr:   2048,
        }
    }

    /// Probability that the next bit is 1 (0 to 4095).
    pub fn p(&self) -> i32 {
        assert!(self.pr >= 0 && self.pr < 4096);
        self.pr
    }

    /// Fold in the observed bit and retrain the whole ensemble.
    pub fn update(&mut self, bit: i32) {
        self.ctx.advance(bit);

        let y = bit;
        let pr0 = self.cm.p(&self.ctx);

        let c0 = self.ctx.c0 as u32;
        let c1 = self.ctx.buf(1) as u32;
        let c2 = self.ctx.buf(2) as u32;
        let c3 = self.ctx.buf(3) as u32;

        // Filter the context model output with APMs: one pass keyed on
        // the partial byte, then two rounds of order 1-3 keyed maps
        self.pr = self.a.p(y, 7, pr0, c0);

        let pr1 = self.a1.p(y, 7, pr0, c0 + 256 * c1);
        let pr2 = self.a2.p(y, 7, pr0, c0 ^ (hash2(c1, c2) & 0xffff));
        let pr3 = self.a3.p(y, 7, pr0, c0 ^ (hash3(c1, c2, c3) & 0xffff));
        let pr0 = (pr0 + pr1 + pr2 + pr3 + 2) >> 2;

        let pr1 = self.a4.p(y, 7, self.pr, c0 + 256 * c1);
        let pr2 = self.a5.p(y, 7, self.pr, c0 ^ (hash2(c1, c2) & 0xffff));
        let pr3 = self.a6.p(y, 7, self.pr, c0 ^ (hash3(c1, c2, c3) & 0xffff));
        self.pr = (self.pr + pr1 + pr2 + pr3 + 2) >> 2;

        self.pr = (self.pr + pr0 + 1) >> 1;
    }
}
impl Default for Predictor {
    fn default() -> Predictor {
        Predictor::new()
    }
}
// ----------------------------------------------------------------------------------------------------------------------------------------
