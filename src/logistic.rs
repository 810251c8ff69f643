// Logistic Functions -------------------------------------------------------------------------------------- Logistic Functions

/// Returns p = 4096/(1 + exp(-d/256)) (Inverse of stretch)
/// d = (-2047..2047), p = (0..4095)
pub fn squash(d: i32) -> i32 {
    const SQ_T: [i32; 33] = [
    1,2,3,6,10,16,27,45,73,120,194,310,488,747,1101,
    1546,2047,2549,2994,3348,3607,3785,3901,3975,4022,
    4050,4068,4079,4085,4089,4092,4093,4094];
    if d > 2047  { return 4095; }
    if d < -2047 { return 0;    }
    let i_w = d & 127;
    let d = ((d >> 7) + 16) as usize;
    (SQ_T[d] * (128 - i_w) + SQ_T[d+1] * i_w + 64) >> 7
}

/// Tabulated inverse of squash: ln(p/(1-p)) scaled by 8 bits. The table is
/// filled by sweeping squash across its whole domain, so the two functions
/// invert each other to within table discretization.
pub struct Stretch {
    t: Vec<i16>,
}
impl Stretch {
    pub fn new() -> Stretch {
        let mut t = vec![0i16; 4096];
        let mut pi = 0;
        for x in -2047..=2047i32 {
            let i = squash(x);
            for j in pi..=i {
                t[j as usize] = x as i16;
            }
            pi = i + 1;
        }
        t[4095] = 2047;
        Stretch { t }
    }

    /// Returns d = ln(p/(1-p)), p = (0..4095), d = (-2047..2047)
    pub fn get(&self, p: i32) -> i32 {
        assert!(p >= 0 && p < 4096);
        self.t[p as usize] as i32
    }
}
impl Default for Stretch {
    fn default() -> Stretch {
        Stretch::new()
    }
}
// --------------------------------------------------------------------------------------------------------------------------------
