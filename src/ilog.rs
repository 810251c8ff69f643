// Ilog ---------------------------------------------------------------------------------------------------------------- Ilog

/// ilog(x) = round(log2(x) * 16), 0 <= x < 64K. The table is computed once
/// by numerical integration of 1/x: each step adds 2^29/ln2 / (2i-1) to a
/// fixed-point accumulator and emits its top byte.
pub struct Ilog {
    t: Vec<u8>,
}
impl Ilog {
    pub fn new() -> Ilog {
        let mut t = vec![0u8; 65_536];
        let mut x: u32 = 14_155_776;
        for i in 2..65_536u32 {
            // numerator is 2^29/ln 2; the accumulator wraps near the top
            // of the range, as the table has always done
            x = x.wrapping_add(774_541_002 / (i * 2 - 1));
            t[i as usize] = (x >> 24) as u8;
        }
        Ilog { t }
    }

    pub fn get(&self, x: u16) -> i32 {
        self.t[x as usize] as i32
    }

    /// Extends ilog to 32-bit arguments by dispatching on the high octets.
    pub fn llog(&self, x: u32) -> i32 {
        if x >= 0x1000000 {
            256 + self.get((x >> 16) as u16)
        }
        else if x >= 0x10000 {
            128 + self.get((x >> 8) as u16)
        }
        else {
            self.get(x as u16)
        }
    }
}
impl Default for Ilog {
    fn default() -> Ilog {
        Ilog::new()
    }
}
// --------------------------------------------------------------------------------------------------------------------------------
