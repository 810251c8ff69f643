// Hash Table ------------------------------------------------------------------------------------------------------------ Hash Table

/// Hash 2-5 u32s into one. The multipliers are large odd constants; the
/// final xor folds the high bits back down.
pub fn hash(a: u32, b: u32, c: u32, d: u32, e: u32) -> u32 {
    let h = a.wrapping_mul(200_002_979)
        .wrapping_add(b.wrapping_mul(30_005_491))
        .wrapping_add(c.wrapping_mul(50_004_239))
        .wrapping_add(d.wrapping_mul(70_004_807))
        .wrapping_add(e.wrapping_mul(110_002_499));
    h ^ h >> 9 ^ a >> 2 ^ b >> 3 ^ c >> 4 ^ d >> 5 ^ e >> 6
}
pub fn hash2(a: u32, b: u32) -> u32 {
    hash(a, b, 0xffff_ffff, 0xffff_ffff, 0xffff_ffff)
}
pub fn hash3(a: u32, b: u32, c: u32) -> u32 {
    hash(a, b, c, 0xffff_ffff, 0xffff_ffff)
}

/// Probe limit: one 8-element cache line region per key.
const M: usize = 8;

/// A Bh maps a 32-bit key to an array of B bytes: a 2 byte checksum to
/// detect collisions followed by B-2 payload bytes. The first payload byte
/// doubles as a replacement priority, with 0 marking an unused element.
///
/// The table holds n elements (n a power of two). A lookup probes the 8
/// elements starting at (key*8) mod n: an empty element adopts the key's
/// checksum, a matching element is moved to the front of the region (LRU
/// on hit), and if all 8 probes miss, the lower priority of the last two
/// probed elements is zeroed and replaced. get() returns the byte offset
/// of the payload, past the checksum.
pub struct Bh<const B: usize> {
    t:  Vec<u8>, // Elements
    n:  usize,   // Element count - 1
}
impl<const B: usize> Bh<B> {
    pub fn new(i: usize) -> Bh<B> {
        assert!(B >= 2);
        assert!(i >= M && i.is_power_of_two());
        Bh {
            t:  vec![0; i * B],
            n:  i - 1,
        }
    }

    fn chk(&self, elem: usize) -> u16 {
        u16::from_le_bytes([self.t[elem * B], self.t[elem * B + 1]])
    }
    fn set_chk(&mut self, elem: usize, chk: u16) {
        self.t[elem * B..elem * B + 2].copy_from_slice(&chk.to_le_bytes());
    }

    /// Find or create the element for key; returns its payload offset.
    pub fn get(&mut self, key: u32) -> usize {
        let chk = ((key >> 16 ^ key) & 0xffff) as u16;
        let i = (key as usize).wrapping_mul(M) & self.n;
        let mut j = 0;
        while j < M {
            if self.t[(i + j) * B + 2] == 0 {
                self.set_chk(i + j, chk); // empty, claim it
            }
            if self.chk(i + j) == chk {
                break; // found
            }
            j += 1;
        }
        if j == 0 {
            return i * B + 2; // front
        }
        let mut tmp = [0u8; B]; // element to move to front
        if j == M {
            j -= 1;
            tmp[..2].copy_from_slice(&chk.to_le_bytes());
            // Of the last two probes, evict the lower priority one
            if M > 2 && self.t[(i + j) * B + 2] > self.t[(i + j - 1) * B + 2] {
                j -= 1;
            }
        }
        else {
            tmp.copy_from_slice(&self.t[(i + j) * B..(i + j + 1) * B]);
        }
        self.t.copy_within(i * B..(i + j) * B, (i + 1) * B);
        self.t[i * B..(i + 1) * B].copy_from_slice(&tmp);
        i * B + 2
    }
}
impl<const B: usize> std::ops::Index<usize> for Bh<B> {
    type Output = u8;
    fn index(&self, i: usize) -> &u8 {
        &self.t[i]
    }
}
impl<const B: usize> std::ops::IndexMut<usize> for Bh<B> {
    fn index_mut(&mut self, i: usize) -> &mut u8 {
        &mut self.t[i]
    }
}
// ----------------------------------------------------------------------------------------------------------------------------------------
