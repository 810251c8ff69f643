use paqmix::{Config, Predictor};

/// Linear congruential generator for reproducible pseudorandom streams.
struct Rand {
    state: u32,
}
impl Rand {
    fn seed(x: u32) -> Rand {
        Rand { state: x }
    }
    fn next_byte(&mut self) -> u8 {
        self.state = self.state.wrapping_mul(214_013).wrapping_add(2_531_011);
        (self.state >> 16) as u8
    }
}

fn small() -> Predictor {
    Predictor::with_config(Config::new().memory(0).unwrap())
}

/// Feed bytes MSB first, recording (p, bit) for every bit.
fn feed(p: &mut Predictor, bytes: &[u8], log: &mut Vec<(i32, i32)>) {
    for &byte in bytes {
        for i in (0..8).rev() {
            let bit = ((byte >> i) & 1) as i32;
            let pr = p.p();
            assert!((0..4096).contains(&pr));
            log.push((pr, bit));
            p.update(bit);
        }
    }
}

#[test]
fn starts_uniform() {
    let p = small();
    assert_eq!(p.p(), 2048);
}

#[test]
fn all_zeros_converges_low() {
    let mut p = small();
    let mut log = Vec::new();
    feed(&mut p, &vec![0u8; 128], &mut log); // 1024 bits

    // Settled well below uniform shortly in, and far below by the end
    for &(pr, _) in &log[128..] {
        assert!(pr < 512, "p = {pr} after convergence window");
    }
    for &(pr, _) in &log[512..] {
        assert!(pr < 200, "p = {pr} late in an all-zero stream");
    }
}

#[test]
fn alternating_pattern_learned() {
    let mut p = small();
    let mut log = Vec::new();
    feed(&mut p, &vec![0x55u8; 128], &mut log); // (01)^512

    // The period-2 structure emerges: late predictions are confident in
    // the right direction at both phases
    for &(pr, bit) in &log[log.len() - 256..] {
        if bit == 1 {
            assert!(pr > 3000, "expected confident 1, p = {pr}");
        }
        else {
            assert!(pr < 1100, "expected confident 0, p = {pr}");
        }
    }
}

#[test]
fn repeated_byte_learned() {
    let mut p = small();
    let mut log = Vec::new();
    feed(&mut p, &vec![0x41u8; 256], &mut log);

    for &(pr, bit) in &log[log.len() - 512..] {
        if bit == 1 {
            assert!(pr > 3000, "expected confident 1, p = {pr}");
        }
        else {
            assert!(pr < 1000, "expected confident 0, p = {pr}");
        }
    }
}

#[test]
fn replay_is_deterministic() {
    let mut rand = Rand::seed(1);
    let data: Vec<u8> = (0..2048).map(|_| rand.next_byte()).collect();

    let mut p1 = small();
    let mut p2 = small();
    let mut log1 = Vec::new();
    let mut log2 = Vec::new();
    feed(&mut p1, &data, &mut log1);
    feed(&mut p2, &data, &mut log2);

    assert_eq!(log1, log2);
}

#[test]
fn random_stream_stays_calibrated() {
    let mut rand = Rand::seed(99);
    let data: Vec<u8> = (0..4096).map(|_| rand.next_byte()).collect();

    let mut p = small();
    let mut log = Vec::new();
    feed(&mut p, &data, &mut log);

    // On incompressible input the average prediction hovers near 1/2
    let window = &log[log.len() / 2..];
    let mean: i64 = window.iter().map(|&(pr, _)| pr as i64).sum::<i64>() / window.len() as i64;
    assert!((1700..=2400).contains(&mean), "mean p = {mean}");
}

#[test]
fn abrupt_transition_recovers() {
    let mut p = small();
    let mut log = Vec::new();
    feed(&mut p, &vec![0x00u8; 512], &mut log);
    log.clear();
    feed(&mut p, &vec![0xFFu8; 512], &mut log);

    // The models swing toward the new regime: confident within the
    // first tens of bytes, pinned by the end
    let early = &log[32 * 8..64 * 8];
    let mean: i64 = early.iter().map(|&(pr, _)| pr as i64).sum::<i64>() / early.len() as i64;
    assert!(mean > 2500, "mean p = {mean} soon after transition");

    for &(pr, _) in &log[log.len() - 1024..] {
        assert!(pr > 3000, "p = {pr} late in an all-ones stream");
    }
}

#[test]
fn default_memory_matches_small_on_short_input() {
    // Short streams touch few buckets, so the memory option must not
    // change determinism of the first predictions
    let mut a = Predictor::new();
    let mut b = Predictor::new();
    let mut la = Vec::new();
    let mut lb = Vec::new();
    feed(&mut a, b"the quick brown fox jumps over the lazy dog", &mut la);
    feed(&mut b, b"the quick brown fox jumps over the lazy dog", &mut lb);
    assert_eq!(la, lb);
}
