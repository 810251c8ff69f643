use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use paqmix::{Config, Predictor};

fn mixed_data(len: usize) -> Vec<u8> {
    // Half text-like repetition, half pseudorandom
    let mut data: Vec<u8> = b"the quick brown fox jumps over the lazy dog. "
        .iter().copied().cycle().take(len / 2).collect();
    let mut state = 1u32;
    for _ in 0..len / 2 {
        state = state.wrapping_mul(214_013).wrapping_add(2_531_011);
        data.push((state >> 16) as u8);
    }
    data
}

fn predict_throughput(c: &mut Criterion) {
    let data = mixed_data(1 << 16);
    let mut group = c.benchmark_group("predictor");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.sample_size(10);
    group.bench_function("predict_update_64k", |b| {
        b.iter(|| {
            let mut p = Predictor::with_config(Config::new().memory(0).unwrap());
            let mut acc = 0i64;
            for &byte in &data {
                for i in (0..8).rev() {
                    let bit = ((byte >> i) & 1) as i32;
                    acc += p.p() as i64;
                    p.update(bit);
                }
            }
            black_box(acc)
        })
    });
    group.finish();
}

criterion_group!(benches, predict_throughput);
criterion_main!(benches);
