// In benches/merge_bench.rs

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use dsl2sr::kernels::{analog, bitmerge};

// --- MOCK DATA GENERATION ---

/// Generates one block's worth of channel bitstreams with distinct patterns.
fn generate_channels(probe_count: usize, bytes_per_channel: usize) -> Vec<Vec<u8>> {
    (0..probe_count)
        .map(|p| {
            (0..bytes_per_channel)
                .map(|i| (i as u8).wrapping_mul(31).wrapping_add(p as u8))
                .collect()
        })
        .collect()
}

// --- Benchmark Suite ---

const BENCH_BLOCK_BYTES: usize = 8192; // 64 Ki samples per channel

fn bench_bitmerge(c: &mut Criterion) {
    let mut group = c.benchmark_group("Bitstream Merge");
    group.throughput(criterion::Throughput::Bytes(BENCH_BLOCK_BYTES as u64));

    for probe_count in [8usize, 16, 32] {
        let channels = generate_channels(probe_count, BENCH_BLOCK_BYTES);
        let refs: Vec<&[u8]> = channels.iter().map(Vec::as_slice).collect();
        let mut merged = Vec::new();

        group.bench_function(format!("merge {} probes", probe_count), |b| {
            b.iter(|| {
                bitmerge::merge(black_box(&refs), BENCH_BLOCK_BYTES * 8, &mut merged).unwrap();
                black_box(&merged);
            })
        });
    }

    group.finish();
}

fn bench_analog_repack(c: &mut Criterion) {
    let raw: Vec<u8> = (0..=255u8).cycle().take(BENCH_BLOCK_BYTES * 8).collect();
    let mut out = Vec::new();

    let mut group = c.benchmark_group("Analog Repack");
    group.throughput(criterion::Throughput::Bytes(raw.len() as u64));
    group.bench_function("repack dedicated", |b| {
        b.iter(|| {
            analog::repack(black_box(&raw), 128, 10, &mut out).unwrap();
            black_box(&out);
        })
    });
    group.finish();
}

criterion_group!(benches, bench_bitmerge, bench_analog_repack);
criterion_main!(benches);
