//! Criterion benchmarks for the parallel parameter-search driver.
//!
//! Run with:
//!   cargo bench --bench search

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use bufsqueeze::search::find_best_lzss;
use bufsqueeze::testutil::gen_buffer;

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("lzss_parameter_search");
    group.sample_size(10);

    for &size in &[16_384usize, 65_536] {
        let data = gen_buffer(size, 0x5EED);

        group.throughput(Throughput::Bytes(size as u64));
        for &workers in &[1usize, 4, 8] {
            group.bench_with_input(
                BenchmarkId::new(format!("workers_{workers}"), size),
                &data,
                |b, data| {
                    b.iter(|| find_best_lzss(data, 16, None, workers).unwrap());
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_search);
criterion_main!(benches);
