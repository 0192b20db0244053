//! Criterion benchmarks for the RLE codec.
//!
//! Run with:
//!   cargo bench --bench rle

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use bufsqueeze::rle::{compress, decompress, to_binary, Params};
use bufsqueeze::testutil::gen_buffer;

fn bench_compress_decompress(c: &mut Criterion) {
    let mut group = c.benchmark_group("rle_compress_decompress");

    for &size in &[16_384usize, 131_072] {
        let data = gen_buffer(size, 0xBADF00D);
        let params = Params::new(8, true, 24).unwrap();

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("compress", size), &data, |b, data| {
            b.iter(|| compress(data, &params));
        });

        let (tokens, mut stats) = compress(&data, &params);
        stats.analyze_sentinel(&tokens);
        group.bench_with_input(
            BenchmarkId::new("decompress", size),
            &tokens,
            |b, tokens| {
                b.iter(|| decompress(tokens, &params));
            },
        );

        group.bench_with_input(BenchmarkId::new("to_binary", size), &tokens, |b, tokens| {
            b.iter(|| to_binary(tokens, &stats, &params).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compress_decompress);
criterion_main!(benches);
