//! Criterion benchmarks for the LZSS codec.
//!
//! Run with:
//!   cargo bench --bench lzss

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use bufsqueeze::lzss::{compress, decompress, to_binary, Params};
use bufsqueeze::testutil::gen_buffer;

fn bench_compress_decompress(c: &mut Criterion) {
    let mut group = c.benchmark_group("lzss_compress_decompress");

    for &size in &[16_384usize, 131_072] {
        let data = gen_buffer(size, 0xC0FFEE);
        let params = Params::new(16, 8, 22).unwrap();

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("compress", size), &data, |b, data| {
            b.iter(|| compress(data, &params));
        });

        let (tokens, _stats) = compress(&data, &params);
        group.bench_with_input(
            BenchmarkId::new("decompress", size),
            &tokens,
            |b, tokens| {
                b.iter(|| decompress(tokens));
            },
        );

        group.bench_with_input(BenchmarkId::new("to_binary", size), &tokens, |b, tokens| {
            b.iter(|| to_binary(tokens, &params).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compress_decompress);
criterion_main!(benches);
