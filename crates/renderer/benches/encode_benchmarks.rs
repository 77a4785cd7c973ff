//! Benchmarks for raster encoding.
//!
//! Run with: cargo bench --package renderer --bench encode_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use colorizer::{colorize, ColorizeMode, ColorizeParams, PackedPixel};
use rand::Rng;
use renderer::{bmp, png};

/// Random noise plane, values in `[0, 1000)`.
fn generate_noise(width: usize, height: usize) -> Vec<f32> {
    let mut rng = rand::thread_rng();
    (0..width * height).map(|_| rng.gen_range(0.0..1000.0)).collect()
}

fn render(samples: &[f32], mode: ColorizeMode) -> Vec<PackedPixel> {
    colorize(samples, &ColorizeParams::new(mode).with_stripes(10.0)).unwrap()
}

fn bench_png(c: &mut Criterion) {
    let mut group = c.benchmark_group("png");

    for size in [256usize, 512, 1024] {
        let samples = generate_noise(size, size);
        group.throughput(Throughput::Elements((size * size) as u64));

        // Greyscale stays under 256 colors and takes the indexed path
        let grey = render(&samples, ColorizeMode::Greyscale);
        group.bench_with_input(BenchmarkId::new("indexed", size), &grey, |b, pixels| {
            b.iter(|| png::create_png_auto(black_box(pixels), size, size).unwrap())
        });

        let nick = render(&samples, ColorizeMode::NickRgb);
        group.bench_with_input(BenchmarkId::new("rgba", size), &nick, |b, pixels| {
            b.iter(|| png::create_png_auto(black_box(pixels), size, size).unwrap())
        });
    }

    group.finish();
}

fn bench_bmp(c: &mut Criterion) {
    let mut group = c.benchmark_group("bmp");

    for size in [256usize, 1024, 2048] {
        let pixels = render(&generate_noise(size, size), ColorizeMode::Roygbiv);
        group.throughput(Throughput::Bytes((size * size * 4) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &pixels, |b, pixels| {
            b.iter(|| bmp::encode_bmp(black_box(pixels), size, size).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_png, bench_bmp);
criterion_main!(benches);
