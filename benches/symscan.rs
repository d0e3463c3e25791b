use criterion::{criterion_group, criterion_main, Criterion};
use image::{Rgb, RgbImage};
use std::hint::black_box;
use std::sync::Arc;
use symscan::image::io::encode_png;
use symscan::{suppress, BoundingBox, Detector, ScanConfig, ThumbnailOracle, WindowGrid};

fn make_image(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let value = ((x * 13) ^ (y * 7) ^ (x * y)) & 0xFF;
        Rgb([value as u8, value as u8, 255 - value as u8])
    })
}

fn bench_scan(c: &mut Criterion) {
    let blueprint = make_image(512, 512);
    let reference = image::imageops::crop_imm(&blueprint, 120, 100, 48, 48).to_image();
    let blueprint = encode_png(&blueprint).unwrap();
    let reference = encode_png(&reference).unwrap();

    let oracle = Arc::new(ThumbnailOracle::default());
    let sequential = Detector::new(oracle.clone());
    c.bench_function("scan_blueprint_512_seq", |b| {
        b.iter(|| {
            sequential
                .scan_blueprint(black_box(&reference), black_box(&blueprint))
                .unwrap()
        })
    });

    let parallel = Detector::new(oracle).with_scan_config(ScanConfig {
        parallel: true,
        ..ScanConfig::default()
    });
    c.bench_function("scan_blueprint_512_par", |b| {
        b.iter(|| {
            parallel
                .scan_blueprint(black_box(&reference), black_box(&blueprint))
                .unwrap()
        })
    });
}

fn bench_suppress(c: &mut Criterion) {
    let grid = WindowGrid::new(2048, 2048, 64, 64, 0.5);
    let boxes: Vec<BoundingBox> = grid
        .iter()
        .enumerate()
        .map(|(idx, (x, y))| BoundingBox {
            x,
            y,
            width: 64,
            height: 64,
            score: 0.85 + ((idx * 7919) % 1000) as f32 / 10_000.0,
        })
        .collect();

    c.bench_function("suppress_dense_grid", |b| {
        b.iter(|| suppress(black_box(&boxes), 0.1))
    });
}

criterion_group!(benches, bench_scan, bench_suppress);
criterion_main!(benches);
