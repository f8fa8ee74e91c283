//! Criterion benchmarks for Snowfall critical paths
//!
//! Benchmarks the per-frame work a host pays:
//! - Field: advancing and pruning live flakes
//! - Compositor: tinting, fading and scaling one mask
//! - Frame: compositing every flake and drawing the canvas

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use image::{Rgba, RgbaImage};
use snowfall::color::TINT;
use snowfall::compositor::{compose, draw_frame, render_flake};
use snowfall::field::SnowField;
use snowfall::TextureSet;

const DT: f64 = 1.0 / 60.0;
const SIDE: u32 = 500;

// =============================================================================
// Test Data Generators
// =============================================================================

/// Generate a star-shaped mask of the given size
fn make_mask(side: u32) -> RgbaImage {
    let c = side / 2;
    RgbaImage::from_fn(side, side, |x, y| {
        if x == c || y == c || x == y || x + y == side - 1 {
            Rgba([255, 255, 255, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

fn make_textures() -> TextureSet {
    let masks = [16, 24, 32, 40].into_iter().map(make_mask).collect();
    TextureSet::from_masks(masks).expect("non-empty set")
}

/// Field with `n` flakes spread over the canvas
fn make_field(n: usize) -> SnowField {
    let mut field = SnowField::seeded(make_textures(), 1);
    let cols = (n as f64).sqrt().ceil() as usize;
    let step = SIDE as f64 / cols.max(1) as f64;
    for i in 0..n {
        let x = (i % cols) as f64 * step;
        let y = (i / cols) as f64 * step;
        field.spawn_at(x, y);
    }
    field
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_field_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("field_tick");

    for n in [10, 100, 1000] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter_batched(
                || make_field(n),
                |mut field| {
                    field.tick(black_box(DT), SIDE as f64, SIDE as f64);
                    field
                },
                criterion::BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_compose(c: &mut Criterion) {
    let mut group = c.benchmark_group("compose");

    for side in [16u32, 32, 64] {
        let mask = make_mask(side);
        group.throughput(Throughput::Elements((side * side) as u64));
        group.bench_with_input(BenchmarkId::new("tint_fade", side), &mask, |b, mask| {
            b.iter(|| compose(black_box(mask), TINT, 0.6, 0.5))
        });
        group.bench_with_input(BenchmarkId::new("render_flake", side), &mask, |b, mask| {
            b.iter(|| render_flake(black_box(mask), 0.6, 0.5))
        });
    }

    group.finish();
}

fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame");
    group.sample_size(20);

    for n in [10, 100, 500] {
        let field = make_field(n);
        let renderables = field.renderables();

        group.bench_with_input(BenchmarkId::new("renderables", n), &field, |b, field| {
            b.iter(|| field.renderables())
        });
        group.bench_with_input(BenchmarkId::new("draw_frame", n), &renderables, |b, r| {
            b.iter(|| draw_frame(SIDE, SIDE, Rgba([0, 0, 0, 255]), black_box(r)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_field_tick, bench_compose, bench_frame);
criterion_main!(benches);
