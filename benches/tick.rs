//! Benchmarks for the CPU frame loop.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::DVec2;

use driftfield::prelude::*;
use driftfield::{ParticleField, Scene};

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");
    group.sample_size(30);

    for count in [1000, 5000, 8000] {
        group.bench_with_input(BenchmarkId::new("particles", count), &count, |b, &count| {
            // Long lifetime so the field never empties mid-measurement.
            let config = SketchConfig::classic()
                .with_particle_count(count)
                .with_lifetime(1_000_000)
                .with_frame_horizon(FrameHorizon::Freeze(u64::MAX));
            let mut sketch = Sketch::new(config).unwrap();
            sketch.start(42).unwrap();
            b.iter(|| black_box(sketch.tick().unwrap()))
        });
    }

    group.finish();
}

fn bench_field_advance(c: &mut Criterion) {
    let config = SketchConfig::spiral().with_lifetime(1_000_000);
    let mut random = SeededRandom::new(7);
    let noise = PerlinNoise::new(7);
    let scene = Scene::roll(&config, 7, 0, 7, &mut random).unwrap();
    let particles = scene.spawn(&mut random, &noise).unwrap();
    let mut canvas = Canvas::new(config.canvas_size);

    c.bench_function("field_advance_spiral_5000", |b| {
        let mut field = ParticleField::from_particles(particles.clone());
        b.iter(|| black_box(field.advance(&scene, &noise, &mut canvas).unwrap()))
    });
}

fn bench_noise(c: &mut Criterion) {
    let noise = PerlinNoise::new(1);
    c.bench_function("perlin_noise3", |b| {
        let mut p = DVec2::ZERO;
        b.iter(|| {
            p += DVec2::new(0.37, 0.11);
            black_box(noise.noise3(p.x * 0.0007, p.y * 0.0007, 0.0))
        })
    });
}

fn bench_rasterize(c: &mut Criterion) {
    let mut canvas = Canvas::new(800);
    let color = Color::rgb(200, 120, 40);
    c.bench_function("fill_square_4px", |b| {
        let mut x = 0.0;
        b.iter(|| {
            x = (x + 1.37) % 800.0;
            canvas.fill_square(black_box(DVec2::new(x, 400.0)), 4.0, color);
        })
    });
}

criterion_group!(benches, bench_tick, bench_field_advance, bench_noise, bench_rasterize);
criterion_main!(benches);
