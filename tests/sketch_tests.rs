//! End-to-end tests for the sketch lifecycle.
//!
//! These drive a full [`Sketch`] through start, ticks, regeneration and the
//! frame horizon, checking the observable state after each phase.

use driftfield::prelude::*;
use driftfield::{Particle, Scene};

fn mono() -> Palette {
    Palette::from_hex("Mono", &["#000000", "#ffffff"]).unwrap()
}

fn small(config: SketchConfig) -> SketchConfig {
    config.with_canvas_size(96).with_particle_count(150)
}

fn run(sketch: &mut Sketch, ticks: usize) -> Vec<TickOutcome> {
    (0..ticks).map(|_| sketch.tick().unwrap()).collect()
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_same_seed_same_frames() {
    let config = small(SketchConfig::classic());
    let mut a = Sketch::new(config.clone()).unwrap();
    let mut b = Sketch::new(config).unwrap();
    a.start(42).unwrap();
    b.start(42).unwrap();

    for frame in 0..60 {
        a.tick().unwrap();
        b.tick().unwrap();
        assert_eq!(a.field().particles(), b.field().particles(), "frame {frame}");
    }
    assert_eq!(a.surface().as_bytes(), b.surface().as_bytes());
    assert_eq!(a.last_features(), b.last_features());
}

#[test]
fn test_different_seeds_diverge() {
    let config = small(SketchConfig::classic());
    let mut a = Sketch::new(config.clone()).unwrap();
    let mut b = Sketch::new(config).unwrap();
    a.start(1).unwrap();
    b.start(2).unwrap();
    run(&mut a, 20);
    run(&mut b, 20);
    assert_ne!(a.field().particles(), b.field().particles());
    assert_ne!(a.surface().as_bytes(), b.surface().as_bytes());
}

#[test]
fn test_restart_reproduces_run() {
    let mut sketch = Sketch::new(small(SketchConfig::spiral())).unwrap();
    sketch.start(9).unwrap();
    run(&mut sketch, 15);
    let first = sketch.surface().as_bytes().to_vec();

    sketch.start(9).unwrap();
    run(&mut sketch, 15);
    assert_eq!(sketch.surface().as_bytes(), first.as_slice());
}

// ============================================================================
// Scene initialization
// ============================================================================

#[test]
fn test_seed_42_mono_scene() {
    let config = SketchConfig::classic()
        .with_palettes(vec![Weighted::new(mono(), 1.0)])
        .with_noise_presets(vec![Weighted::new(NoisePreset::new("Medium", 0.0007), 1.0)])
        .with_particle_count(5000);

    let mut sketch = Sketch::new(config.clone()).unwrap();
    sketch.start(42).unwrap();

    let scene = sketch.scene().unwrap();
    assert_eq!(scene.canvas_size, 800);
    assert_eq!(scene.noise_scale(), 0.0007);
    let mut colors = scene.palette.colors.clone();
    colors.sort_by_key(|c| c.to_array());
    assert_eq!(colors, vec![Color::BLACK, Color::WHITE]);

    assert_eq!(sketch.field().len(), 5000);
    for p in sketch.field() {
        assert_eq!(p.life, 800);
        assert_eq!(p.size, 0.0);
        assert!(p.color < 2);
        assert!((-400.0..1200.0).contains(&p.position.x));
        assert!((-400.0..1200.0).contains(&p.position.y));
    }

    let mut again = Sketch::new(config).unwrap();
    again.start(42).unwrap();
    assert_eq!(again.scene().unwrap().palette, sketch.scene().unwrap().palette);
}

#[test]
fn test_features_reported_per_generation() {
    let log = FeatureLog::new();
    let config = small(SketchConfig::snapshot()).with_lifetime(5);
    let mut sketch = Sketch::new(config).unwrap().with_feature_sink(log.clone());
    sketch.start(3).unwrap();
    run(&mut sketch, 16);

    let records = log.records();
    // Generations start on ticks 1, 6, 11 and 16.
    assert_eq!(records.len(), 4);
    for (i, record) in records.iter().enumerate() {
        assert_eq!(record.generation, i as u32);
        assert_eq!(record.seed, 3);
        assert_eq!(record.particle_count, 150);
        assert_eq!(record.palette, "Classic");
    }
}

// ============================================================================
// Particle lifecycle
// ============================================================================

#[test]
fn test_single_particle_last_step() {
    let config = SketchConfig::classic();
    let mut random = SeededRandom::new(4);
    let noise = PerlinNoise::new(4);
    let scene = Scene::roll(&config, 4, 0, 4, &mut random).unwrap();

    let mut particle = Particle::new(DVec2::new(400.0, 400.0), &scene, &noise).unwrap();
    particle.life = 1;
    particle.advance(&scene, &noise).unwrap();
    assert_eq!(particle.life, 0);
    assert!(particle.is_dead());
    assert_eq!(particle.size, 0.0);
}

#[test]
fn test_every_particle_lives_exactly_lifetime_ticks() {
    let config = small(SketchConfig::classic()).with_lifetime(25);
    let mut sketch = Sketch::new(config).unwrap();
    sketch.start(12).unwrap();

    for tick in 1..25 {
        sketch.tick().unwrap();
        assert_eq!(sketch.field().len(), 150, "tick {tick}");
        assert!(sketch.field().iter().all(|p| p.life == 25 - tick));
        assert!(sketch.field().iter().all(|p| p.size >= 0.0));
    }
    sketch.tick().unwrap();
    assert!(sketch.field().is_empty());
}

// ============================================================================
// Regeneration
// ============================================================================

#[test]
fn test_regeneration_refills_to_configured_count() {
    let config = small(SketchConfig::classic()).with_lifetime(10);
    let mut sketch = Sketch::new(config).unwrap();
    sketch.start(77).unwrap();
    run(&mut sketch, 10);
    assert!(sketch.field().is_empty());

    sketch.tick().unwrap();
    assert_eq!(sketch.field().len(), 150);
    assert_eq!(sketch.generation(), Some(1));
    // Spawned in [-48, 144) and moved one unit step since.
    for p in sketch.field() {
        assert!(p.position.x >= -49.0 && p.position.x < 145.0);
        assert!(p.position.y >= -49.0 && p.position.y < 145.0);
        assert_eq!(p.life, 9);
    }
}

#[test]
fn test_wave_preset_regenerates_eight_thousand() {
    let config = SketchConfig::wave().with_canvas_size(64).with_lifetime(2);
    let mut sketch = Sketch::new(config).unwrap();
    sketch.start(5).unwrap();
    run(&mut sketch, 2);
    assert!(sketch.field().is_empty());
    sketch.tick().unwrap();
    assert_eq!(sketch.field().len(), 8000);
}

#[test]
fn test_final_frame_survives_until_next_tick() {
    let config = small(SketchConfig::classic()).with_lifetime(8);
    let mut sketch = Sketch::new(config).unwrap();
    sketch.start(21).unwrap();
    run(&mut sketch, 8);
    let drawn = sketch.surface().as_bytes().to_vec();
    assert!(drawn.chunks(4).any(|px| px != [0, 0, 0, 255]));

    // The empty field is only refilled (and the canvas cleared) on the next tick.
    assert!(sketch.field().is_empty());
    assert_eq!(sketch.surface().as_bytes(), drawn.as_slice());
}

// ============================================================================
// Frame horizon
// ============================================================================

#[test]
fn test_freeze_at_800() {
    let config = SketchConfig::classic().with_canvas_size(64).with_particle_count(60);
    let mut sketch = Sketch::new(config).unwrap();
    sketch.start(42).unwrap();

    let outcomes = run(&mut sketch, 800);
    assert_eq!(outcomes[799], TickOutcome::Froze);
    assert!(outcomes[..799].iter().all(|o| *o == TickOutcome::Advanced));
    assert_eq!(sketch.state(), SketchState::Frozen);

    let particles = sketch.field().particles().to_vec();
    let pixels = sketch.surface().as_bytes().to_vec();
    assert_eq!(sketch.tick().unwrap(), TickOutcome::Idle);
    assert_eq!(sketch.field().particles(), particles.as_slice());
    assert_eq!(sketch.surface().as_bytes(), pixels.as_slice());
    assert_eq!(sketch.total_frames(), 800);
}

#[test]
fn test_freeze_keeps_live_field() {
    let config = small(SketchConfig::classic())
        .with_lifetime(1000)
        .with_frame_horizon(FrameHorizon::Freeze(30));
    let mut sketch = Sketch::new(config).unwrap();
    sketch.start(6).unwrap();
    run(&mut sketch, 30);

    let particles = sketch.field().particles().to_vec();
    assert_eq!(particles.len(), 150);
    run(&mut sketch, 5);
    assert_eq!(sketch.field().particles(), particles.as_slice());
}

#[test]
fn test_snapshot_policy_keeps_running() {
    let config = small(SketchConfig::snapshot())
        .with_lifetime(6)
        .with_frame_horizon(FrameHorizon::Snapshot(6));
    let mut sketch = Sketch::new(config).unwrap();
    sketch.start(30).unwrap();

    let outcomes = run(&mut sketch, 18);
    let snapshots: Vec<usize> = outcomes
        .iter()
        .enumerate()
        .filter(|(_, o)| **o == TickOutcome::Snapshot)
        .map(|(i, _)| i + 1)
        .collect();
    assert_eq!(snapshots, vec![6, 12, 18]);
    assert_eq!(sketch.frame(), 0);
    assert_eq!(sketch.total_frames(), 18);
    assert_eq!(sketch.state(), SketchState::Running);
    assert_eq!(sketch.generation(), Some(2));
}

// ============================================================================
// Border
// ============================================================================

#[test]
fn test_border_masks_edges() {
    let config = SketchConfig::spiral()
        .with_canvas_size(100)
        .with_particle_count(3000)
        .with_lifetime(200);
    let mut sketch = Sketch::new(config).unwrap();
    sketch.start(8).unwrap();
    run(&mut sketch, 20);

    let canvas = sketch.surface();
    for i in 0..100 {
        for d in 0..15 {
            assert_eq!(canvas.pixel(d, i), Some(Color::BLACK));
            assert_eq!(canvas.pixel(99 - d, i), Some(Color::BLACK));
            assert_eq!(canvas.pixel(i, d), Some(Color::BLACK));
            assert_eq!(canvas.pixel(i, 99 - d), Some(Color::BLACK));
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

struct Stuck;

impl RandomSource for Stuck {
    fn random(&mut self) -> f64 {
        1.0
    }

    fn reseed(&mut self, _seed: u64) {}
}

/// Noise that answers the same finite value everywhere.
struct Constant(f64);

impl NoiseSource for Constant {
    fn noise2(&self, _x: f64, _y: f64) -> f64 {
        self.0
    }

    fn noise3(&self, _x: f64, _y: f64, _z: f64) -> f64 {
        self.0
    }

    fn reseed(&mut self, _seed: u64) {}
}

#[test]
fn test_tick_before_start() {
    let mut sketch = Sketch::new(small(SketchConfig::classic())).unwrap();
    assert!(matches!(sketch.tick(), Err(SketchError::NotStarted)));
}

#[test]
fn test_out_of_contract_random_is_provider_fault() {
    let config = small(SketchConfig::classic());
    let mut sketch = Sketch::with_parts(config, Canvas::new(96), Stuck, PerlinNoise::default()).unwrap();
    assert!(matches!(sketch.start(1), Err(SketchError::ProviderFault(_))));
    assert_eq!(sketch.state(), SketchState::Uninitialized);
}

#[test]
fn test_out_of_range_noise_is_provider_fault() {
    for value in [1.5, 7.0, -0.25] {
        let config = small(SketchConfig::classic());
        let mut sketch =
            Sketch::with_parts(config, Canvas::new(96), SeededRandom::default(), Constant(value)).unwrap();
        assert!(
            matches!(sketch.start(1), Err(SketchError::ProviderFault(_))),
            "noise {value}"
        );
        assert_eq!(sketch.state(), SketchState::Uninitialized);
        assert!(sketch.field().is_empty());
    }

    // In-range constant noise runs fine and sizes stay under the thickness cap.
    let config = small(SketchConfig::classic()).with_lifetime(20);
    let mut sketch =
        Sketch::with_parts(config, Canvas::new(96), SeededRandom::default(), Constant(0.99)).unwrap();
    sketch.start(1).unwrap();
    for _ in 0..10 {
        sketch.tick().unwrap();
        let thickness = sketch.scene().unwrap().thickness;
        assert!(sketch.field().iter().all(|p| p.size <= thickness));
    }
}

#[test]
fn test_invalid_config_rejected_up_front() {
    let config = SketchConfig::classic().with_particle_count(0);
    assert!(matches!(Sketch::new(config), Err(ConfigError::NotPositive("particle_count"))));

    let config = SketchConfig::classic().with_palettes(vec![Weighted::new(mono(), 0.0)]);
    assert!(Sketch::new(config).is_err());

    let config = SketchConfig::classic().with_canvas_size(1 << 20);
    assert!(matches!(
        Sketch::new(config),
        Err(ConfigError::OutOfRange { name: "canvas_size", .. })
    ));
}

// ============================================================================
// Config files
// ============================================================================

#[test]
fn test_saved_config_reproduces_sketch() {
    let dir = std::env::temp_dir().join("driftfield-config-test");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("spiral.json");

    let config = small(SketchConfig::spiral());
    config.save(&path).unwrap();
    let loaded = SketchConfig::load(&path).unwrap();
    assert_eq!(loaded, config);

    let mut a = Sketch::new(config).unwrap();
    let mut b = Sketch::new(loaded).unwrap();
    a.start(11).unwrap();
    b.start(11).unwrap();
    run(&mut a, 10);
    run(&mut b, 10);
    assert_eq!(a.surface().as_bytes(), b.surface().as_bytes());
    std::fs::remove_file(&path).ok();
}
