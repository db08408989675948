//! The sketch state machine.
//!
//! ```text
//! Uninitialized --start--> Running --horizon (Freeze)--> Frozen
//!                           ^   |
//!                           +---+ horizon (Snapshot): counter reset
//! ```
//!
//! A [`Sketch`] owns the drawing surface, both providers and the particle
//! field. The host calls [`Sketch::start`] once with a seed and then
//! [`Sketch::tick`] once per displayed frame.
//!
//! When a frame leaves the field empty the next scene is not built right
//! away. It is built at the start of the following tick, so the last frame
//! of a generation stays on the surface until the host ticks again.
//!
//! # Example
//!
//! ```ignore
//! use driftfield::prelude::*;
//!
//! let mut sketch = Sketch::new(SketchConfig::classic())?;
//! sketch.start(42)?;
//! while sketch.tick()? != TickOutcome::Froze {}
//! sketch.surface().save("out.png")?;
//! ```

use glam::DVec2;
use tracing::{debug, info, trace};

use crate::canvas::{Canvas, Surface};
use crate::config::{Border, FrameHorizon, SketchConfig};
use crate::error::{ConfigError, SketchError};
use crate::features::{FeatureSink, Features, TracingSink};
use crate::field::ParticleField;
use crate::provider::{NoiseSource, PerlinNoise, RandomSource, SeededRandom};
use crate::scene::Scene;

/// Lifecycle state of a [`Sketch`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SketchState {
    #[default]
    Uninitialized,
    Running,
    /// Reached a [`FrameHorizon::Freeze`] horizon; ticks no longer mutate anything.
    Frozen,
}

/// What a single [`Sketch::tick`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// One frame was drawn.
    Advanced,
    /// One frame was drawn and it hit a snapshot horizon. The surface holds
    /// the image to export; the frame counter has been reset.
    Snapshot,
    /// One frame was drawn and it hit a freeze horizon.
    Froze,
    /// The sketch is frozen; nothing happened.
    Idle,
}

pub struct Sketch<S = Canvas, R = SeededRandom, N = PerlinNoise>
where
    S: Surface,
    R: RandomSource,
    N: NoiseSource,
{
    config: SketchConfig,
    surface: S,
    random: R,
    noise: N,
    sink: Box<dyn FeatureSink>,
    state: SketchState,
    scene: Option<Scene>,
    field: ParticleField,
    /// Frames since start or since the last snapshot.
    frame: u64,
    /// Frames since start, never reset by snapshots.
    total_frames: u64,
    snapshots: u64,
    last_features: Option<Features>,
}

impl Sketch {
    /// Sketch drawing onto a fresh [`Canvas`] with the default providers.
    pub fn new(config: SketchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let canvas = Canvas::new(config.canvas_size);
        Self::with_parts(config, canvas, SeededRandom::default(), PerlinNoise::default())
    }
}

impl<S, R, N> Sketch<S, R, N>
where
    S: Surface,
    R: RandomSource,
    N: NoiseSource,
{
    /// Assemble a sketch from explicit parts.
    ///
    /// The surface must be `config.canvas_size` pixels square.
    pub fn with_parts(config: SketchConfig, surface: S, random: R, noise: N) -> Result<Self, ConfigError> {
        config.validate()?;
        if surface.size() != config.canvas_size {
            return Err(ConfigError::OutOfRange {
                name: "surface size",
                value: surface.size() as f64,
            });
        }
        Ok(Self {
            config,
            surface,
            random,
            noise,
            sink: Box::new(TracingSink),
            state: SketchState::Uninitialized,
            scene: None,
            field: ParticleField::new(),
            frame: 0,
            total_frames: 0,
            snapshots: 0,
            last_features: None,
        })
    }

    /// Replace where per-generation [`Features`] records go.
    pub fn with_feature_sink(mut self, sink: impl FeatureSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn config(&self) -> &SketchConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn state(&self) -> SketchState {
        self.state
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    /// Frames since start or since the last snapshot.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    pub fn snapshots(&self) -> u64 {
        self.snapshots
    }

    pub fn generation(&self) -> Option<u32> {
        self.scene.as_ref().map(|s| s.generation)
    }

    pub fn last_features(&self) -> Option<&Features> {
        self.last_features.as_ref()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Seed both providers with `seed`, roll generation 0 and populate the
    /// field. Calling it again restarts the sketch from scratch.
    ///
    /// On failure the previous scene, field, counters and surface are kept
    /// and the noise is put back on the previous scene's seed.
    pub fn start(&mut self, seed: u64) -> Result<(), SketchError> {
        self.random.reseed(seed);
        self.noise.reseed(seed);
        let started = Scene::roll(&self.config, seed, 0, seed, &mut self.random)
            .and_then(|scene| self.install(scene));
        if let Err(err) = started {
            self.restore_noise();
            return Err(err);
        }

        self.frame = 0;
        self.total_frames = 0;
        self.snapshots = 0;
        self.state = SketchState::Running;
        info!(target: "sketch", seed, preset = %self.config.name, "sketch started");
        Ok(())
    }

    /// Advance one frame.
    pub fn tick(&mut self) -> Result<TickOutcome, SketchError> {
        match self.state {
            SketchState::Uninitialized => return Err(SketchError::NotStarted),
            SketchState::Frozen => return Ok(TickOutcome::Idle),
            SketchState::Running => {}
        }

        if self.field.is_empty() {
            self.regenerate()?;
        }

        let scene = self.scene.as_ref().ok_or(SketchError::NotStarted)?;
        let step = self.field.advance(scene, &self.noise, &mut self.surface)?;
        if let Some(border) = self.config.border {
            draw_border(&mut self.surface, border);
        }

        self.frame += 1;
        self.total_frames += 1;
        trace!(
            target: "sketch",
            frame = self.frame,
            live = self.field.len(),
            expired = step.expired,
            "tick"
        );

        match self.config.frame_horizon {
            FrameHorizon::Freeze(n) if self.frame >= n => {
                self.state = SketchState::Frozen;
                info!(target: "sketch", frame = self.frame, "frame horizon reached, frozen");
                Ok(TickOutcome::Froze)
            }
            FrameHorizon::Snapshot(n) if self.frame >= n => {
                self.frame = 0;
                self.snapshots += 1;
                info!(
                    target: "sketch",
                    snapshot = self.snapshots,
                    total_frames = self.total_frames,
                    "frame horizon reached, snapshot"
                );
                Ok(TickOutcome::Snapshot)
            }
            _ => Ok(TickOutcome::Advanced),
        }
    }

    fn regenerate(&mut self) -> Result<(), SketchError> {
        let current = self.scene.as_ref().ok_or(SketchError::NotStarted)?;
        let next = current.next_generation(&self.config, &mut self.random)?;
        let reseeded = next.noise_seed != current.noise_seed;
        if reseeded {
            self.noise.reseed(next.noise_seed);
        }
        if let Err(err) = self.install(next) {
            if reseeded {
                self.restore_noise();
            }
            return Err(err);
        }
        Ok(())
    }

    /// Put the noise back on the installed scene's seed.
    fn restore_noise(&mut self) {
        if let Some(scene) = &self.scene {
            self.noise.reseed(scene.noise_seed);
        }
    }

    /// Spawn the population, then clear the surface and report the scene.
    /// Nothing is changed unless the spawn succeeds.
    fn install(&mut self, scene: Scene) -> Result<(), SketchError> {
        let particles = scene.spawn(&mut self.random, &self.noise)?;
        self.surface.clear(scene.background);
        self.field.populate(particles);

        let features = scene.features();
        self.sink.record(&features);
        info!(
            target: "scene",
            generation = scene.generation,
            palette = %scene.palette.name,
            noise = %scene.noise.name,
            thickness = scene.thickness,
            particles = self.field.len(),
            "scene generated"
        );
        debug!(
            target: "scene",
            order = ?scene.palette.colors.iter().map(|c| c.to_hex()).collect::<Vec<_>>(),
            noise_seed = scene.noise_seed,
            "palette shuffled"
        );

        self.last_features = Some(features);
        self.scene = Some(scene);
        Ok(())
    }
}

/// Four strips of `border.thickness` centered on the canvas edges.
fn draw_border<S>(surface: &mut S, border: Border)
where
    S: Surface + ?Sized,
{
    let size = surface.size() as f64;
    let half = size * 0.5;
    let t = border.thickness;
    surface.fill_rect(DVec2::new(0.0, half), t, size, border.color);
    surface.fill_rect(DVec2::new(size, half), t, size, border.color);
    surface.fill_rect(DVec2::new(half, 0.0), size, t, border.color);
    surface.fill_rect(DVec2::new(half, size), size, t, border.color);
}
