//! Scene generation.
//!
//! A [`Scene`] is the immutable bundle chosen once per generation: the
//! shuffled palette, the noise preset, the line thickness and the copies of
//! the config values every particle step needs. Particles never read the
//! [`SketchConfig`] directly.

use glam::DVec2;
use tracing::debug;

use crate::color::Color;
use crate::config::{Motion, Regeneration, SketchConfig};
use crate::error::SketchError;
use crate::features::Features;
use crate::palette::{NoisePreset, Palette};
use crate::particle::Particle;
use crate::provider::{checked_unit, map_range, NoiseSource, RandomSource};
use crate::weighted::select_weighted;

/// Upper bound (exclusive) for noise seeds drawn during a reroll.
const NOISE_SEED_RANGE: f64 = 100_000.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// 0 for the scene built at start, +1 per regeneration.
    pub generation: u32,
    /// Seed the sketch was started with.
    pub seed: u64,
    /// Seed the noise source currently runs on.
    pub noise_seed: u64,
    pub palette: Palette,
    pub noise: NoisePreset,
    pub thickness: f64,
    pub particle_count: usize,
    pub canvas_size: u32,
    pub lifetime: u32,
    pub phase_step: f64,
    pub size_noise_scale: f64,
    pub color_band: [f64; 2],
    pub max_color_index: usize,
    pub motion: Motion,
    pub background: Color,
}

impl Scene {
    /// Roll a fresh scene: pick a palette, pick a noise preset, draw the
    /// thickness, then shuffle the palette. Draw order is fixed so a seed
    /// always yields the same scene.
    pub fn roll<R>(
        config: &SketchConfig,
        seed: u64,
        generation: u32,
        noise_seed: u64,
        random: &mut R,
    ) -> Result<Self, SketchError>
    where
        R: RandomSource + ?Sized,
    {
        config.validate()?;

        let palette = select_weighted("palettes", &config.palettes, random)?
            .value
            .clone();
        let noise = select_weighted("noise_presets", &config.noise_presets, random)?
            .value
            .clone();
        let [low, high] = config.thickness_range;
        let thickness = map_range(checked_unit(random.random(), "random")?, 0.0, 1.0, low, high);

        let mut scene = Self {
            generation,
            seed,
            noise_seed,
            palette,
            noise,
            thickness,
            particle_count: config.particle_count,
            canvas_size: config.canvas_size,
            lifetime: config.lifetime,
            phase_step: config.phase_step,
            size_noise_scale: config.size_noise_scale,
            color_band: config.color_band,
            max_color_index: config.max_color_index,
            motion: config.motion,
            background: config.background,
        };
        shuffle(&mut scene.palette.colors, random);
        Ok(scene)
    }

    /// Build the scene for the next generation.
    ///
    /// Under [`Regeneration::Hold`] the selection carries over and only the
    /// palette order is reshuffled. Under [`Regeneration::Reroll`] everything
    /// is re-selected and a new noise seed is drawn from the random stream.
    pub fn next_generation<R>(&self, config: &SketchConfig, random: &mut R) -> Result<Self, SketchError>
    where
        R: RandomSource + ?Sized,
    {
        let generation = self.generation.wrapping_add(1);
        match config.regeneration {
            Regeneration::Hold => {
                let mut next = self.clone();
                next.generation = generation;
                shuffle(&mut next.palette.colors, random);
                Ok(next)
            }
            Regeneration::Reroll => {
                let mut next = Self::roll(config, self.seed, generation, self.noise_seed, random)?;
                let draw = checked_unit(random.random(), "random")?;
                next.noise_seed = (draw * NOISE_SEED_RANGE) as u64;
                Ok(next)
            }
        }
    }

    #[inline]
    pub fn noise_scale(&self) -> f64 {
        self.noise.scale
    }

    /// Palette index for a particle born at `position`.
    ///
    /// Noise is stretched onto `color_band` and clamped to
    /// `[0, min(max_color_index, palette.len() - 1)]`, so the band's tails
    /// pile onto the first and last allowed colors.
    pub fn color_index<N>(&self, position: DVec2, noise: &N) -> Result<usize, SketchError>
    where
        N: NoiseSource + ?Sized,
    {
        let scaled = position * self.noise_scale();
        let n = checked_unit(noise.noise2(scaled.x, scaled.y), "noise")?;
        let [low, high] = self.color_band;
        let cap = self.max_color_index.min(self.palette.len().saturating_sub(1));
        Ok(map_range(n, 0.0, 1.0, low, high).clamp(0.0, cap as f64) as usize)
    }

    /// Color for a palette index, falling back to the background.
    #[inline]
    pub fn color(&self, index: usize) -> Color {
        self.palette.get(index).unwrap_or(self.background)
    }

    /// Spawn `particle_count` particles uniformly over `[-0.5, 1.5) * canvas_size`
    /// on each axis, so some start outside the visible canvas.
    pub fn spawn<R, N>(&self, random: &mut R, noise: &N) -> Result<Vec<Particle>, SketchError>
    where
        R: RandomSource + ?Sized,
        N: NoiseSource + ?Sized,
    {
        let size = self.canvas_size as f64;
        let mut particles = Vec::with_capacity(self.particle_count);
        for _ in 0..self.particle_count {
            let x = checked_unit(random.random(), "random")? * 2.0 - 0.5;
            let y = checked_unit(random.random(), "random")? * 2.0 - 0.5;
            particles.push(Particle::new(DVec2::new(x * size, y * size), self, noise)?);
        }
        debug!(
            target: "scene",
            generation = self.generation,
            count = particles.len(),
            "spawned particles over [{}, {})",
            -0.5 * size,
            1.5 * size
        );
        Ok(particles)
    }

    /// Metadata record describing this scene.
    pub fn features(&self) -> Features {
        Features {
            particle_count: self.particle_count,
            palette: self.palette.name.clone(),
            seed: self.seed,
            line_thickness: format!("{:.2}", self.thickness),
            noise_scale: format!("{:.5}", self.noise.scale),
            noise_type: self.noise.name.clone(),
            generation: self.generation,
        }
    }
}

/// Seeded Fisher-Yates shuffle in place.
pub fn shuffle<T, R>(items: &mut [T], random: &mut R)
where
    R: RandomSource + ?Sized,
{
    for i in (1..items.len()).rev() {
        let j = ((random.random() * (i + 1) as f64) as usize).min(i);
        items.swap(i, j);
    }
}
