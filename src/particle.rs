//! The particle record and its per-step update rule.
//!
//! Each step a particle samples the direction noise at its scaled position and
//! current phase, moves, loses one unit of life, and resizes under an envelope
//! that falls linearly from the scene thickness to zero as life runs out.
//!
//! | Field | Meaning |
//! |-------|---------|
//! | `position` | canvas-space coordinate |
//! | `size` | side of the drawn square, `0` at birth and at death |
//! | `color` | palette index, fixed at creation |
//! | `life` | remaining steps; dead at `<= 0` |
//! | `phase` | third noise coordinate, so the field drifts over time |
//! | `noise_scale` | position scale for the direction noise |

use std::f64::consts::{FRAC_PI_2, TAU};

use glam::DVec2;

use crate::canvas::Surface;
use crate::config::Motion;
use crate::error::SketchError;
use crate::provider::{checked_unit, map_range, NoiseSource};
use crate::scene::Scene;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub position: DVec2,
    pub size: f64,
    pub color: usize,
    pub life: i32,
    pub phase: f64,
    pub noise_scale: f64,
}

impl Particle {
    /// Create a particle at `position`, coloring it from the scene palette.
    pub fn new<N>(position: DVec2, scene: &Scene, noise: &N) -> Result<Self, SketchError>
    where
        N: NoiseSource + ?Sized,
    {
        Ok(Self {
            position,
            size: 0.0,
            color: scene.color_index(position, noise)?,
            life: scene.lifetime as i32,
            phase: 0.0,
            noise_scale: scene.noise_scale(),
        })
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.life <= 0
    }

    /// Advance exactly one step.
    ///
    /// Both noise samples must land in `[0, 1)`; otherwise the particle is
    /// left as it was and [`SketchError::ProviderFault`] is returned.
    pub fn advance<N>(&mut self, scene: &Scene, noise: &N) -> Result<(), SketchError>
    where
        N: NoiseSource + ?Sized,
    {
        let budget = scene.lifetime as f64;
        let life = self.life as f64;
        let remaining = (self.life - 1).max(0) as f64;

        let scaled = self.position * self.noise_scale;
        let mut angle = checked_unit(noise.noise3(scaled.x, scaled.y, self.phase), "noise")? * TAU;

        let step = match scene.motion {
            Motion::Standard => DVec2::from_angle(angle),
            Motion::Spiral {
                start_radius,
                end_radius,
            } => {
                if self.life > 0 {
                    angle += TAU / life;
                }
                let radius = map_range(remaining, budget, 0.0, start_radius, end_radius);
                DVec2::from_angle(angle) * radius
            }
            Motion::Wave {
                amplitude,
                wavelength,
            } => {
                let ripple = amplitude * (TAU * life / wavelength).sin();
                DVec2::from_angle(angle) + DVec2::from_angle(angle + FRAC_PI_2) * ripple
            }
        };
        let position = self.position + step;
        let next_life = self.life - 1;

        // Envelope is taken on the life left after this step, so the final
        // step of a particle always draws nothing.
        let max_size = map_range(next_life.max(0) as f64, budget, 0.0, scene.thickness, 0.0);
        let sized = position * scene.size_noise_scale;
        let size = checked_unit(noise.noise3(sized.x, sized.y, self.phase), "noise")? * max_size;

        self.position = position;
        self.life = next_life;
        self.size = size.max(0.0);
        self.phase += scene.phase_step;
        Ok(())
    }

    /// Draw a borderless square of side `size` centered on the particle.
    pub fn render<S>(&self, scene: &Scene, surface: &mut S)
    where
        S: Surface + ?Sized,
    {
        if self.size > 0.0 {
            surface.fill_square(self.position, self.size, scene.color(self.color));
        }
    }
}
