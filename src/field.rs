//! The live particle population of one generation.
//!
//! Each frame every particle is drawn at its current state and then stepped.
//! The stepped copies go into a fresh buffer which is filtered for liveness
//! afterwards, so no survivor is skipped or stepped twice and survivors keep
//! their relative order. Drawing waits until every step has succeeded.

use tracing::trace;

use crate::canvas::Surface;
use crate::error::SketchError;
use crate::particle::Particle;
use crate::provider::NoiseSource;
use crate::scene::Scene;

/// Counts from one frame of [`ParticleField::advance`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FieldStep {
    /// Particles drawn and stepped this frame.
    pub advanced: usize,
    /// Particles removed because their life ran out.
    pub expired: usize,
}

#[derive(Clone, Debug, Default)]
pub struct ParticleField {
    particles: Vec<Particle>,
}

impl ParticleField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_particles(particles: Vec<Particle>) -> Self {
        Self { particles }
    }

    /// Replace the population with a freshly spawned one.
    pub fn populate(&mut self, particles: Vec<Particle>) {
        self.particles = particles;
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }

    /// Draw then step every particle, and drop the ones that died.
    ///
    /// The whole frame is stepped before anything is drawn. If any step fails
    /// (noise outside `[0, 1)` or a particle pushed to a non-finite state) the
    /// frame is abandoned with [`SketchError::ProviderFault`]; neither the
    /// population nor the surface is touched.
    pub fn advance<N, S>(&mut self, scene: &Scene, noise: &N, surface: &mut S) -> Result<FieldStep, SketchError>
    where
        N: NoiseSource + ?Sized,
        S: Surface + ?Sized,
    {
        let mut next = Vec::with_capacity(self.particles.len());
        for particle in &self.particles {
            let mut stepped = *particle;
            stepped.advance(scene, noise)?;
            if !stepped.position.is_finite() || !stepped.size.is_finite() {
                return Err(SketchError::ProviderFault(format!(
                    "particle stepped to non-finite state at {:?}",
                    stepped.position
                )));
            }
            next.push(stepped);
        }

        for particle in &self.particles {
            particle.render(scene, surface);
        }

        let advanced = next.len();
        next.retain(|p| !p.is_dead());
        let expired = advanced - next.len();
        self.particles = next;

        trace!(target: "field", advanced, expired, live = self.particles.len(), "frame advanced");
        Ok(FieldStep { advanced, expired })
    }
}

impl<'a> IntoIterator for &'a ParticleField {
    type Item = &'a Particle;
    type IntoIter = std::slice::Iter<'a, Particle>;

    fn into_iter(self) -> Self::IntoIter {
        self.particles.iter()
    }
}
