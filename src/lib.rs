//! # driftfield - seeded noise-field particle sketches
//!
//! Thousands of particles drift across a square canvas along a coherent-noise
//! direction field, leaving square marks that swell and shrink over their
//! lifetime. When every particle has died a new generation is spawned; the
//! sketch stops (or exports a snapshot) at a fixed frame horizon.
//!
//! Everything is deterministic for a given seed: the same seed always produces
//! the same palette, the same particles and byte-identical canvases.
//!
//! ## Quick Start
//!
//! ```ignore
//! use driftfield::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut sketch = Sketch::new(SketchConfig::classic())?;
//!     sketch.start(42)?;
//!     while sketch.tick()? != TickOutcome::Froze {}
//!     sketch.surface().save("drift.png")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Scenes
//!
//! A [`Scene`] is rolled once per generation from a [`SketchConfig`]: a
//! palette and a noise scale are picked from weighted tables, a line
//! thickness is drawn, and the palette order is shuffled. Particles read the
//! scene; they never touch the config.
//!
//! ### Particles
//!
//! Each [`Particle`] samples the noise field at its position, steps along the
//! resulting angle, and resizes under an envelope that reaches zero exactly
//! when its life runs out. See [`Motion`] for the spiral and wave variants.
//!
//! ### Providers
//!
//! Randomness and noise come through the [`RandomSource`] and [`NoiseSource`]
//! traits. [`SeededRandom`] and [`PerlinNoise`] are the defaults; tests swap
//! in scripted sources.
//!
//! ## Presets
//!
//! | Preset | Palettes | Motion | Horizon |
//! |--------|----------|--------|---------|
//! | `classic` | Deep Sea / Sunset / Spring Bloom | standard | freeze at 800 |
//! | `spiral` | Deep Sea / Sunset / Gun Metal + black | spiral, 30 px border | freeze at 800 |
//! | `fixed` | Classic | standard | freeze at 800 |
//! | `snapshot` | Classic | standard, re-rolled per generation | snapshot every 800 |
//! | `wave` | Deep Sea / Sunset / Spring Bloom | wave, 8000 particles | freeze at 800 |

pub mod canvas;
pub mod color;
pub mod config;
pub mod error;
pub mod features;
pub mod field;
pub mod palette;
pub mod particle;
pub mod provider;
pub mod scene;
pub mod sketch;
pub mod time;
pub mod weighted;

#[cfg(feature = "viewer")]
pub mod viewer;

pub use canvas::{Canvas, Surface};
pub use color::Color;
pub use config::{Border, FrameHorizon, Motion, Regeneration, SketchConfig};
pub use error::{ConfigError, ExportError, SketchError};
pub use features::{FeatureLog, FeatureSink, Features, TracingSink};
pub use field::{FieldStep, ParticleField};
pub use glam::DVec2;
pub use palette::{NoisePreset, Palette};
pub use particle::Particle;
pub use provider::{NoiseSource, PerlinNoise, RandomSource, SeededRandom};
pub use scene::Scene;
pub use sketch::{Sketch, SketchState, TickOutcome};
pub use time::FrameClock;
pub use weighted::{select_weighted, Weighted};

#[cfg(feature = "viewer")]
pub use error::{GpuError, ViewerError};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use driftfield::prelude::*;
/// ```
pub mod prelude {
    pub use crate::canvas::{Canvas, Surface};
    pub use crate::color::Color;
    pub use crate::config::{Border, FrameHorizon, Motion, Regeneration, SketchConfig};
    pub use crate::error::{ConfigError, ExportError, SketchError};
    pub use crate::features::{FeatureLog, FeatureSink, Features};
    pub use crate::palette::{NoisePreset, Palette};
    pub use crate::provider::{NoiseSource, PerlinNoise, RandomSource, SeededRandom};
    pub use crate::sketch::{Sketch, SketchState, TickOutcome};
    pub use crate::time::FrameClock;
    pub use crate::weighted::Weighted;
    pub use glam::DVec2;
}
