//! Sketch configuration.
//!
//! A [`SketchConfig`] holds everything that stays fixed for the life of a
//! sketch: option tables, particle budget, motion strategy, stopping policy.
//! It can be built in code, picked from a named preset, or loaded from JSON.
//!
//! # Example
//!
//! ```ignore
//! use driftfield::prelude::*;
//!
//! let config = SketchConfig::spiral()
//!     .with_particle_count(8000)
//!     .with_frame_horizon(FrameHorizon::Snapshot(800));
//! config.validate()?;
//! config.save("spiral.json")?;
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::ConfigError;
use crate::palette::{NoisePreset, Palette};
use crate::weighted::{validate_weights, Weighted};

/// Names accepted by [`SketchConfig::preset`].
pub const PRESET_NAMES: [&str; 5] = ["classic", "spiral", "fixed", "snapshot", "wave"];

/// Largest accepted canvas side, in pixels.
pub const MAX_CANVAS_SIZE: u32 = 16_384;

/// How a particle turns its sampled angle into displacement.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Motion {
    /// One unit step along the sampled angle.
    #[default]
    Standard,
    /// Angle bends by `TAU / life` and the step radius shrinks from
    /// `start_radius` to `end_radius` over the lifetime, curling inward.
    Spiral { start_radius: f64, end_radius: f64 },
    /// Unit step plus a lateral ripple of `amplitude` along `angle + PI/2`,
    /// oscillating once every `wavelength` steps.
    Wave { amplitude: f64, wavelength: f64 },
}

impl Motion {
    pub fn spiral() -> Self {
        Motion::Spiral {
            start_radius: 20.0,
            end_radius: 1.0,
        }
    }

    pub fn wave() -> Self {
        Motion::Wave {
            amplitude: 0.5,
            wavelength: 40.0,
        }
    }
}

/// What happens once the frame counter reaches the horizon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", content = "frames", rename_all = "snake_case")]
pub enum FrameHorizon {
    /// Stop for good; later ticks are no-ops.
    Freeze(u64),
    /// Report a snapshot to the host, reset the counter and keep running.
    Snapshot(u64),
}

impl FrameHorizon {
    pub fn frames(&self) -> u64 {
        match *self {
            FrameHorizon::Freeze(n) | FrameHorizon::Snapshot(n) => n,
        }
    }
}

impl Default for FrameHorizon {
    fn default() -> Self {
        FrameHorizon::Freeze(800)
    }
}

/// What a new generation keeps from the previous one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regeneration {
    /// Keep the first palette, noise preset and thickness; only reshuffle.
    #[default]
    Hold,
    /// Roll a fresh palette, noise preset and thickness, and reseed the noise.
    Reroll,
}

/// Opaque frame drawn over the canvas edges after the particle layer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Border {
    pub thickness: f64,
    pub color: Color,
}

impl Border {
    pub fn new(thickness: f64) -> Self {
        Self {
            thickness,
            color: Color::BLACK,
        }
    }
}

/// Complete sketch configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchConfig {
    pub name: String,
    /// Fixed seed; `None` lets the host draw one.
    pub seed: Option<u64>,
    /// Side length of the square canvas in pixels.
    pub canvas_size: u32,
    /// Particles spawned per generation.
    pub particle_count: usize,
    /// Steps each particle lives for.
    pub lifetime: u32,
    /// Added to a particle's noise phase every step.
    pub phase_step: f64,
    /// Position scale for the size noise, independent of the direction noise.
    pub size_noise_scale: f64,
    /// Line thickness is drawn uniformly from this range per scene.
    pub thickness_range: [f64; 2],
    pub palettes: Vec<Weighted<Palette>>,
    pub noise_presets: Vec<Weighted<NoisePreset>>,
    /// Noise in `[0, 1)` is stretched onto this band before becoming a color index.
    pub color_band: [f64; 2],
    /// Highest palette index a particle may be assigned.
    pub max_color_index: usize,
    pub motion: Motion,
    pub border: Option<Border>,
    pub frame_horizon: FrameHorizon,
    pub regeneration: Regeneration,
    /// Ticks per second requested from the host.
    pub frame_rate: f64,
    pub background: Color,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self::classic()
    }
}

impl SketchConfig {
    // =========================================================================
    // PRESETS
    // =========================================================================

    /// Three weighted palettes, four noise presets, unit-step drift.
    pub fn classic() -> Self {
        Self {
            name: "classic".into(),
            seed: None,
            canvas_size: 800,
            particle_count: 5000,
            lifetime: 800,
            phase_step: 0.0001,
            size_noise_scale: 0.001,
            thickness_range: [3.0, 5.0],
            palettes: Palette::classic_table(),
            noise_presets: NoisePreset::table(0.003),
            color_band: [-3.0, 8.5],
            max_color_index: 4,
            motion: Motion::Standard,
            border: None,
            frame_horizon: FrameHorizon::Freeze(800),
            regeneration: Regeneration::Hold,
            frame_rate: 30.0,
            background: Color::BLACK,
        }
    }

    /// Inward spirals inside a 30 px black frame.
    pub fn spiral() -> Self {
        Self {
            name: "spiral".into(),
            thickness_range: [2.0, 4.0],
            palettes: Palette::spiral_table(),
            noise_presets: NoisePreset::table(0.002),
            motion: Motion::spiral(),
            border: Some(Border::new(30.0)),
            ..Self::classic()
        }
    }

    /// One palette, one noise scale, fixed thickness.
    pub fn fixed() -> Self {
        Self {
            name: "fixed".into(),
            thickness_range: [5.0, 5.0],
            palettes: vec![Weighted::new(Palette::classic(), 1.0)],
            noise_presets: vec![Weighted::new(NoisePreset::new("Fixed", 0.0005), 1.0)],
            ..Self::classic()
        }
    }

    /// Like [`fixed`](Self::fixed), but exports every 800 frames and
    /// re-rolls each generation.
    pub fn snapshot() -> Self {
        Self {
            name: "snapshot".into(),
            frame_horizon: FrameHorizon::Snapshot(800),
            regeneration: Regeneration::Reroll,
            ..Self::fixed()
        }
    }

    /// Classic tables with a perpendicular ripple and a denser field.
    pub fn wave() -> Self {
        Self {
            name: "wave".into(),
            particle_count: 8000,
            motion: Motion::wave(),
            ..Self::classic()
        }
    }

    /// Resolve a preset by name (case-insensitive).
    pub fn preset(name: &str) -> Result<Self, ConfigError> {
        match name.to_ascii_lowercase().as_str() {
            "classic" => Ok(Self::classic()),
            "spiral" => Ok(Self::spiral()),
            "fixed" => Ok(Self::fixed()),
            "snapshot" => Ok(Self::snapshot()),
            "wave" => Ok(Self::wave()),
            _ => Err(ConfigError::UnknownPreset(name.to_string())),
        }
    }

    // =========================================================================
    // BUILDER
    // =========================================================================

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_canvas_size(mut self, size: u32) -> Self {
        self.canvas_size = size;
        self
    }

    pub fn with_particle_count(mut self, count: usize) -> Self {
        self.particle_count = count;
        self
    }

    pub fn with_lifetime(mut self, lifetime: u32) -> Self {
        self.lifetime = lifetime;
        self
    }

    pub fn with_thickness_range(mut self, low: f64, high: f64) -> Self {
        self.thickness_range = [low, high];
        self
    }

    pub fn with_palettes(mut self, palettes: Vec<Weighted<Palette>>) -> Self {
        self.palettes = palettes;
        self
    }

    pub fn with_noise_presets(mut self, presets: Vec<Weighted<NoisePreset>>) -> Self {
        self.noise_presets = presets;
        self
    }

    pub fn with_motion(mut self, motion: Motion) -> Self {
        self.motion = motion;
        self
    }

    pub fn with_border(mut self, border: Option<Border>) -> Self {
        self.border = border;
        self
    }

    pub fn with_frame_horizon(mut self, horizon: FrameHorizon) -> Self {
        self.frame_horizon = horizon;
        self
    }

    pub fn with_regeneration(mut self, regeneration: Regeneration) -> Self {
        self.regeneration = regeneration;
        self
    }

    pub fn with_frame_rate(mut self, fps: f64) -> Self {
        self.frame_rate = fps;
        self
    }

    // =========================================================================
    // VALIDATION & I/O
    // =========================================================================

    /// Reject configurations the sketch cannot run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.canvas_size == 0 {
            return Err(ConfigError::NotPositive("canvas_size"));
        }
        if self.canvas_size > MAX_CANVAS_SIZE {
            return Err(ConfigError::OutOfRange {
                name: "canvas_size",
                value: self.canvas_size as f64,
            });
        }
        if self.particle_count == 0 {
            return Err(ConfigError::NotPositive("particle_count"));
        }
        if self.lifetime == 0 {
            return Err(ConfigError::NotPositive("lifetime"));
        }
        if self.lifetime > i32::MAX as u32 {
            return Err(ConfigError::OutOfRange {
                name: "lifetime",
                value: self.lifetime as f64,
            });
        }
        if self.frame_horizon.frames() == 0 {
            return Err(ConfigError::NotPositive("frame_horizon"));
        }
        positive("frame_rate", self.frame_rate)?;
        finite("phase_step", self.phase_step)?;
        finite("size_noise_scale", self.size_noise_scale)?;

        let [low, high] = self.thickness_range;
        non_negative("thickness_range", low)?;
        finite("thickness_range", high)?;
        if high < low {
            return Err(ConfigError::OutOfRange {
                name: "thickness_range",
                value: high,
            });
        }

        let [band_low, band_high] = self.color_band;
        finite("color_band", band_low)?;
        finite("color_band", band_high)?;
        if band_high <= band_low {
            return Err(ConfigError::OutOfRange {
                name: "color_band",
                value: band_high,
            });
        }

        validate_weights("palettes", &self.palettes)?;
        for entry in &self.palettes {
            entry.value.validate()?;
        }
        validate_weights("noise_presets", &self.noise_presets)?;
        for entry in &self.noise_presets {
            positive("noise_presets.scale", entry.value.scale)?;
        }

        match self.motion {
            Motion::Standard => {}
            Motion::Spiral {
                start_radius,
                end_radius,
            } => {
                non_negative("motion.start_radius", start_radius)?;
                non_negative("motion.end_radius", end_radius)?;
            }
            Motion::Wave {
                amplitude,
                wavelength,
            } => {
                finite("motion.amplitude", amplitude)?;
                positive("motion.wavelength", wavelength)?;
            }
        }

        if let Some(border) = &self.border {
            non_negative("border.thickness", border.thickness)?;
        }
        Ok(())
    }

    /// Save the configuration as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load a configuration from a JSON file. Missing fields take the
    /// classic defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }
}

fn finite(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { name, value })
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(name, value)?;
    if value < 0.0 {
        return Err(ConfigError::OutOfRange { name, value });
    }
    Ok(())
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(name, value)?;
    if value <= 0.0 {
        return Err(ConfigError::OutOfRange { name, value });
    }
    Ok(())
}
