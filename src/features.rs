//! Per-generation metadata records.
//!
//! Every scene generation reports a flat key/value record describing the
//! choices that were rolled. Nothing in the sketch reads these back; they
//! exist for display and cataloguing by the host.

use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ExportError;

/// Flat metadata record for one scene generation.
///
/// Serialized with human-readable keys (`"Particle Count"`, `"Color Palette"`, ...).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Features {
    #[serde(rename = "Particle Count")]
    pub particle_count: usize,
    #[serde(rename = "Color Palette")]
    pub palette: String,
    #[serde(rename = "Seed Value")]
    pub seed: u64,
    /// Two decimal places.
    #[serde(rename = "Line Thickness")]
    pub line_thickness: String,
    /// Five decimal places.
    #[serde(rename = "Noise Scale")]
    pub noise_scale: String,
    #[serde(rename = "Noise Type")]
    pub noise_type: String,
    #[serde(rename = "Generation")]
    pub generation: u32,
}

/// Receives one [`Features`] record per scene generation.
pub trait FeatureSink {
    fn record(&mut self, features: &Features);
}

impl FeatureSink for Vec<Features> {
    fn record(&mut self, features: &Features) {
        self.push(features.clone());
    }
}

/// Emits each record as an `info` event.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl FeatureSink for TracingSink {
    fn record(&mut self, features: &Features) {
        info!(
            target: "features",
            particle_count = features.particle_count,
            palette = %features.palette,
            seed = features.seed,
            line_thickness = %features.line_thickness,
            noise_scale = %features.noise_scale,
            noise_type = %features.noise_type,
            generation = features.generation,
            "scene features"
        );
    }
}

/// Shared, cloneable record log.
///
/// Hand one clone to the sketch and keep another to read the records back.
#[derive(Clone, Debug, Default)]
pub struct FeatureLog(Rc<RefCell<Vec<Features>>>);

impl FeatureLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every record so far, oldest first.
    pub fn records(&self) -> Vec<Features> {
        self.0.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Write every record as a pretty-printed JSON array.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        let json = serde_json::to_string_pretty(&*self.0.borrow())?;
        fs::write(path, json)?;
        Ok(())
    }
}

impl FeatureSink for FeatureLog {
    fn record(&mut self, features: &Features) {
        self.0.borrow_mut().push(features.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Features {
        Features {
            particle_count: 5000,
            palette: "Sunset".into(),
            seed: 42,
            line_thickness: "3.17".into(),
            noise_scale: "0.00070".into(),
            noise_type: "Medium".into(),
            generation: 0,
        }
    }

    #[test]
    fn test_features_serialize_with_display_keys() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["Particle Count"], 5000);
        assert_eq!(json["Color Palette"], "Sunset");
        assert_eq!(json["Seed Value"], 42);
        assert_eq!(json["Line Thickness"], "3.17");
        assert_eq!(json["Noise Scale"], "0.00070");
        assert_eq!(json["Noise Type"], "Medium");
    }

    #[test]
    fn test_feature_log_shares_records() {
        let log = FeatureLog::new();
        let mut handle = log.clone();
        handle.record(&sample());
        handle.record(&sample());
        assert_eq!(log.len(), 2);
        assert_eq!(log.records()[0], sample());
    }

    #[test]
    fn test_vec_sink_collects() {
        let mut sink: Vec<Features> = Vec::new();
        sink.record(&sample());
        assert_eq!(sink, vec![sample()]);
    }
}
