//! # Preset Gallery
//!
//! Renders every built-in preset with the same seed and writes one PNG per
//! preset, plus a JSON file with the features of each scene:
//!
//! - **classic**: weighted palettes, unit-step drift
//! - **spiral**: particles curl inward inside a black frame
//! - **fixed**: a single palette and noise scale
//! - **snapshot**: the first 800-frame snapshot of a re-rolling run
//! - **wave**: drift with a perpendicular ripple
//!
//! Run with: `cargo run --release --example gallery -- [SEED] [OUT_DIR]`

use std::path::PathBuf;

use driftfield::config::PRESET_NAMES;
use driftfield::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let mut args = std::env::args().skip(1);
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| "gallery".into()));
    std::fs::create_dir_all(&out_dir)?;

    let log = FeatureLog::new();
    for name in PRESET_NAMES {
        let config = SketchConfig::preset(name)?;
        let horizon = config.frame_horizon.frames();
        let mut sketch = Sketch::new(config)?.with_feature_sink(log.clone());
        sketch.start(seed)?;

        while sketch.total_frames() < horizon {
            if matches!(sketch.tick()?, TickOutcome::Froze | TickOutcome::Snapshot) {
                break;
            }
        }

        let path = out_dir.join(format!("{name}-{seed}.png"));
        sketch.surface().save(&path)?;
        println!("{name:>9}: {} frames -> {}", sketch.total_frames(), path.display());
    }

    log.write_json(out_dir.join(format!("features-{seed}.json")))?;
    Ok(())
}
