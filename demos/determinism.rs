//! # Determinism Check
//!
//! Runs the same preset twice with the same seed and once with a different
//! seed, and compares a checksum of the canvas after every 100 frames.
//! The first two columns always match; the third does not.
//!
//! Run with: `cargo run --release --example determinism -- [PRESET] [SEED]`

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use driftfield::prelude::*;

fn checksum(sketch: &Sketch) -> u64 {
    let mut hasher = DefaultHasher::new();
    sketch.surface().as_bytes().hash(&mut hasher);
    hasher.finish()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let preset = args.next().unwrap_or_else(|| "classic".into());
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);

    let config = SketchConfig::preset(&preset)?;
    let mut first = Sketch::new(config.clone())?;
    let mut second = Sketch::new(config.clone())?;
    let mut other = Sketch::new(config)?;
    first.start(seed)?;
    second.start(seed)?;
    other.start(seed + 1)?;

    println!("preset `{preset}`, seed {seed} vs {}", seed + 1);
    println!("{:>6}  {:>16}  {:>16}  {:>16}", "frame", "run a", "run b", "other seed");
    for frame in 1..=800 {
        first.tick()?;
        second.tick()?;
        other.tick()?;
        if frame % 100 == 0 {
            let (a, b, c) = (checksum(&first), checksum(&second), checksum(&other));
            println!("{frame:>6}  {a:016x}  {b:016x}  {c:016x}");
            if a != b {
                return Err(format!("runs diverged at frame {frame}").into());
            }
        }
    }
    println!("identical seeds produced identical canvases");
    Ok(())
}
