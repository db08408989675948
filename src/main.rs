//! `driftfield` command-line host.
//!
//! ```text
//! driftfield [CONFIG.json] [--preset NAME] [--seed N] [--frames N]
//!            [--out PATH] [--features PATH] [--window]
//! ```
//!
//! Runs headless by default: ticks until the sketch freezes (or `--frames`
//! ticks have run) and writes the canvas to `--out`. Snapshot outcomes are
//! written next to it with a `-NNNN` suffix.

use std::path::PathBuf;
use std::process::ExitCode;

use rand::Rng;
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use driftfield::canvas::numbered_path;
use driftfield::prelude::*;

const USAGE: &str = "\
usage: driftfield [CONFIG.json] [--preset NAME] [--seed N] [--frames N]
                  [--out PATH] [--features PATH] [--window]

presets: classic, spiral, fixed, snapshot, wave";

#[derive(Debug, Error)]
enum CliError {
    #[error("{0}\n\n{usage}", usage = USAGE)]
    Usage(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Sketch(#[from] SketchError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[cfg(feature = "viewer")]
    #[error(transparent)]
    Viewer(#[from] driftfield::ViewerError),
    #[cfg(not(feature = "viewer"))]
    #[error("--window requires building with the `viewer` feature")]
    ViewerUnavailable,
}

#[derive(Debug, PartialEq)]
struct Args {
    config: Option<PathBuf>,
    preset: Option<String>,
    seed: Option<u64>,
    frames: Option<u64>,
    out: PathBuf,
    features: Option<PathBuf>,
    window: bool,
    help: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            config: None,
            preset: None,
            seed: None,
            frames: None,
            out: PathBuf::from("driftfield.png"),
            features: None,
            window: false,
            help: false,
        }
    }
}

fn parse_args<I>(args: I) -> Result<Args, CliError>
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = Args::default();
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| iter.next().ok_or_else(|| CliError::Usage(format!("{flag} needs a value")));
        match arg.as_str() {
            "-h" | "--help" => parsed.help = true,
            "--window" => parsed.window = true,
            "--preset" => parsed.preset = Some(value("--preset")?),
            "--seed" => parsed.seed = Some(parse_number("--seed", &value("--seed")?)?),
            "--frames" => parsed.frames = Some(parse_number("--frames", &value("--frames")?)?),
            "--out" => parsed.out = PathBuf::from(value("--out")?),
            "--features" => parsed.features = Some(PathBuf::from(value("--features")?)),
            flag if flag.starts_with('-') => return Err(CliError::Usage(format!("unknown option `{flag}`"))),
            path => {
                if parsed.config.is_some() {
                    return Err(CliError::Usage(format!("unexpected argument `{path}`")));
                }
                parsed.config = Some(PathBuf::from(path));
            }
        }
    }
    Ok(parsed)
}

fn parse_number(flag: &str, raw: &str) -> Result<u64, CliError> {
    raw.parse()
        .map_err(|_| CliError::Usage(format!("{flag} expects a non-negative integer, got `{raw}`")))
}

/// Config file first, then preset, then the classic defaults.
fn load_config(args: &Args) -> Result<SketchConfig, CliError> {
    let mut config = match (&args.config, &args.preset) {
        (Some(path), _) => SketchConfig::load(path)?,
        (None, Some(name)) => SketchConfig::preset(name)?,
        (None, None) => SketchConfig::classic(),
    };
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    Ok(config)
}

/// Headless runs under a snapshot horizon never freeze, so they stop after
/// one horizon unless `--frames` says otherwise.
fn frame_limit(args: &Args, config: &SketchConfig) -> Option<u64> {
    match (args.frames, config.frame_horizon) {
        (Some(n), _) => Some(n),
        (None, FrameHorizon::Snapshot(n)) => Some(n),
        (None, FrameHorizon::Freeze(_)) => None,
    }
}

fn run_headless(mut sketch: Sketch, args: &Args, limit: Option<u64>) -> Result<(), CliError> {
    loop {
        if limit.is_some_and(|max| sketch.total_frames() >= max) {
            break;
        }
        match sketch.tick()? {
            TickOutcome::Advanced => {}
            TickOutcome::Snapshot => {
                let path = numbered_path(&args.out, sketch.snapshots());
                sketch.surface().save(&path)?;
            }
            TickOutcome::Froze | TickOutcome::Idle => break,
        }
    }
    info!(
        target: "host",
        frames = sketch.total_frames(),
        generation = sketch.generation().unwrap_or(0),
        "run finished"
    );
    sketch.surface().save(&args.out)?;
    Ok(())
}

#[cfg(feature = "viewer")]
fn run_windowed(sketch: Sketch, args: &Args) -> Result<(), CliError> {
    let options = driftfield::viewer::ViewerOptions {
        out: args.out.clone(),
        max_frames: args.frames,
    };
    driftfield::viewer::run(sketch, options)?;
    Ok(())
}

#[cfg(not(feature = "viewer"))]
fn run_windowed(_sketch: Sketch, _args: &Args) -> Result<(), CliError> {
    Err(CliError::ViewerUnavailable)
}

fn run(args: Args) -> Result<(), CliError> {
    let config = load_config(&args)?;
    let seed = config
        .seed
        .unwrap_or_else(|| rand::thread_rng().gen_range(0..100_000));
    let limit = frame_limit(&args, &config);
    info!(target: "host", preset = %config.name, seed, "starting sketch");

    let log = FeatureLog::new();
    let mut sketch = Sketch::new(config)?;
    if args.features.is_some() {
        sketch = sketch.with_feature_sink(log.clone());
    }
    sketch.start(seed)?;

    if args.window {
        run_windowed(sketch, &args)?;
    } else {
        run_headless(sketch, &args, limit)?;
    }

    if let Some(path) = &args.features {
        log.write_json(path)?;
        info!(target: "host", path = %path.display(), records = log.len(), "features written");
    }
    Ok(())
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            error!(target: "host", "{e}");
            return ExitCode::from(2);
        }
    };
    if args.help {
        println!("{USAGE}");
        return ExitCode::SUCCESS;
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(target: "host", "{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args, CliError> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_defaults() {
        assert_eq!(args(&[]).unwrap(), Args::default());
    }

    #[test]
    fn test_parse_all_flags() {
        let parsed = args(&[
            "cfg.json",
            "--preset",
            "spiral",
            "--seed",
            "42",
            "--frames",
            "100",
            "--out",
            "art.png",
            "--features",
            "features.json",
            "--window",
        ])
        .unwrap();
        assert_eq!(parsed.config, Some(PathBuf::from("cfg.json")));
        assert_eq!(parsed.preset.as_deref(), Some("spiral"));
        assert_eq!(parsed.seed, Some(42));
        assert_eq!(parsed.frames, Some(100));
        assert_eq!(parsed.out, PathBuf::from("art.png"));
        assert_eq!(parsed.features, Some(PathBuf::from("features.json")));
        assert!(parsed.window);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(args(&["--seed"]), Err(CliError::Usage(_))));
        assert!(matches!(args(&["--seed", "-3"]), Err(CliError::Usage(_))));
        assert!(matches!(args(&["--bogus"]), Err(CliError::Usage(_))));
        assert!(matches!(args(&["a.json", "b.json"]), Err(CliError::Usage(_))));
    }

    #[test]
    fn test_load_config_precedence() {
        let parsed = args(&["--preset", "wave", "--seed", "7"]).unwrap();
        let config = load_config(&parsed).unwrap();
        assert_eq!(config.name, "wave");
        assert_eq!(config.seed, Some(7));

        let parsed = args(&["--preset", "nope"]).unwrap();
        assert!(matches!(load_config(&parsed), Err(CliError::Config(ConfigError::UnknownPreset(_)))));
    }

    #[test]
    fn test_snapshot_runs_are_bounded() {
        let parsed = args(&[]).unwrap();
        assert_eq!(frame_limit(&parsed, &SketchConfig::snapshot()), Some(800));
        assert_eq!(frame_limit(&parsed, &SketchConfig::classic()), None);
        let parsed = args(&["--frames", "5"]).unwrap();
        assert_eq!(frame_limit(&parsed, &SketchConfig::classic()), Some(5));
    }
}
