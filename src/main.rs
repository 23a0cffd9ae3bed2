use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod color;
mod config;
mod display;
mod geometry;
mod pointer;
mod radar;
mod renderer;
mod shutdown;
mod trail;

use config::Config;
use geometry::Point;

#[derive(Parser, Debug)]
#[command(name = "radarsweep")]
#[command(author, version, about = "Animated radar sweep with mouse-driven target detection")]
struct Args {
    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Frames per second (1-240)
    #[arg(long)]
    fps: Option<u32>,

    /// Pull targets outside the radar disc onto the rim
    #[arg(long)]
    clamp_projection: bool,

    /// Compare beam and target by shortest angular distance
    #[arg(long)]
    wrap_bearing: bool,

    /// Hide the status line
    #[arg(long)]
    no_status: bool,

    /// Render headless and write the frame as a PPM image
    #[arg(long, value_name = "PATH")]
    snapshot: Option<PathBuf>,

    /// Frame number to capture with --snapshot
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u64).range(1..))]
    frames: u64,

    /// Fixed target position in canvas pixels for --snapshot
    #[arg(long, value_name = "X,Y", requires = "snapshot", value_parser = parse_point)]
    target: Option<Point>,

    /// Write a commented config template to the default path and exit
    #[arg(long)]
    init_config: bool,

    /// Print a shell completion script and exit
    #[arg(long, value_name = "SHELL")]
    completions: Option<clap_complete::Shell>,
}

fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{}'", s))?;
    let x: f64 = x.trim().parse().map_err(|_| format!("invalid X coordinate '{}'", x.trim()))?;
    let y: f64 = y.trim().parse().map_err(|_| format!("invalid Y coordinate '{}'", y.trim()))?;
    if !x.is_finite() || !y.is_finite() {
        return Err(format!("coordinates must be finite, got '{}'", s));
    }
    Ok(Point::new(x, y))
}

/// The terminal owns the screen while the radar runs, so interactive sessions
/// log to a file in the cache directory instead of stderr.
fn init_logging(interactive: bool) -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive("radarsweep=info".parse()?);
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if !interactive {
        builder.with_writer(std::io::stderr).init();
        return Ok(());
    }

    match dirs::cache_dir().map(|p| p.join("radarsweep")) {
        Some(dir) => {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let file = open_log_file(&dir.join("radarsweep.log"))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::sink).init(),
    }
    Ok(())
}

/// Each session starts a fresh log.
fn open_log_file(path: &Path) -> Result<File> {
    File::create(path).with_context(|| format!("Failed to open log file {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(shell) = args.completions {
        clap_complete::generate(shell, &mut Args::command(), "radarsweep", &mut std::io::stdout());
        return Ok(());
    }

    if args.init_config {
        let path = Config::init_default_config()?;
        println!("Wrote config template to {}", path.display());
        return Ok(());
    }

    let interactive = args.snapshot.is_none();
    init_logging(interactive)?;

    // Load or create config
    let mut ignored_config = None;
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => match Config::load_from_default_path() {
            Ok(config) => config.unwrap_or_default(),
            Err(e) => {
                warn!("{e}; using defaults");
                ignored_config = Some(e);
                Config::default()
            }
        },
    };
    config.merge_args(&args);

    info!("Starting radarsweep at {} fps", config.display.fps);

    let result = match &args.snapshot {
        Some(path) => display::snapshot::run(&config, args.frames, args.target, path),
        None => display::terminal::run(config).await,
    };

    // The alternate screen would have hidden this; say it once the terminal is back.
    if interactive {
        if let Some(e) = ignored_config {
            eprintln!("radarsweep: {e}; defaults were used");
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_target_point() {
        assert_eq!(parse_point("350,200"), Ok(Point::new(350.0, 200.0)));
        assert_eq!(parse_point(" 1.5 , -2 "), Ok(Point::new(1.5, -2.0)));
        assert!(parse_point("350").is_err());
        assert!(parse_point("a,2").is_err());
        assert!(parse_point("inf,200").is_err());
        assert!(parse_point("1,NaN").is_err());
    }

    #[test]
    fn target_requires_snapshot() {
        assert!(Args::try_parse_from(["radarsweep", "--target", "1,2"]).is_err());
        let args =
            Args::try_parse_from(["radarsweep", "--snapshot", "out.ppm", "--target", "1,2"]).unwrap();
        assert_eq!(args.target, Some(Point::new(1.0, 2.0)));
        assert_eq!(args.frames, 1);
    }

    #[test]
    fn log_file_is_truncated_each_session() {
        let path = std::env::temp_dir().join(format!("radarsweep-log-{}.log", std::process::id()));
        std::fs::write(&path, "previous session\n").unwrap();

        drop(open_log_file(&path).unwrap());
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn zero_frames_is_rejected() {
        assert!(Args::try_parse_from(["radarsweep", "--snapshot", "x.ppm", "--frames", "0"]).is_err());
    }
}
