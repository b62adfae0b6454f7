//! `driftfield [--snapshot out.png] [config.json]`
//!
//! Opens a window with one particle field. With `--snapshot`, renders a few
//! frames headlessly to a PNG instead.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use driftfield::{render_snapshot, FieldConfig, Rgb};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const SNAPSHOT_SIZE: (u32, u32) = (1280, 720);
const SNAPSHOT_FRAMES: u32 = 60;

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    snapshot: Option<PathBuf>,
}

fn parse_args() -> Args {
    let mut args = Args::default();
    let mut iter = env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--snapshot" => match iter.next() {
                Some(path) => args.snapshot = Some(path.into()),
                None => warn!("--snapshot needs an output path"),
            },
            _ => args.config = Some(arg.into()),
        }
    }
    args
}

fn load_config(path: Option<&PathBuf>) -> FieldConfig {
    let Some(path) = path else {
        return FieldConfig::default();
    };
    match FieldConfig::load(path) {
        Ok(config) => {
            info!(path = %path.display(), "loaded config");
            config
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "using default config");
            FieldConfig::default()
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = parse_args();
    let config = load_config(args.config.as_ref());

    if let Some(out) = args.snapshot {
        let (width, height) = SNAPSHOT_SIZE;
        let surface = render_snapshot(config, width, height, SNAPSHOT_FRAMES, Some(Rgb::new(5, 5, 13)));
        return match surface.save(&out) {
            Ok(()) => {
                info!(path = %out.display(), "wrote snapshot");
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!(error = %e, "snapshot failed");
                ExitCode::FAILURE
            }
        };
    }

    match driftfield::viewer::run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "viewer exited with an error");
            ExitCode::FAILURE
        }
    }
}
