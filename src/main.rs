//! Command line front end: build the default mount and write its STL and
//! STEP files.

use clap::Parser;
use eyepiece_mount::adapter::{AdapterBuilder, AdapterParameters, Composition, Tuning};
use eyepiece_mount::io::{StlFormat, save_exports};
use std::path::PathBuf;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

/// Generate the M18×0.75 to M16×0.75 diopter mount
#[derive(Parser)]
#[command(name = "eyepiece-mount")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Threaded diopter mount generator (STL + STEP)", long_about = None)]
struct Cli {
    /// Directory the files are written to
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Base file name; defaults to the thread designation
    #[arg(short, long)]
    name: Option<String>,

    /// Facets per full circle
    #[arg(short, long, default_value_t = Tuning::default().segments)]
    segments: usize,

    /// Keep the lens socket as a separate body instead of fusing it
    #[arg(long)]
    co_located: bool,

    /// Write ASCII STL instead of binary
    #[arg(long)]
    ascii_stl: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let params = AdapterParameters::default();
    let composition = if cli.co_located {
        Composition::CoLocated
    } else {
        Composition::Fused
    };
    let tuning = Tuning::default()
        .with_segments(cli.segments)
        .with_composition(composition);

    let builder = AdapterBuilder::new(params, tuning)?;
    info!(designation = %params.designation(), segments = tuning.segments, ?composition, "building mount");
    let assembly = builder.build();

    let basename = cli.name.unwrap_or_else(|| params.designation());
    let format = if cli.ascii_stl {
        StlFormat::Ascii
    } else {
        StlFormat::Binary
    };
    let files = save_exports(&assembly, &cli.out_dir, &basename, format)?;
    info!(stl = %files.stl.display(), step = %files.step.display(), "done");
    Ok(())
}
