//! Galaxy CLI
//!
//! Renders the galaxy cursor effect without a window:
//! - `galaxy run` drives the effect with an orbiting pointer and writes the
//!   final surface as PNG plus a JSON report
//! - `galaxy easings` prints the easing registry

mod config;
mod report;
mod run;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use galaxy_animation::Easing;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Headless renderer for the galaxy cursor effect
#[derive(Parser, Debug)]
#[command(name = "galaxy")]
#[command(about = "Headless renderer for the galaxy cursor effect")]
#[command(version)]
struct Cli {
    /// Log filter, overrides RUST_LOG (e.g. "galaxy_core=debug")
    #[arg(long, global = true)]
    log: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render frames with an orbiting pointer
    Run(RunArgs),
    /// List every easing with its value at t = 0, 0.5 and 1
    Easings,
}

#[derive(clap::Args, Debug, Default)]
pub struct RunArgs {
    /// Config file (defaults to ./galaxy.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of frames to render
    #[arg(long)]
    pub frames: Option<u32>,

    /// Milliseconds between frames
    #[arg(long)]
    pub tick_ms: Option<f64>,

    /// Seed for point placement and jitter
    #[arg(long)]
    pub seed: Option<u64>,

    /// Surface width
    #[arg(long, requires = "height")]
    pub width: Option<u32>,

    /// Surface height
    #[arg(long, requires = "width")]
    pub height: Option<u32>,

    /// Write the final surface as PNG
    #[arg(long)]
    pub png: Option<PathBuf>,

    /// Write the JSON report here instead of stdout
    #[arg(long)]
    pub report: Option<PathBuf>,
}

fn init_logging(filter: Option<&str>) -> Result<()> {
    let filter = match filter {
        Some(filter) => EnvFilter::try_new(filter).context("Invalid log filter")?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log.as_deref())?;

    match cli.command {
        Commands::Run(args) => run::run(args),
        Commands::Easings => {
            print_easings();
            Ok(())
        }
    }
}

fn print_easings() {
    println!("{:<16} {:>9} {:>9} {:>9}", "name", "t=0", "t=0.5", "t=1");
    for easing in Easing::ALL {
        println!(
            "{:<16} {:>9.4} {:>9.4} {:>9.4}",
            easing.name(),
            easing.apply(0.0),
            easing.apply(0.5),
            easing.apply(1.0)
        );
    }
}
