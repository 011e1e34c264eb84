mod cli;
mod config;
mod error;

use crate::{
    cli::Args,
    config::{FileConfig, resolve},
    error::Result,
};
use clap::Parser;
use playlist_filter_engine::{FilterPipeline, FilterReport};
use std::process;
use tracing::debug;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    if let Err(e) = run(args).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let file_config = FileConfig::load(args.config.as_deref())?;
    let settings = resolve(&args, file_config)?;
    debug!("Resolved settings: {:?}", settings);

    let pipeline = FilterPipeline::new(settings.filter)?;
    let report = pipeline.run(&settings.output).await?;

    if !args.quiet {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &FilterReport) {
    println!("source: {}", report.source_url);
    println!("output: {}", report.output_path.display());
    println!("kept entries: {}", report.kept);
    for (group, count) in &report.kept_by_group {
        println!("  {group}: {count}");
    }
}

/// `--quiet` and `--verbose` win over `RUST_LOG`, which defaults to `info`.
fn build_filter(verbose: bool, quiet: bool, rust_log: Option<&str>) -> EnvFilter {
    if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        rust_log
            .and_then(|directives| EnvFilter::try_new(directives).ok())
            .unwrap_or_else(|| EnvFilter::new("info"))
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(verbose, quiet, rust_log.as_deref());

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(verbose),
        )
        .init();
}
