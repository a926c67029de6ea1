use auto_archive::archiver::context::RunContext;
use auto_archive::archiver::processor::run;
use clap::Parser;
use std::path::PathBuf;
use std::process::exit;
use tracing::error;
use tracing::level_filters::LevelFilter;

/// Create archives as described in YAML presets
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Preset files, processed in order
    #[arg(required = true)]
    presets: Vec<PathBuf>,
    /// Log resolved archives, external commands and timings
    #[arg(short, long)]
    verbose: bool,
    /// 7z executable used by presets with `native: true`
    #[arg(long)]
    sevenzip_bin: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            LevelFilter::DEBUG
        } else {
            LevelFilter::INFO
        })
        .init();

    let res = RunContext::from_current_dir(args.verbose, args.sevenzip_bin)
        .and_then(|ctx| run(&args.presets, &ctx));

    if let Err(e) = res {
        error!("{e}");
        exit(1);
    }
}
