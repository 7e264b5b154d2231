//! FilterMerge CLI
//!
//! Merges whitelist and blocklist sources into one whitelist file and a set
//! of blocklist parts.

mod fetch;
mod local;
mod output;

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use log::info;

use fm_core::{merge, MergeReport, SourceLoader, Sources};
use fm_emitter::{build_units, EmitSettings, DEFAULT_BASE_URL, DEFAULT_MAX_RULES_PER_PART};

use crate::fetch::FetchOptions;

#[derive(Parser)]
#[command(name = "fm-cli")]
#[command(about = "FilterMerge filter list aggregator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch configured sources and write merged filter lists
    Merge {
        /// Source configuration (JSON with `whitelist` and `blocklist` arrays)
        #[arg(short, long, default_value = "config/sources.json")]
        config: PathBuf,

        /// Directory holding the last good copy of every source
        #[arg(short, long, default_value = "backup")]
        backup: PathBuf,

        /// Request timeout in seconds
        #[arg(long, default_value_t = 20)]
        timeout: u64,

        /// Use backups only, without touching the network
        #[arg(long)]
        offline: bool,

        #[command(flatten)]
        emit: EmitArgs,
    },

    /// Merge local filter list files
    Local {
        /// Whitelist source files, in priority order
        #[arg(short, long)]
        whitelist: Vec<String>,

        /// Blocklist source files, in priority order
        #[arg(short = 'l', long)]
        blocklist: Vec<String>,

        #[command(flatten)]
        emit: EmitArgs,
    },
}

#[derive(Args)]
struct EmitArgs {
    /// Output directory (recreated on every run)
    #[arg(short, long, default_value = "output")]
    output: PathBuf,

    /// Maximum rules per blocklist part
    #[arg(long, default_value_t = DEFAULT_MAX_RULES_PER_PART)]
    max_rules: usize,

    /// URL prefix used for the links written into file headers
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let verbose = match &cli.command {
        Commands::Merge { emit, .. } | Commands::Local { emit, .. } => emit.verbose,
    };
    init_logging(verbose);

    let result = match cli.command {
        Commands::Merge {
            config,
            backup,
            timeout,
            offline,
            emit,
        } => cmd_merge(&config, backup, timeout, offline, &emit),
        Commands::Local {
            whitelist,
            blocklist,
            emit,
        } => cmd_local(whitelist, blocklist, &emit),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();
}

fn cmd_merge(
    config: &Path,
    backup_dir: PathBuf,
    timeout: u64,
    offline: bool,
    emit: &EmitArgs,
) -> Result<(), String> {
    let sources = Sources::load(config).map_err(|e| e.to_string())?;
    info!(
        "Loaded {} whitelist and {} blocklist sources from '{}'",
        sources.whitelist.len(),
        sources.blocklist.len(),
        config.display()
    );

    let opts = FetchOptions {
        backup_dir,
        timeout: Duration::from_secs(timeout),
        offline,
    };
    let fetched = fetch::fetch_all(&sources, &opts)?;

    run(&sources, &fetched, emit)
}

fn cmd_local(whitelist: Vec<String>, blocklist: Vec<String>, emit: &EmitArgs) -> Result<(), String> {
    let sources = local::local_sources(whitelist, blocklist)?;
    run(&sources, &local::FileLoader, emit)
}

fn run<L: SourceLoader>(sources: &Sources, loader: &L, emit: &EmitArgs) -> Result<(), String> {
    let start = Instant::now();
    let report = merge(sources, loader);
    let merge_time = start.elapsed();

    let settings = EmitSettings {
        max_rules_per_part: emit.max_rules,
        base_url: emit.base_url.clone(),
    };
    let updated = chrono::Local::now().naive_local();
    let emission = build_units(&report.reconciled, &settings, updated).map_err(|e| e.to_string())?;
    let written = output::write_outputs(&emit.output, &emission, sources)?;

    print_summary(&report, written, &emit.output);
    println!(
        "  Time:      {:.1}ms (merge: {:.1}ms)",
        start.elapsed().as_secs_f64() * 1000.0,
        merge_time.as_secs_f64() * 1000.0,
    );

    Ok(())
}

fn print_summary(report: &MergeReport, written: usize, output: &Path) {
    let reconciled = &report.reconciled;
    let missing = report.missing_sources().count();

    println!("Merged {} sources into '{}'", report.sources.len(), output.display());
    if missing > 0 {
        println!("  Missing:   {} source(s) had no content", missing);
    }
    println!("  Whitelist: {} rules", reconciled.whitelist.len());
    println!(
        "  Blocklist: {} rules ({} removed by whitelist)",
        reconciled.blocklist.len(),
        reconciled.removed
    );
    println!("  Files:     {} (1 whitelist, {} blocklist parts)", written, written - 1);
}
