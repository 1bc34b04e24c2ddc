//! copy2hash - Command-line interface for the hash-naming transfer engine.
//!
//! Parses arguments, runs the ledger pipeline end to end and prints a
//! summary. All real work happens in the engine crate.

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use engine::{
    assign_hashes, collect_metadata, create_ledger, execute_transfers, finalize, write_report,
    DigestAlgorithm, EngineError, HashNamer, Mode, NamingPolicy, ReportFormat,
};

/// copy2hash - Copy or rename files to hash-derived names
#[derive(Parser, Debug)]
#[command(name = "copy2hash")]
#[command(version)]
#[command(about = "Copy or move files to filenames derived from secure hashes")]
struct Args {
    /// Files to process; the filename string is what gets hashed
    #[arg(value_name = "FILE")]
    infile: Vec<PathBuf>,

    /// Report formats: csv, json, pkl, txt, yaml, xml, or any literal extension
    #[arg(short = 'r', long, value_name = "FORMAT", num_args = 1.., default_value = "json")]
    report: Vec<String>,

    /// Base filename (no extension) for the generated reports
    #[arg(long, value_name = "NAME", default_value = "copy_report")]
    report_name: String,

    /// Digest algorithms; repeats allowed, each adds a report column
    #[arg(short = 's', long, value_name = "ALGORITHM", num_args = 1.., default_value = "sha256")]
    sha: Vec<String>,

    /// Destination directory, created recursively if missing
    #[arg(short = 'd', long, value_name = "DIR")]
    directory: Option<PathBuf>,

    /// Move files instead of copying them
    #[arg(long = "move")]
    move_files: bool,

    /// Replace the original extension with the algorithm name
    #[arg(long)]
    extension_tag: bool,

    /// Prefix the hash name with the algorithm name
    #[arg(long)]
    prefix_tag: bool,

    /// Drop the original extension entirely (overrides the tag flags)
    #[arg(long)]
    strip_extension: bool,

    /// Enable informational log output
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    // Priority: RUST_LOG env var > --verbose flag > default "warn"
    let default_filter = if verbose { "debug" } else { "warn" };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .init();
}

fn format_duration(elapsed: std::time::Duration) -> String {
    let secs = elapsed.as_secs();
    if secs == 0 {
        return format!("{}ms", elapsed.as_millis());
    }

    let mins = secs / 60;
    let secs = secs % 60;
    if mins > 0 {
        format!("{}m {}s", mins, secs)
    } else {
        format!("{}s", secs)
    }
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let exit_code = match run_cli(&args) {
        Ok(()) => 0,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            2
        }
    };

    std::process::exit(exit_code);
}

/// Main CLI logic - separated for testability
fn run_cli(args: &Args) -> Result<(), String> {
    // Validate every algorithm token before touching the filesystem
    let mut algorithms = Vec::with_capacity(args.sha.len());
    for token in &args.sha {
        let algo: DigestAlgorithm = token
            .parse()
            .map_err(|e: EngineError| e.to_string())?;
        algorithms.push(algo);
    }

    let formats: Vec<ReportFormat> = args.report.iter().map(|t| ReportFormat::parse(t)).collect();

    let policy = NamingPolicy {
        strip_extension: args.strip_extension,
        extension_tag: args.extension_tag,
        prefix_tag: args.prefix_tag,
    };

    let mode = if args.move_files { Mode::Move } else { Mode::Copy };

    let start = Instant::now();

    let mut ledger = create_ledger(mode, algorithms).map_err(|e| e.to_string())?;
    collect_metadata(&mut ledger, &args.infile, args.directory.as_deref())
        .map_err(|e| e.to_string())?;

    let namer = HashNamer::new(policy);
    assign_hashes(&mut ledger, &namer).map_err(|e| e.to_string())?;

    let stats = execute_transfers(&mut ledger).map_err(|e| e.to_string())?;

    // The report is written even when transfers failed
    let report = finalize(ledger).map_err(|e| e.to_string())?;
    let written = write_report(&report, &args.report_name, &formats).map_err(|e| e.to_string())?;

    eprintln!();
    eprintln!("Run complete!");
    eprintln!(
        "Summary: {} completed, {} skipped, {} failed of {} attempted",
        stats.completed, stats.skipped, stats.failed, stats.attempted
    );
    eprintln!("Reports:");
    for path in &written {
        eprintln!("  {}", path.display());
    }
    eprintln!("Elapsed: {}", format_duration(start.elapsed()));

    if stats.failed > 0 {
        Err(format!(
            "{} of {} transfers failed",
            stats.failed, stats.attempted
        ))
    } else {
        Ok(())
    }
}
